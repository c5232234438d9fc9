//! Block decompression for the framed sections of the file.
//!
//! Every compressed stream is a sequence of blocks. A block starts with a
//! three-byte little-endian header whose least significant bit marks an
//! uncompressed block and whose remaining 23 bits give the body length.
//! Uncompressed bodies pass through verbatim; compressed bodies are inflated
//! whole into a scratch buffer bounded by the declared compression block
//! size.

use std::io::Read;

use bytes::{Buf, Bytes, BytesMut};
use num_enum::TryFromPrimitive;

use crate::error::{OrcError, Result};
use crate::io::stream::{PositionProvider, SeekableStream};
use crate::proto;

#[derive(TryFromPrimitive, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum CompressionKind {
    None = 0,
    Zlib = 1,
    Snappy = 2,
    Lzo = 3,
}

impl From<proto::CompressionKind> for CompressionKind {
    fn from(kind: proto::CompressionKind) -> CompressionKind {
        match kind {
            proto::CompressionKind::None => CompressionKind::None,
            proto::CompressionKind::Zlib => CompressionKind::Zlib,
            proto::CompressionKind::Snappy => CompressionKind::Snappy,
            proto::CompressionKind::Lzo => CompressionKind::Lzo,
        }
    }
}

/// Stack a block decompressor on `input` as required by `kind`.
/// `CompressionKind::None` passes the stream through untouched; LZO is
/// rejected here rather than at first read.
pub fn create_decompressor(
    kind: CompressionKind,
    input: Box<dyn SeekableStream>,
    block_size: u64,
) -> Result<Box<dyn SeekableStream>> {
    match kind {
        CompressionKind::None => Ok(input),
        CompressionKind::Zlib | CompressionKind::Snappy => {
            Ok(Box::new(DecompressStream::new(input, kind, block_size)))
        }
        CompressionKind::Lzo => Err(OrcError::not_implemented("LZO decompression")),
    }
}

/// One decoded block is live at a time; `next` serves slices of it and
/// `backup` rewinds within it.
pub struct DecompressStream {
    input: Box<dyn SeekableStream>,
    kind: CompressionKind,
    block_size: usize,
    /// Unconsumed tail of the current input window.
    pending: Bytes,
    /// The decoded block being served.
    window: Bytes,
    served: usize,
    bytes_returned: u64,
}

impl DecompressStream {
    pub fn new(
        input: Box<dyn SeekableStream>,
        kind: CompressionKind,
        block_size: u64,
    ) -> DecompressStream {
        DecompressStream {
            input,
            kind,
            block_size: (block_size as usize).max(1),
            pending: Bytes::new(),
            window: Bytes::new(),
            served: 0,
            bytes_returned: 0,
        }
    }

    fn error(&self, what: impl Into<String>) -> OrcError {
        OrcError::Compression {
            kind: self.kind,
            what: what.into(),
            offset: Some(self.input.bytes_read()),
        }
    }

    /// One byte of the compressed stream, or `None` on a clean end.
    fn input_byte(&mut self) -> Result<Option<u8>> {
        while self.pending.is_empty() {
            match self.input.next()? {
                Some(window) => self.pending = window,
                None => return Ok(None),
            }
        }
        let byte = self.pending[0];
        self.pending.advance(1);
        Ok(Some(byte))
    }

    /// The next `count` compressed bytes as one contiguous buffer,
    /// borrowing the input window when it already covers them.
    fn input_bytes(&mut self, count: usize) -> Result<Bytes> {
        if self.pending.len() >= count {
            let bytes = self.pending.slice(..count);
            self.pending = self.pending.slice(count..);
            return Ok(bytes);
        }
        let mut assembled = BytesMut::with_capacity(count);
        while assembled.len() < count {
            if self.pending.is_empty() {
                match self.input.next()? {
                    Some(window) => self.pending = window,
                    None => return Err(self.error("block body ends early")),
                }
            }
            let take = self.pending.len().min(count - assembled.len());
            assembled.extend_from_slice(&self.pending[..take]);
            self.pending = self.pending.slice(take..);
        }
        Ok(assembled.freeze())
    }

    /// Decode the next block into `self.window`. False on a clean end of
    /// the compressed stream.
    fn fill(&mut self) -> Result<bool> {
        let first = match self.input_byte()? {
            Some(byte) => byte,
            None => return Ok(false),
        };
        let second = self
            .input_byte()?
            .ok_or_else(|| self.error("block header ends early"))?;
        let third = self
            .input_byte()?
            .ok_or_else(|| self.error("block header ends early"))?;
        let header =
            u32::from(first) | (u32::from(second) << 8) | (u32::from(third) << 16);
        let is_original = header & 1 != 0;
        let length = (header >> 1) as usize;

        let body = self.input_bytes(length)?;
        if is_original {
            self.window = body;
        } else {
            let mut scratch = Vec::with_capacity(self.block_size.min(length * 4));
            match self.kind {
                CompressionKind::Zlib => {
                    flate2::read::DeflateDecoder::new(body.as_ref())
                        .read_to_end(&mut scratch)
                        .map_err(|err| self.error(err.to_string()))?;
                }
                CompressionKind::Snappy => {
                    let decoded_len = snap::raw::decompress_len(body.as_ref())
                        .map_err(|err| self.error(err.to_string()))?;
                    scratch.resize(decoded_len, 0);
                    snap::raw::Decoder::new()
                        .decompress(body.as_ref(), &mut scratch)
                        .map_err(|err| self.error(err.to_string()))?;
                }
                CompressionKind::None | CompressionKind::Lzo => {
                    return Err(self.error("codec not constructible"));
                }
            }
            if scratch.len() > self.block_size {
                return Err(self.error(format!(
                    "block inflates to {} bytes, over the {} byte limit",
                    scratch.len(),
                    self.block_size
                )));
            }
            self.window = Bytes::from(scratch);
        }
        self.served = 0;
        Ok(true)
    }
}

impl SeekableStream for DecompressStream {
    fn next(&mut self) -> Result<Option<Bytes>> {
        while self.served >= self.window.len() {
            if !self.fill()? {
                return Ok(None);
            }
            // zero-length blocks are legal; keep going
        }
        let window = self.window.slice(self.served..);
        self.served = self.window.len();
        self.bytes_returned += window.len() as u64;
        Ok(Some(window))
    }

    fn backup(&mut self, count: usize) {
        debug_assert!(count <= self.served);
        self.served -= count;
        self.bytes_returned -= count as u64;
    }

    fn skip(&mut self, mut count: u64) -> Result<bool> {
        while count > 0 {
            match self.next()? {
                Some(window) => {
                    if window.len() as u64 > count {
                        self.backup(window.len() - count as usize);
                        return Ok(true);
                    }
                    count -= window.len() as u64;
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    fn bytes_read(&self) -> u64 {
        self.bytes_returned
    }

    /// Consumes a block offset for the compressed stream and a byte offset
    /// within the decoded block.
    fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.input.seek(position)?;
        self.pending = Bytes::new();
        self.window = Bytes::new();
        self.served = 0;
        let within_block = position.next();
        if !self.skip(within_block)? {
            return Err(OrcError::parse_at("seek past end of block", within_block));
        }
        Ok(())
    }
}
