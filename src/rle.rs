//! Run-length decoders for integer, byte, and boolean streams.
//!
//! Integer streams come in two encodings selected by the column encoding
//! kind: `DIRECT`/`DICTIONARY` use v1, `DIRECT_V2`/`DICTIONARY_V2` use v2.
//! PRESENT bitmaps are byte-RLE of packed bytes, unpacked bit by bit.

pub mod byte_rle;
pub mod v1;
pub mod v2;

use bytes::Bytes;

use crate::error::{OrcError, Result};
use crate::io::stream::{PositionProvider, SeekableStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleVersion {
    V1,
    V2,
}

/// Decodes an integer stream into caller-supplied `i64` slots.
pub trait IntRleDecoder {
    /// Reposition the underlying stream and then skip the number of records
    /// given by the next position value.
    fn seek(&mut self, position: &mut PositionProvider) -> Result<()>;

    fn skip(&mut self, count: u64) -> Result<()>;

    /// Fill every slot of `data`, except that slots with
    /// `not_null[i] == 0` are left untouched and consume nothing from the
    /// stream.
    fn next(&mut self, data: &mut [i64], not_null: Option<&[u8]>) -> Result<()>;
}

pub fn create_rle_decoder(
    input: Box<dyn SeekableStream>,
    signed: bool,
    version: RleVersion,
) -> Box<dyn IntRleDecoder> {
    match version {
        RleVersion::V1 => Box::new(v1::RleDecoderV1::new(input, signed)),
        RleVersion::V2 => Box::new(v2::RleDecoderV2::new(input, signed)),
    }
}

/// `(x >> 1) ^ -(x & 1)`, the inverse of the zig-zag transform.
#[inline]
pub(crate) fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Byte-level access over a seekable stream: refills windows on demand and
/// frames the variable-length integers used by run headers.
pub(crate) struct ByteReader {
    input: Box<dyn SeekableStream>,
    window: Bytes,
    position: usize,
}

impl ByteReader {
    pub fn new(input: Box<dyn SeekableStream>) -> ByteReader {
        ByteReader {
            input,
            window: Bytes::new(),
            position: 0,
        }
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        while self.position >= self.window.len() {
            match self.input.next()? {
                Some(window) => {
                    self.window = window;
                    self.position = 0;
                }
                None => return Err(OrcError::eof("run header or body")),
            }
        }
        let byte = self.window[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Base-128 varint, 7-bit groups little-endian first.
    pub fn read_vulong(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut offset: u32 = 0;
        loop {
            let byte = self.read_byte()?;
            result |= u64::from(byte & 0x7f).wrapping_shl(offset);
            if byte < 0x80 {
                return Ok(result);
            }
            offset += 7;
        }
    }

    pub fn read_vslong(&mut self) -> Result<i64> {
        Ok(unzigzag(self.read_vulong()?))
    }

    /// Big-endian unsigned integer of `count` bytes, `count` in `1..=8`.
    pub fn read_long_be(&mut self, count: u32) -> Result<u64> {
        let mut result: u64 = 0;
        for _ in 0..count {
            result = (result << 8) | u64::from(self.read_byte()?);
        }
        Ok(result)
    }

    /// Advance the stream without decoding.
    pub fn skip_bytes(&mut self, count: u64) -> Result<()> {
        let buffered = (self.window.len() - self.position) as u64;
        if count <= buffered {
            self.position += count as usize;
            return Ok(());
        }
        self.position = self.window.len();
        if !self.input.skip(count - buffered)? {
            return Err(OrcError::eof("byte skip"));
        }
        Ok(())
    }

    /// Reposition the stream, dropping the buffered window.
    pub fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.input.seek(position)?;
        self.window = Bytes::new();
        self.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::stream::SeekableArrayStream;

    fn reader(bytes: Vec<u8>) -> ByteReader {
        ByteReader::new(Box::new(SeekableArrayStream::with_chunk_size(bytes, 2)))
    }

    #[test]
    fn vulong_accumulates_seven_bit_groups() {
        let mut r = reader(vec![0x00, 0x7f, 0x80, 0x01, 0xac, 0x02, 0xff, 0x7f]);
        assert_eq!(r.read_vulong().unwrap(), 0);
        assert_eq!(r.read_vulong().unwrap(), 127);
        assert_eq!(r.read_vulong().unwrap(), 128);
        assert_eq!(r.read_vulong().unwrap(), 300);
        assert_eq!(r.read_vulong().unwrap(), 16383);
    }

    #[test]
    fn vslong_unzigzags() {
        let mut r = reader(vec![0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(r.read_vslong().unwrap(), 0);
        assert_eq!(r.read_vslong().unwrap(), -1);
        assert_eq!(r.read_vslong().unwrap(), 1);
        assert_eq!(r.read_vslong().unwrap(), -2);
        assert_eq!(r.read_vslong().unwrap(), 2);
    }

    #[test]
    fn long_be_is_big_endian() {
        let mut r = reader(vec![0x12, 0x34, 0x56, 0x78]);
        assert_eq!(r.read_long_be(3).unwrap(), 0x123456);
        assert_eq!(r.read_long_be(1).unwrap(), 0x78);
    }

    #[test]
    fn read_past_end_reports_eof() {
        let mut r = reader(vec![0x80]);
        assert!(matches!(r.read_vulong(), Err(OrcError::Parse { .. })));
    }

    #[test]
    fn unzigzag_maps_back_to_signed() {
        assert_eq!(unzigzag(0), 0);
        assert_eq!(unzigzag(1), -1);
        assert_eq!(unzigzag(2), 1);
        assert_eq!(unzigzag(u64::MAX), i64::MIN);
        assert_eq!(unzigzag(u64::MAX - 1), i64::MAX);
    }
}
