//! Seekable streams of zero-copy byte windows.
//!
//! A stream hands out contiguous [`Bytes`] windows through `next`; `backup`
//! rewinds within the most recent window only. A seek position is an ordered
//! list of integers, one consumed per layer: byte-in-stream for the raw
//! streams here, block-offset plus byte-in-block once a decompressor is
//! stacked on top.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;

use crate::error::{OrcError, Result};
use crate::io::source::InputSource;

/// Hands out the integers of a seek position, outermost layer first.
pub struct PositionProvider<'a> {
    positions: std::slice::Iter<'a, u64>,
}

impl<'a> PositionProvider<'a> {
    pub fn new(positions: &'a [u64]) -> PositionProvider<'a> {
        PositionProvider {
            positions: positions.iter(),
        }
    }

    pub fn next(&mut self) -> u64 {
        self.positions.next().copied().unwrap_or(0)
    }
}

pub trait SeekableStream {
    /// The next contiguous window, or `None` at end of stream.
    fn next(&mut self) -> Result<Option<Bytes>>;

    /// Rewind `count` bytes within the window most recently returned.
    fn backup(&mut self, count: usize);

    /// Move forward `count` bytes. Returns false when the skip ran past the
    /// end of the stream.
    fn skip(&mut self, count: u64) -> Result<bool>;

    /// Bytes handed out so far, net of `backup`.
    fn bytes_read(&self) -> u64;

    fn seek(&mut self, position: &mut PositionProvider) -> Result<()>;
}

/// Serves an in-memory buffer in fixed-size windows.
pub struct SeekableArrayStream {
    data: Bytes,
    chunk_size: usize,
    position: usize,
}

impl SeekableArrayStream {
    pub fn new(data: impl Into<Bytes>) -> SeekableArrayStream {
        let data = data.into();
        let chunk_size = data.len().max(1);
        SeekableArrayStream {
            data,
            chunk_size,
            position: 0,
        }
    }

    /// Segment the buffer into windows of at most `chunk_size` bytes; used
    /// by tests to exercise window boundaries.
    pub fn with_chunk_size(data: impl Into<Bytes>, chunk_size: usize) -> SeekableArrayStream {
        SeekableArrayStream {
            data: data.into(),
            chunk_size: chunk_size.max(1),
            position: 0,
        }
    }
}

impl SeekableStream for SeekableArrayStream {
    fn next(&mut self) -> Result<Option<Bytes>> {
        if self.position >= self.data.len() {
            return Ok(None);
        }
        let end = (self.position + self.chunk_size).min(self.data.len());
        let window = self.data.slice(self.position..end);
        self.position = end;
        Ok(Some(window))
    }

    fn backup(&mut self, count: usize) {
        debug_assert!(count <= self.position);
        self.position = self.position.saturating_sub(count);
    }

    fn skip(&mut self, count: u64) -> Result<bool> {
        let target = self.position as u64 + count;
        if target > self.data.len() as u64 {
            self.position = self.data.len();
            return Ok(false);
        }
        self.position = target as usize;
        Ok(true)
    }

    fn bytes_read(&self) -> u64 {
        self.position as u64
    }

    fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        let target = position.next();
        if target > self.data.len() as u64 {
            return Err(OrcError::parse_at("seek past end of stream", target));
        }
        self.position = target as usize;
        Ok(())
    }
}

/// Pages `block_size` windows of a `(offset, length)` region of a shared
/// byte source. The source is shared because every column stream of a stripe
/// reads from the same file; the decoder is single-threaded, so the cell is
/// never contended.
pub struct SeekableFileStream {
    source: Rc<RefCell<dyn InputSource>>,
    start: u64,
    length: u64,
    block_size: usize,
    position: u64,
    buffer: Bytes,
    push_back: usize,
}

impl SeekableFileStream {
    pub fn new(
        source: Rc<RefCell<dyn InputSource>>,
        offset: u64,
        length: u64,
        block_size: u64,
    ) -> SeekableFileStream {
        SeekableFileStream {
            source,
            start: offset,
            length,
            block_size: (block_size as usize).max(1),
            position: 0,
            buffer: Bytes::new(),
            push_back: 0,
        }
    }
}

impl SeekableStream for SeekableFileStream {
    fn next(&mut self) -> Result<Option<Bytes>> {
        if self.push_back > 0 {
            let window = self.buffer.slice(self.buffer.len() - self.push_back..);
            self.position += window.len() as u64;
            self.push_back = 0;
            return Ok(Some(window));
        }
        let remaining = self.length - self.position;
        if remaining == 0 {
            return Ok(None);
        }
        let count = (self.block_size as u64).min(remaining) as usize;
        let mut buf = vec![0u8; count];
        self.source
            .borrow_mut()
            .read(&mut buf, self.start + self.position)?;
        self.buffer = Bytes::from(buf);
        self.position += count as u64;
        Ok(Some(self.buffer.clone()))
    }

    fn backup(&mut self, count: usize) {
        debug_assert!(self.push_back + count <= self.buffer.len());
        self.push_back += count;
        self.position -= count as u64;
    }

    fn skip(&mut self, count: u64) -> Result<bool> {
        self.push_back = 0;
        let target = self.position + count;
        if target > self.length {
            self.position = self.length;
            return Ok(false);
        }
        self.position = target;
        Ok(true)
    }

    fn bytes_read(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        let target = position.next();
        if target > self.length {
            return Err(OrcError::parse_at("seek past end of stream", target));
        }
        self.position = target;
        self.push_back = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MemorySource;

    #[test]
    fn array_stream_windows_respect_chunk_size() {
        let mut stream = SeekableArrayStream::with_chunk_size(vec![0u8, 1, 2, 3, 4, 5, 6], 3);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[0, 1, 2]);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[3, 4, 5]);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[6]);
        assert!(stream.next().unwrap().is_none());
        assert_eq!(stream.bytes_read(), 7);
    }

    #[test]
    fn array_stream_backup_reserves_window_tail() {
        let mut stream = SeekableArrayStream::with_chunk_size(vec![0u8, 1, 2, 3, 4], 4);
        stream.next().unwrap().unwrap();
        stream.backup(2);
        assert_eq!(stream.bytes_read(), 2);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[2, 3, 4]);
    }

    #[test]
    fn array_stream_skip_reports_overrun() {
        let mut stream = SeekableArrayStream::new(vec![0u8; 10]);
        assert!(stream.skip(8).unwrap());
        assert!(!stream.skip(8).unwrap());
        assert!(stream.next().unwrap().is_none());
    }

    #[test]
    fn file_stream_pages_blocks_from_the_source() {
        let source: Rc<RefCell<dyn InputSource>> = Rc::new(RefCell::new(MemorySource::new(
            (0u8..20).collect::<Vec<u8>>(),
            "twenty",
        )));
        let mut stream = SeekableFileStream::new(source, 5, 10, 4);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[5, 6, 7, 8]);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[9, 10, 11, 12]);
        stream.backup(3);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[10, 11, 12]);
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[13, 14]);
        assert!(stream.next().unwrap().is_none());
    }

    #[test]
    fn file_stream_seek_consumes_one_position() {
        let source: Rc<RefCell<dyn InputSource>> = Rc::new(RefCell::new(MemorySource::new(
            (0u8..16).collect::<Vec<u8>>(),
            "sixteen",
        )));
        let mut stream = SeekableFileStream::new(source, 0, 16, 8);
        let mut position = PositionProvider::new(&[12]);
        stream.seek(&mut position).unwrap();
        assert_eq!(stream.next().unwrap().unwrap().as_ref(), &[12, 13, 14, 15]);
    }
}
