//! Random-access byte sources.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;

use crate::error::Result;

/// Random-access reads over a named byte container.
///
/// Calls are synchronous and serial; a read that cannot fill `dst` fails
/// instead of returning short.
pub trait InputSource {
    fn read(&mut self, dst: &mut [u8], offset: u64) -> Result<()>;
    fn len(&self) -> u64;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn name(&self) -> &str;
}

/// A local file.
pub struct FileSource {
    file: File,
    length: u64,
    name: String,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<FileSource> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        Ok(FileSource {
            file,
            length,
            name: path.display().to_string(),
        })
    }
}

impl InputSource for FileSource {
    fn read(&mut self, dst: &mut [u8], offset: u64) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(dst)?;
        Ok(())
    }

    fn len(&self) -> u64 {
        self.length
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An in-memory byte buffer, mostly for tests and synthesized files.
pub struct MemorySource {
    data: Bytes,
    name: String,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>, name: impl Into<String>) -> MemorySource {
        MemorySource {
            data: data.into(),
            name: name.into(),
        }
    }
}

impl InputSource for MemorySource {
    fn read(&mut self, dst: &mut [u8], offset: u64) -> Result<()> {
        let start = offset as usize;
        let end = start + dst.len();
        if end > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read of {}..{} past end of {}", start, end, self.name),
            )
            .into());
        }
        dst.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn read_local_file(path: impl AsRef<Path>) -> Result<FileSource> {
    FileSource::open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_reads_at_offset() {
        let mut source = MemorySource::new(vec![1u8, 2, 3, 4, 5], "five");
        let mut buf = [0u8; 3];
        source.read(&mut buf, 1).unwrap();
        assert_eq!(buf, [2, 3, 4]);
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn short_read_fails() {
        let mut source = MemorySource::new(vec![1u8, 2, 3], "three");
        let mut buf = [0u8; 3];
        assert!(source.read(&mut buf, 1).is_err());
    }
}
