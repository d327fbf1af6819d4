//! Chunk Reader
//!
//! Pulls the next chunk from any [`std::io::Read`] source straight into the
//! free tail of a [`WorkingBuffer`]. There is no intermediate copy; the
//! buffer's raw array is the read target.

use std::io::{ErrorKind, Read};

use log::trace;

use super::working_buffer::WorkingBuffer;
use crate::error::{FilterError, Result};

/// Reads from an external byte source into a working buffer.
pub struct ChunkReader<R> {
    source: R,
    /// Total bytes pulled from the source
    total_read: usize,
    /// Set once the source reported end-of-stream
    finished: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            total_read: 0,
            finished: false,
        }
    }

    /// Read up to the buffer's remaining capacity and append it.
    ///
    /// Returns the number of bytes appended; `0` means end-of-stream.
    /// A full buffer cannot accept input, which is fatal.
    pub fn read_chunk(&mut self, buffer: &mut WorkingBuffer) -> Result<usize> {
        if self.finished {
            return Ok(0);
        }
        if buffer.is_full() {
            return Err(FilterError::CapacityExceeded {
                capacity: buffer.capacity(),
            });
        }

        let count = loop {
            match self.source.read(buffer.spare_mut()) {
                Ok(count) => break count,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(FilterError::Io(e)),
            }
        };

        if count == 0 {
            self.finished = true;
            trace!("source reached end-of-stream after {} bytes", self.total_read);
            return Ok(0);
        }

        buffer.commit(count)?;
        self.total_read += count;
        Ok(count)
    }

    /// Total bytes read so far
    pub fn total_read(&self) -> usize {
        self.total_read
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out one byte per call and fails with `Interrupted` in between.
    struct Stuttering {
        data: Vec<u8>,
        pos: usize,
        interrupt_next: bool,
    }

    impl Read for Stuttering {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(std::io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            self.interrupt_next = true;
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_reads_until_end() {
        let mut buffer = WorkingBuffer::new(64);
        let mut reader = ChunkReader::new(Cursor::new(b"hello".to_vec()));

        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 5);
        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 0);
        assert!(reader.is_finished());
        assert_eq!(buffer.redacted(), b"hello");
        assert_eq!(reader.total_read(), 5);
    }

    #[test]
    fn test_read_limited_by_capacity() {
        let mut buffer = WorkingBuffer::new(3);
        let mut reader = ChunkReader::new(Cursor::new(b"abcdef".to_vec()));

        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 3);
        let err = reader.read_chunk(&mut buffer).unwrap_err();
        assert!(matches!(err, FilterError::CapacityExceeded { capacity: 3 }));

        buffer.compact(3);
        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 3);
        assert_eq!(buffer.raw(), b"def");
    }

    #[test]
    fn test_interrupted_is_retried() {
        let mut buffer = WorkingBuffer::new(8);
        let mut reader = ChunkReader::new(Stuttering {
            data: b"ab".to_vec(),
            pos: 0,
            interrupt_next: true,
        });

        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 1);
        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 1);
        assert_eq!(reader.read_chunk(&mut buffer).unwrap(), 0);
        assert_eq!(buffer.raw(), b"ab");
    }
}
