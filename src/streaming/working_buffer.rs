//! Working Buffer for Bounded-Memory Redaction
//!
//! CRITICAL: Memory usage is FLAT regardless of stream length.
//! This buffer:
//! - Pre-allocates two fixed-size byte arrays (raw input, redacted output)
//! - Never grows; running out of room is reported, never paginated around
//! - Keeps both arrays the same valid length at all times
//! - Shifts the unflushed tail to the front after every flush

use crate::error::{FilterError, Result};

/// Paired raw/redacted storage carried between chunks.
///
/// `raw[..len]` is untouched input. `redacted[..len]` starts as a copy of it
/// and is only ever changed by the scanner replacing digits with the mask.
pub struct WorkingBuffer {
    /// Input bytes exactly as read
    raw: Vec<u8>,
    /// Output bytes, same length and positions as `raw`
    redacted: Vec<u8>,
    /// Number of valid bytes in both arrays
    len: usize,
}

impl WorkingBuffer {
    /// Create with fixed capacity - NO dynamic growth
    pub fn new(capacity: usize) -> Self {
        Self {
            raw: vec![0u8; capacity],
            redacted: vec![0u8; capacity],
            len: 0,
        }
    }

    /// Fixed capacity in bytes
    pub fn capacity(&self) -> usize {
        self.raw.len()
    }

    /// Number of valid bytes currently held
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left before the buffer is full
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append bytes to the end of the valid region.
    ///
    /// Fails without modifying the buffer if `bytes` does not fit.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(FilterError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        let end = self.len + bytes.len();
        self.raw[self.len..end].copy_from_slice(bytes);
        self.redacted[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    /// Unused tail of the raw array, for reading input in place.
    ///
    /// Bytes written here become valid only after [`commit`](Self::commit).
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.raw[self.len..]
    }

    /// Mark `count` bytes written through [`spare_mut`](Self::spare_mut) as
    /// valid, mirroring them into the redacted array.
    pub fn commit(&mut self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(FilterError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        let end = self.len + count;
        let (raw, redacted) = (&self.raw[self.len..end], &mut self.redacted[self.len..end]);
        redacted.copy_from_slice(raw);
        self.len = end;
        Ok(())
    }

    /// Drop `[0, from)` and shift `[from, len)` down to the start.
    pub fn compact(&mut self, from: usize) {
        let from = from.min(self.len);
        if from == 0 {
            return;
        }
        self.raw.copy_within(from..self.len, 0);
        self.redacted.copy_within(from..self.len, 0);
        self.len -= from;
    }

    /// Raw bytes read-only and redacted bytes mutable, both `len()` long.
    pub fn scan_view(&mut self) -> (&[u8], &mut [u8]) {
        (&self.raw[..self.len], &mut self.redacted[..self.len])
    }

    /// Valid raw input
    pub fn raw(&self) -> &[u8] {
        &self.raw[..self.len]
    }

    /// Valid redacted output
    pub fn redacted(&self) -> &[u8] {
        &self.redacted[..self.len]
    }

    /// Forget all content (allocation is kept)
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_copies_both_sides() {
        let mut buffer = WorkingBuffer::new(16);
        buffer.append(b"abc").unwrap();

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.raw(), b"abc");
        assert_eq!(buffer.redacted(), b"abc");
    }

    #[test]
    fn test_memory_limit() {
        let mut buffer = WorkingBuffer::new(4);
        buffer.append(b"abcd").unwrap();
        assert!(buffer.is_full());

        let err = buffer.append(b"e").unwrap_err();
        assert!(matches!(err, FilterError::CapacityExceeded { capacity: 4 }));
        // Verify buffer doesn't grow beyond capacity
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.raw.len(), 4);
    }

    #[test]
    fn test_oversized_append_leaves_buffer_untouched() {
        let mut buffer = WorkingBuffer::new(4);
        buffer.append(b"ab").unwrap();
        assert!(buffer.append(b"cde").is_err());
        assert_eq!(buffer.raw(), b"ab");
    }

    #[test]
    fn test_spare_and_commit() {
        let mut buffer = WorkingBuffer::new(8);
        buffer.append(b"ab").unwrap();

        let spare = buffer.spare_mut();
        assert_eq!(spare.len(), 6);
        spare[..3].copy_from_slice(b"cde");
        buffer.commit(3).unwrap();

        assert_eq!(buffer.raw(), b"abcde");
        assert_eq!(buffer.redacted(), b"abcde");
        assert!(buffer.commit(4).is_err());
    }

    #[test]
    fn test_compact_keeps_redactions() {
        let mut buffer = WorkingBuffer::new(8);
        buffer.append(b"ab12").unwrap();
        {
            let (_, redacted) = buffer.scan_view();
            redacted[2] = b'X';
        }

        buffer.compact(2);
        assert_eq!(buffer.raw(), b"12");
        assert_eq!(buffer.redacted(), b"X2");
        assert_eq!(buffer.remaining(), 6);
    }

    #[test]
    fn test_compact_everything() {
        let mut buffer = WorkingBuffer::new(8);
        buffer.append(b"abc").unwrap();
        buffer.compact(3);
        assert!(buffer.is_empty());

        buffer.append(b"z").unwrap();
        buffer.compact(0);
        assert_eq!(buffer.raw(), b"z");
    }

    #[test]
    fn test_reset() {
        let mut buffer = WorkingBuffer::new(8);
        buffer.append(b"data").unwrap();
        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 8);
    }
}
