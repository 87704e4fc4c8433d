//! Working storage for in-progress record fields.
//!
//! Every parser owns one region per field it accumulates (name, sequence,
//! quality, or a whole table line). A region is a growable byte buffer that
//! steps through a fixed ladder of size classes; bytes already written are
//! preserved across growth, so a record can straddle a growth step. Regions
//! are allocated once at parser construction and reused for every record.

use crate::error::{BiochunkError, Result};

/// Small storage size class (1 KiB). Record names and table lines start here.
pub const SMALL_STORAGE: usize = 1024;

/// Medium storage size class (8 MiB). Sequence and quality regions start here.
pub const MEDIUM_STORAGE: usize = 8 * 1024 * 1024;

/// Large storage size class (512 MiB). The growth ceiling for any region.
pub const LARGE_STORAGE: usize = 512 * 1024 * 1024;

fn next_class(class: usize) -> Option<usize> {
    if class < MEDIUM_STORAGE {
        Some(MEDIUM_STORAGE)
    } else if class < LARGE_STORAGE {
        Some(LARGE_STORAGE)
    } else {
        None
    }
}

/// One field region of a parser's working storage.
pub(crate) struct Region {
    buf: Vec<u8>,
    class: usize,
    grows: bool,
}

impl Region {
    /// A region that grows through the size-class ladder up to
    /// [`LARGE_STORAGE`]; writes beyond that fail with `StorageExceeded`.
    pub fn growable(class: usize) -> Self {
        Region {
            buf: Vec::with_capacity(class),
            class,
            grows: true,
        }
    }

    /// A region fixed at `class` bytes; writes beyond it are dropped.
    /// Used for record names, which are clipped rather than grown.
    pub fn clipped(class: usize) -> Self {
        Region {
            buf: Vec::with_capacity(class),
            class,
            grows: false,
        }
    }

    /// Append one byte, growing to the next size class when full.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.buf.len() == self.class {
            if !self.grows {
                return Ok(());
            }
            let next = next_class(self.class).ok_or(BiochunkError::StorageExceeded {
                limit: LARGE_STORAGE,
            })?;
            self.buf.reserve_exact(next - self.buf.len());
            self.class = next;
        }
        self.buf.push(byte);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Forget the accumulated bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Drop trailing ASCII whitespace from the accumulated bytes.
    pub fn trim_end(&mut self) {
        while let Some(byte) = self.buf.last() {
            if byte.is_ascii_whitespace() {
                self.buf.pop();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_region_drops_overflow() {
        let mut region = Region::clipped(4);
        for byte in b"abcdef" {
            region.push(*byte).unwrap();
        }
        assert_eq!(region.as_slice(), b"abcd");
    }

    #[test]
    fn growable_region_steps_to_next_class() {
        // Start one byte short of a tiny class to force growth early.
        let mut region = Region::growable(2);
        for byte in b"abcdef" {
            region.push(*byte).unwrap();
        }
        assert_eq!(region.as_slice(), b"abcdef");
    }

    #[test]
    fn ladder_tops_out_at_large() {
        assert_eq!(next_class(SMALL_STORAGE), Some(MEDIUM_STORAGE));
        assert_eq!(next_class(MEDIUM_STORAGE), Some(LARGE_STORAGE));
        assert_eq!(next_class(LARGE_STORAGE), None);
    }

    #[test]
    fn trim_end_strips_whitespace_only() {
        let mut region = Region::growable(SMALL_STORAGE);
        for byte in b"read1 \t\r\n" {
            region.push(*byte).unwrap();
        }
        region.trim_end();
        assert_eq!(region.as_slice(), b"read1");

        region.clear();
        assert!(region.is_empty());
        region.trim_end();
        assert_eq!(region.len(), 0);
    }
}
