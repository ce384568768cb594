//! File extent management
//!
//! Extents represent contiguous data regions on disk.

/// File extent (contiguous data region)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Starting byte offset on the device
    pub offset: u64,

    /// Length in bytes
    pub length: u32,
}

impl Extent {
    /// Create new extent
    pub fn new(offset: u64, length: u32) -> Self {
        Self { offset, length }
    }

    /// End offset (exclusive), `None` on overflow
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length as u64)
    }

    /// Length widened for offset arithmetic
    pub fn len(&self) -> u64 {
        self.length as u64
    }

    /// Zero-length extent?
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}
