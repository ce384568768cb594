//! Directory iteration
//!
//! Walks the records of one directory extent in on-disk order, through the
//! volume's translation cache. Padding is skipped and never yielded; "." and
//! ".." are yielded like any other entry.

use crate::device::BlockDevice;
use crate::directory::Entry;
use crate::error::{Iso9660Error, Result};
use crate::file::extent::Extent;
use crate::types::Inode;
use crate::volume::Volume;

/// Directory iterator
pub struct DirectoryIterator<'a, D: BlockDevice, const N: usize> {
    volume: &'a mut Volume<D, N>,
    position: u64,
    end: u64,
    failed: bool,
}

impl<'a, D: BlockDevice, const N: usize> DirectoryIterator<'a, D, N> {
    /// Create new directory iterator over a directory's extent
    pub fn new(volume: &'a mut Volume<D, N>, extent: &Extent) -> Self {
        Self {
            volume,
            position: extent.offset,
            end: extent.offset.saturating_add(extent.len()),
            failed: false,
        }
    }
}

impl<D: BlockDevice, const N: usize> Iterator for DirectoryIterator<'_, D, N> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Check if we've read all directory data
            if self.failed || self.position >= self.end {
                return None;
            }

            let remaining = self.end - self.position;
            let translation = match self.volume.translate(Inode(self.position), remaining) {
                Ok(t) => t,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            if translation.consumed > remaining {
                // Padding may run past a directory that ends mid-block
                if translation.entry.is_none() {
                    self.position = self.end;
                    return None;
                }
                self.failed = true;
                return Some(Err(Iso9660Error::InvalidDirectoryRecord));
            }

            self.position += translation.consumed;

            if let Some(entry) = translation.entry {
                return Some(Ok(entry));
            }
        }
    }
}
