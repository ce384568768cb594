//! Filesystem operations exposed to the VFS
//!
//! The operations themselves live on [`Volume`]. [`Iso9660Fs`] is the mount
//! slot a kernel keeps for its one card: empty until a volume is recognized,
//! and every operation answers `ENXIO` while it is.

mod ops;

use crate::device::BlockDevice;
use crate::error::{Errno, FsResult};
use crate::types::{Inode, Stat, StatVfs, CACHE_ENTRIES};
use crate::volume::Volume;
use log::warn;

/// Mount slot for one ISO9660 volume
pub struct Iso9660Fs<D: BlockDevice, const N: usize = CACHE_ENTRIES> {
    volume: Option<Volume<D, N>>,
}

impl<D: BlockDevice, const N: usize> Iso9660Fs<D, N> {
    /// An empty, unmounted slot
    pub const fn new() -> Self {
        Self { volume: None }
    }

    /// Recognize the volume on `device` and mount it
    ///
    /// Any failure to find or validate a volume is `ENXIO`; the slot is left
    /// as it was.
    pub fn mount(&mut self, device: D) -> FsResult<()> {
        match Volume::init(device) {
            Ok(volume) => {
                self.volume = Some(volume);
                Ok(())
            }
            Err(err) => {
                if !err.is_mount_failure() {
                    warn!("isofs: device error while locating volume: {}", err);
                }
                Err(Errno::NotMounted)
            }
        }
    }

    /// Is a volume mounted?
    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    /// The mounted volume
    pub fn volume(&mut self) -> FsResult<&mut Volume<D, N>> {
        self.volume.as_mut().ok_or(Errno::NotMounted)
    }

    /// Filesystem size in bytes
    pub fn fs_len(&self) -> FsResult<u64> {
        self.volume.as_ref().map(Volume::fs_len).ok_or(Errno::NotMounted)
    }

    /// Inode of the root directory
    pub fn root_ino(&self) -> FsResult<Inode> {
        self.volume.as_ref().map(Volume::root_ino).ok_or(Errno::NotMounted)
    }

    /// See [`Volume::stat`]
    pub fn stat(&mut self, inode: Inode) -> FsResult<Stat> {
        self.volume()?.stat(inode)
    }

    /// See [`Volume::statvfs`]
    pub fn statvfs(&self) -> FsResult<StatVfs> {
        self.volume.as_ref().map(Volume::statvfs).ok_or(Errno::NotMounted)
    }

    /// See [`Volume::read`]
    pub fn read(&mut self, inode: Inode, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        self.volume()?.read(inode, offset, buf)
    }

    /// See [`Volume::search`]
    pub fn search(&mut self, dir: Inode, name: &str) -> FsResult<Inode> {
        self.volume()?.search(dir, name)
    }

    /// See [`Volume::lookup_path`]
    pub fn lookup_path(&mut self, path: &str) -> FsResult<Inode> {
        self.volume()?.lookup_path(path)
    }
}

impl<D: BlockDevice, const N: usize> Default for Iso9660Fs<D, N> {
    fn default() -> Self {
        Self::new()
    }
}
