//! stat, statvfs, read, search and path lookup on a mounted volume

use crate::device::BlockDevice;
use crate::directory::iterator::DirectoryIterator;
use crate::directory::Entry;
use crate::error::{FsResult, Iso9660Error, Result};
use crate::file::{self, extent::Extent};
use crate::types::{Inode, Stat, StatVfs, DIRENT_SIZE, MAX_DIRECTORY_DEPTH, MAX_RECORD_LEN};
use crate::volume::Volume;

impl<D: BlockDevice, const N: usize> Volume<D, N> {
    /// Decoded record at `inode`; padding is not a valid target.
    fn resolve(&mut self, inode: Inode) -> Result<Entry> {
        self.translate(inode, MAX_RECORD_LEN as u64)?.into_entry()
    }

    /// File status of `inode`
    pub fn stat(&mut self, inode: Inode) -> FsResult<Stat> {
        Ok(self.resolve(inode)?.stat)
    }

    /// Filesystem statistics; never any free blocks
    pub fn statvfs(&self) -> StatVfs {
        StatVfs {
            block_size: self.block_size(),
            blocks_total: self.descriptor().volume_space_size as u64,
            blocks_free: 0,
        }
    }

    /// Read from `inode` at `offset`
    ///
    /// Files return their bytes. Directories return a stream of
    /// [`DIRENT_SIZE`]-byte serialized [`Dirent`](crate::types::Dirent)s,
    /// one per record; `offset` addresses that stream. Each call walks the
    /// directory from its first record, so sequential reads are the cheap
    /// access pattern. Returns 0 at end of file or directory.
    pub fn read(&mut self, inode: Inode, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        let entry = self.resolve(inode)?;

        if entry.stat.is_dir() {
            return self.read_directory(&entry.extent, offset, buf);
        }

        Ok(file::read_extent(self.device_mut(), &entry.extent, offset, buf)?)
    }

    fn read_directory(&mut self, extent: &Extent, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        let which = offset / DIRENT_SIZE as u64;
        let mut fraction = (offset % DIRENT_SIZE as u64) as usize;
        let mut entries = DirectoryIterator::new(self, extent);

        for _ in 0..which {
            match entries.next() {
                Some(entry) => {
                    entry?;
                }
                None => return Ok(0),
            }
        }

        let mut filled = 0;
        while filled < buf.len() {
            let Some(entry) = entries.next() else {
                break;
            };
            let bytes = entry?.dirent.to_bytes();
            let chunk = &bytes[fraction..];
            let n = chunk.len().min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&chunk[..n]);
            filled += n;
            fraction = 0;
        }

        Ok(filled)
    }

    /// Find `name` in directory `dir`
    ///
    /// Names compare exactly against the synthesized entry names, so "." and
    /// ".." resolve too.
    pub fn search(&mut self, dir: Inode, name: &str) -> FsResult<Inode> {
        let entry = self.resolve(dir)?;
        if !entry.stat.is_dir() {
            return Err(Iso9660Error::NotADirectory.into());
        }

        for child in DirectoryIterator::new(self, &entry.extent) {
            let child = child?;
            if child.dirent.name() == name.as_bytes() {
                return Ok(child.dirent.ino);
            }
        }

        Err(Iso9660Error::NotFound.into())
    }

    /// Resolve an absolute path from the root
    ///
    /// Empty components are ignored, so "", "/" and "//" name the root.
    pub fn lookup_path(&mut self, path: &str) -> FsResult<Inode> {
        let components = path.split('/').filter(|c| !c.is_empty());
        if components.clone().count() > MAX_DIRECTORY_DEPTH {
            return Err(Iso9660Error::PathTooLong.into());
        }

        let mut current = self.root_ino();
        for component in components {
            current = self.search(current, component)?;
        }

        Ok(current)
    }
}
