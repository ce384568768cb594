//! Directory record parsing
//!
//! Turns one on-disk directory record into the POSIX-shaped triple the
//! filesystem layer works with: a [`Stat`], a [`Dirent`] and the [`Extent`]
//! holding the file's bytes (or, for a directory, its child records).

pub mod iterator;
pub mod record;

use crate::device::BlockDevice;
use crate::error::{Iso9660Error, Result};
use crate::extensions::rock_ridge::RockRidgeFields;
use crate::file::extent::Extent;
use crate::types::{
    Dirent, FileType, Inode, Stat, DIRENT_NAME_LEN, MAX_RECORD_LEN, S_IFDIR, S_IFREG,
};
use crate::utils::{sector, string};
use log::warn;
use record::DirectoryRecord;

/// Read-only permission granted to every file without a PX entry
const DEFAULT_PERMISSIONS: u32 = 0o444;

/// Execute bits added for identifiers with the executable suffix
const EXECUTE_PERMISSIONS: u32 = 0o111;

/// A decoded directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Directory entry
    pub dirent: Dirent,
    /// File status
    pub stat: Stat,
    /// Where the content lives
    pub extent: Extent,
}

/// Result of translating the bytes at one inode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Bytes to advance to reach the next record
    pub consumed: u64,
    /// `None` for padding up to the end of a logical block
    pub entry: Option<Entry>,
}

impl Translation {
    /// The decoded record, or [`Iso9660Error::NoEntry`] for padding
    pub fn into_entry(self) -> Result<Entry> {
        self.entry.ok_or(Iso9660Error::NoEntry)
    }
}

/// Something that can translate the record at an inode.
pub trait Translate {
    /// Decode the record at `inode`, reading at most `max_len` bytes
    fn translate(&mut self, inode: Inode, max_len: u64) -> Result<Translation>;
}

/// Parses directory records straight from the device.
pub struct EntryParser<'a, D: BlockDevice + ?Sized> {
    device: &'a mut D,
    block_size: u64,
}

impl<'a, D: BlockDevice + ?Sized> EntryParser<'a, D> {
    /// Create a parser for a volume with the given logical block size
    pub fn new(device: &'a mut D, block_size: u64) -> Self {
        Self { device, block_size }
    }
}

impl<D: BlockDevice + ?Sized> Translate for EntryParser<'_, D> {
    fn translate(&mut self, inode: Inode, max_len: u64) -> Result<Translation> {
        let device_size = self.device.size();
        let offset = inode.offset();
        if offset >= device_size {
            return Err(Iso9660Error::IoError);
        }

        let max_len = max_len.min(device_size - offset);
        let want = max_len.min(MAX_RECORD_LEN as u64) as usize;
        let mut raw = [0u8; MAX_RECORD_LEN];
        let raw = &mut raw[..want];
        self.device.read_at(offset, raw)?;

        match raw.first() {
            None => return Err(Iso9660Error::InvalidDirectoryRecord),
            Some(0) => {
                let consumed = sector::bytes_to_boundary(offset, self.block_size)
                    .ok_or(Iso9660Error::InvalidDirectoryRecord)?;
                return Ok(Translation {
                    consumed,
                    entry: None,
                });
            }
            Some(_) => {}
        }

        let record = DirectoryRecord::parse(raw).inspect_err(|_| {
            warn!("isofs: malformed directory record at {}", inode);
        })?;

        let extent = Extent::new(
            record.get_extent_lba() as u64 * self.block_size,
            record.get_data_length(),
        );
        if extent.end().map_or(true, |end| end > device_size) {
            warn!("isofs: extent of {} runs past the device", inode);
            return Err(Iso9660Error::ExtentOutOfBounds);
        }

        if record.file_identifier().len() >= DIRENT_NAME_LEN {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        let susp = if cfg!(feature = "rock-ridge") {
            RockRidgeFields::scan(record.system_use()).inspect_err(|_| {
                warn!("isofs: malformed system use area at {}", inode);
            })?
        } else {
            RockRidgeFields::default()
        };

        Ok(Translation {
            consumed: record.length() as u64,
            entry: Some(Entry {
                dirent: synthesize_dirent(inode, &record, &susp),
                stat: synthesize_stat(inode, &record, &susp),
                extent,
            }),
        })
    }
}

/// Build the file status for a record
fn synthesize_stat(inode: Inode, record: &DirectoryRecord<'_>, susp: &RockRidgeFields<'_>) -> Stat {
    let (mode, uid, gid) = match susp.posix {
        Some(px) => {
            let mode = match px.file_type() {
                Some(file_type) => file_type.mode_bits() | px.permissions(),
                None => S_IFREG,
            };
            (mode, px.uid, px.gid)
        }
        None if record.is_directory() => (S_IFDIR | DEFAULT_PERMISSIONS, 0, 0),
        None => {
            let mut mode = FileType::Regular.mode_bits() | DEFAULT_PERMISSIONS;
            if string::is_executable_name(record.file_identifier()) {
                mode |= EXECUTE_PERMISSIONS;
            }
            (mode, 0, 0)
        }
    };

    let size = record.get_data_length() as u64;
    Stat {
        ino: inode,
        mode,
        nlink: 1,
        uid,
        gid,
        size,
        used: size,
    }
}

/// Build the directory entry for a record
fn synthesize_dirent(
    inode: Inode,
    record: &DirectoryRecord<'_>,
    susp: &RockRidgeFields<'_>,
) -> Dirent {
    let id = record.file_identifier();
    let name = match susp.alternate_name {
        // "." and ".." keep their names whatever NM says
        Some(alternate) if id != string::CURRENT_DIR_ID && id != string::PARENT_DIR_ID => {
            alternate
        }
        _ => string::display_name(id),
    };
    Dirent::new(inode, name)
}
