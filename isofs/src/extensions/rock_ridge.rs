//! Rock Ridge extension support
//!
//! Rock Ridge adds POSIX filesystem semantics (permissions, symlinks, long names)
//! through System Use Sharing Protocol entries stored after the file identifier
//! of each directory record.

use crate::error::{Iso9660Error, Result};
use crate::types::FileType;
use log::trace;

/// System Use Entry header length: signature, length, version
pub const ENTRY_HEADER_LEN: usize = 4;

/// One System Use entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemUseEntry<'a> {
    /// Signature (2 bytes, e.g. "PX", "NM")
    pub signature: [u8; 2],
    /// Entry version
    pub version: u8,
    /// Entry-specific data after the header
    pub data: &'a [u8],
}

/// Iterator over the System Use entries of one record
pub struct SystemUseEntries<'a> {
    area: &'a [u8],
}

impl<'a> SystemUseEntries<'a> {
    /// Iterate `area`, the System Use bytes of a directory record
    pub fn new(area: &'a [u8]) -> Self {
        Self { area }
    }
}

impl<'a> Iterator for SystemUseEntries<'a> {
    type Item = Result<SystemUseEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.area.len() < ENTRY_HEADER_LEN {
            return None;
        }

        let len = self.area[2] as usize;
        // Zero fill after the last entry
        if len < ENTRY_HEADER_LEN {
            self.area = &[];
            return None;
        }
        if len > self.area.len() {
            self.area = &[];
            return Some(Err(Iso9660Error::InvalidDirectoryRecord));
        }

        let (entry, rest) = self.area.split_at(len);
        self.area = if &entry[..2] == signatures::TERMINATOR { &[] } else { rest };

        Some(Ok(SystemUseEntry {
            signature: [entry[0], entry[1]],
            version: entry[3],
            data: &entry[ENTRY_HEADER_LEN..],
        }))
    }
}

/// POSIX file attributes (PX entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixAttributes {
    /// File mode (POSIX encoding)
    pub mode: u32,
    /// Number of links
    pub links: u32,
    /// User ID
    pub uid: u32,
    /// Group ID
    pub gid: u32,
}

impl PosixAttributes {
    /// Decode the data of a PX entry (both-endian fields, LE half read)
    pub fn parse(data: &[u8]) -> Result<Self> {
        let field = |index: usize| {
            data.get(index * 8..index * 8 + 4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        };

        Ok(Self {
            mode: field(0).ok_or(Iso9660Error::InvalidDirectoryRecord)?,
            links: field(1).unwrap_or(1),
            uid: field(2).unwrap_or(0),
            gid: field(3).unwrap_or(0),
        })
    }

    /// File type from the POSIX type bits, if it is one we know
    pub const fn file_type(&self) -> Option<FileType> {
        match self.mode & posix::S_IFMT {
            posix::S_IFREG => Some(FileType::Regular),
            posix::S_IFDIR => Some(FileType::Directory),
            posix::S_IFLNK => Some(FileType::Symlink),
            posix::S_IFIFO => Some(FileType::Fifo),
            posix::S_IFCHR => Some(FileType::CharDevice),
            posix::S_IFBLK => Some(FileType::BlockDevice),
            posix::S_IFSOCK => Some(FileType::Socket),
            _ => None,
        }
    }

    /// Permission bits (including setuid, setgid, sticky)
    pub const fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// Rock Ridge fields found in one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RockRidgeFields<'a> {
    /// `RR` marker present
    pub marker: bool,
    /// Alternate name (NM data after the flags byte)
    pub alternate_name: Option<&'a [u8]>,
    /// POSIX attributes
    pub posix: Option<PosixAttributes>,
}

impl<'a> RockRidgeFields<'a> {
    /// Collect RR, NM and PX from a System Use area.
    ///
    /// A repeated entry replaces the earlier one. An area starting with a
    /// space is filler, not SUSP.
    pub fn scan(area: &'a [u8]) -> Result<Self> {
        let mut fields = Self::default();

        if area.len() < ENTRY_HEADER_LEN || area[0] == b' ' {
            return Ok(fields);
        }

        for entry in SystemUseEntries::new(area) {
            let entry = entry?;
            trace!(
                "isofs: susp {}{} len {}",
                entry.signature[0] as char,
                entry.signature[1] as char,
                entry.data.len() + ENTRY_HEADER_LEN
            );

            match &entry.signature {
                signatures::ROCK_RIDGE => fields.marker = true,
                signatures::ALTERNATE_NAME => {
                    // First data byte is the NM flags field
                    fields.alternate_name = Some(entry.data.get(1..).unwrap_or(&[]));
                }
                signatures::POSIX_ATTRS => {
                    fields.posix = Some(PosixAttributes::parse(entry.data)?);
                }
                _ => {}
            }
        }

        Ok(fields)
    }
}

/// POSIX file type constants as recorded in PX entries
pub mod posix {
    /// File type mask
    pub const S_IFMT: u32 = 0o170000;
    /// Socket
    pub const S_IFSOCK: u32 = 0o140000;
    /// Symbolic link
    pub const S_IFLNK: u32 = 0o120000;
    /// Regular file
    pub const S_IFREG: u32 = 0o100000;
    /// Block device
    pub const S_IFBLK: u32 = 0o060000;
    /// Directory
    pub const S_IFDIR: u32 = 0o040000;
    /// Character device
    pub const S_IFCHR: u32 = 0o020000;
    /// FIFO
    pub const S_IFIFO: u32 = 0o010000;
}

/// Signature constants
pub mod signatures {
    /// Rock Ridge extensions in use (RRIP 1.09)
    pub const ROCK_RIDGE: &[u8; 2] = b"RR";
    /// POSIX file attributes signature
    pub const POSIX_ATTRS: &[u8; 2] = b"PX";
    /// Alternate name signature
    pub const ALTERNATE_NAME: &[u8; 2] = b"NM";
    /// SUSP terminator
    pub const TERMINATOR: &[u8; 2] = b"ST";
}
