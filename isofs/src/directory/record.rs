//! Directory Record structure
//!
//! Directory records describe files and subdirectories.
//!
//! Layout (ECMA-119 9.1), offsets from the start of the record:
//!
//! | BP    | Field                               |
//! |-------|-------------------------------------|
//! | 0     | Length of directory record          |
//! | 1     | Extended attribute record length    |
//! | 2-9   | Extent location (both-endian)       |
//! | 10-17 | Data length (both-endian)           |
//! | 18-24 | Recording date and time             |
//! | 25    | File flags                          |
//! | 26    | File unit size                      |
//! | 27    | Interleave gap size                 |
//! | 28-31 | Volume sequence number              |
//! | 32    | File identifier length              |
//! | 33-   | File identifier, padding, system use|

use crate::error::{Iso9660Error, Result};
use crate::types::FileFlags;

const EXTENT_LBA: usize = 2;
const DATA_LENGTH: usize = 10;
const FILE_FLAGS: usize = 25;
const FILE_ID_LEN: usize = 32;

/// Borrowed view of one directory record
#[derive(Debug, Clone, Copy)]
pub struct DirectoryRecord<'a> {
    bytes: &'a [u8],
}

impl<'a> DirectoryRecord<'a> {
    /// Fixed part, before the file identifier
    pub const FIXED_LENGTH: usize = 33;

    /// Minimum record length (fixed part plus a one-byte identifier)
    pub const MIN_LENGTH: usize = 34;

    /// Parse directory record from bytes
    ///
    /// `data` may extend past the record; the view is trimmed to the
    /// record's own length.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let length = *data.first().ok_or(Iso9660Error::InvalidDirectoryRecord)? as usize;

        if length < Self::MIN_LENGTH || length > data.len() {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        let bytes = &data[..length];

        // Validate file identifier length
        if Self::FIXED_LENGTH + bytes[FILE_ID_LEN] as usize > length {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        Ok(Self { bytes })
    }

    /// Length of the record in bytes
    pub fn length(&self) -> u8 {
        self.bytes[0]
    }

    /// Get extent LBA (little-endian part of both-endian field)
    pub fn get_extent_lba(&self) -> u32 {
        read_le32(self.bytes, EXTENT_LBA)
    }

    /// Get data length (little-endian part)
    pub fn get_data_length(&self) -> u32 {
        read_le32(self.bytes, DATA_LENGTH)
    }

    /// Parse file flags
    pub fn get_flags(&self) -> FileFlags {
        FileFlags::from_bits_retain(self.bytes[FILE_FLAGS])
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.get_flags().contains(FileFlags::DIRECTORY)
    }

    /// Get file identifier bytes
    pub fn file_identifier(&self) -> &'a [u8] {
        let len = self.bytes[FILE_ID_LEN] as usize;
        &self.bytes[Self::FIXED_LENGTH..Self::FIXED_LENGTH + len]
    }

    /// System Use area: after the identifier and its pad byte
    pub fn system_use(&self) -> &'a [u8] {
        let id_len = self.bytes[FILE_ID_LEN] as usize;
        let pad = usize::from(id_len % 2 == 0);
        let start = Self::FIXED_LENGTH + id_len + pad;
        self.bytes.get(start..).unwrap_or(&[])
    }
}

fn read_le32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
