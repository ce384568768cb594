//! Primary Volume Descriptor parsing
//!
//! The Primary Volume Descriptor (PVD) is always present and describes
//! the basic ISO9660 filesystem structure. See ECMA-119 8.4.

use crate::error::{Iso9660Error, Result};
use crate::types::{Inode, SECTOR_SIZE};

/// Type code, "CD001", descriptor version 1, unused byte
pub const PVD_SIGNATURE: [u8; 8] = [0x01, b'C', b'D', b'0', b'0', b'1', 0x01, 0x00];

/// Volume space size (both-endian 32-bit)
const VOLUME_SPACE_SIZE_OFFSET: usize = 80;
/// Logical block size (both-endian 16-bit)
const LOGICAL_BLOCK_SIZE_OFFSET: usize = 128;
/// Root directory record (34 bytes)
pub const ROOT_RECORD_OFFSET: usize = 156;
/// Length of the embedded root directory record
pub const ROOT_RECORD_LEN: usize = 34;
/// File structure version (1 byte)
const FILE_STRUCTURE_VERSION_OFFSET: usize = 881;

/// Parsed Primary Volume Descriptor
#[derive(Debug, Clone)]
pub struct PrimaryVolumeDescriptor {
    /// Byte offset of the descriptor on the device
    pub offset: u64,
    /// Total logical blocks
    pub volume_space_size: u32,
    /// Bytes per logical block
    pub logical_block_size: u16,
    /// File structure version (must be 1)
    pub file_structure_version: u8,
    /// Root directory record, verbatim
    pub root_directory_record: [u8; ROOT_RECORD_LEN],
}

/// Does this sector start with the PVD signature?
pub fn is_primary(sector: &[u8]) -> bool {
    sector.starts_with(&PVD_SIGNATURE)
}

/// Read the little-endian half of a both-endian 32-bit field
fn both_endian_32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Read the little-endian half of a both-endian 16-bit field
fn both_endian_16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

impl PrimaryVolumeDescriptor {
    /// Parse a descriptor sector read from byte `offset`
    pub fn parse(sector: &[u8], offset: u64) -> Result<Self> {
        if sector.len() < SECTOR_SIZE || !is_primary(sector) {
            return Err(Iso9660Error::NotAFilesystem);
        }

        let mut root_directory_record = [0u8; ROOT_RECORD_LEN];
        root_directory_record
            .copy_from_slice(&sector[ROOT_RECORD_OFFSET..ROOT_RECORD_OFFSET + ROOT_RECORD_LEN]);

        Ok(Self {
            offset,
            volume_space_size: both_endian_32(sector, VOLUME_SPACE_SIZE_OFFSET),
            logical_block_size: both_endian_16(sector, LOGICAL_BLOCK_SIZE_OFFSET),
            file_structure_version: sector[FILE_STRUCTURE_VERSION_OFFSET],
            root_directory_record,
        })
    }

    /// Check the descriptor against the device it was read from
    pub fn validate(&self, device_size: u64) -> Result<()> {
        if self.file_structure_version != 1 {
            return Err(Iso9660Error::UnsupportedVersion);
        }

        if self.volume_space_size == 0 || self.logical_block_size == 0 {
            return Err(Iso9660Error::InvalidVolumeSize);
        }

        if self.fs_len() > device_size {
            return Err(Iso9660Error::InvalidVolumeSize);
        }

        Ok(())
    }

    /// Filesystem size in bytes
    pub fn fs_len(&self) -> u64 {
        self.volume_space_size as u64 * self.logical_block_size as u64
    }

    /// Block size widened for offset arithmetic
    pub fn block_size(&self) -> u64 {
        self.logical_block_size as u64
    }

    /// Inode of the root directory: its record embedded in this descriptor
    pub fn root_ino(&self) -> Inode {
        Inode(self.offset + ROOT_RECORD_OFFSET as u64)
    }
}
