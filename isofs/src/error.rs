//! Error types for ISO9660 operations
//!
//! Two layers: [`Iso9660Error`] is what the parser, cache and volume locator
//! produce; [`Errno`] is what the VFS boundary sees.

use thiserror::Error;

/// Result type for ISO9660 operations
pub type Result<T> = core::result::Result<T, Iso9660Error>;

/// Result type for the VFS-facing filesystem operations
pub type FsResult<T> = core::result::Result<T, Errno>;

/// Errors that can occur during ISO9660 operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Iso9660Error {
    /// I/O error reading from block device
    #[error("I/O error reading block device")]
    IoError,

    /// No valid Primary Volume Descriptor before the set terminator
    #[error("no ISO9660 primary volume descriptor found")]
    NotAFilesystem,

    /// Unsupported file structure version
    #[error("unsupported ISO9660 file structure version")]
    UnsupportedVersion,

    /// Volume size or block size is zero or exceeds the device
    #[error("volume size does not fit the device")]
    InvalidVolumeSize,

    /// Corrupted directory record
    #[error("corrupted directory record")]
    InvalidDirectoryRecord,

    /// File extent out of bounds
    #[error("file extent out of bounds")]
    ExtentOutOfBounds,

    /// Padding was found where a directory record was required
    #[error("no directory record at this location")]
    NoEntry,

    /// Inode is not a directory
    #[error("not a directory")]
    NotADirectory,

    /// File or directory not found
    #[error("file or directory not found")]
    NotFound,

    /// Path has too many components
    #[error("path exceeds maximum depth")]
    PathTooLong,
}

impl Iso9660Error {
    /// Whether this error means the device does not hold a usable volume.
    pub const fn is_mount_failure(&self) -> bool {
        matches!(
            self,
            Self::NotAFilesystem | Self::UnsupportedVersion | Self::InvalidVolumeSize
        )
    }
}

/// Error codes reported to the VFS layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Errno {
    /// `ENXIO`: no volume mounted, or volume recognition failed
    #[error("no such device or address")]
    NotMounted,

    /// `EIO`: malformed on-disk structure or device failure
    #[error("input/output error")]
    Io,

    /// `ENOTDIR`
    #[error("not a directory")]
    NotADirectory,

    /// `ENOENT`
    #[error("no such file or directory")]
    NotFound,

    /// `ENAMETOOLONG`
    #[error("file name too long")]
    NameTooLong,
}

impl Errno {
    /// `ENOENT`
    pub const ENOENT: i32 = 2;
    /// `EIO`
    pub const EIO: i32 = 5;
    /// `ENXIO`
    pub const ENXIO: i32 = 6;
    /// `ENOTDIR`
    pub const ENOTDIR: i32 = 20;
    /// `ENAMETOOLONG`
    pub const ENAMETOOLONG: i32 = 36;

    /// Raw errno value as returned to userspace (positive).
    pub const fn as_raw(&self) -> i32 {
        match self {
            Self::NotMounted => Self::ENXIO,
            Self::Io => Self::EIO,
            Self::NotADirectory => Self::ENOTDIR,
            Self::NotFound => Self::ENOENT,
            Self::NameTooLong => Self::ENAMETOOLONG,
        }
    }
}

impl From<Iso9660Error> for Errno {
    fn from(err: Iso9660Error) -> Self {
        match err {
            Iso9660Error::NotAFilesystem
            | Iso9660Error::UnsupportedVersion
            | Iso9660Error::InvalidVolumeSize => Self::NotMounted,
            Iso9660Error::IoError
            | Iso9660Error::InvalidDirectoryRecord
            | Iso9660Error::ExtentOutOfBounds
            | Iso9660Error::NoEntry => Self::Io,
            Iso9660Error::NotADirectory => Self::NotADirectory,
            Iso9660Error::NotFound => Self::NotFound,
            Iso9660Error::PathTooLong => Self::NameTooLong,
        }
    }
}
