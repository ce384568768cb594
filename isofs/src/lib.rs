//! ISO9660 Filesystem Driver
//!
//! A `no_std`, read-only ISO9660 driver with Rock Ridge support, built for a
//! kernel serving a single storage device.
//!
//! # Overview
//!
//! The driver never builds a directory tree in memory. An inode is the byte
//! offset of a directory record on the device, and every operation decodes
//! the records it needs on demand, through a small fixed-size translation
//! cache. This crate provides:
//! - Primary Volume Descriptor recognition
//! - Directory record decoding into POSIX-shaped [`Stat`] and [`Dirent`]
//! - Rock Ridge alternate names (`NM`) and POSIX modes (`PX`)
//! - `stat`, `statvfs`, `read` (files and directories) and `search`
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Device layer** - [`BlockDevice`], byte-addressed reads
//! 2. **Volume layer** - Locates the PVD from sector 16
//! 3. **Directory layer** - Decodes one record, SUSP fields included
//! 4. **Cache layer** - Inode to translation, LRU by linear scan
//! 5. **Filesystem layer** - The operations the VFS calls
//!
//! # Usage
//!
//! ```ignore
//! use isofs::{mount, ByteBlockDevice};
//!
//! let mut volume = mount(ByteBlockDevice::new(block_io)?)?;
//! let root = volume.root_ino();
//! let readme = volume.search(root, "README.TXT")?;
//!
//! let mut buf = [0u8; 512];
//! let n = volume.read(readme, 0, &mut buf)?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod cache;
pub mod device;
pub mod directory;
pub mod error;
pub mod extensions;
pub mod file;
pub mod fs;
pub mod types;
pub mod utils;
pub mod volume;

pub use cache::TranslationCache;
pub use device::{BlockDevice, ByteBlockDevice};
pub use directory::{Entry, Translation};
pub use error::{Errno, FsResult, Iso9660Error, Result};
pub use fs::Iso9660Fs;
pub use types::{Dirent, FileType, Inode, Stat, StatVfs, DIRENT_SIZE};

// High-level API exports
pub use volume::{mount, Volume};
