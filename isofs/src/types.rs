//! Common types and constants for ISO9660

use bitflags::bitflags;
use core::fmt;

/// ISO9660 sector size (always 2048 bytes)
pub const SECTOR_SIZE: usize = 2048;

/// Volume descriptor set starts at sector 16
pub const VOLUME_DESCRIPTOR_START: u64 = 16;

/// Upper bound on volume descriptors scanned before giving up
pub const MAX_VOLUME_DESCRIPTORS: u64 = 128;

/// Largest possible directory record (the length field is one byte)
pub const MAX_RECORD_LEN: usize = 255;

/// Capacity of [`Dirent::name`], including the NUL terminator
pub const DIRENT_NAME_LEN: usize = 256;

/// Size in bytes of one serialized [`Dirent`] in a directory read stream
pub const DIRENT_SIZE: usize = 8 + DIRENT_NAME_LEN;

/// Default number of translation cache slots
pub const CACHE_ENTRIES: usize = 128;

/// Maximum directory depth accepted by path lookup
pub const MAX_DIRECTORY_DEPTH: usize = 8;

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

/// Volume descriptor type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VolumeDescriptorType {
    /// Boot Record (El Torito)
    BootRecord = 0,
    /// Primary Volume Descriptor
    Primary = 1,
    /// Supplementary Volume Descriptor (Joliet)
    Supplementary = 2,
    /// Volume Partition Descriptor
    Partition = 3,
    /// Volume Descriptor Set Terminator
    Terminator = 255,
}

/// Inode number: the absolute byte offset of a directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Inode(pub u64);

impl Inode {
    /// Byte offset of the directory record on the device
    pub const fn offset(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Inode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

bitflags! {
    /// File flags from directory record (BP 26)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileFlags: u8 {
        /// Hidden file
        const HIDDEN = 0x01;
        /// Directory (not a file)
        const DIRECTORY = 0x02;
        /// Associated file
        const ASSOCIATED = 0x04;
        /// Extended attribute record format
        const RECORD = 0x08;
        /// Owner/group permissions in extended attributes
        const PROTECTION = 0x10;
        /// Not final directory record for this file
        const MULTI_EXTENT = 0x80;
    }
}

/// File type as reported through [`Stat::mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Regular file
    Regular,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Named pipe
    Fifo,
    /// Character device
    CharDevice,
    /// Block device
    BlockDevice,
    /// Socket
    Socket,
}

impl FileType {
    /// `S_IF*` bits for this type
    pub const fn mode_bits(self) -> u32 {
        match self {
            Self::Regular => S_IFREG,
            Self::Directory => S_IFDIR,
            Self::Symlink => S_IFLNK,
            Self::Fifo => S_IFIFO,
            Self::CharDevice => S_IFCHR,
            Self::BlockDevice => S_IFBLK,
            Self::Socket => S_IFSOCK,
        }
    }

    /// Decode the type bits of a host mode
    pub const fn from_mode(mode: u32) -> Option<Self> {
        match mode & S_IFMT {
            S_IFREG => Some(Self::Regular),
            S_IFDIR => Some(Self::Directory),
            S_IFLNK => Some(Self::Symlink),
            S_IFIFO => Some(Self::Fifo),
            S_IFCHR => Some(Self::CharDevice),
            S_IFBLK => Some(Self::BlockDevice),
            S_IFSOCK => Some(Self::Socket),
            _ => None,
        }
    }
}

/// POSIX-shaped file status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// Inode (directory record offset)
    pub ino: Inode,
    /// Type and permission bits
    pub mode: u32,
    /// Link count (always 1)
    pub nlink: u32,
    /// Owner, from Rock Ridge `PX` when present
    pub uid: u32,
    /// Group, from Rock Ridge `PX` when present
    pub gid: u32,
    /// Size in bytes
    pub size: u64,
    /// Bytes used on the medium
    pub used: u64,
}

impl Stat {
    /// Type encoded in `mode`
    pub const fn file_type(&self) -> Option<FileType> {
        FileType::from_mode(self.mode)
    }

    /// Is this a directory?
    pub const fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    /// Is this a regular file?
    pub const fn is_regular(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }
}

/// Filesystem-wide statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatVfs {
    /// Logical block size in bytes
    pub block_size: u32,
    /// Total logical blocks
    pub blocks_total: u64,
    /// Free blocks (always 0, the medium is read-only)
    pub blocks_free: u64,
}

/// Fixed-size directory entry handed to the VFS
#[derive(Clone, PartialEq, Eq)]
pub struct Dirent {
    /// Inode of the entry
    pub ino: Inode,
    name: [u8; DIRENT_NAME_LEN],
}

impl Dirent {
    /// Build an entry, truncating `name` to fit with its NUL terminator.
    pub fn new(ino: Inode, name: &[u8]) -> Self {
        let mut buf = [0u8; DIRENT_NAME_LEN];
        let len = name.len().min(DIRENT_NAME_LEN - 1);
        buf[..len].copy_from_slice(&name[..len]);
        Self { ino, name: buf }
    }

    /// Name bytes, without the terminator
    pub fn name(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DIRENT_NAME_LEN);
        &self.name[..len]
    }

    /// Name as UTF-8, if it is
    pub fn name_str(&self) -> Option<&str> {
        core::str::from_utf8(self.name()).ok()
    }

    /// Serialize as it appears in a directory read stream
    pub fn to_bytes(&self) -> [u8; DIRENT_SIZE] {
        let mut out = [0u8; DIRENT_SIZE];
        out[..8].copy_from_slice(&self.ino.0.to_le_bytes());
        out[8..].copy_from_slice(&self.name);
        out
    }

    /// Parse one serialized entry
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..DIRENT_SIZE)?;
        let mut ino = [0u8; 8];
        ino.copy_from_slice(&bytes[..8]);
        let mut name = [0u8; DIRENT_NAME_LEN];
        name.copy_from_slice(&bytes[8..]);
        Some(Self {
            ino: Inode(u64::from_le_bytes(ino)),
            name,
        })
    }
}

impl fmt::Debug for Dirent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Dirent");
        s.field("ino", &self.ino);
        match self.name_str() {
            Some(name) => s.field("name", &name),
            None => s.field("name", &self.name()),
        };
        s.finish()
    }
}
