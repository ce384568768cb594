//! Common test utilities and mock block devices

#![allow(dead_code)]

pub mod builder;
#[allow(unused_imports)]
pub use builder::{IsoBuilder, Node};

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use isofs::{ByteBlockDevice, Volume};
use std::io;

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
}

impl MemoryBlockDevice {
    /// Create a new memory block device from raw data
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_block_size(data, 2048)
    }

    /// Same, with a device block size other than the ISO sector size
    pub fn with_block_size(data: Vec<u8>, block_size: usize) -> Self {
        Self { data, block_size }
    }

    /// Load an image from disk
    pub fn from_file(path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Mount through the byte adapter
    pub fn mount(self) -> Volume<ByteBlockDevice<Self>> {
        let device = ByteBlockDevice::new(self).expect("adapter should wrap device");
        Volume::init(device).expect("mount should succeed")
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, _start_lba: Lba, _src: &[u8]) -> Result<(), Self::Error> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "read-only medium",
        ))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Collect a directory through the read stream, `chunk` bytes per call.
pub fn read_dir_stream<D: isofs::BlockDevice>(
    volume: &mut Volume<D>,
    dir: isofs::Inode,
    chunk: usize,
) -> Vec<isofs::Dirent> {
    let mut stream = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = volume
            .read(dir, stream.len() as u64, &mut buf)
            .expect("directory read should succeed");
        if n == 0 {
            break;
        }
        stream.extend_from_slice(&buf[..n]);
    }

    assert_eq!(stream.len() % isofs::DIRENT_SIZE, 0);
    stream
        .chunks(isofs::DIRENT_SIZE)
        .map(|c| isofs::Dirent::from_bytes(c).expect("whole dirent"))
        .collect()
}
