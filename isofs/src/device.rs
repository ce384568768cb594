//! Block device boundary
//!
//! The driver reads the medium through [`BlockDevice`], a byte-addressed
//! interface. [`ByteBlockDevice`] adapts any `gpt_disk_io::BlockIo` so the
//! same disks the rest of the system uses can back a volume.

use crate::error::{Iso9660Error, Result};
use alloc::vec;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Byte-addressable, read-only storage.
pub trait BlockDevice {
    /// Total addressable bytes.
    fn size(&self) -> u64;

    /// Fill all of `buf` starting at byte `offset`.
    ///
    /// Short reads are not part of the contract: either every byte is read
    /// or the call fails.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

impl<D: BlockDevice + ?Sized> BlockDevice for &mut D {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        (**self).read_at(offset, buf)
    }
}

impl BlockDevice for &[u8] {
    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let start = usize::try_from(offset).map_err(|_| Iso9660Error::IoError)?;
        let end = start.checked_add(buf.len()).ok_or(Iso9660Error::IoError)?;
        let src = self.get(start..end).ok_or(Iso9660Error::IoError)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

/// Byte-addressed view over a block-addressed device.
///
/// Partial blocks are served through a one-block bounce buffer; aligned runs
/// of whole blocks are read straight into the caller's buffer.
pub struct ByteBlockDevice<B: BlockIo> {
    block_io: B,
    block_size: u64,
    size: u64,
    bounce: Vec<u8>,
}

impl<B: BlockIo> ByteBlockDevice<B> {
    /// Wrap `block_io`, capturing its size once.
    pub fn new(mut block_io: B) -> Result<Self> {
        let block_size = block_io.block_size().to_u64();
        let num_blocks = block_io
            .num_blocks()
            .map_err(|_| Iso9660Error::IoError)?;
        let size = num_blocks
            .checked_mul(block_size)
            .ok_or(Iso9660Error::IoError)?;
        let bounce_len = usize::try_from(block_size).map_err(|_| Iso9660Error::IoError)?;

        Ok(Self {
            block_io,
            block_size,
            size,
            bounce: vec![0u8; bounce_len],
        })
    }

    /// Device block size in bytes
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Give back the wrapped device
    pub fn into_inner(self) -> B {
        self.block_io
    }
}

impl<B: BlockIo> BlockDevice for ByteBlockDevice<B> {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let end = offset
            .checked_add(buf.len() as u64)
            .ok_or(Iso9660Error::IoError)?;
        if end > self.size {
            return Err(Iso9660Error::IoError);
        }

        let block_size = self.block_size as usize;
        let mut pos = offset;
        let mut filled = 0;

        while filled < buf.len() {
            let lba = Lba(pos / self.block_size);
            let within = (pos % self.block_size) as usize;
            let wanted = buf.len() - filled;

            let n = if within == 0 && wanted >= block_size {
                // Whole blocks go straight to the destination
                let n = wanted - wanted % block_size;
                self.block_io
                    .read_blocks(lba, &mut buf[filled..filled + n])
                    .map_err(|_| Iso9660Error::IoError)?;
                n
            } else {
                self.block_io
                    .read_blocks(lba, &mut self.bounce)
                    .map_err(|_| Iso9660Error::IoError)?;
                let n = (block_size - within).min(wanted);
                buf[filled..filled + n].copy_from_slice(&self.bounce[within..within + n]);
                n
            };

            filled += n;
            pos += n as u64;
        }

        Ok(())
    }
}
