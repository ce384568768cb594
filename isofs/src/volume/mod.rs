//! Volume descriptor parsing
//!
//! ISO9660 volume descriptors start at sector 16 and describe the filesystem layout.
//! Only the Primary Volume Descriptor is used; supplementary and boot
//! descriptors are skipped.

pub mod primary;

use crate::cache::TranslationCache;
use crate::device::BlockDevice;
use crate::directory::{EntryParser, Translation};
use crate::error::{Iso9660Error, Result};
use crate::types::{
    Inode, VolumeDescriptorType, CACHE_ENTRIES, MAX_VOLUME_DESCRIPTORS, SECTOR_SIZE,
    VOLUME_DESCRIPTOR_START,
};
use crate::utils::sector;
use log::{debug, warn};
use primary::PrimaryVolumeDescriptor;

/// A mounted ISO9660 volume
///
/// Owns the device, the parsed Primary Volume Descriptor and the inode
/// translation cache. Every filesystem operation goes through a `&mut
/// Volume`; there is no global state.
pub struct Volume<D: BlockDevice, const N: usize = CACHE_ENTRIES> {
    device: D,
    pvd: PrimaryVolumeDescriptor,
    cache: TranslationCache<N>,
}

/// Mount an ISO9660 volume with the default cache size
///
/// # Arguments
/// * `device` - Byte-addressed device holding the ISO at offset 0
///
/// # Returns
/// The mounted volume
pub fn mount<D: BlockDevice>(device: D) -> Result<Volume<D>> {
    Volume::init(device)
}

/// Find the Primary Volume Descriptor
///
/// Reads descriptors from sector 16 until the PVD, the set terminator or
/// the scan limit. Every failure is [`Iso9660Error::NotAFilesystem`] or one
/// of the validation errors.
pub fn locate<D: BlockDevice + ?Sized>(device: &mut D) -> Result<PrimaryVolumeDescriptor> {
    let device_size = device.size();
    let mut buffer = [0u8; SECTOR_SIZE];

    for index in 0..MAX_VOLUME_DESCRIPTORS {
        let offset = sector::sector_to_byte(VOLUME_DESCRIPTOR_START + index, SECTOR_SIZE as u64)
            .ok_or(Iso9660Error::NotAFilesystem)?;
        if offset.saturating_add(SECTOR_SIZE as u64) > device_size {
            break;
        }

        device
            .read_at(offset, &mut buffer)
            .map_err(|_| Iso9660Error::NotAFilesystem)?;

        if buffer[0] == VolumeDescriptorType::Terminator as u8 {
            break;
        }

        if primary::is_primary(&buffer) {
            let pvd = PrimaryVolumeDescriptor::parse(&buffer, offset)?;
            pvd.validate(device_size).inspect_err(|err| {
                warn!("isofs: rejected primary volume descriptor at {:#x}: {}", offset, err);
            })?;
            return Ok(pvd);
        }
    }

    Err(Iso9660Error::NotAFilesystem)
}

impl<D: BlockDevice, const N: usize> Volume<D, N> {
    /// Recognize the volume on `device`
    pub fn init(mut device: D) -> Result<Self> {
        let pvd = locate(&mut device)?;

        debug!(
            "isofs: mounted {} blocks of {} bytes, root {}",
            pvd.volume_space_size,
            pvd.logical_block_size,
            pvd.root_ino()
        );

        Ok(Self {
            device,
            pvd,
            cache: TranslationCache::new(),
        })
    }

    /// Filesystem size in bytes
    pub fn fs_len(&self) -> u64 {
        self.pvd.fs_len()
    }

    /// Inode of the root directory
    pub fn root_ino(&self) -> Inode {
        self.pvd.root_ino()
    }

    /// Logical block size in bytes
    pub fn block_size(&self) -> u32 {
        self.pvd.logical_block_size as u32
    }

    /// The parsed Primary Volume Descriptor
    pub fn descriptor(&self) -> &PrimaryVolumeDescriptor {
        &self.pvd
    }

    /// The translation cache
    pub fn cache(&self) -> &TranslationCache<N> {
        &self.cache
    }

    /// Release the device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Translate the record at `inode` through the cache
    pub fn translate(&mut self, inode: Inode, max_len: u64) -> Result<Translation> {
        let mut parser = EntryParser::new(&mut self.device, self.pvd.block_size());
        self.cache.lookup(&mut parser, inode, max_len)
    }

    pub(crate) fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
