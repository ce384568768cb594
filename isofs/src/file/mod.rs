//! File reading and extent management

pub mod extent;

use crate::device::BlockDevice;
use crate::error::Result;
use extent::Extent;

/// Read file contents at `offset` within the extent
///
/// # Arguments
/// * `device` - Block device
/// * `extent` - File extent to read
/// * `offset` - Byte offset inside the file
/// * `buffer` - Buffer to read into
///
/// # Returns
/// Number of bytes read; 0 at or past end of file
pub fn read_extent<D: BlockDevice + ?Sized>(
    device: &mut D,
    extent: &Extent,
    offset: u64,
    buffer: &mut [u8],
) -> Result<usize> {
    if offset >= extent.len() {
        return Ok(0);
    }

    let len = (extent.len() - offset).min(buffer.len() as u64) as usize;
    device.read_at(extent.offset + offset, &mut buffer[..len])?;

    Ok(len)
}
