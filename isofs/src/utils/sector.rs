//! Block alignment and calculation utilities

/// Bytes from `offset` to the next multiple of `block_size`.
///
/// An offset already on a boundary is a full block away from the next one.
/// `None` for a zero block size.
pub fn bytes_to_boundary(offset: u64, block_size: u64) -> Option<u64> {
    let within = offset.checked_rem(block_size)?;
    Some(block_size - within)
}

/// Byte offset of a logical sector
pub fn sector_to_byte(sector: u64, sector_size: u64) -> Option<u64> {
    sector.checked_mul(sector_size)
}
