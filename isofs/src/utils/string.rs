//! Identifier handling
//!
//! ISO9660 file identifiers carry a `;version` suffix and two reserved
//! single-byte identifiers for the current and parent directory.

/// Identifier of the "." record
pub const CURRENT_DIR_ID: &[u8] = &[0x00];

/// Identifier of the ".." record
pub const PARENT_DIR_ID: &[u8] = &[0x01];

/// Files the loader treats as executables (ISO identifier, version included)
pub const EXECUTABLE_SUFFIX: &[u8] = b".NNE;1";

/// Strip version suffix from an identifier ("FILE.TXT;1" -> "FILE.TXT")
///
/// Only a trailing `;` followed by digits is removed; directory identifiers
/// have no version and come back unchanged.
pub fn strip_version(id: &[u8]) -> &[u8] {
    match id.iter().rposition(|&b| b == b';') {
        Some(pos)
            if pos + 1 < id.len() && id[pos + 1..].iter().all(u8::is_ascii_digit) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}

/// Display name of an identifier when no alternate name is recorded
pub fn display_name(id: &[u8]) -> &[u8] {
    match id {
        CURRENT_DIR_ID => b".",
        PARENT_DIR_ID => b"..",
        _ => strip_version(id),
    }
}

/// Does this ISO identifier mark an executable?
pub fn is_executable_name(id: &[u8]) -> bool {
    id.ends_with(EXECUTABLE_SUFFIX)
}
