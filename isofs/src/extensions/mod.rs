//! ISO9660 extensions carried in the System Use area

pub mod rock_ridge;
