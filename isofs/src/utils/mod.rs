//! Small helpers shared by the parsing layers

pub mod sector;
pub mod string;
