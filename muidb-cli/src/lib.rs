//! CLI library for testing purposes

pub mod exchange;
pub mod info;
pub mod path_glob;
pub mod validation;

pub use muidb::MuiDbFile;
