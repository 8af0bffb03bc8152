//! API types shared by mplat services

pub mod types;

pub use types::*;
