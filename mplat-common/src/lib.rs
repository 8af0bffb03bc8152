//! # mplat Common Library
//!
//! Shared code for the mplat Resource Service (mplat-rs) and Song Service (mplat-ss):
//! - Identifier and batch validation rules used by both services
//! - Song field validation rules
//! - API request/response types exchanged between the services
//! - Bootstrap configuration loading
//! - Database pool initialization
//! - "mm:ss" duration formatting
//! - Graceful shutdown signal

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod shutdown;
pub mod time;
pub mod validation;

pub use error::{Error, Result};
pub use validation::ValidationError;
