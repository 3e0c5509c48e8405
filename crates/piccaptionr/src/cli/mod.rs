//! Command implementations for the `piccaptionr` binary.

pub mod caption;
pub mod config;
pub mod interactive;
pub mod progress;
