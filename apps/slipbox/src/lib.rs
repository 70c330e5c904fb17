//! # slipbox (binary support library)
//!
//! CLI structure and configuration for the slipbox binary, exposed as a
//! library so integration tests can drive them directly.

pub mod cli;
pub mod config;
