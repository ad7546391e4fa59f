//! Core types and configuration for the choppiness indicator.
//!
//! This crate provides shared types used across all other crates:
//! - Price bars and price source selection
//! - Line samples, crossover counts and choppiness readings
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
