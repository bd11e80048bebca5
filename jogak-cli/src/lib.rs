//! jogak CLI library
//!
//! This library provides the batch command-line interface around
//! `jogak-core`: chunking parser output, post-cleaning and inspecting chunk
//! files, and managing configuration.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
