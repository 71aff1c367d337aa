//! sentbench CLI library
//!
//! This library provides the command-line interface for benchmarking
//! sentence segmentation providers.

pub mod commands;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
