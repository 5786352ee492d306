//! CLI module
//!
//! Command-line interface for converting JSON to Parquet.
//!
//! # Flags
//!
//! - `-i/--input-path` and `-o/--output-path` - source and destination
//! - `-p/--profile_name` - OCI config profile for local runs
//! - `--conf`, `--conf-file` - extra engine configuration

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{convert, summary_line, Runner};
