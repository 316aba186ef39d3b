//! Command-line interface for playlist-porter.
//!
//! This module parses arguments, layers flags and environment variables over
//! the config file, and drives the library's batch operations.

mod commands;

pub use commands::{Cli, Commands, run_command};
