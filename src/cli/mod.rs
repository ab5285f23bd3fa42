//! CLI module for the trivia server
//!
//! Provides command-line interface for:
//! - init: Create the database schema, optionally with sample data
//! - serve: Run the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, init_logging, run, run_command, serve, Config, DATABASE_PATH_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
