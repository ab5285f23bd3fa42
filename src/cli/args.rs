//! CLI argument definitions using clap
//!
//! Commands:
//! - trivia init [--config <path>] [--seed]
//! - trivia serve [--config <path>] [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trivia API - categories, questions and quizzes over HTTP
#[derive(Parser, Debug)]
#[command(name = "trivia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema
    Init {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Load the sample categories and questions
        #[arg(long)]
        seed: bool,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
