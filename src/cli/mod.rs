//! Command-line front end
//!
//! Provides:
//! - Argument parsing (clap derive)
//! - Subcommand dispatch (analyze, diff, categories)
//! - Deterministic exit codes

pub mod args;
pub mod dispatch;

pub use args::{parse_args, AnalyzeArgs, Args, Command, DiffArgs};
pub use dispatch::{run_cli, run_command, ExitCode};

use std::path::PathBuf;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run '{command}': {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    History(#[from] crate::history::Error),
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_REGRESSION: i32 = 3;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
