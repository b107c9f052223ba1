//! Run history
//!
//! Compares two persisted run-result files scenario by scenario:
//! - [`status`] loads the per-scenario status map from a result file
//! - [`diff`] finds regressions and fixes between two maps
//! - [`select`] picks which two files to compare when none are named

pub mod diff;
pub mod select;
pub mod status;

use std::path::PathBuf;

pub use diff::{diff_runs, RunDiff, StatusChange};
pub use select::{select_result_files, ResultPair};
pub use status::{load_statuses, statuses_from_json, RunStatusMap, MISSING_STATUS, UNTESTED_STATUS};

/// History errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid result file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Need a {golden} or at least 2 result files in {}. Save a baseline run as {golden} first.",
        dir.display()
    )]
    InsufficientResults { dir: PathBuf, golden: String },
}

pub type Result<T> = std::result::Result<T, Error>;
