//! Automatic choice of the two result files to compare

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::history::{Error, Result};

/// Baseline and current result files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPair {
    pub baseline: PathBuf,
    pub current: PathBuf,
}

/// Pick the files to compare from a results directory
///
/// Non-golden `*.json` files are ordered by file name, so timestamped names
/// sort chronologically.
/// - golden file present and at least one other: golden vs the latest other
/// - otherwise at least two others: the two latest
/// - otherwise [`Error::InsufficientResults`]
pub fn select_result_files(dir: &Path, golden: &str) -> Result<ResultPair> {
    let insufficient = || Error::InsufficientResults {
        dir: dir.to_path_buf(),
        golden: golden.to_string(),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(insufficient()),
        Err(source) => {
            return Err(Error::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut others: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| path.file_name().is_some_and(|name| name != golden))
        .collect();
    others.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let golden_path = dir.join(golden);
    let pair = match others.as_slice() {
        [.., latest] if golden_path.is_file() => ResultPair {
            baseline: golden_path,
            current: latest.clone(),
        },
        [.., previous, latest] => ResultPair {
            baseline: previous.clone(),
            current: latest.clone(),
        },
        _ => return Err(insufficient()),
    };

    debug!(
        baseline = %pair.baseline.display(),
        current = %pair.current.display(),
        "selected result files"
    );
    Ok(pair)
}
