//! Persisted run-result files
//!
//! A result file is a JSON array of features, each with a `name` and an
//! optional list of `elements`. Only elements of type `scenario` count.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::history::{Error, Result};
use crate::outcome::scenario_key;

/// `"<feature> :: <scenario>"` to status text
pub type RunStatusMap = BTreeMap<String, String>;

/// Status of a scenario element that carries none
pub const UNTESTED_STATUS: &str = "untested";

/// Status of a scenario absent from one side of a comparison
pub const MISSING_STATUS: &str = "missing";

#[derive(Debug, Deserialize)]
struct FeatureRecord {
    name: String,
    #[serde(default)]
    elements: Vec<ElementRecord>,
}

#[derive(Debug, Deserialize)]
struct ElementRecord {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    status: Option<String>,
}

/// Build the status map from result-file JSON text
pub fn statuses_from_json(json: &str) -> std::result::Result<RunStatusMap, serde_json::Error> {
    let features: Vec<FeatureRecord> = serde_json::from_str(json)?;

    let mut statuses = RunStatusMap::new();
    for feature in &features {
        for element in feature.elements.iter().filter(|e| e.kind == "scenario") {
            let status = element
                .status
                .clone()
                .unwrap_or_else(|| UNTESTED_STATUS.to_string());
            statuses.insert(scenario_key(&feature.name, &element.name), status);
        }
    }
    Ok(statuses)
}

/// Load the status map of one result file
pub fn load_statuses(path: &Path) -> Result<RunStatusMap> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let statuses = statuses_from_json(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), scenarios = statuses.len(), "loaded run statuses");
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_statuses_from_json() {
        let json = r#"[
            {"name": "Match1", "elements": [
                {"type": "background", "name": "setup", "status": "passed"},
                {"type": "scenario", "name": "[1] a", "status": "passed"},
                {"type": "scenario", "name": "[2] b", "status": "failed"}
            ]},
            {"name": "Empty"}
        ]"#;
        let statuses = statuses_from_json(json).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses["Match1 :: [1] a"], "passed");
        assert_eq!(statuses["Match1 :: [2] b"], "failed");
    }

    #[test]
    fn test_missing_status_is_untested() {
        let json = r#"[{"name": "F", "elements": [{"type": "scenario", "name": "s"}]}]"#;
        let statuses = statuses_from_json(json).unwrap();
        assert_eq!(statuses["F :: s"], UNTESTED_STATUS);
    }

    #[test]
    fn test_load_statuses_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        assert!(matches!(load_statuses(&missing), Err(Error::Io { .. })));

        let bad = temp.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(load_statuses(&bad), Err(Error::Json { .. })));
    }

    #[test]
    fn test_load_statuses_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.json");
        std::fs::write(
            &path,
            r#"[{"name": "F", "elements": [{"type": "scenario", "name": "s", "status": "skipped"}]}]"#,
        )
        .unwrap();
        let statuses = load_statuses(&path).unwrap();
        assert_eq!(statuses["F :: s"], "skipped");
    }
}
