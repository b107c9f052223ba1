//! Per-scenario outcome records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of one scenario in a scraped run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Errored,
}

impl ScenarioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioStatus::Passed => "passed",
            ScenarioStatus::Failed => "failed",
            ScenarioStatus::Errored => "errored",
        }
    }

    /// Failed and errored scenarios both count as failures
    pub fn is_failure(&self) -> bool {
        !matches!(self, ScenarioStatus::Passed)
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything scraped about a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub feature: String,
    pub name: String,

    /// Source location tag (`features/x.feature:12`), empty when absent
    pub location: String,
    pub status: ScenarioStatus,

    /// Captured error lines, in output order
    pub errors: Vec<String>,

    /// Query text of the scenario, empty when none was captured
    pub query: String,
}

impl ScenarioOutcome {
    /// A fresh record: passed, no errors, no query
    pub fn new(feature: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            name: name.into(),
            location: location.into(),
            status: ScenarioStatus::Passed,
            errors: Vec::new(),
            query: String::new(),
        }
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    /// Stable key shared with persisted run-result files
    pub fn key(&self) -> String {
        scenario_key(&self.feature, &self.name)
    }
}

/// `"<feature> :: <scenario>"`
pub fn scenario_key(feature: &str, scenario: &str) -> String {
    format!("{} :: {}", feature, scenario)
}

/// Run-level counts taken from the runner's trailing summary lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }

    /// Percentage of all scenarios that passed, 0 for an empty run
    pub fn pass_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.passed as f64 / total as f64 * 100.0,
        }
    }
}

/// A fully scraped run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRun {
    pub scenarios: Vec<ScenarioOutcome>,
    pub summary: RunSummary,
}

impl ParsedRun {
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.scenarios.iter().filter(|s| s.status.is_failure())
    }
}
