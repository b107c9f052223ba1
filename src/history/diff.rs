//! Regression and fix detection between two runs

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::history::status::{RunStatusMap, MISSING_STATUS};

const PASSED: &str = "passed";

/// A scenario whose pass state flipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub key: String,

    /// Status on the side where the scenario does not pass
    pub status: String,
}

/// Result of comparing a baseline run against a current run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDiff {
    /// Passed in the baseline, not passed now; carries the current status
    pub regressions: Vec<StatusChange>,

    /// Passes now, did not before; carries the baseline status
    pub fixes: Vec<StatusChange>,
    pub baseline_passed: usize,
    pub current_passed: usize,
}

impl RunDiff {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    pub fn passed_delta(&self) -> i64 {
        self.current_passed as i64 - self.baseline_passed as i64
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.regressions.is_empty() {
            out.push_str("No regressions: nothing that previously passed is now failing.\n");
        } else {
            let _ = writeln!(
                out,
                "REGRESSIONS ({} tests that used to pass but now fail):",
                self.regressions.len()
            );
            for change in &self.regressions {
                let _ = writeln!(out, "  {}  [{}]", change.key, change.status);
            }
        }

        if !self.fixes.is_empty() {
            let _ = writeln!(out, "\nFIXES ({} tests that now pass):", self.fixes.len());
            for change in &self.fixes {
                let _ = writeln!(out, "  {}  [was {}]", change.key, change.status);
            }
        }

        let _ = writeln!(
            out,
            "\nTotal passed: {} → {} ({:+})",
            self.baseline_passed,
            self.current_passed,
            self.passed_delta()
        );
        out
    }
}

fn passed_count(statuses: &RunStatusMap) -> usize {
    statuses.values().filter(|s| *s == PASSED).count()
}

/// Compare two status maps over the union of their scenario keys
///
/// Keys absent from one side have status `missing` there. Changes between
/// two non-passing statuses are neither regressions nor fixes.
pub fn diff_runs(baseline: &RunStatusMap, current: &RunStatusMap) -> RunDiff {
    let keys: BTreeSet<&String> = baseline.keys().chain(current.keys()).collect();

    let mut diff = RunDiff {
        baseline_passed: passed_count(baseline),
        current_passed: passed_count(current),
        ..RunDiff::default()
    };

    for key in keys {
        let old = baseline.get(key).map_or(MISSING_STATUS, String::as_str);
        let new = current.get(key).map_or(MISSING_STATUS, String::as_str);
        if old == new {
            continue;
        }
        if old == PASSED {
            diff.regressions.push(StatusChange {
                key: key.clone(),
                status: new.to_string(),
            });
        } else if new == PASSED {
            diff.fixes.push(StatusChange {
                key: key.clone(),
                status: old.to_string(),
            });
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(pairs: &[(&str, &str)]) -> RunStatusMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_regression_and_fix() {
        let baseline = statuses(&[("F :: A", "passed"), ("F :: B", "failed")]);
        let current = statuses(&[("F :: A", "failed"), ("F :: B", "passed")]);
        let diff = diff_runs(&baseline, &current);

        assert_eq!(
            diff.regressions,
            vec![StatusChange {
                key: "F :: A".to_string(),
                status: "failed".to_string()
            }]
        );
        assert_eq!(
            diff.fixes,
            vec![StatusChange {
                key: "F :: B".to_string(),
                status: "failed".to_string()
            }]
        );
        assert_eq!(diff.passed_delta(), 0);
        assert!(diff.render().contains("Total passed: 1 → 1 (+0)"));
    }

    #[test]
    fn test_missing_keys() {
        let baseline = statuses(&[("F :: gone", "passed")]);
        let current = statuses(&[("F :: new", "passed")]);
        let diff = diff_runs(&baseline, &current);
        assert_eq!(diff.regressions[0].status, MISSING_STATUS);
        assert_eq!(diff.fixes[0].status, MISSING_STATUS);
    }

    #[test]
    fn test_non_passing_changes_are_ignored() {
        let baseline = statuses(&[("F :: A", "failed")]);
        let current = statuses(&[("F :: A", "skipped")]);
        let diff = diff_runs(&baseline, &current);
        assert!(diff.regressions.is_empty());
        assert!(diff.fixes.is_empty());
        assert!(diff.render().starts_with("No regressions"));
    }

    #[test]
    fn test_render_lists_changes() {
        let baseline = statuses(&[("F :: A", "passed"), ("F :: B", "passed")]);
        let current = statuses(&[("F :: A", "errored")]);
        let rendered = diff_runs(&baseline, &current).render();
        assert!(rendered.contains("REGRESSIONS (2 tests"));
        assert!(rendered.contains("  F :: A  [errored]\n"));
        assert!(rendered.contains("  F :: B  [missing]\n"));
        assert!(rendered.contains("Total passed: 2 → 0 (-2)"));
    }
}
