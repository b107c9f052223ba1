//! Runner output scraper
//!
//! A single pass over the step-runner's raw "no-capture" output. Lines that
//! match nothing are ignored; this is a best-effort scrape, not a grammar.
//!
//! States:
//! - no scenario active
//! - scenario active
//! - scenario active, collecting query text between `"""` delimiters

use regex::Regex;
use std::mem;
use std::sync::OnceLock;
use tracing::debug;

use crate::outcome::record::{ParsedRun, RunSummary, ScenarioOutcome, ScenarioStatus};

const ASSERT_MARKER: &str = "ASSERT FAILED:";
const RUNTIME_ERROR_MARKER: &str = "RuntimeError:";
const TRACEBACK_MARKER: &str = "Traceback";
const QUERY_DELIMITER: &str = "\"\"\"";

/// Exception class names whose lines are kept as extra errors after a traceback
const EXCEPTION_CLASSES: &[&str] = &[
    "AttributeError",
    "TypeError",
    "KeyError",
    "ValueError",
    "IndexError",
    "AssertionError",
    "NotImplementedError",
    "Exception",
    "StopIteration",
];

struct Patterns {
    feature: Regex,
    scenario: Regex,
    exception: Regex,
    summary: Regex,
    skipped: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        feature: Regex::new(r"^Feature:\s+(.+?)(?:\s+#\s+(.+))?$").expect("Invalid regex"),
        scenario: Regex::new(r"^\s+Scenario(?:\s+Outline)?:\s+(.+?)(?:\s+#\s+(.+))?$")
            .expect("Invalid regex"),
        exception: Regex::new(&format!(
            r"^\s+((?:{})\S*:.+)",
            EXCEPTION_CLASSES.join("|")
        ))
        .expect("Invalid regex"),
        summary: Regex::new(r"(\d+) scenarios? passed, (\d+) failed, (\d+) error")
            .expect("Invalid regex"),
        skipped: Regex::new(r"(\d+) scenarios? .* (\d+) skipped").expect("Invalid regex"),
    })
}

enum ScanState {
    NoScenario,
    Scenario(ScenarioOutcome),
    Query(ScenarioOutcome, Vec<String>),
}

struct OutputParser {
    feature: String,
    state: ScanState,
    scenarios: Vec<ScenarioOutcome>,
}

impl OutputParser {
    fn new() -> Self {
        Self {
            feature: String::new(),
            state: ScanState::NoScenario,
            scenarios: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let patterns = patterns();

        if let Some(caps) = patterns.feature.captures(line) {
            self.feature = caps[1].trim().to_string();
            return;
        }

        if let Some(caps) = patterns.scenario.captures(line) {
            self.finalize();
            let location = caps.get(2).map_or("", |m| m.as_str()).trim();
            self.state = ScanState::Scenario(ScenarioOutcome::new(
                self.feature.clone(),
                caps[1].trim(),
                location,
            ));
            return;
        }

        self.state = match mem::replace(&mut self.state, ScanState::NoScenario) {
            ScanState::NoScenario => ScanState::NoScenario,
            ScanState::Scenario(outcome) if line.trim() == QUERY_DELIMITER => {
                ScanState::Query(outcome, Vec::new())
            }
            ScanState::Scenario(mut outcome) => {
                apply_error_rules(&mut outcome, line);
                ScanState::Scenario(outcome)
            }
            ScanState::Query(mut outcome, lines) if line.trim() == QUERY_DELIMITER => {
                outcome.query = lines.join("\n").trim().to_string();
                ScanState::Scenario(outcome)
            }
            ScanState::Query(outcome, mut lines) => {
                lines.push(line.trim().to_string());
                ScanState::Query(outcome, lines)
            }
        };
    }

    /// Move any in-progress scenario into the finished list
    fn finalize(&mut self) {
        match mem::replace(&mut self.state, ScanState::NoScenario) {
            ScanState::NoScenario => {}
            ScanState::Scenario(outcome) | ScanState::Query(outcome, _) => {
                self.scenarios.push(outcome);
            }
        }
    }
}

/// First matching rule wins; a line feeds at most one rule
fn apply_error_rules(outcome: &mut ScenarioOutcome, line: &str) {
    let trimmed = line.trim();

    if let Some((_, rest)) = line.split_once(ASSERT_MARKER) {
        outcome.status = ScenarioStatus::Failed;
        outcome.errors.push(rest.trim().to_string());
    } else if trimmed.starts_with(RUNTIME_ERROR_MARKER) {
        outcome.status = ScenarioStatus::Errored;
        outcome.errors.push(trimmed.to_string());
    } else if trimmed.starts_with(TRACEBACK_MARKER) {
        outcome.status = ScenarioStatus::Errored;
    } else if outcome.status == ScenarioStatus::Errored {
        if let Some(caps) = patterns().exception.captures(line) {
            outcome.errors.push(caps[1].trim().to_string());
        }
    }
}

fn parse_summary(text: &str) -> RunSummary {
    let patterns = patterns();
    let mut summary = RunSummary::default();

    if let Some(caps) = patterns.summary.captures(text) {
        summary.passed = caps[1].parse().unwrap_or(0);
        summary.failed = caps[2].parse().unwrap_or(0);
        summary.errored = caps[3].parse().unwrap_or(0);
    }
    if let Some(caps) = patterns.skipped.captures(text) {
        summary.skipped = caps[2].parse().unwrap_or(0);
    }
    summary
}

/// Scrape a whole run's raw output
pub fn parse_run_output(text: &str) -> ParsedRun {
    let mut parser = OutputParser::new();
    for line in text.lines() {
        parser.feed(line.trim_end());
    }
    parser.finalize();

    let summary = parse_summary(text);
    debug!(
        scenarios = parser.scenarios.len(),
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        "parsed runner output"
    );

    ParsedRun {
        scenarios: parser.scenarios,
        summary,
    }
}
