//! Outcome classifier
//!
//! Turns the raw textual output of a conformance run into a report:
//! - [`parser`] scrapes per-scenario status, error lines and query text
//! - [`classify`] maps each failing scenario's first error onto the taxonomy
//! - [`aggregate`] counts categories, details, groups and features
//! - [`report`] renders the result for a terminal

pub mod aggregate;
pub mod classify;
pub mod parser;
pub mod record;
pub mod report;

pub use aggregate::{CategoryStats, FailureBreakdown, ScenarioExample};
pub use classify::{classify_error, Category, Classification, ErrorKind, RULES};
pub use parser::parse_run_output;
pub use record::{scenario_key, ParsedRun, RunSummary, ScenarioOutcome, ScenarioStatus};
pub use report::{render_report, ReportOptions};
