//! Scenario lifecycle telemetry

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::scenario::runner::QueryOutcome;

/// Hook notified at scenario lifecycle points
///
/// Every method has an empty default body so implementations pick only the
/// events they care about.
pub trait ScenarioObserver {
    fn scenario_started(&mut self, _name: &str) {}

    fn query_executed(&mut self, _query: &str, _outcome: &QueryOutcome) {}

    fn scenario_finished(&mut self, _name: &str, _passed: bool) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScenarioObserver for NoopObserver {}

/// Observer that turns lifecycle events into `tracing` events
#[derive(Debug, Default)]
pub struct TracingObserver {
    started: Option<Instant>,
    queries: usize,
    failed_queries: usize,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries seen in the current scenario
    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn failed_queries(&self) -> usize {
        self.failed_queries
    }
}

impl ScenarioObserver for TracingObserver {
    fn scenario_started(&mut self, name: &str) {
        self.started = Some(Instant::now());
        self.queries = 0;
        self.failed_queries = 0;
        debug!(scenario = name, "scenario started");
    }

    fn query_executed(&mut self, query: &str, outcome: &QueryOutcome) {
        self.queries += 1;
        match outcome {
            QueryOutcome::Rows(table) => {
                debug!(query, rows = table.row_count(), "query executed");
            }
            QueryOutcome::Failed(e) => {
                self.failed_queries += 1;
                debug!(query, error = %e, "query failed");
            }
        }
    }

    fn scenario_finished(&mut self, name: &str, passed: bool) {
        let elapsed_ms = self
            .started
            .take()
            .map_or(0, |start| start.elapsed().as_millis() as u64);
        if passed {
            info!(scenario = name, queries = self.queries, elapsed_ms, "scenario passed");
        } else {
            warn!(
                scenario = name,
                queries = self.queries,
                failed_queries = self.failed_queries,
                elapsed_ms,
                "scenario failed"
            );
        }
    }
}
