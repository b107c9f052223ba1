//! No-op engine
//!
//! Lets the harness be exercised end to end before a real engine is wired in.
//! Every query succeeds with an empty result and the graph never changes.

use tracing::debug;

use crate::engine::{EngineError, GraphEngine, Params, ResultTable};

/// Engine that accepts every query and does nothing
#[derive(Debug, Default)]
pub struct StubEngine {
    executed: usize,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queries executed since the last `clear`
    pub fn executed(&self) -> usize {
        self.executed
    }
}

impl GraphEngine for StubEngine {
    fn clear(&mut self) {
        self.executed = 0;
    }

    fn execute(&mut self, query: &str, params: &Params) -> Result<ResultTable, EngineError> {
        debug!(params = params.len(), "stub engine ignoring query: {}", query);
        self.executed += 1;
        Ok(ResultTable::default())
    }

    fn node_count(&self) -> usize {
        0
    }

    fn edge_count(&self) -> usize {
        0
    }
}
