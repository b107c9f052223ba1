//! The graph engine contract
//!
//! An engine is injected into the harness; nothing here links a concrete
//! implementation. The contract is deliberately narrow:
//! - execute a query with optional named parameters
//! - report node and edge counts (for side-effect deltas)
//! - optionally report property and label counts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Value;

/// One result row, keyed by column name
pub type Row = BTreeMap<String, Value>;

/// Named query parameters
pub type Params = BTreeMap<String, Value>;

/// Columns plus rows returned by a single query execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column names in projection order (not checked for uniqueness)
    pub columns: Vec<String>,

    /// Rows in the order the engine produced them
    pub rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Whether the result has no rows (columns may still be present)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Failure reported by an engine while executing a query
///
/// The message is the engine's own text, kept verbatim so the outcome
/// classifier can triage it later.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Query(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Entity counts observed at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: usize,
    pub edges: usize,

    /// Total property count, if the engine tracks it
    pub properties: Option<usize>,

    /// Distinct label count, if the engine tracks it
    pub labels: Option<usize>,
}

/// A graph-query engine driven by the harness
///
/// Calls are strictly sequential: one scenario at a time, one query at a time.
pub trait GraphEngine {
    /// Drop all graph state so the next scenario starts empty
    fn clear(&mut self);

    /// Execute a query and return its rows, or the engine's failure text
    fn execute(&mut self, query: &str, params: &Params) -> Result<ResultTable, EngineError>;

    /// Current number of nodes
    fn node_count(&self) -> usize;

    /// Current number of edges (relationships)
    fn edge_count(&self) -> usize;

    /// Current number of properties across all entities
    fn property_count(&self) -> Option<usize> {
        None
    }

    /// Current number of distinct labels
    fn label_count(&self) -> Option<usize> {
        None
    }

    /// Capture all counts the engine reports
    fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.node_count(),
            edges: self.edge_count(),
            properties: self.property_count(),
            labels: self.label_count(),
        }
    }
}

impl<E: GraphEngine + ?Sized> GraphEngine for Box<E> {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn execute(&mut self, query: &str, params: &Params) -> Result<ResultTable, EngineError> {
        (**self).execute(query, params)
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn property_count(&self) -> Option<usize> {
        (**self).property_count()
    }

    fn label_count(&self) -> Option<usize> {
        (**self).label_count()
    }
}
