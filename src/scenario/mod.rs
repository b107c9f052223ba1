//! Scenario step library
//!
//! The synchronous lifecycle an external step-runner drives for each
//! scenario: reset, given steps that prepare the graph, one or more queries,
//! then assertions. Assertion failures are [`StepError`]s whose messages use
//! the markers the outcome classifier recognises.

pub mod observer;
pub mod runner;

pub use observer::{NoopObserver, ScenarioObserver, TracingObserver};
pub use runner::{ErrorPhase, Procedure, QueryOutcome, ScenarioRunner};

use cypher_tck_engine::EngineError;

use crate::matcher::TableError;

/// Step failures
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Expected query text in '{0}' step")]
    NoQueryText(&'static str),

    #[error("Setup query failed: {error}\nQuery was: {query}")]
    Setup { error: EngineError, query: String },

    #[error("No query result available")]
    NoResult,

    #[error("Query failed with error: {error}\nQuery was: {query}")]
    QueryFailed { error: EngineError, query: String },

    #[error("Result mismatch:\n{detail}\nQuery was: {query}")]
    ResultMismatch { detail: String, query: String },

    #[error("Expected empty result, but got {count} rows:\n{rows}\nQuery was: {query}")]
    NotEmpty {
        count: usize,
        rows: String,
        query: String,
    },

    #[error("Expected no side effects, but got: {effects}\nQuery was: {query}")]
    UnexpectedSideEffects { effects: String, query: String },

    #[error("Side effects mismatch: {detail}\nQuery was: {query}")]
    SideEffectsMismatch { detail: String, query: String },

    #[error("Expected {kind} ({detail}), but query succeeded\nQuery was: {query}")]
    MissingError {
        kind: String,
        detail: String,
        query: String,
    },

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),
}

pub type Result<T> = std::result::Result<T, StepError>;
