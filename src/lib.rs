//! Cypher TCK harness
//!
//! Support code for running the openCypher Technology Compatibility Kit
//! against a graph engine and triaging the results:
//! - [`matcher`] compares engine results with scenario expectations
//! - [`scenario`] is the step library an external runner drives
//! - [`outcome`] scrapes run output and classifies failures
//! - [`history`] diffs persisted runs to find regressions

pub mod cli;
pub mod config;
pub mod history;
pub mod logging;
pub mod matcher;
pub mod outcome;
pub mod scenario;

pub use config::{ColourMode, HarnessConfig};
pub use matcher::{compare_results, compare_side_effects, parse_literal, Comparison};
pub use outcome::{classify_error, parse_run_output, Category, Classification, FailureBreakdown};
pub use scenario::{ScenarioRunner, StepError};

// Engine boundary types, so step-runners need only this crate
pub use cypher_tck_engine::{
    EngineError, GraphEngine, Params, ResultTable, Row, SideEffects, SideEffectsMap, StubEngine,
    Value,
};
