//! Given/When/Then steps over an injected engine

use std::collections::BTreeMap;
use tracing::{debug, info};

use cypher_tck_engine::{EngineError, GraphEngine, Params, ResultTable, SideEffects};

use crate::matcher::{
    compare_side_effects, compare_tables, parse_parameters_table, parse_side_effects_table,
    parse_table_rows,
};
use crate::scenario::observer::ScenarioObserver;
use crate::scenario::{Result, StepError};

/// What the last executed query produced
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(ResultTable),
    Failed(EngineError),
}

/// Where an expected error should surface
///
/// Both phases are checked the same way; the engine boundary does not say
/// whether a failure happened while compiling or while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    CompileTime,
    Runtime,
}

/// A procedure registered by a `there exists a procedure` step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub signature: String,
    pub rows: Vec<Vec<String>>,
}

/// Per-scenario state plus the engine it drives
pub struct ScenarioRunner<E: GraphEngine> {
    engine: E,
    last_query: Option<String>,
    outcome: Option<QueryOutcome>,
    side_effects: SideEffects,
    setup_side_effects: SideEffects,
    procedures: BTreeMap<String, Procedure>,
    params: Params,
}

impl<E: GraphEngine> ScenarioRunner<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            last_query: None,
            outcome: None,
            side_effects: SideEffects::default(),
            setup_side_effects: SideEffects::default(),
            procedures: BTreeMap::new(),
            params: Params::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn outcome(&self) -> Option<&QueryOutcome> {
        self.outcome.as_ref()
    }

    /// Side effects of the last `executing query` step
    pub fn side_effects(&self) -> &SideEffects {
        &self.side_effects
    }

    /// Side effects accumulated by `having executed` setup steps
    pub fn setup_side_effects(&self) -> &SideEffects {
        &self.setup_side_effects
    }

    pub fn procedure(&self, signature: &str) -> Option<&Procedure> {
        self.procedures.get(signature)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    // --- lifecycle ---

    /// Clear the engine and forget everything from the previous scenario
    pub fn before_scenario(&mut self, name: &str, observer: &mut dyn ScenarioObserver) {
        self.engine.clear();
        self.last_query = None;
        self.outcome = None;
        self.side_effects = SideEffects::default();
        self.setup_side_effects = SideEffects::default();
        self.procedures.clear();
        self.params.clear();
        observer.scenario_started(name);
    }

    pub fn after_scenario(&mut self, name: &str, passed: bool, observer: &mut dyn ScenarioObserver) {
        observer.scenario_finished(name, passed);
    }

    // --- given ---

    pub fn given_empty_graph(&mut self) {
        self.engine.clear();
    }

    /// The scenario accepts whatever the graph currently holds
    pub fn given_any_graph(&mut self) {
        debug!("using current graph state");
    }

    /// Run a setup query; an engine failure here is a setup error
    pub fn having_executed(&mut self, query: &str) -> Result<()> {
        let query = require_query_text(query, "having executed")?;

        let before = self.engine.snapshot();
        self.engine
            .execute(query, &self.params)
            .map_err(|error| StepError::Setup {
                error,
                query: query.to_string(),
            })?;
        let after = self.engine.snapshot();

        self.setup_side_effects = SideEffects::between(&before, &after);
        debug!(query, "setup query executed");
        Ok(())
    }

    /// Record a procedure and its (possibly empty) data table
    pub fn given_procedure<S: AsRef<str>>(&mut self, signature: &str, table: &[Vec<S>]) {
        let rows = table
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().to_string()).collect())
            .collect();
        self.procedures.insert(
            signature.to_string(),
            Procedure {
                signature: signature.to_string(),
                rows,
            },
        );
        info!(signature, "registered procedure");
    }

    /// Add named parameters from a headerless `name | literal` table
    pub fn given_parameters<S: AsRef<str>>(&mut self, table: &[Vec<S>]) -> Result<()> {
        self.params.extend(parse_parameters_table(table)?);
        Ok(())
    }

    // --- when ---

    /// Execute the scenario's query, recording its outcome and side effects
    pub fn executing_query(&mut self, query: &str, observer: &mut dyn ScenarioObserver) -> Result<()> {
        let query = require_query_text(query, "executing query")?;

        let before = self.engine.snapshot();
        let outcome = match self.engine.execute(query, &self.params) {
            Ok(table) => QueryOutcome::Rows(table),
            Err(e) => QueryOutcome::Failed(e),
        };
        let after = self.engine.snapshot();

        self.side_effects = SideEffects::between(&before, &after);
        observer.query_executed(query, &outcome);
        self.last_query = Some(query.to_string());
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Control queries run exactly like scenario queries
    pub fn executing_control_query(
        &mut self,
        query: &str,
        observer: &mut dyn ScenarioObserver,
    ) -> Result<()> {
        self.executing_query(query, observer)
    }

    // --- then ---

    pub fn result_in_any_order<S: AsRef<str>>(&self, table: &[Vec<S>]) -> Result<()> {
        self.check_result(table, false)
    }

    pub fn result_in_order<S: AsRef<str>>(&self, table: &[Vec<S>]) -> Result<()> {
        self.check_result(table, true)
    }

    pub fn result_empty(&self) -> Result<()> {
        let rows = self.successful_rows()?;
        if rows.is_empty() {
            return Ok(());
        }
        Err(StepError::NotEmpty {
            count: rows.row_count(),
            rows: format!("{:?}", rows.rows),
            query: self.query_text(),
        })
    }

    pub fn no_side_effects(&self) -> Result<()> {
        self.require_rows()?;
        if self.side_effects.has_no_effects() {
            return Ok(());
        }
        Err(StepError::UnexpectedSideEffects {
            effects: format!("{:?}", self.side_effects.to_map()),
            query: self.query_text(),
        })
    }

    /// Compare side effects against a headerless `key | count` table
    pub fn side_effects_should_be<S: AsRef<str>>(&self, table: &[Vec<S>]) -> Result<()> {
        self.require_rows()?;
        let expected = parse_side_effects_table(table)?;
        let comparison = compare_side_effects(&self.side_effects.to_map(), &expected);
        if comparison.is_match() {
            return Ok(());
        }
        Err(StepError::SideEffectsMismatch {
            detail: comparison.detail().to_string(),
            query: self.query_text(),
        })
    }

    /// Passes when the last query failed with any error
    ///
    /// The error kind and detail name the expectation in the failure message
    /// but are not matched against the engine's error text.
    pub fn error_raised(&self, phase: ErrorPhase, kind: &str, detail: &str) -> Result<()> {
        match &self.outcome {
            Some(QueryOutcome::Failed(e)) => {
                debug!(?phase, kind, detail, error = %e, "expected error raised");
                Ok(())
            }
            _ => Err(StepError::MissingError {
                kind: kind.to_string(),
                detail: detail.to_string(),
                query: self.query_text(),
            }),
        }
    }

    fn check_result<S: AsRef<str>>(&self, table: &[Vec<S>], ordered: bool) -> Result<()> {
        let actual = self.successful_rows()?;
        let expected = parse_table_rows(table);
        let comparison = compare_tables(actual, &expected, ordered);
        if comparison.is_match() {
            return Ok(());
        }
        Err(StepError::ResultMismatch {
            detail: comparison.detail().to_string(),
            query: self.query_text(),
        })
    }

    /// Rows of the last query, or the step failure explaining their absence
    fn successful_rows(&self) -> Result<&ResultTable> {
        match &self.outcome {
            Some(QueryOutcome::Rows(table)) => Ok(table),
            Some(QueryOutcome::Failed(e)) => Err(StepError::QueryFailed {
                error: e.clone(),
                query: self.query_text(),
            }),
            None => Err(StepError::NoResult),
        }
    }

    fn require_rows(&self) -> Result<()> {
        match &self.outcome {
            Some(QueryOutcome::Rows(_)) => Ok(()),
            _ => Err(StepError::NoResult),
        }
    }

    fn query_text(&self) -> String {
        self.last_query.clone().unwrap_or_default()
    }
}

fn require_query_text<'a>(query: &'a str, step: &'static str) -> Result<&'a str> {
    match query.trim() {
        "" => Err(StepError::NoQueryText(step)),
        trimmed => Ok(trimmed),
    }
}
