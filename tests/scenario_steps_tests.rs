//! Scenario step library driven end to end against a small in-memory engine

use std::collections::BTreeSet;

use cypher_tck::outcome::{classify_error, Category};
use cypher_tck::scenario::{ErrorPhase, NoopObserver, ScenarioRunner, StepError, TracingObserver};
use cypher_tck::{EngineError, GraphEngine, Params, ResultTable, Row, Value};

/// Understands just enough to run the scenarios below:
/// `CREATE (:Label)`, `MATCH (n) RETURN count(n) AS c`, `RETURN $name AS v`
/// and `MATCH (n) DELETE n`. Anything else is a parse error.
#[derive(Default)]
struct TinyEngine {
    labels: Vec<String>,
}

impl GraphEngine for TinyEngine {
    fn clear(&mut self) {
        self.labels.clear();
    }

    fn execute(&mut self, query: &str, params: &Params) -> Result<ResultTable, EngineError> {
        if let Some(rest) = query.strip_prefix("CREATE (:") {
            self.labels.push(rest.trim_end_matches(')').to_string());
            return Ok(ResultTable::default());
        }
        match query {
            "MATCH (n) RETURN count(n) AS c" => Ok(single("c", Value::Int(self.labels.len() as i64))),
            "MATCH (n) DELETE n" => {
                self.labels.clear();
                Ok(ResultTable::default())
            }
            "RETURN $name AS v" => Ok(single(
                "v",
                params.get("name").cloned().unwrap_or(Value::Null),
            )),
            _ => Err(EngineError::Query(format!(
                "Parse error: UnexpectedToken(IDENTIFIER) in '{}'",
                query
            ))),
        }
    }

    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn edge_count(&self) -> usize {
        0
    }

    fn label_count(&self) -> Option<usize> {
        let distinct: BTreeSet<&str> = self.labels.iter().map(String::as_str).collect();
        Some(distinct.len())
    }
}

fn single(column: &str, value: Value) -> ResultTable {
    let row: Row = [(column.to_string(), value)].into_iter().collect();
    ResultTable::new(vec![column.to_string()], vec![row])
}

fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn test_create_scenario_with_side_effects() {
    let mut observer = TracingObserver::new();
    let mut runner = ScenarioRunner::new(TinyEngine::default());

    runner.before_scenario("Create a labelled node", &mut observer);
    runner.given_empty_graph();
    runner.executing_query("CREATE (:A)", &mut observer).unwrap();
    runner.result_empty().unwrap();
    runner
        .side_effects_should_be(&table(&[&["+nodes", "1"], &["+labels", "1"]]))
        .unwrap();
    runner.after_scenario("Create a labelled node", true, &mut observer);

    assert_eq!(observer.queries(), 1);
}

#[test]
fn test_setup_then_count() {
    let mut runner = ScenarioRunner::new(TinyEngine::default());
    runner.before_scenario("count", &mut NoopObserver);
    runner.given_any_graph();
    runner.having_executed("CREATE (:A)").unwrap();
    runner.having_executed("CREATE (:B)").unwrap();

    runner
        .executing_query("MATCH (n) RETURN count(n) AS c", &mut NoopObserver)
        .unwrap();
    runner.result_in_order(&table(&[&["c"], &["2"]])).unwrap();
    runner.no_side_effects().unwrap();
}

#[test]
fn test_delete_reports_removals() {
    let mut runner = ScenarioRunner::new(TinyEngine::default());
    runner.having_executed("CREATE (:A)").unwrap();
    runner.executing_query("MATCH (n) DELETE n", &mut NoopObserver).unwrap();
    runner
        .side_effects_should_be(&table(&[&["-nodes", "1"], &["-labels", "1"]]))
        .unwrap();
}

#[test]
fn test_parameters_reach_the_engine() {
    let mut runner = ScenarioRunner::new(TinyEngine::default());
    runner.given_parameters(&table(&[&["name", "'Bob'"]])).unwrap();
    runner.executing_query("RETURN $name AS v", &mut NoopObserver).unwrap();
    runner.result_in_any_order(&table(&[&["v"], &["'Bob'"]])).unwrap();
}

#[test]
fn test_step_failures_classify_as_expected() {
    let mut runner = ScenarioRunner::new(TinyEngine::default());

    runner
        .executing_query("MATCH (n) RETURN count(n) AS c", &mut NoopObserver)
        .unwrap();
    let mismatch = runner.result_in_any_order(&table(&[&["c"], &["5"]])).unwrap_err();
    assert_eq!(classify_error(&mismatch.to_string()).category, Category::ResultMismatch);

    let missing = runner
        .error_raised(ErrorPhase::CompileTime, "SyntaxError", "InvalidParameterUse")
        .unwrap_err();
    assert_eq!(
        classify_error(&missing.to_string()).category.label(),
        "Missing Error: SyntaxError"
    );

    runner.executing_query("CREATE (:A)", &mut NoopObserver).unwrap();
    let effects = runner
        .side_effects_should_be(&table(&[&["+nodes", "2"]]))
        .unwrap_err();
    assert_eq!(
        classify_error(&effects.to_string()).category,
        Category::SideEffectsMismatch
    );
}

#[test]
fn test_engine_error_is_distinct_from_empty_result() {
    let mut runner = ScenarioRunner::new(TinyEngine::default());
    runner.executing_query("RETURN oops", &mut NoopObserver).unwrap();

    let err = runner.result_empty().unwrap_err();
    assert!(matches!(err, StepError::QueryFailed { .. }));
    assert!(err.to_string().contains("Query was: RETURN oops"));
    runner
        .error_raised(ErrorPhase::Runtime, "SyntaxError", "UnexpectedToken")
        .unwrap();
    assert!(matches!(runner.no_side_effects(), Err(StepError::NoResult)));
}

#[test]
fn test_malformed_side_effect_table() {
    let mut runner = ScenarioRunner::new(TinyEngine::default());
    runner.executing_query("CREATE (:A)", &mut NoopObserver).unwrap();
    let err = runner
        .side_effects_should_be(&table(&[&["+nodes", "lots"]]))
        .unwrap_err();
    assert!(matches!(err, StepError::Table(_)));
}
