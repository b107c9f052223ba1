//! Result and side-effect comparison

use std::collections::BTreeSet;
use std::fmt::Write;

use cypher_tck_engine::{ResultTable, Row, SideEffectsMap};

use crate::matcher::normalize::normalize_cell;
use crate::matcher::Comparison;

/// A row after normalization, projected onto the expected column order
type NormalizedRow = Vec<Option<String>>;

#[derive(Debug, thiserror::Error)]
enum CompareError {
    #[error("{side} row {row} has no value for column '{column}'")]
    MissingCell {
        side: &'static str,
        row: usize,
        column: String,
    },
}

/// Compare an actual result against an expected one
///
/// Column *sets* must match before any row is looked at. Rows are then
/// normalized to strings, projected onto the expected column order and, when
/// `ordered` is false, sorted. Equality is exact, duplicates included.
pub fn compare_results(
    actual_columns: &[String],
    actual_rows: &[Row],
    expected_columns: &[String],
    expected_rows: &[Row],
    ordered: bool,
) -> Comparison {
    let actual_set: BTreeSet<&str> = actual_columns.iter().map(String::as_str).collect();
    let expected_set: BTreeSet<&str> = expected_columns.iter().map(String::as_str).collect();
    if actual_set != expected_set {
        return Comparison::Mismatch(format!(
            "Column mismatch: expected {:?}, got {:?}",
            expected_columns, actual_columns
        ));
    }

    match (actual_rows.is_empty(), expected_rows.is_empty()) {
        (true, true) => return Comparison::Match,
        (true, false) => {
            return Comparison::Mismatch(format!("Expected {} rows, got 0", expected_rows.len()))
        }
        (false, true) => {
            return Comparison::Mismatch(format!("Expected 0 rows, got {}", actual_rows.len()))
        }
        (false, false) => {}
    }

    match compare_rows(actual_rows, expected_columns, expected_rows, ordered) {
        Ok(comparison) => comparison,
        Err(e) => Comparison::Mismatch(format!("Error comparing results: {}", e)),
    }
}

/// [`compare_results`] over whole tables
pub fn compare_tables(actual: &ResultTable, expected: &ResultTable, ordered: bool) -> Comparison {
    compare_results(
        &actual.columns,
        &actual.rows,
        &expected.columns,
        &expected.rows,
        ordered,
    )
}

fn compare_rows(
    actual_rows: &[Row],
    columns: &[String],
    expected_rows: &[Row],
    ordered: bool,
) -> Result<Comparison, CompareError> {
    let mut actual = normalize_rows("actual", actual_rows, columns)?;
    let mut expected = normalize_rows("expected", expected_rows, columns)?;

    if !ordered {
        actual.sort();
        expected.sort();
    }

    if actual == expected {
        Ok(Comparison::Match)
    } else {
        Ok(Comparison::Mismatch(format!(
            "Results don't match:\nExpected:\n{}\nActual:\n{}",
            render_rows(columns, &expected),
            render_rows(columns, &actual)
        )))
    }
}

fn normalize_rows(
    side: &'static str,
    rows: &[Row],
    columns: &[String],
) -> Result<Vec<NormalizedRow>, CompareError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            columns
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(normalize_cell)
                        .ok_or_else(|| CompareError::MissingCell {
                            side,
                            row: idx + 1,
                            column: column.clone(),
                        })
                })
                .collect()
        })
        .collect()
}

fn render_rows(columns: &[String], rows: &[NormalizedRow]) -> String {
    let cell_text = |cell: &Option<String>| cell.clone().unwrap_or_else(|| "null".to_string());

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_text(cell).chars().count());
        }
    }

    let mut out = String::new();
    let mut write_line = |cells: Vec<String>| {
        out.push('|');
        for (cell, width) in cells.iter().zip(&widths) {
            let _ = write!(out, " {:<width$} |", cell, width = *width);
        }
        out.push('\n');
    };

    write_line(columns.to_vec());
    for row in rows {
        write_line(row.iter().map(cell_text).collect());
    }
    out.trim_end().to_string()
}

/// Compare side-effect summaries by exact key/value equality
///
/// The mismatch detail lists missing keys, unexpected keys and differing
/// counts, joined with `"; "`.
pub fn compare_side_effects(actual: &SideEffectsMap, expected: &SideEffectsMap) -> Comparison {
    if actual == expected {
        return Comparison::Match;
    }

    let missing: Vec<&str> = expected
        .keys()
        .filter(|k| !actual.contains_key(*k))
        .map(String::as_str)
        .collect();
    let extra: Vec<&str> = actual
        .keys()
        .filter(|k| !expected.contains_key(*k))
        .map(String::as_str)
        .collect();

    let mut errors = Vec::new();
    if !missing.is_empty() {
        errors.push(format!("Missing side effects: {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        errors.push(format!("Unexpected side effects: {}", extra.join(", ")));
    }
    for (key, expected_count) in expected {
        if let Some(actual_count) = actual.get(key) {
            if actual_count != expected_count {
                errors.push(format!(
                    "{}: expected {}, got {}",
                    key, expected_count, actual_count
                ));
            }
        }
    }

    Comparison::Mismatch(errors.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cypher_tck_engine::Value;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[(&str, Value)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn effects(pairs: &[(&str, i64)]) -> SideEffectsMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_compare_results_exact_match() {
        let rows = vec![
            row(&[("name", "a".into()), ("value", 1i64.into())]),
            row(&[("name", "b".into()), ("value", 2i64.into())]),
        ];
        let c = cols(&["name", "value"]);
        let result = compare_results(&c, &rows, &c, &rows, true);
        assert!(result.is_match());
        assert_eq!(result.detail(), "");
    }

    #[test]
    fn test_compare_results_unordered_match() {
        let c = cols(&["name", "value"]);
        let actual = vec![
            row(&[("name", "b".into()), ("value", 2i64.into())]),
            row(&[("name", "a".into()), ("value", 1i64.into())]),
        ];
        let expected = vec![
            row(&[("name", "a".into()), ("value", 1i64.into())]),
            row(&[("name", "b".into()), ("value", 2i64.into())]),
        ];
        assert!(compare_results(&c, &actual, &c, &expected, false).is_match());
        assert!(!compare_results(&c, &actual, &c, &expected, true).is_match());
    }

    #[test]
    fn test_compare_results_column_mismatch() {
        let actual = vec![row(&[("name", "a".into()), ("value", 1i64.into())])];
        let expected = vec![row(&[("name", "a".into()), ("age", 1i64.into())])];
        let result = compare_results(
            &cols(&["name", "value"]),
            &actual,
            &cols(&["name", "age"]),
            &expected,
            false,
        );
        assert!(result.detail().starts_with("Column mismatch"));
    }

    #[test]
    fn test_compare_results_column_order_irrelevant() {
        let actual = vec![row(&[("a", 1i64.into()), ("b", 2i64.into())])];
        let expected = actual.clone();
        let result = compare_results(&cols(&["b", "a"]), &actual, &cols(&["a", "b"]), &expected, true);
        assert!(result.is_match());
    }

    #[test]
    fn test_compare_results_empty_sides() {
        let c = cols(&["n"]);
        let one = vec![row(&[("n", 1i64.into())])];
        assert!(compare_results(&c, &[], &c, &[], false).is_match());
        assert_eq!(
            compare_results(&c, &[], &c, &one, false).detail(),
            "Expected 1 rows, got 0"
        );
        assert_eq!(
            compare_results(&c, &one, &c, &[], false).detail(),
            "Expected 0 rows, got 1"
        );
    }

    #[test]
    fn test_compare_results_float_collapses_to_int() {
        let c = cols(&["v"]);
        let actual = vec![row(&[("v", Value::Float(2.0))])];
        let expected = vec![row(&[("v", Value::from("2"))])];
        assert!(compare_results(&c, &actual, &c, &expected, false).is_match());
    }

    #[test]
    fn test_compare_results_nan_matches_nan() {
        let c = cols(&["v"]);
        let actual = vec![row(&[("v", Value::Float(f64::NAN))])];
        assert!(compare_results(&c, &actual, &c, &actual.clone(), true).is_match());
    }

    #[test]
    fn test_compare_results_duplicate_multiplicity() {
        let c = cols(&["v"]);
        let actual = vec![row(&[("v", 1i64.into())]), row(&[("v", 1i64.into())])];
        let expected = vec![row(&[("v", 1i64.into())]), row(&[("v", 2i64.into())])];
        assert!(!compare_results(&c, &actual, &c, &expected, false).is_match());
    }

    #[test]
    fn test_compare_results_null_distinct_from_string() {
        let c = cols(&["v"]);
        let actual = vec![row(&[("v", Value::Null)])];
        let expected = vec![row(&[("v", Value::from("null"))])];
        assert!(!compare_results(&c, &actual, &c, &expected, true).is_match());
    }

    #[test]
    fn test_compare_results_missing_cell_is_reported() {
        let c = cols(&["a", "b"]);
        let actual = vec![row(&[("a", 1i64.into())])];
        let expected = vec![row(&[("a", 1i64.into()), ("b", 2i64.into())])];
        let result = compare_results(&c, &actual, &c, &expected, false);
        assert_eq!(
            result.detail(),
            "Error comparing results: actual row 1 has no value for column 'b'"
        );
    }

    #[test]
    fn test_mismatch_detail_renders_both_tables() {
        let c = cols(&["n"]);
        let actual = vec![row(&[("n", 1i64.into())])];
        let expected = vec![row(&[("n", 22i64.into())])];
        let detail = compare_results(&c, &actual, &c, &expected, true)
            .detail()
            .to_string();
        assert_eq!(
            detail,
            "Results don't match:\nExpected:\n| n  |\n| 22 |\nActual:\n| n |\n| 1 |"
        );
    }

    #[test]
    fn test_compare_side_effects_match() {
        let e = effects(&[("+nodes", 2), ("+labels", 1)]);
        assert!(compare_side_effects(&e, &e.clone()).is_match());
        assert!(compare_side_effects(&effects(&[]), &effects(&[])).is_match());
    }

    #[test]
    fn test_compare_side_effects_missing() {
        let result = compare_side_effects(&effects(&[("+nodes", 2)]), &effects(&[("+nodes", 2), ("+labels", 1)]));
        assert_eq!(result.detail(), "Missing side effects: +labels");
    }

    #[test]
    fn test_compare_side_effects_extra() {
        let result = compare_side_effects(&effects(&[("+nodes", 1)]), &effects(&[]));
        assert_eq!(result.detail(), "Unexpected side effects: +nodes");
    }

    #[test]
    fn test_compare_side_effects_all_kinds() {
        let actual = effects(&[("+nodes", 3), ("-labels", 1)]);
        let expected = effects(&[("+nodes", 2), ("+properties", 4)]);
        assert_eq!(
            compare_side_effects(&actual, &expected).detail(),
            "Missing side effects: +properties; Unexpected side effects: -labels; +nodes: expected 2, got 3"
        );
    }
}
