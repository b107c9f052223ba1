//! Expectation table parsing
//!
//! Scenario tables reach the harness as grids of raw cell text. Result tables
//! carry a header row; key/value tables (side effects, parameters) do not.

use cypher_tck_engine::{Params, ResultTable, Row, SideEffectsMap};

use crate::matcher::literal::parse_literal;

/// Errors in key/value tables
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("Row {row}: expected 2 cells (key | value), found {found}")]
    NotAPair { row: usize, found: usize },

    #[error("Row {row}: count for '{key}' is not an integer: '{value}'")]
    InvalidCount {
        row: usize,
        key: String,
        value: String,
    },
}

/// Parse a result table whose first row is the header
///
/// Cells are zipped with header names by position; surplus header names or
/// cells are dropped. An empty grid yields no columns and no rows.
pub fn parse_table_rows<S: AsRef<str>>(table: &[Vec<S>]) -> ResultTable {
    let Some((header, body)) = table.split_first() else {
        return ResultTable::default();
    };

    let columns: Vec<String> = header.iter().map(|h| h.as_ref().to_string()).collect();
    let rows = body
        .iter()
        .map(|cells| {
            columns
                .iter()
                .zip(cells.iter())
                .map(|(column, cell)| (column.clone(), parse_literal(cell.as_ref())))
                .collect::<Row>()
        })
        .collect();

    ResultTable::new(columns, rows)
}

/// Split a headerless two-column table into trimmed `(key, value)` pairs
pub fn parse_pair_table<S: AsRef<str>>(table: &[Vec<S>]) -> Result<Vec<(String, String)>, TableError> {
    table
        .iter()
        .enumerate()
        .map(|(idx, cells)| match cells.as_slice() {
            [key, value] => Ok((key.as_ref().trim().to_string(), value.as_ref().trim().to_string())),
            _ => Err(TableError::NotAPair {
                row: idx + 1,
                found: cells.len(),
            }),
        })
        .collect()
}

/// Parse an expected side-effects table (`| +nodes | 1 |` per row)
pub fn parse_side_effects_table<S: AsRef<str>>(table: &[Vec<S>]) -> Result<SideEffectsMap, TableError> {
    let mut effects = SideEffectsMap::new();
    for (idx, (key, value)) in parse_pair_table(table)?.into_iter().enumerate() {
        let count = value.parse::<i64>().map_err(|_| TableError::InvalidCount {
            row: idx + 1,
            key: key.clone(),
            value: value.clone(),
        })?;
        effects.insert(key, count);
    }
    Ok(effects)
}

/// Parse a parameters table (`| name | literal |` per row)
pub fn parse_parameters_table<S: AsRef<str>>(table: &[Vec<S>]) -> Result<Params, TableError> {
    Ok(parse_pair_table(table)?
        .into_iter()
        .map(|(name, literal)| (name, parse_literal(&literal)))
        .collect())
}
