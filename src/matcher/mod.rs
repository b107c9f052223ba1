//! Result matcher
//!
//! Reconciles what an engine returned with what a scenario expects:
//! - expected tables arrive as raw cell text and are parsed into [`Value`]s
//! - both sides are normalized so `2` and `2.0` compare equal and NaN stays
//!   distinguishable
//! - rows are compared in order or as multisets
//! - side-effect summaries are compared key by key
//!
//! Nothing in this module fails: every problem is reported as a
//! [`Comparison::Mismatch`] carrying a human-readable detail.
//!
//! [`Value`]: cypher_tck_engine::Value

pub mod compare;
pub mod literal;
pub mod normalize;
pub mod table;

pub use compare::{compare_results, compare_side_effects, compare_tables};
pub use literal::{parse_literal, MAX_LIST_DEPTH};
pub use normalize::{normalize_cell, normalize_value};
pub use table::{
    parse_pair_table, parse_parameters_table, parse_side_effects_table, parse_table_rows, TableError,
};

/// Outcome of comparing actual against expected data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch(String),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }

    /// Mismatch detail, empty on a match
    pub fn detail(&self) -> &str {
        match self {
            Comparison::Match => "",
            Comparison::Mismatch(detail) => detail,
        }
    }
}
