//! Literal cell grammar
//!
//! Expected-result cells are loosely typed text. The grammar below is tried
//! in order and the first rule that applies wins:
//!
//! 1. `null` / `NULL` → null
//! 2. `NaN` → float NaN
//! 3. `true` / `false` (any case) → boolean
//! 4. numeric: contains `.`, `e` or `E` → float, otherwise integer
//! 5. single- or double-quoted → inner text, no escape processing
//! 6. `[ ... ]` → list, elements parsed recursively
//! 7. anything else → the trimmed text verbatim
//!
//! Parsing is total. Nodes, relationships, paths and maps fall through to
//! rule 7 and are compared as opaque strings. Cells whose brackets nest
//! deeper than [`MAX_LIST_DEPTH`] are also kept verbatim, so a parsed value
//! never nests deeper than that.

use cypher_tck_engine::Value;

/// Deepest bracket nesting parsed as a list
pub const MAX_LIST_DEPTH: usize = 64;

/// Parse one table cell into a value
pub fn parse_literal(text: &str) -> Value {
    let text = text.trim();
    if nesting_depth(text) > MAX_LIST_DEPTH {
        return Value::String(text.to_string());
    }
    parse_cell(text)
}

fn parse_cell(text: &str) -> Value {
    let text = text.trim();

    if text == "null" || text == "NULL" {
        return Value::Null;
    }

    if text == "NaN" {
        return Value::Float(f64::NAN);
    }

    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if let Some(number) = parse_number(text) {
        return number;
    }

    if let Some(inner) = strip_quotes(text) {
        return Value::String(inner.to_string());
    }

    if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
        return parse_list(&text[1..text.len() - 1]);
    }

    Value::String(text.to_string())
}

fn parse_number(text: &str) -> Option<Value> {
    if text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        text.parse::<f64>().ok().map(Value::Float)
    } else {
        text.parse::<i64>().ok().map(Value::Int)
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    ['\'', '"']
        .into_iter()
        .find(|q| text.starts_with(*q) && text.ends_with(*q))
        .map(|_| &text[1..text.len() - 1])
}

fn parse_list(inner: &str) -> Value {
    let inner = inner.trim();
    if inner.is_empty() {
        return Value::List(Vec::new());
    }
    Value::List(split_elements(inner).into_iter().map(parse_cell).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Plain,
    Quoted(char),
}

/// Deepest unquoted bracket nesting in `text`
fn nesting_depth(text: &str) -> usize {
    let mut state = ScanState::Plain;
    let mut depth = 0usize;
    let mut deepest = 0usize;

    for ch in text.chars() {
        state = match (state, ch) {
            (ScanState::Quoted(q), c) if c == q => ScanState::Plain,
            (ScanState::Quoted(q), _) => ScanState::Quoted(q),
            (ScanState::Plain, '\'' | '"') => ScanState::Quoted(ch),
            (ScanState::Plain, '[') => {
                depth += 1;
                deepest = deepest.max(depth);
                ScanState::Plain
            }
            (ScanState::Plain, ']') => {
                depth = depth.saturating_sub(1);
                ScanState::Plain
            }
            (ScanState::Plain, _) => ScanState::Plain,
        };
    }
    deepest
}

/// Split list contents on commas at bracket depth zero, outside quoted runs
///
/// Interior empty elements are kept (they parse as empty strings); a trailing
/// empty element is dropped.
fn split_elements(inner: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut state = ScanState::Plain;
    let mut depth: i32 = 0;
    let mut start = 0;

    for (idx, ch) in inner.char_indices() {
        state = match (state, ch) {
            (ScanState::Quoted(q), c) if c == q => ScanState::Plain,
            (ScanState::Quoted(q), _) => ScanState::Quoted(q),
            (ScanState::Plain, '\'' | '"') => ScanState::Quoted(ch),
            (ScanState::Plain, '[') => {
                depth += 1;
                ScanState::Plain
            }
            (ScanState::Plain, ']') => {
                depth -= 1;
                ScanState::Plain
            }
            (ScanState::Plain, ',') if depth == 0 => {
                elements.push(inner[start..idx].trim());
                start = idx + 1;
                ScanState::Plain
            }
            (ScanState::Plain, _) => ScanState::Plain,
        };
    }

    let last = inner[start..].trim();
    if !last.is_empty() {
        elements.push(last);
    }
    elements
}
