//! Failure classification
//!
//! Maps the first error line of a failing scenario onto a fixed taxonomy.
//! Rules are tried in order and the first hit wins, so the order of
//! [`RULES`] is part of the contract: a line mentioning both a parse error
//! and a runtime error is a parse error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Detail strings are cut to this many characters
const DETAIL_LIMIT: usize = 80;

/// The catch-all bucket keeps a little more of the raw line
const FALLBACK_LIMIT: usize = 100;

/// Error kinds a scenario can expect the engine to raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    SyntaxError,
    TypeError,
    SemanticError,
    ArgumentError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::SyntaxError,
        ErrorKind::TypeError,
        ErrorKind::SemanticError,
        ErrorKind::ArgumentError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::SemanticError => "SemanticError",
            ErrorKind::ArgumentError => "ArgumentError",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure taxonomy
///
/// Ordered by pipeline stage, which is also the order reports break ties in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    ParseUnexpectedToken,
    ParseOther,
    BinderVariableNotFound,
    BinderUnsupportedExpression,
    BinderOther,
    PlannerUnsupportedPattern,
    OptimizerNoValidPlan,
    RuntimeColumnTypeMismatch,
    RuntimeSortColumnNotFound,
    RuntimeDurationInSeconds,
    RuntimeDurationInMonths,
    RuntimeDurationInDays,
    RuntimeDeleteNotSupported,
    RuntimeStatementNotSupported,
    RuntimeInsertExpressionEval,
    RuntimeWrongPropertyType,
    RuntimeOther,
    MissingError(ErrorKind),
    ExpectedError(ErrorKind),
    ResultMismatch,
    SideEffectsMismatch,
    Other,

    /// A failing scenario with no captured error line
    Unclassified,
}

impl Category {
    /// Every category, parameterized ones expanded once per [`ErrorKind`]
    pub fn all() -> Vec<Category> {
        let mut all = vec![
            Category::ParseUnexpectedToken,
            Category::ParseOther,
            Category::BinderVariableNotFound,
            Category::BinderUnsupportedExpression,
            Category::BinderOther,
            Category::PlannerUnsupportedPattern,
            Category::OptimizerNoValidPlan,
            Category::RuntimeColumnTypeMismatch,
            Category::RuntimeSortColumnNotFound,
            Category::RuntimeDurationInSeconds,
            Category::RuntimeDurationInMonths,
            Category::RuntimeDurationInDays,
            Category::RuntimeDeleteNotSupported,
            Category::RuntimeStatementNotSupported,
            Category::RuntimeInsertExpressionEval,
            Category::RuntimeWrongPropertyType,
            Category::RuntimeOther,
        ];
        all.extend(ErrorKind::ALL.into_iter().map(Category::MissingError));
        all.extend(ErrorKind::ALL.into_iter().map(Category::ExpectedError));
        all.extend([
            Category::ResultMismatch,
            Category::SideEffectsMismatch,
            Category::Other,
            Category::Unclassified,
        ]);
        all
    }

    /// Display label, e.g. `Binder: VariableNotFound`
    pub fn label(&self) -> String {
        let fixed = match self {
            Category::ParseUnexpectedToken => "Parse: UnexpectedToken",
            Category::ParseOther => "Parse: Other",
            Category::BinderVariableNotFound => "Binder: VariableNotFound",
            Category::BinderUnsupportedExpression => "Binder: UnsupportedExpression",
            Category::BinderOther => "Binder: Other",
            Category::PlannerUnsupportedPattern => "Planner: UnsupportedPattern",
            Category::OptimizerNoValidPlan => "Optimizer: NoValidPlan",
            Category::RuntimeColumnTypeMismatch => "Runtime: ColumnTypeMismatch",
            Category::RuntimeSortColumnNotFound => "Runtime: SortColumnNotFound",
            Category::RuntimeDurationInSeconds => "Runtime: duration.inSeconds",
            Category::RuntimeDurationInMonths => "Runtime: duration.inMonths",
            Category::RuntimeDurationInDays => "Runtime: duration.inDays",
            Category::RuntimeDeleteNotSupported => "Runtime: DeleteNotSupported",
            Category::RuntimeStatementNotSupported => "Runtime: StatementNotSupported",
            Category::RuntimeInsertExpressionEval => "Runtime: InsertExpressionEval",
            Category::RuntimeWrongPropertyType => "Runtime: WrongPropertyType",
            Category::RuntimeOther => "Runtime: Other",
            Category::MissingError(kind) => return format!("Missing Error: {}", kind),
            Category::ExpectedError(kind) => return format!("Expected Error: {}", kind),
            Category::ResultMismatch => "Result: Mismatch",
            Category::SideEffectsMismatch => "Result: SideEffectsMismatch",
            Category::Other => "Other",
            Category::Unclassified => "Unknown (no error captured)",
        };
        fixed.to_string()
    }

    /// High-level group: the label text before the first `:`
    pub fn group(&self) -> &'static str {
        match self {
            Category::ParseUnexpectedToken | Category::ParseOther => "Parse",
            Category::BinderVariableNotFound
            | Category::BinderUnsupportedExpression
            | Category::BinderOther => "Binder",
            Category::PlannerUnsupportedPattern => "Planner",
            Category::OptimizerNoValidPlan => "Optimizer",
            Category::RuntimeColumnTypeMismatch
            | Category::RuntimeSortColumnNotFound
            | Category::RuntimeDurationInSeconds
            | Category::RuntimeDurationInMonths
            | Category::RuntimeDurationInDays
            | Category::RuntimeDeleteNotSupported
            | Category::RuntimeStatementNotSupported
            | Category::RuntimeInsertExpressionEval
            | Category::RuntimeWrongPropertyType
            | Category::RuntimeOther => "Runtime",
            Category::MissingError(_) => "Missing Error",
            Category::ExpectedError(_) => "Expected Error",
            Category::ResultMismatch | Category::SideEffectsMismatch => "Result",
            Category::Other => "Other",
            Category::Unclassified => "Unknown (no error captured)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A category plus an optional sub-detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub detail: Option<String>,
}

impl Classification {
    fn new(category: Category, detail: Option<String>) -> Self {
        Self { category, detail }
    }

    fn bare(category: Category) -> Self {
        Self::new(category, None)
    }

    fn with(category: Category, detail: impl Into<String>) -> Self {
        Self::new(category, Some(detail.into()))
    }
}

/// One entry of the ordered rule table
pub struct Rule {
    pub name: &'static str,
    apply: fn(&str) -> Option<Classification>,
}

impl Rule {
    pub fn apply(&self, line: &str) -> Option<Classification> {
        (self.apply)(line)
    }
}

struct Patterns {
    unexpected_token: Regex,
    parse_detail: Regex,
    variable_not_found: Regex,
    unsupported_expression: Regex,
    binding_detail: Regex,
    unsupported_pattern: Regex,
    column_types: Regex,
    sort_column: Regex,
    property_types: Regex,
    runtime_error: Regex,
    missing_error: Regex,
    expected_error: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let kinds = ErrorKind::ALL.map(|k| k.as_str()).join("|");
        Patterns {
            unexpected_token: Regex::new(r"Parse error: UnexpectedToken\((\w+)")
                .expect("Invalid regex"),
            parse_detail: Regex::new(r"Parse error: (.+)").expect("Invalid regex"),
            variable_not_found: Regex::new(r#"Binding error: VariableNotFound\("(\w+)"\)"#)
                .expect("Invalid regex"),
            unsupported_expression: Regex::new(r#"Binding error: UnsupportedExpression\("(.+?)"\)"#)
                .expect("Invalid regex"),
            binding_detail: Regex::new(r"Binding error: (.+)").expect("Invalid regex"),
            unsupported_pattern: Regex::new(r#"UnsupportedPattern\("(.+?)"\)"#)
                .expect("Invalid regex"),
            column_types: Regex::new(
                r"column types must match schema types, expected (\w+) but found (\w+)",
            )
            .expect("Invalid regex"),
            sort_column: Regex::new(r"Sort column '(.+?)' not found").expect("Invalid regex"),
            property_types: Regex::new(r"expected (\w+) but actual type is (\w+)")
                .expect("Invalid regex"),
            runtime_error: Regex::new(r#"RuntimeError\("(.+?)"\)"#).expect("Invalid regex"),
            missing_error: Regex::new(&format!(
                r"Expected ({}) \((\w+)\), but query succeeded",
                kinds
            ))
            .expect("Invalid regex"),
            expected_error: Regex::new(&format!(r"Expected ({})", kinds)).expect("Invalid regex"),
        }
    })
}

/// First `limit` characters of `text`
fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn capture(re: &Regex, line: &str, group: usize) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().to_string())
}

fn error_kind(re: &Regex, line: &str) -> Option<ErrorKind> {
    re.captures(line)
        .and_then(|caps| ErrorKind::from_name(&caps[1]))
}

/// Rules that only test for a fixed substring
fn contains(line: &str, needle: &str, category: Category) -> Option<Classification> {
    line.contains(needle).then(|| Classification::bare(category))
}

fn parse_unexpected_token(line: &str) -> Option<Classification> {
    capture(&patterns().unexpected_token, line, 1)
        .map(|token| Classification::with(Category::ParseUnexpectedToken, token))
}

fn parse_other(line: &str) -> Option<Classification> {
    if !line.contains("Parse error:") {
        return None;
    }
    let detail = capture(&patterns().parse_detail, line, 1).unwrap_or_else(|| "unknown".to_string());
    Some(Classification::with(Category::ParseOther, truncate(&detail, DETAIL_LIMIT)))
}

fn binder_variable_not_found(line: &str) -> Option<Classification> {
    capture(&patterns().variable_not_found, line, 1)
        .map(|name| Classification::with(Category::BinderVariableNotFound, name))
}

fn binder_unsupported_expression(line: &str) -> Option<Classification> {
    capture(&patterns().unsupported_expression, line, 1)
        .map(|expr| Classification::with(Category::BinderUnsupportedExpression, expr))
}

fn binder_other(line: &str) -> Option<Classification> {
    if !line.contains("Binding error:") {
        return None;
    }
    let detail = capture(&patterns().binding_detail, line, 1).unwrap_or_else(|| "unknown".to_string());
    Some(Classification::with(Category::BinderOther, truncate(&detail, DETAIL_LIMIT)))
}

fn planner_unsupported_pattern(line: &str) -> Option<Classification> {
    if !line.contains("UnsupportedPattern") {
        return None;
    }
    let detail = capture(&patterns().unsupported_pattern, line, 1)
        .unwrap_or_else(|| "unknown".to_string());
    Some(Classification::with(
        Category::PlannerUnsupportedPattern,
        truncate(&detail, DETAIL_LIMIT),
    ))
}

fn optimizer_no_valid_plan(line: &str) -> Option<Classification> {
    contains(line, "NoValidPlan", Category::OptimizerNoValidPlan)
}

fn runtime_column_type_mismatch(line: &str) -> Option<Classification> {
    patterns().column_types.captures(line).map(|caps| {
        Classification::with(
            Category::RuntimeColumnTypeMismatch,
            format!("{} vs {}", &caps[1], &caps[2]),
        )
    })
}

fn runtime_sort_column_not_found(line: &str) -> Option<Classification> {
    capture(&patterns().sort_column, line, 1)
        .map(|column| Classification::with(Category::RuntimeSortColumnNotFound, column))
}

fn runtime_duration_in_seconds(line: &str) -> Option<Classification> {
    contains(line, "duration.inSeconds()", Category::RuntimeDurationInSeconds)
}

fn runtime_duration_in_months(line: &str) -> Option<Classification> {
    contains(line, "duration.inMonths()", Category::RuntimeDurationInMonths)
}

fn runtime_duration_in_days(line: &str) -> Option<Classification> {
    contains(line, "duration.inDays()", Category::RuntimeDurationInDays)
}

fn runtime_delete_not_supported(line: &str) -> Option<Classification> {
    contains(line, "DELETE not supported", Category::RuntimeDeleteNotSupported)
}

fn runtime_statement_not_supported(line: &str) -> Option<Classification> {
    contains(
        line,
        "statement type is not supported",
        Category::RuntimeStatementNotSupported,
    )
}

fn runtime_insert_expression_eval(line: &str) -> Option<Classification> {
    contains(
        line,
        "Could not evaluate expression in INSERT",
        Category::RuntimeInsertExpressionEval,
    )
}

fn runtime_wrong_property_type(line: &str) -> Option<Classification> {
    if !line.contains("Wrong type for property") {
        return None;
    }
    let detail = patterns()
        .property_types
        .captures(line)
        .map(|caps| format!("{} vs {}", &caps[1], &caps[2]));
    Some(Classification::new(Category::RuntimeWrongPropertyType, detail))
}

fn runtime_other(line: &str) -> Option<Classification> {
    if !line.contains("Runtime") {
        return None;
    }
    let detail = capture(&patterns().runtime_error, line, 1).unwrap_or_else(|| line.to_string());
    Some(Classification::with(Category::RuntimeOther, truncate(&detail, DETAIL_LIMIT)))
}

fn missing_error(line: &str) -> Option<Classification> {
    let re = &patterns().missing_error;
    let kind = error_kind(re, line)?;
    let detail = capture(re, line, 2).unwrap_or_default();
    Some(Classification::with(Category::MissingError(kind), detail))
}

fn expected_error(line: &str) -> Option<Classification> {
    let kind = error_kind(&patterns().expected_error, line)?;
    Some(Classification::with(
        Category::ExpectedError(kind),
        truncate(line, DETAIL_LIMIT),
    ))
}

fn result_mismatch(line: &str) -> Option<Classification> {
    contains(line, "Result mismatch", Category::ResultMismatch)
}

fn side_effects_mismatch(line: &str) -> Option<Classification> {
    contains(line, "Side effects mismatch", Category::SideEffectsMismatch)
}

/// The ordered rule table; the catch-all lives in [`classify_error`]
pub static RULES: &[Rule] = &[
    Rule { name: "parse-unexpected-token", apply: parse_unexpected_token },
    Rule { name: "parse-other", apply: parse_other },
    Rule { name: "binder-variable-not-found", apply: binder_variable_not_found },
    Rule { name: "binder-unsupported-expression", apply: binder_unsupported_expression },
    Rule { name: "binder-other", apply: binder_other },
    Rule { name: "planner-unsupported-pattern", apply: planner_unsupported_pattern },
    Rule { name: "optimizer-no-valid-plan", apply: optimizer_no_valid_plan },
    Rule { name: "runtime-column-type-mismatch", apply: runtime_column_type_mismatch },
    Rule { name: "runtime-sort-column-not-found", apply: runtime_sort_column_not_found },
    Rule { name: "runtime-duration-in-seconds", apply: runtime_duration_in_seconds },
    Rule { name: "runtime-duration-in-months", apply: runtime_duration_in_months },
    Rule { name: "runtime-duration-in-days", apply: runtime_duration_in_days },
    Rule { name: "runtime-delete-not-supported", apply: runtime_delete_not_supported },
    Rule { name: "runtime-statement-not-supported", apply: runtime_statement_not_supported },
    Rule { name: "runtime-insert-expression-eval", apply: runtime_insert_expression_eval },
    Rule { name: "runtime-wrong-property-type", apply: runtime_wrong_property_type },
    Rule { name: "runtime-other", apply: runtime_other },
    Rule { name: "missing-error", apply: missing_error },
    Rule { name: "expected-error", apply: expected_error },
    Rule { name: "result-mismatch", apply: result_mismatch },
    Rule { name: "side-effects-mismatch", apply: side_effects_mismatch },
];

/// Classify one error line
///
/// Always yields a category; lines no rule recognizes land in
/// [`Category::Other`] with the line as detail.
pub fn classify_error(line: &str) -> Classification {
    let line = line.trim();
    RULES
        .iter()
        .find_map(|rule| rule.apply(line))
        .unwrap_or_else(|| Classification::with(Category::Other, truncate(line, FALLBACK_LIMIT)))
}
