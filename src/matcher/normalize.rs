//! Value canonicalization before comparison
//!
//! Engines and expectation literals can spell the same number differently
//! (`2` vs `2.0`). Normalization collapses whole floats to integers and turns
//! NaN into the string `"NaN"` so it compares equal to itself.

use cypher_tck_engine::Value;

// 2^63: the first float past i64::MAX
const I64_UPPER_EXCLUSIVE: f64 = 9_223_372_036_854_775_808.0;

/// Canonicalize a value (idempotent)
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Float(x) => normalize_float(*x),
        Value::List(items) => Value::List(items.iter().map(normalize_value).collect()),
        other => other.clone(),
    }
}

fn normalize_float(x: f64) -> Value {
    if x.is_nan() {
        return Value::String("NaN".to_string());
    }
    let negative_zero = x == 0.0 && x.is_sign_negative();
    let in_range = x >= i64::MIN as f64 && x < I64_UPPER_EXCLUSIVE;
    if x.is_finite() && x.trunc() == x && !negative_zero && in_range {
        Value::Int(x as i64)
    } else {
        Value::Float(x)
    }
}

/// Normalize then stringify one cell; null stays `None`
pub fn normalize_cell(value: &Value) -> Option<String> {
    match normalize_value(value) {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_floats_collapse() {
        assert_eq!(normalize_value(&Value::Float(2.0)), Value::Int(2));
        assert_eq!(normalize_value(&Value::Float(-3.0)), Value::Int(-3));
        assert_eq!(normalize_value(&Value::Float(0.0)), Value::Int(0));
    }

    #[test]
    fn test_fractional_floats_stay() {
        assert_eq!(normalize_value(&Value::Float(2.5)), Value::Float(2.5));
    }

    #[test]
    fn test_negative_zero_stays_float() {
        let v = normalize_value(&Value::Float(-0.0));
        assert!(matches!(v, Value::Float(x) if x == 0.0 && x.is_sign_negative()));
    }

    #[test]
    fn test_nan_becomes_string() {
        assert_eq!(normalize_value(&Value::Float(f64::NAN)), Value::from("NaN"));
    }

    #[test]
    fn test_out_of_range_floats_stay() {
        assert_eq!(normalize_value(&Value::Float(1e300)), Value::Float(1e300));
        assert_eq!(
            normalize_value(&Value::Float(f64::INFINITY)),
            Value::Float(f64::INFINITY)
        );
    }

    #[test]
    fn test_lists_normalize_recursively() {
        let v = Value::List(vec![
            Value::Float(1.0),
            Value::List(vec![Value::Float(f64::NAN), Value::Null]),
        ]);
        assert_eq!(
            normalize_value(&v),
            Value::List(vec![
                Value::Int(1),
                Value::List(vec![Value::from("NaN"), Value::Null]),
            ])
        );
    }

    #[test]
    fn test_other_types_pass_through() {
        assert_eq!(normalize_value(&Value::Null), Value::Null);
        assert_eq!(normalize_value(&Value::Bool(true)), Value::Bool(true));
        assert_eq!(normalize_value(&Value::from("x")), Value::from("x"));
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell(&Value::Null), None);
        assert_eq!(normalize_cell(&Value::Float(2.0)), Some("2".to_string()));
        assert_eq!(normalize_cell(&Value::from("2")), Some("2".to_string()));
        assert_eq!(
            normalize_cell(&Value::List(vec![Value::Float(1.0), Value::from("a")])),
            Some("[1, 'a']".to_string())
        );
    }
}
