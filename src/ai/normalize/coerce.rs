//! Lenient Value Coercers
//!
//! Primitive-level converters that absorb the variability of free-form
//! model output into exact types. None of these can fail: wrong types,
//! out-of-range numbers, and absent values all resolve to documented
//! fallbacks. The enum counterpart lives on each report enum as
//! `from_loose` (see `types::report`).

use serde_json::Value;

use crate::constants::normalize::{
    LIST_JOIN, NOT_SPECIFIED, SCORE_FALLBACK, SCORE_MAX, SCORE_MIN,
};

/// Coerce any JSON value into a plain string.
///
/// Strings pass through, arrays join their string/number elements with
/// `". "`, numbers are stringified, and everything else resolves to
/// `"Not specified"`.
pub fn flexible_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                parts.join(LIST_JOIN)
            }
        }
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// Coerce any JSON value into an integer score in [1, 10].
///
/// Numbers are taken directly, numeric strings are parsed, anything else
/// falls back to 5. A value above 10 is assumed to be on a 0-100 scale
/// and divided by 10 before rounding; the result is clamped to [1, 10].
/// Rounding is half-away-from-zero, so 85 becomes 9 and 95 becomes 10.
pub fn score(value: &Value) -> u8 {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let Some(mut n) = n else {
        return SCORE_FALLBACK;
    };
    if !n.is_finite() {
        return SCORE_FALLBACK;
    }

    if n > f64::from(SCORE_MAX) {
        n /= 10.0;
    }

    (n.round() as i64).clamp(i64::from(SCORE_MIN), i64::from(SCORE_MAX)) as u8
}

/// Coerce any JSON value into a list of strings.
///
/// Arrays keep their string elements (numbers are stringified, other
/// element types dropped); absent or non-array input becomes an empty vec.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_flexible_string_passthrough() {
        assert_eq!(flexible_string(&json!("hello")), "hello");
    }

    #[test]
    fn test_flexible_string_joins_arrays() {
        assert_eq!(flexible_string(&json!(["hello", "world"])), "hello. world");
        assert_eq!(flexible_string(&json!(["a", 2, "b"])), "a. 2. b");
    }

    #[test]
    fn test_flexible_string_stringifies_numbers() {
        assert_eq!(flexible_string(&json!(7)), "7");
        assert_eq!(flexible_string(&json!(7.5)), "7.5");
    }

    #[test]
    fn test_flexible_string_fallbacks() {
        assert_eq!(flexible_string(&json!(null)), "Not specified");
        assert_eq!(flexible_string(&json!(true)), "Not specified");
        assert_eq!(flexible_string(&json!({"a": 1})), "Not specified");
        assert_eq!(flexible_string(&json!([null, {}])), "Not specified");
    }

    #[test]
    fn test_score_in_range_passthrough() {
        assert_eq!(score(&json!(8)), 8);
        assert_eq!(score(&json!(1)), 1);
        assert_eq!(score(&json!(10)), 10);
    }

    #[test]
    fn test_score_rescales_percentage() {
        // 85 -> 8.5 -> round 9; 95 -> 9.5 -> round 10
        assert_eq!(score(&json!(85)), 9);
        assert_eq!(score(&json!(95)), 10);
        assert_eq!(score(&json!(100)), 10);
        assert_eq!(score(&json!(11)), 1);
    }

    #[test]
    fn test_score_parses_strings() {
        assert_eq!(score(&json!("7")), 7);
        assert_eq!(score(&json!(" 85 ")), 9);
    }

    #[test]
    fn test_score_non_numeric_falls_back() {
        assert_eq!(score(&json!("abc")), 5);
        assert_eq!(score(&json!(null)), 5);
        assert_eq!(score(&json!(["7"])), 5);
        assert_eq!(score(&json!(true)), 5);
    }

    #[test]
    fn test_score_clamps_extremes() {
        assert_eq!(score(&json!(0)), 1);
        assert_eq!(score(&json!(-4)), 1);
        assert_eq!(score(&json!(1000)), 10);
    }

    #[test]
    fn test_string_list() {
        assert_eq!(string_list(&json!(["a", "b"])), vec!["a", "b"]);
        assert_eq!(string_list(&json!(["a", 1, null])), vec!["a", "1"]);
        assert!(string_list(&json!(null)).is_empty());
        assert!(string_list(&json!("not a list")).is_empty());
    }

    proptest! {
        #[test]
        fn prop_score_always_in_bounds(n in -1e9f64..1e9f64) {
            let s = score(&json!(n));
            prop_assert!((1..=10).contains(&s));
        }

        #[test]
        fn prop_score_large_values_rescale(n in 11.0f64..100.0f64) {
            let expected = ((n / 10.0).round() as i64).clamp(1, 10) as u8;
            prop_assert_eq!(score(&json!(n)), expected);
        }

        #[test]
        fn prop_flexible_string_never_empty_on_null_like(s in "\\PC*") {
            // Whatever string comes in goes out unchanged.
            prop_assert_eq!(flexible_string(&json!(s.clone())), s);
        }
    }
}
