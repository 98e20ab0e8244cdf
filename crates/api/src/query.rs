//! Query parameter access helpers.
//!
//! Handlers read from the raw query map so malformed numeric input degrades
//! to defaults and clamps instead of a framework-level rejection -- every
//! failure that does occur keeps the JSON error envelope. An empty value is
//! treated the same as an absent one.

use std::collections::HashMap;

use crate::error::AppError;

/// Raw query parameters as extracted by `Query<QueryMap>`.
pub type QueryMap = HashMap<String, String>;

/// Fetch a required parameter; absent or empty values are a 400.
pub fn required<'a>(params: &'a QueryMap, key: &'static str) -> Result<&'a str, AppError> {
    match params.get(key).map(String::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::MissingParam(key)),
    }
}

/// Fetch an optional parameter, falling back to `default` when absent or
/// empty.
pub fn optional<'a>(params: &'a QueryMap, key: &str, default: &'a str) -> &'a str {
    match params.get(key).map(String::as_str) {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// Fetch an optional integer parameter; unparseable values fall back to
/// `default` (callers clamp the result into their own range).
pub fn optional_i64(params: &QueryMap, key: &str, default: i64) -> i64 {
    params
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn required_rejects_absent_and_empty() {
        let map = params(&[("present", "x"), ("empty", "")]);

        assert_eq!(required(&map, "present").unwrap(), "x");
        assert_matches!(required(&map, "empty"), Err(AppError::MissingParam("empty")));
        assert_matches!(required(&map, "gone"), Err(AppError::MissingParam("gone")));
    }

    #[test]
    fn optional_falls_back_on_absent_and_empty() {
        let map = params(&[("set", "value"), ("empty", "")]);

        assert_eq!(optional(&map, "set", "d"), "value");
        assert_eq!(optional(&map, "empty", "d"), "d");
        assert_eq!(optional(&map, "gone", "d"), "d");
    }

    #[test]
    fn optional_i64_degrades_to_default() {
        let map = params(&[("n", "42"), ("junk", "4x2")]);

        assert_eq!(optional_i64(&map, "n", 7), 42);
        assert_eq!(optional_i64(&map, "junk", 7), 7);
        assert_eq!(optional_i64(&map, "gone", 7), 7);
    }
}
