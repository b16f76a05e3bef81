use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::sanitize::{DEFAULT_MAX_LENGTH, sanitize_with_limit};

/// Reduces untrusted tool arguments to sanitized strings, with the default
/// length ceiling.
///
/// See [`sanitize_parameter_set_with_limit`].
pub fn sanitize_parameter_set(raw: &Map<String, Value>) -> BTreeMap<String, String> {
    sanitize_parameter_set_with_limit(raw, DEFAULT_MAX_LENGTH)
}

/// Reduces untrusted tool arguments to sanitized strings.
///
/// Strings are sanitized, numbers and booleans are rendered as text. Keys
/// holding `null`, arrays or objects are dropped without an error.
pub fn sanitize_parameter_set_with_limit(raw: &Map<String, Value>, max_length: usize) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => sanitize_with_limit(s, max_length),
                Value::Number(n) => number_to_string(n),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    log::trace!("Dropping non-primitive parameter '{key}'");
                    return None;
                }
            };

            Some((key.clone(), value))
        })
        .collect()
}

/// Renders a number the way a JavaScript client would print it: whole values
/// without a fractional part.
fn number_to_string(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }

    if let Some(u) = number.as_u64() {
        return u.to_string();
    }

    match number.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn primitives_kept_and_compounds_dropped() {
        let raw = params(json!({
            "a": "x<y",
            "b": 3,
            "c": true,
            "d": null,
            "f": [1, 2],
            "g": { "h": 1 },
        }));

        insta::assert_debug_snapshot!(sanitize_parameter_set(&raw), @r#"
        {
            "a": "xy",
            "b": "3",
            "c": "true",
        }
        "#);
    }

    #[test]
    fn falsy_primitives_are_kept() {
        let raw = params(json!({ "zero": 0, "no": false, "empty": "" }));
        let sanitized = sanitize_parameter_set(&raw);

        assert_eq!(sanitized["zero"], "0");
        assert_eq!(sanitized["no"], "false");
        assert_eq!(sanitized["empty"], "");
    }

    #[test]
    fn number_rendering() {
        let raw = params(json!({
            "negative": -12,
            "big": 18446744073709551615u64,
            "fraction": 1.5,
            "whole_float": 3.0,
            "negative_zero": -0.0,
        }));

        let sanitized = sanitize_parameter_set(&raw);

        assert_eq!(sanitized["negative"], "-12");
        assert_eq!(sanitized["big"], "18446744073709551615");
        assert_eq!(sanitized["fraction"], "1.5");
        assert_eq!(sanitized["whole_float"], "3");
        assert_eq!(sanitized["negative_zero"], "0");
    }

    #[test]
    fn string_values_respect_limit() {
        let raw = params(json!({ "q": "abcdef" }));
        assert_eq!(sanitize_parameter_set_with_limit(&raw, 4)["q"], "abcd");
    }

    #[test]
    fn keys_appear_once() {
        let raw = params(json!({ "b": "1", "a": "2", "c": "3" }));
        let keys: Vec<_> = sanitize_parameter_set(&raw).into_keys().collect();

        assert_eq!(keys, ["a", "b", "c"]);
    }
}
