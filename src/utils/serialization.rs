// src/utils/serialization.rs
//! Serialization utilities for loosely-typed CMS payloads.
//!
//! Provides helpers for:
//! - Parsing raw response bodies into JSON values
//! - Coercing arbitrary JSON scalars into strings with truthiness semantics
//! - Picking the first populated key out of a set of aliases

use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Deserializes a value from a JSON string.
///
/// # Arguments
/// * `data` - JSON string to deserialize
///
/// # Returns
/// - `Ok(T)` with deserialized value on success
/// - `Err(serde_json::Error)` if deserialization fails
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}

/// Coerces a JSON value into a string if it is populated.
///
/// # Returns
/// - `Some(text)` for non-empty strings, non-zero numbers and `true`
/// - `None` for `null`, `false`, `0`, `""`, arrays and objects
///
/// # Note
/// CMS editors occasionally store serials as numbers; those are rendered as
/// text so `12345` and `12345.0` both compare equal to `"12345"`.
pub fn truthy_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map_or(true, |f| f != 0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Renders a number the way browsers print it: integral floats lose their
/// fractional part, so `12345.0` becomes `"12345"`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

/// Returns the first key among `keys` whose value is populated.
///
/// # Arguments
/// * `fields` - JSON object to read from
/// * `keys` - Keys in order of preference (primary name first, aliases after)
pub fn first_populated(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(truthy_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy_string_scalars() {
        assert_eq!(truthy_string(&json!("ABC")), Some("ABC".to_string()));
        assert_eq!(truthy_string(&json!(12345)), Some("12345".to_string()));
        assert_eq!(truthy_string(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_truthy_string_integral_floats_drop_fraction() {
        assert_eq!(truthy_string(&json!(12345.0)), Some("12345".to_string()));
        assert_eq!(truthy_string(&json!(-7.0)), Some("-7".to_string()));
        assert_eq!(truthy_string(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(truthy_string(&json!(0.0)), None);

        let parsed: Value = deserialize("40213.0").unwrap();
        assert_eq!(truthy_string(&parsed), Some("40213".to_string()));
    }

    #[test]
    fn test_truthy_string_falsy_values() {
        assert_eq!(truthy_string(&json!("")), None);
        assert_eq!(truthy_string(&json!(0)), None);
        assert_eq!(truthy_string(&json!(false)), None);
        assert_eq!(truthy_string(&Value::Null), None);
        assert_eq!(truthy_string(&json!({"a": 1})), None);
        assert_eq!(truthy_string(&json!(["a"])), None);
    }

    #[test]
    fn test_first_populated_falls_back_to_alias() {
        let fields = json!({ "studentName": "", "name": "Jane Doe" });
        let fields = fields.as_object().unwrap();

        assert_eq!(
            first_populated(fields, &["studentName", "name"]),
            Some("Jane Doe".to_string())
        );
        assert_eq!(first_populated(fields, &["missing"]), None);
    }

    #[test]
    fn test_deserialize_reports_malformed_json() {
        assert!(deserialize::<Value>("{\"items\": [").is_err());
        assert_eq!(deserialize::<Value>("{}").unwrap(), json!({}));
    }
}
