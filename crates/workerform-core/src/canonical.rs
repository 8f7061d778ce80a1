//! Canonical JSON form used as an equality oracle when diffing resource state.
//!
//! Two values are considered equivalent when their canonical encodings are
//! byte-identical. Object keys are sorted and `null` members (the absence
//! marker produced by unset optional fields) are dropped, so neither key order
//! nor the difference between "explicitly absent" and "omitted" can produce a
//! spurious diff. Array order is preserved.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Recursively rewrite `value` into canonical form.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut out = Map::with_capacity(entries.len());
            for (key, v) in entries {
                out.insert(key.clone(), canonicalize(v));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Serialize `value` and return its compact canonical JSON text.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&canonicalize(&value))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ignores_field_order() {
        let v1 = canonical_json(&json!({"a": "A", "b": "B"})).unwrap();
        assert_eq!(v1, r#"{"a":"A","b":"B"}"#);

        let v2 = canonical_json(&json!({"b": "B", "a": "A"})).unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_sorts_nested_objects() {
        let v1 = json!({"outer": {"z": 1, "y": [{"q": true, "p": false}]}, "a": 0});
        let v2 = json!({"a": 0, "outer": {"y": [{"p": false, "q": true}], "z": 1}});
        assert_eq!(canonical_json(&v1).unwrap(), canonical_json(&v2).unwrap());
        assert_eq!(
            canonical_json(&v1).unwrap(),
            r#"{"a":0,"outer":{"y":[{"p":false,"q":true}],"z":1}}"#
        );
    }

    #[test]
    fn test_drops_null_members() {
        let with_null = json!({"name": "test", "logpush": null, "nested": {"x": null}});
        let omitted = json!({"name": "test", "nested": {}});
        assert_eq!(
            canonical_json(&with_null).unwrap(),
            canonical_json(&omitted).unwrap()
        );
    }

    #[test]
    fn test_array_order_is_significant() {
        let v1 = json!({"flags": ["a", "b"]});
        let v2 = json!({"flags": ["b", "a"]});
        assert_ne!(canonical_json(&v1).unwrap(), canonical_json(&v2).unwrap());
    }

    #[test]
    fn test_keeps_null_array_elements() {
        assert_eq!(canonicalize(&json!([1, null, 2])), json!([1, null, 2]));
    }

    #[test]
    fn test_skipped_option_matches_null() {
        #[derive(Serialize)]
        struct WithSkip {
            name: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            date: Option<String>,
        }

        #[derive(Serialize)]
        struct WithNull {
            date: Option<String>,
            name: &'static str,
        }

        let a = canonical_json(&WithSkip { name: "n", date: None }).unwrap();
        let b = canonical_json(&WithNull { date: None, name: "n" }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(canonicalize(&json!(42)), json!(42));
        assert_eq!(canonicalize(&json!("s")), json!("s"));
        assert_eq!(canonicalize(&Value::Null), Value::Null);
    }
}
