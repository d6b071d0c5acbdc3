//! Dotted-path access to property trees.
//!
//! Manifest properties arrive as arbitrarily nested mappings, while specs and
//! link declarations name them with flat dotted paths (`db.tls.enabled`).
//! These helpers bridge the two on a generic [`serde_json::Value`] tree.
//!
//! # Examples
//!
//! ```rust
//! use run_template::properties::{get_nested, set_nested};
//! use serde_json::{Value, json};
//!
//! let mut doc = Value::Null;
//! set_nested(&mut doc, "db.tls.enabled", json!(true));
//! assert_eq!(doc, json!({ "db": { "tls": { "enabled": true } } }));
//! assert_eq!(get_nested(&doc, "db.tls.enabled"), Some(&json!(true)));
//! ```

pub mod resolver;

pub use resolver::{PropertyResolver, missing_default_placeholder};

use serde_json::{Map, Value};

/// Look up a dot-separated path in a tree.
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not a mapping. A present `null` is returned as `Some(&Value::Null)`;
/// callers decide whether that counts as absent.
pub fn get_nested<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.as_object()?.get(segment))
}

/// Assign `value` at a dot-separated path, creating intermediate mappings.
///
/// Any non-mapping value found along the way (including `doc` itself) is
/// replaced by an empty mapping so the assignment always lands.
pub fn set_nested(doc: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = doc;

    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            unreachable!("replaced by an object above");
        };

        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        current = map.entry(segment.to_string()).or_insert(Value::Null);
    }
}

/// String form of a property value.
///
/// Strings are taken verbatim, scalars use their literal form, `null` is
/// empty and collections are rendered as compact JSON.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested_walks_mappings() {
        let doc = json!({ "db": { "port": 5432, "tls": { "enabled": false } } });
        assert_eq!(get_nested(&doc, "db.port"), Some(&json!(5432)));
        assert_eq!(get_nested(&doc, "db.tls.enabled"), Some(&json!(false)));
        assert_eq!(get_nested(&doc, "db"), doc.get("db"));
    }

    #[test]
    fn test_get_nested_missing_segments() {
        let doc = json!({ "db": { "port": 5432 } });
        assert_eq!(get_nested(&doc, "db.address"), None);
        assert_eq!(get_nested(&doc, "db.port.value"), None);
        assert_eq!(get_nested(&doc, "cache"), None);
        assert_eq!(get_nested(&Value::Null, "db"), None);
    }

    #[test]
    fn test_get_nested_reports_explicit_null() {
        let doc = json!({ "db": { "password": null } });
        assert_eq!(get_nested(&doc, "db.password"), Some(&Value::Null));
    }

    #[test]
    fn test_set_nested_builds_intermediate_mappings() {
        let mut doc = json!({});
        set_nested(&mut doc, "a.b.c", json!("deep"));
        set_nested(&mut doc, "a.b.d", json!(1));
        set_nested(&mut doc, "top", json!(true));

        assert_eq!(doc, json!({ "a": { "b": { "c": "deep", "d": 1 } }, "top": true }));
    }

    #[test]
    fn test_set_nested_replaces_scalar_intermediate() {
        let mut doc = json!({ "a": "scalar" });
        set_nested(&mut doc, "a.b", json!(2));
        assert_eq!(doc, json!({ "a": { "b": 2 } }));
    }

    #[test]
    fn test_to_display_string() {
        assert_eq!(to_display_string(&json!("localhost")), "localhost");
        assert_eq!(to_display_string(&json!(5432)), "5432");
        assert_eq!(to_display_string(&json!(1.5)), "1.5");
        assert_eq!(to_display_string(&json!(true)), "true");
        assert_eq!(to_display_string(&Value::Null), "");
        assert_eq!(to_display_string(&json!(["a", 1])), r#"["a",1]"#);
        assert_eq!(to_display_string(&json!({ "k": "v" })), r#"{"k":"v"}"#);
    }
}
