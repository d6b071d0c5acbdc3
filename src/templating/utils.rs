//! Utility functions for the templating system.

use serde_json::Value;

/// Perform a deep merge of two JSON values.
///
/// Recursively merges `overrides` into `base`. For objects, fields from
/// `overrides` are added or replace fields in `base`. For arrays and
/// primitives, `overrides` completely replaces `base`.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use run_template::templating::deep_merge_json;
///
/// let defaults = json!({ "db": { "host": "localhost", "port": 3306 } });
/// let manifest = json!({ "db": { "port": 5432 } });
///
/// let result = deep_merge_json(defaults, &manifest);
/// assert_eq!(result, json!({ "db": { "host": "localhost", "port": 5432 } }));
/// ```
pub fn deep_merge_json(mut base: Value, overrides: &Value) -> Value {
    match (base.as_object_mut(), overrides.as_object()) {
        (Some(base_obj), Some(override_obj)) => {
            for (key, override_value) in override_obj {
                match base_obj.get_mut(key) {
                    Some(base_value) if base_value.is_object() && override_value.is_object() => {
                        *base_value = deep_merge_json(base_value.take(), override_value);
                    }
                    // A null override keeps the default
                    Some(_) if override_value.is_null() => {}
                    _ => {
                        base_obj.insert(key.clone(), override_value.clone());
                    }
                }
            }
            base
        }
        (_, _) => overrides.clone(),
    }
}
