//! Template functions for reading properties and links.
//!
//! | Function  | Arguments                    | Result                                  |
//! |-----------|------------------------------|-----------------------------------------|
//! | `p`       | `name`, optional `default`   | property value, error when missing      |
//! | `has_p`   | `name`                       | whether the property has a value        |
//! | `link_p`  | `link`, `name`, opt. `default` | property of a consumed link           |
//! | `has_link`| `name`                       | whether the link is bound               |
//!
//! ```text
//! port: {{ p(name="port") }}
//! {% if has_link(name="db") %}db: {{ link_p(link="db", name="address") }}{% endif %}
//! ```

use std::collections::{BTreeMap, HashMap};
use tera::Value;

use crate::core::RunTemplateError;
use crate::links::Link;
use crate::properties::PropertyResolver;
use crate::release::JobSpec;

fn string_arg<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    key: &str,
) -> tera::Result<&'a str> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(tera::Error::msg(format!(
            "{function}: argument '{key}' must be a string, got {other}"
        ))),
        None => Err(tera::Error::msg(format!("{function}: missing required argument '{key}'"))),
    }
}

/// Keep a typed failure reachable through the returned error's source chain.
fn function_error(error: RunTemplateError) -> tera::Error {
    tera::Error::chain(error.to_string(), error)
}

/// `p(name, default?)`: the job's own property.
pub fn create_p_function(manifest_properties: Value, spec: JobSpec) -> impl tera::Function {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let name = string_arg("p", args, "name")?;
        let resolver = PropertyResolver::new(&manifest_properties, &spec);

        match resolver.resolve_or_fail(name) {
            Ok(value) => Ok(value),
            Err(e) => match args.get("default") {
                Some(default) => Ok(default.clone()),
                None => Err(match e.downcast::<RunTemplateError>() {
                    Ok(error) => function_error(error),
                    Err(e) => tera::Error::msg(e.to_string()),
                }),
            },
        }
    }
}

/// `has_p(name)`: true when `p(name)` succeeds without a default.
pub fn create_has_p_function(manifest_properties: Value, spec: JobSpec) -> impl tera::Function {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let name = string_arg("has_p", args, "name")?;
        let resolver = PropertyResolver::new(&manifest_properties, &spec);
        Ok(Value::Bool(resolver.resolve_or_fail(name).is_ok()))
    }
}

/// `link_p(link, name, default?)`: a property of a consumed link.
pub fn create_link_p_function(links: BTreeMap<String, Link>) -> impl tera::Function {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let link_name = string_arg("link_p", args, "link")?;
        let name = string_arg("link_p", args, "name")?;

        let Some(link) = links.get(link_name) else {
            return Err(function_error(RunTemplateError::LinkNotFound {
                name: link_name.to_string(),
                available: links.keys().cloned().collect(),
            }));
        };

        match (link.property(name), args.get("default")) {
            (Some(value), _) if !value.is_null() => Ok(value.clone()),
            (_, Some(default)) => Ok(default.clone()),
            _ => Err(tera::Error::msg(format!(
                "could not find property {name} in link '{link_name}'"
            ))),
        }
    }
}

/// `has_link(name)`: true when the job consumes a link of that name and one was built.
pub fn create_has_link_function(links: BTreeMap<String, Link>) -> impl tera::Function {
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let name = string_arg("has_link", args, "name")?;
        Ok(Value::Bool(links.contains_key(name)))
    }
}
