//! Job spec documents (`jobs/<job>/spec`).
//!
//! ```yaml
//! name: provider
//! templates:
//!   config.yml.erb: config/config.yml
//! properties:
//!   address:
//!     description: Listen address
//!     default: localhost
//! provides:
//!   - name: db
//!     type: database
//!     properties: [address, port]
//! consumes:
//!   - name: cache
//!     optional: true
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A job's declaration of templates, properties and link roles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobSpec {
    /// Job name as declared in the spec, if any
    #[serde(default)]
    pub name: Option<String>,

    /// Template source file (under `templates/`) -> rendered file name
    #[serde(default, deserialize_with = "null_as_default")]
    pub templates: BTreeMap<String, String>,

    /// Flat dotted property name -> definition
    #[serde(default, deserialize_with = "property_definitions")]
    pub properties: BTreeMap<String, PropertyDefinition>,

    /// Links this job exposes; only a single entry is supported
    #[serde(default, deserialize_with = "null_as_default")]
    pub provides: Vec<ProvidesLink>,

    /// Links this job depends on
    #[serde(default, deserialize_with = "null_as_default")]
    pub consumes: Vec<ConsumesLink>,
}

/// One entry under `properties`.
///
/// A bare `name:` with no body deserializes as a definition without default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyDefinition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
}

/// One entry under `provides`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProvidesLink {
    pub name: String,
    #[serde(default, rename = "type")]
    pub link_type: Option<String>,
    /// Dotted property names exported through the link
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<String>,
}

/// One entry under `consumes`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConsumesLink {
    pub name: String,
    #[serde(default, rename = "type")]
    pub link_type: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl JobSpec {
    /// Parse a spec from YAML text, expanding merge keys.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is an empty spec
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut value: serde_yaml::Value = serde_yaml::from_str(content)?;
        value.apply_merge()?;
        serde_yaml::from_value(value)
    }

    /// Names of the links this job consumes, in declaration order.
    pub fn consumes_names(&self) -> Vec<String> {
        self.consumes.iter().map(|link| link.name.clone()).collect()
    }

    /// Spec defaults assembled into a nested tree.
    ///
    /// Properties without a default are left out.
    pub fn defaults_tree(&self) -> Value {
        let mut tree = Value::Object(serde_json::Map::new());
        for (name, definition) in &self.properties {
            if let Some(default) = definition.default.as_ref().filter(|v| !v.is_null()) {
                crate::properties::set_nested(&mut tree, name, default.clone());
            }
        }
        tree
    }
}

/// Treat an explicit YAML `~` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Property entries may have an empty body (`password:`).
fn property_definitions<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, PropertyDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<PropertyDefinition>>> =
        Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, definition)| (name, definition.unwrap_or_default()))
        .collect())
}
