//! Property resolution against a manifest block and a job spec.
//!
//! A dotted name is looked up first in the manifest properties of the job
//! being rendered, then in the spec's declared defaults. The two callers
//! disagree about a property that is declared without a default:
//!
//! - [`PropertyResolver::resolve_or_placeholder`] (link construction) yields
//!   [`missing_default_placeholder`] so a link can still be built.
//! - [`PropertyResolver::resolve_or_fail`] (template `p()`) treats it as
//!   missing.
//!
//! Both fail with [`RunTemplateError::MissingProperty`] when neither source
//! knows the property at all.

use anyhow::Result;
use serde_json::Value;

use super::{get_nested, to_display_string};
use crate::core::RunTemplateError;
use crate::release::JobSpec;

/// Text substituted for a declared property that has no default.
pub fn missing_default_placeholder(property: &str) -> String {
    format!("no default value for {property}")
}

/// Outcome of looking a property up in a spec.
enum SpecLookup<'a> {
    Default(&'a Value),
    DeclaredWithoutDefault,
    Undeclared,
}

/// Looks up dotted property names for one manifest block and one spec.
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver<'a> {
    manifest_properties: &'a Value,
    spec: &'a JobSpec,
}

impl<'a> PropertyResolver<'a> {
    /// Pair a manifest properties tree with the spec that supplies defaults.
    pub fn new(manifest_properties: &'a Value, spec: &'a JobSpec) -> Self {
        Self {
            manifest_properties,
            spec,
        }
    }

    /// The manifest value for `property`, ignoring explicit `null`s.
    pub fn manifest_value(&self, property: &str) -> Option<&'a Value> {
        get_nested(self.manifest_properties, property).filter(|value| !value.is_null())
    }

    fn spec_lookup(&self, property: &str) -> SpecLookup<'a> {
        match self.spec.properties.get(property) {
            None => SpecLookup::Undeclared,
            Some(definition) => match definition.default.as_ref() {
                Some(default) if !default.is_null() => SpecLookup::Default(default),
                _ => SpecLookup::DeclaredWithoutDefault,
            },
        }
    }

    /// Resolve to a string, substituting a placeholder for a missing default.
    ///
    /// # Errors
    ///
    /// [`RunTemplateError::MissingProperty`] when the property is neither in
    /// the manifest nor declared in the spec.
    pub fn resolve_or_placeholder(&self, property: &str) -> Result<String> {
        if let Some(value) = self.manifest_value(property) {
            tracing::debug!("Property '{}' resolved from manifest", property);
            return Ok(to_display_string(value));
        }

        match self.spec_lookup(property) {
            SpecLookup::Default(default) => {
                tracing::debug!("Property '{}' resolved from spec default", property);
                Ok(to_display_string(default))
            }
            SpecLookup::DeclaredWithoutDefault => {
                tracing::debug!("Property '{}' has no default, using placeholder", property);
                Ok(missing_default_placeholder(property))
            }
            SpecLookup::Undeclared => Err(RunTemplateError::MissingProperty {
                property: property.to_string(),
            }
            .into()),
        }
    }

    /// Resolve to the raw value, failing when no value exists.
    ///
    /// # Errors
    ///
    /// [`RunTemplateError::MissingProperty`] when neither the manifest nor a
    /// spec default supplies a value.
    pub fn resolve_or_fail(&self, property: &str) -> Result<Value> {
        if let Some(value) = self.manifest_value(property) {
            return Ok(value.clone());
        }

        match self.spec_lookup(property) {
            SpecLookup::Default(default) => Ok(default.clone()),
            SpecLookup::DeclaredWithoutDefault | SpecLookup::Undeclared => {
                Err(RunTemplateError::MissingProperty {
                    property: property.to_string(),
                }
                .into())
            }
        }
    }
}
