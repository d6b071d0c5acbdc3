//! Synthetic links between jobs.
//!
//! Without a real deployment there are no instances to ask, so every job
//! that `provides` a link gets one fabricated [`Link`]: a single instance at
//! [`FAKE_ADDRESS`] and properties resolved from the manifest block of the
//! job being rendered, falling back to the provider's spec defaults.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::RunTemplateError;
use crate::properties::{PropertyResolver, get_nested, set_nested};
use crate::release::{JobSpec, ProvidesLink, ReleaseDir};

/// Address given to every synthetic link instance.
pub const FAKE_ADDRESS: &str = "fake_address";

/// One instance behind a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkInstance {
    pub address: String,
}

/// A named bundle of properties one job exposes to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub name: String,
    pub instances: Vec<LinkInstance>,
    /// Nested tree built from the provider's flat dotted property names
    pub properties: Value,
}

impl Link {
    /// Address of the first instance.
    pub fn address(&self) -> Option<&str> {
        self.instances.first().map(|instance| instance.address.as_str())
    }

    /// Look up a dotted property inside this link.
    pub fn property(&self, name: &str) -> Option<&Value> {
        get_nested(&self.properties, name)
    }
}

/// Build the link described by `provides`.
///
/// Each listed property goes through
/// [`PropertyResolver::resolve_or_placeholder`]; the first failure aborts.
pub fn build_link(provides: &ProvidesLink, resolver: &PropertyResolver<'_>) -> Result<Link> {
    let mut properties = Value::Object(Map::new());

    for property in &provides.properties {
        let value = resolver
            .resolve_or_placeholder(property)
            .with_context(|| format!("Failed to build link '{}'", provides.name))?;
        set_nested(&mut properties, property, Value::String(value));
    }

    Ok(Link {
        name: provides.name.clone(),
        instances: vec![LinkInstance {
            address: FAKE_ADDRESS.to_string(),
        }],
        properties,
    })
}

/// Links provided by one job spec: none, or exactly one.
///
/// # Errors
///
/// [`RunTemplateError::NotImplemented`] when the spec declares more than one
/// `provides` entry.
pub fn job_links(spec: &JobSpec, manifest_properties: &Value) -> Result<Vec<Link>> {
    match spec.provides.as_slice() {
        [] => Ok(Vec::new()),
        [provides] => {
            let resolver = PropertyResolver::new(manifest_properties, spec);
            Ok(vec![build_link(provides, &resolver)?])
        }
        _ => Err(RunTemplateError::NotImplemented {
            feature: "currently only supports one provides per spec".to_string(),
        }
        .into()),
    }
}

/// Links provided by every named job of the release, in `job_names` order.
///
/// `manifest_properties` belong to the job being rendered, not to the
/// providers.
pub fn collect_links(
    release: &ReleaseDir,
    job_names: &[String],
    manifest_properties: &Value,
) -> Result<Vec<Link>> {
    let mut links = Vec::new();

    for job_name in job_names {
        let spec = release.job_spec(job_name)?;
        let provided = job_links(&spec, manifest_properties)
            .with_context(|| format!("Failed to collect links provided by job '{job_name}'"))?;

        for link in &provided {
            tracing::debug!("Job '{}' provides link '{}'", job_name, link.name);
        }
        links.extend(provided);
    }

    Ok(links)
}

/// Keep only the links named in `consumes`, preserving order.
///
/// A consumed name with no matching link is logged and otherwise left for
/// the renderer to report if a template asks for it.
pub fn filter_consumed(links: Vec<Link>, consumes: &[String]) -> Vec<Link> {
    for name in consumes {
        if !links.iter().any(|link| &link.name == name) {
            tracing::warn!("No job in the release provides consumed link '{}'", name);
        }
    }

    links.into_iter().filter(|link| consumes.contains(&link.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ReleaseFixture;
    use serde_json::json;

    fn link(name: &str) -> Link {
        Link {
            name: name.to_string(),
            instances: vec![LinkInstance {
                address: FAKE_ADDRESS.to_string(),
            }],
            properties: json!({}),
        }
    }

    #[test]
    fn test_no_provides_contributes_nothing() {
        let spec = JobSpec::from_yaml("name: plain\nprovides: []\n").unwrap();
        assert!(job_links(&spec, &json!({})).unwrap().is_empty());

        let spec = JobSpec::from_yaml("name: plain\n").unwrap();
        assert!(job_links(&spec, &json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_provides_aborts() {
        let spec = JobSpec::from_yaml(
            r#"
provides:
  - name: db
    properties: [port]
  - name: admin
    properties: [port]
properties:
  port:
    default: 1
"#,
        )
        .unwrap();

        let err = job_links(&spec, &json!({})).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunTemplateError>(),
            Some(RunTemplateError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_build_link_nests_and_stringifies() {
        let spec = JobSpec::from_yaml(
            r#"
provides:
  - name: db
    properties: [address, port, tls.enabled, password]
properties:
  address:
    default: localhost
  port:
    default: 3306
  tls.enabled:
    default: false
  password: {}
"#,
        )
        .unwrap();
        let manifest = json!({ "port": 5432 });

        let links = job_links(&spec, &manifest).unwrap();
        assert_eq!(links.len(), 1);
        let db = &links[0];

        assert_eq!(db.name, "db");
        assert_eq!(db.address(), Some(FAKE_ADDRESS));
        assert_eq!(
            db.properties,
            json!({
                "address": "localhost",
                "port": "5432",
                "tls": { "enabled": "false" },
                "password": "no default value for password",
            })
        );
        assert_eq!(db.property("tls.enabled"), Some(&json!("false")));
    }

    #[test]
    fn test_build_link_missing_property_aborts() {
        let spec = JobSpec::from_yaml("provides:\n  - name: db\n    properties: [address]\n")
            .unwrap();
        let err = job_links(&spec, &json!({})).unwrap_err();

        assert!(err.to_string().contains("Failed to build link 'db'"));
        assert_eq!(
            err.downcast_ref::<RunTemplateError>(),
            Some(&RunTemplateError::MissingProperty {
                property: "address".to_string()
            })
        );
    }

    #[test]
    fn test_filter_keeps_only_consumed_in_order() {
        let links = vec![link("cache"), link("db"), link("queue"), link("metrics")];
        let consumes = vec!["queue".to_string(), "db".to_string(), "absent".to_string()];

        let names: Vec<_> =
            filter_consumed(links, &consumes).into_iter().map(|link| link.name).collect();
        assert_eq!(names, vec!["db", "queue"]);
    }

    #[test]
    fn test_filter_with_no_consumes_is_empty() {
        assert!(filter_consumed(vec![link("db")], &[]).is_empty());
    }

    #[test]
    fn test_collect_links_uses_target_manifest_properties() {
        let fixture = ReleaseFixture::new()
            .unwrap()
            .with_job("consumer", "consumes:\n  - name: db\n")
            .unwrap()
            .with_job(
                "provider",
                r#"
provides:
  - name: db
    properties: [address, port]
properties:
  address:
    default: localhost
  port:
    default: 3306
"#,
            )
            .unwrap();
        let release = fixture.release_dir();
        let jobs = release.job_names().unwrap();

        let links = collect_links(&release, &jobs, &json!({ "port": 5432 })).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].properties, json!({ "address": "localhost", "port": "5432" }));
    }
}
