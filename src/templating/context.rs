//! Data bound to a template render.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tera::Context as TeraContext;

use super::utils::deep_merge_json;
use crate::links::{Link, LinkInstance};
use crate::release::JobSpec;

/// Everything a job template can see.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Job whose template is rendered
    pub job_name: String,
    /// The job instance's properties from the manifest
    pub manifest_properties: Value,
    /// The job's own spec, supplying defaults
    pub spec: JobSpec,
    /// Links the job consumes
    pub links: Vec<Link>,
}

/// Serialized shape of a link inside `links.<name>`.
#[derive(Serialize)]
struct LinkBinding<'a> {
    name: &'a str,
    address: Option<&'a str>,
    instances: &'a [LinkInstance],
    properties: &'a Value,
}

impl RenderContext {
    pub fn new(
        job_name: impl Into<String>,
        manifest_properties: Value,
        spec: JobSpec,
        links: Vec<Link>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            manifest_properties,
            spec,
            links,
        }
    }

    /// Spec defaults overlaid with the manifest's values.
    pub fn effective_properties(&self) -> Value {
        deep_merge_json(self.spec.defaults_tree(), &self.manifest_properties)
    }

    /// Links keyed by name. A later link with the same name replaces an earlier one.
    pub fn links_by_name(&self) -> BTreeMap<String, Link> {
        self.links.iter().map(|link| (link.name.clone(), link.clone())).collect()
    }

    /// Variables: `name`, `properties` and `links`.
    pub fn to_tera_context(&self) -> TeraContext {
        let links: BTreeMap<&str, LinkBinding<'_>> = self
            .links
            .iter()
            .map(|link| {
                (
                    link.name.as_str(),
                    LinkBinding {
                        name: &link.name,
                        address: link.address(),
                        instances: &link.instances,
                        properties: &link.properties,
                    },
                )
            })
            .collect();

        let mut context = TeraContext::new();
        context.insert("name", &self.job_name);
        context.insert("properties", &self.effective_properties());
        context.insert("links", &links);
        context
    }
}
