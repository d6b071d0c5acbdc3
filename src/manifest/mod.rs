//! Deployment manifest parsing.
//!
//! Only the parts needed to find one job instance's properties are modeled:
//!
//! ```yaml
//! name: my-deployment
//! instance_groups:
//!   - name: db
//!     jobs:
//!       - name: consumer
//!         release: my-release
//!         properties:
//!           port: 5432
//! ```
//!
//! Every other manifest key is accepted and ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use strsim::levenshtein;

use crate::core::{RunTemplateError, read_text_file};

/// Maximum edit distance for a "did you mean" job suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A parsed deployment manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instance_groups: Vec<InstanceGroup>,
}

/// One `instance_groups` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub jobs: Vec<JobInstance>,
}

/// One job placed on an instance group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInstance {
    pub name: String,
    #[serde(default)]
    pub release: Option<String>,
    /// Arbitrarily nested property overrides; `None` when the key is absent or null
    #[serde(default)]
    pub properties: Option<Value>,
}

impl Manifest {
    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// A [`crate::core::FileOperationError`] when the file cannot be read and
    /// [`RunTemplateError::ManifestParseError`] when it is not a manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_text_file(path, "reading deployment manifest", "manifest::load")?;

        let manifest = Self::from_yaml(&content)
            .map_err(|e| RunTemplateError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
            .with_context(|| format!("Failed to load manifest {}", path.display()))?;

        tracing::debug!(
            "Loaded manifest {} with {} instance group(s)",
            path.display(),
            manifest.instance_groups.len()
        );
        Ok(manifest)
    }

    /// Parse a manifest from YAML text.
    ///
    /// Merge keys (`<<: *anchor`) are expanded first.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut value: serde_yaml::Value = serde_yaml::from_str(content)?;
        value.apply_merge()?;
        serde_yaml::from_value(value)
    }

    /// All job names across all instance groups, in manifest order.
    pub fn job_names(&self) -> Vec<String> {
        self.instance_groups
            .iter()
            .flat_map(|group| group.jobs.iter().map(|job| job.name.clone()))
            .collect()
    }

    /// Properties of the named job instance.
    ///
    /// The first instance group containing the job wins. A job with no
    /// `properties` key yields an empty mapping.
    ///
    /// # Errors
    ///
    /// [`RunTemplateError::JobNotFound`] listing every known job name when no
    /// instance group contains the job.
    pub fn job_properties(&self, job_name: &str) -> Result<Value> {
        let instance = self
            .instance_groups
            .iter()
            .find_map(|group| group.jobs.iter().find(|job| job.name == job_name));

        match instance {
            Some(job) => {
                let properties = match &job.properties {
                    Some(value) if !value.is_null() => value.clone(),
                    _ => Value::Object(Map::new()),
                };
                Ok(properties)
            }
            None => {
                let known_jobs = self.job_names();
                let suggestion = closest_name(job_name, &known_jobs);
                Err(RunTemplateError::JobNotFound {
                    job: job_name.to_string(),
                    known_jobs,
                    suggestion,
                }
                .into())
            }
        }
    }
}

fn closest_name(target: &str, candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .map(|name| (name, levenshtein(target, name)))
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(name, _)| name.clone())
}
