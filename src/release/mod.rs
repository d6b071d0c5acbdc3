//! Release directory access.
//!
//! A release is laid out as:
//!
//! ```text
//! <release>/
//!   jobs/
//!     <job>/
//!       spec
//!       templates/
//!         <source files named in spec.templates>
//! ```

pub mod spec;

pub use spec::{ConsumesLink, JobSpec, PropertyDefinition, ProvidesLink};

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::{FileOperation, FileResultExt, RunTemplateError, read_text_file};

/// Root of a release checkout.
#[derive(Debug, Clone)]
pub struct ReleaseDir {
    root: PathBuf,
}

impl ReleaseDir {
    /// Wrap a release root path. Nothing is read until a method is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.root.join("jobs")
    }

    pub fn job_dir(&self, job_name: &str) -> PathBuf {
        self.jobs_dir().join(job_name)
    }

    /// Names of every job directory in the release, sorted.
    ///
    /// Plain files and hidden entries directly under `jobs/` are ignored.
    pub fn job_names(&self) -> Result<Vec<String>> {
        let jobs_dir = self.jobs_dir();
        let entries = std::fs::read_dir(&jobs_dir).with_file_context(
            FileOperation::ReadDir,
            &jobs_dir,
            "listing release jobs",
            "release::job_names",
        )?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_file_context(
                FileOperation::ReadDir,
                &jobs_dir,
                "listing release jobs",
                "release::job_names",
            )?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();

        tracing::debug!("Found {} job(s) in {}: {:?}", names.len(), jobs_dir.display(), names);
        Ok(names)
    }

    /// Load `jobs/<job_name>/spec`.
    pub fn job_spec(&self, job_name: &str) -> Result<JobSpec> {
        let spec_path = self.job_dir(job_name).join("spec");
        let content = read_text_file(&spec_path, "reading job spec", "release::job_spec")?;

        let spec = JobSpec::from_yaml(&content)
            .map_err(|e| RunTemplateError::SpecParseError {
                file: spec_path.display().to_string(),
                reason: e.to_string(),
            })
            .with_context(|| format!("Failed to load spec for job '{job_name}'"))?;

        tracing::debug!(
            "Loaded spec for job '{}': {} properties, {} provides, {} consumes",
            job_name,
            spec.properties.len(),
            spec.provides.len(),
            spec.consumes.len()
        );
        Ok(spec)
    }

    /// Source file of the template that renders to `template_name`.
    ///
    /// `template_name` is the rendered name (a value of `spec.templates`),
    /// not the source file name.
    pub fn template_path(
        &self,
        job_name: &str,
        spec: &JobSpec,
        template_name: &str,
    ) -> Result<PathBuf> {
        spec.templates
            .iter()
            .find(|(_, rendered)| rendered.as_str() == template_name)
            .map(|(source, _)| self.job_dir(job_name).join("templates").join(source))
            .ok_or_else(|| {
                RunTemplateError::TemplateNotFound {
                    job: job_name.to_string(),
                    template: template_name.to_string(),
                    available: spec.templates.values().cloned().collect(),
                }
                .into()
            })
    }

    /// Read the source of the template that renders to `template_name`.
    pub fn template_source(
        &self,
        job_name: &str,
        spec: &JobSpec,
        template_name: &str,
    ) -> Result<(PathBuf, String)> {
        let path = self.template_path(job_name, spec, template_name)?;
        let source = read_text_file(&path, "reading template for render", "release::template_source")?;
        Ok((path, source))
    }
}
