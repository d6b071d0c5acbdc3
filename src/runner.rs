//! One render, start to finish.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::links::{collect_links, filter_consumed};
use crate::manifest::Manifest;
use crate::release::ReleaseDir;
use crate::templating::{RenderContext, RenderingMetadata, TemplateRenderer};

/// Inputs of a single render.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub job_name: String,
    pub manifest_path: PathBuf,
    /// Rendered template name as listed under the job spec's `templates`
    pub template_name: String,
    /// Release root containing `jobs/`
    pub release_dir: PathBuf,
}

/// Resolve properties and links for `request.job_name` and render its template.
///
/// Steps run in order and the first failure aborts:
///
/// 1. load the manifest and take the job's properties block
/// 2. list the release's jobs
/// 3. build the link every providing job offers
/// 4. keep the links the job consumes
/// 5. render the template
pub fn run_template(request: &RunRequest) -> Result<String> {
    let manifest = Manifest::load(&request.manifest_path)?;
    let manifest_properties = manifest.job_properties(&request.job_name)?;
    tracing::debug!("Manifest properties for '{}': {}", request.job_name, manifest_properties);

    let release = ReleaseDir::new(&request.release_dir);
    let job_names = release.job_names()?;
    tracing::debug!("Release jobs: {:?}", job_names);

    let links = collect_links(&release, &job_names, &manifest_properties)?;

    let spec = release.job_spec(&request.job_name)?;
    let consumes = spec.consumes_names();
    let links = filter_consumed(links, &consumes);
    tracing::debug!(
        "Job '{}' consumes {:?}, {} link(s) bound",
        request.job_name,
        consumes,
        links.len()
    );

    let (source_path, source) =
        release.template_source(&request.job_name, &spec, &request.template_name)?;

    let metadata = RenderingMetadata {
        job_name: request.job_name.clone(),
        template_name: request.template_name.clone(),
        source_path: Some(source_path),
    };
    let context = RenderContext::new(&request.job_name, manifest_properties, spec, links);

    TemplateRenderer::new().render(&source, &context, Some(&metadata)).with_context(|| {
        format!(
            "Failed to render template '{}' of job '{}'",
            request.template_name, request.job_name
        )
    })
}
