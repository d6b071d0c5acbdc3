//! run_template - render a release job's template from a deployment manifest
//!
//! Given a job name, a manifest and a template name, run_template resolves
//! the job's properties and the links it consumes, renders the template and
//! returns the text. Nothing is deployed: every link points at a single
//! synthetic instance.
//!
//! # Release Layout
//!
//! ```text
//! <release>/
//!   jobs/
//!     <job>/
//!       spec              # YAML: templates, properties, provides, consumes
//!       templates/<file>  # Tera source, rendered under the name given in spec.templates
//! ```
//!
//! # Property Resolution
//!
//! A dotted property name is looked up in the job instance's manifest
//! `properties` first, then in the spec's default. See
//! [`properties::PropertyResolver`] for the two lookup flavors used when
//! building links and when rendering.
//!
//! # Modules
//!
//! - [`cli`] - Argument parsing, logging setup and output
//! - [`core`] - Error types and user-facing error formatting
//! - [`links`] - Synthetic links between jobs
//! - [`manifest`] - Deployment manifest model
//! - [`properties`] - Nested property access and resolution
//! - [`release`] - Release directory and job spec model
//! - [`runner`] - One render, start to finish
//! - [`templating`] - Tera rendering with property and link functions
//!
//! # Example
//!
//! ```rust,no_run
//! use run_template::runner::{RunRequest, run_template};
//!
//! let request = RunRequest {
//!     job_name: "web".to_string(),
//!     manifest_path: "manifest.yml".into(),
//!     template_name: "config/web.yml".to_string(),
//!     release_dir: ".".into(),
//! };
//! println!("{}", run_template(&request)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod links;
pub mod manifest;
pub mod properties;
pub mod release;
pub mod runner;
pub mod templating;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
