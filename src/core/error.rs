//! Error handling for run-template
//!
//! Two layers, as in the rest of the crate:
//! - [`RunTemplateError`] - typed failures raised while resolving a job
//! - [`ErrorContext`] - wraps an error with details and a suggestion for the terminal
//!
//! Library code returns [`anyhow::Result`] and attaches context with
//! `.with_context(...)`. The binary converts whatever bubbles up with
//! [`user_friendly_error`] and prints it with [`ErrorContext::display`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use run_template::core::{RunTemplateError, user_friendly_error};
//!
//! let error = RunTemplateError::JobNotFound {
//!     job: "consumer".to_string(),
//!     known_jobs: vec!["provider".to_string()],
//!     suggestion: None,
//! };
//! user_friendly_error(anyhow::Error::from(error)).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::core::file_error::FileOperationError;
use crate::templating::TemplateError;

/// Literal usage line printed on wrong arity.
pub const USAGE: &str = "USAGE: run_template <job_name> <manifest_filename> <template_name>";

/// Every fatal condition of a run.
///
/// None of these are retried; the first one raised ends the run with a
/// non-zero exit status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunTemplateError {
    /// Wrong number of positional arguments.
    #[error("{}", USAGE)]
    Usage,

    /// The manifest exists but is not a valid manifest document.
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path of the manifest
        file: String,
        /// Parser message
        reason: String,
    },

    /// A job spec exists but is not a valid spec document.
    #[error("Invalid job spec syntax in {file}")]
    SpecParseError {
        /// Path of the spec file
        file: String,
        /// Parser message
        reason: String,
    },

    /// The target job is absent from every instance group.
    #[error("there is a problem with the manifest. could not find job {job} in {known_jobs:?}")]
    JobNotFound {
        /// Requested job name
        job: String,
        /// All job names found across instance groups, in manifest order
        known_jobs: Vec<String>,
        /// Closest known name, if any is close enough
        suggestion: Option<String>,
    },

    /// A spec uses a shape this tool does not handle.
    #[error("not implemented: {feature}")]
    NotImplemented {
        /// What is unsupported
        feature: String,
    },

    /// A property is neither in the manifest nor declared in the spec.
    #[error("could not find property {property}")]
    MissingProperty {
        /// Dotted property name
        property: String,
    },

    /// The job has no template that renders to the requested name.
    #[error("Template '{template}' not found in job '{job}'")]
    TemplateNotFound {
        /// Job that was searched
        job: String,
        /// Requested rendered name
        template: String,
        /// Rendered names the job does declare
        available: Vec<String>,
    },

    /// A template asked for a link the job does not consume.
    #[error("Link '{name}' is not available to this job")]
    LinkNotFound {
        /// Link name requested by the template
        name: String,
        /// Names of the links that were bound
        available: Vec<String>,
    },

    /// Anything else worth a message.
    #[error("{message}")]
    Other {
        /// Free-form message
        message: String,
    },
}

/// An error together with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RunTemplateError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no details or suggestion.
    #[must_use]
    pub const fn new(error: RunTemplateError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with details and a suggestion.
///
/// The whole `anyhow` chain is walked, so errors wrapped in
/// `.with_context(...)` are still recognized. The outermost context message
/// is kept as details when the recognized error sits deeper in the chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let outer = error.to_string();
    let mut current: &dyn std::error::Error = error.as_ref();

    loop {
        if let Some(run_error) = current.downcast_ref::<RunTemplateError>() {
            let ctx = create_error_context(run_error.clone());
            if ctx.details.is_none() && outer != run_error.to_string() {
                return ctx.with_details(outer);
            }
            return ctx;
        }

        if let Some(template_error) = current.downcast_ref::<TemplateError>() {
            if let Some(cause) = template_error.cause() {
                let formatted = template_error.format_with_context();
                let ctx = create_error_context(cause.clone());
                let details = match ctx.details.as_deref() {
                    Some(details) => format!("{details}\n\n{formatted}"),
                    None => formatted,
                };
                return ctx.with_details(details);
            }
            return ErrorContext::new(RunTemplateError::Other {
                message: template_error.to_string(),
            })
            .with_details(template_error.format_with_context())
            .with_suggestion("Check the template syntax and the properties and links it references");
        }

        if let Some(file_error) = current.downcast_ref::<FileOperationError>() {
            return ErrorContext::new(RunTemplateError::Other {
                message: file_error.to_string(),
            })
            .with_details(file_error.user_message())
            .with_suggestion("Check that the path exists and that --release-dir points at the release root");
        }

        match current.source() {
            Some(source) => current = source,
            None => break,
        }
    }

    let chain = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>();
    let ctx = ErrorContext::new(RunTemplateError::Other {
        message: outer,
    });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join(": "))
    }
}

fn create_error_context(error: RunTemplateError) -> ErrorContext {
    match &error {
        RunTemplateError::Usage => ErrorContext::new(error),
        RunTemplateError::ManifestParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("The manifest must be YAML with an 'instance_groups' list")
        }
        RunTemplateError::SpecParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check the spec's 'properties', 'provides' and 'consumes' blocks")
        }
        RunTemplateError::JobNotFound {
            suggestion,
            ..
        } => {
            let hint = match suggestion {
                Some(name) => format!("Did you mean '{name}'?"),
                None => "Pass a job name that appears under instance_groups[].jobs[]".to_string(),
            };
            ErrorContext::new(error).with_suggestion(hint)
        }
        RunTemplateError::NotImplemented {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Split the extra provides into a separate job for local rendering"),
        RunTemplateError::MissingProperty {
            property,
        } => {
            let hint = format!(
                "Set '{property}' in the manifest or give it a default in the job spec"
            );
            ErrorContext::new(error).with_suggestion(hint)
        }
        RunTemplateError::TemplateNotFound {
            available,
            ..
        } => {
            let details = format!("Available templates: {}", available.join(", "));
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Use the rendered file name, not the source file name")
        }
        RunTemplateError::LinkNotFound {
            available,
            ..
        } => {
            let details = if available.is_empty() {
                "No links are bound for this job".to_string()
            } else {
                format!("Bound links: {}", available.join(", "))
            };
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Declare the link under 'consumes' and make sure a job provides it")
        }
        RunTemplateError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
