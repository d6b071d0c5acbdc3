//! Template rendering engine with Tera.
//!
//! [`TemplateRenderer`] renders one job template against a
//! [`RenderContext`] with the property and link functions registered.

use regex::Regex;
use std::error::Error as _;
use std::path::PathBuf;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use crate::core::RunTemplateError;

use super::context::RenderContext;
use super::error::{ErrorLocation, TemplateError};
use super::functions;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Lines shown on each side of an error line.
const CONTEXT_LINES: usize = 3;

/// Context information about the current rendering operation
#[derive(Debug, Clone, Default)]
pub struct RenderingMetadata {
    /// Job owning the template
    pub job_name: String,
    /// Rendered name of the template, as listed in the job spec
    pub template_name: String,
    /// Source file path if available
    pub source_path: Option<PathBuf>,
}

/// Template renderer with the Tera engine and job functions.
#[derive(Debug, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `template_content` against `context`.
    ///
    /// A fresh Tera instance is built for every call with `p`, `has_p`,
    /// `link_p` and `has_link` bound to this context.
    pub fn render(
        &self,
        template_content: &str,
        context: &RenderContext,
        metadata: Option<&RenderingMetadata>,
    ) -> Result<String, TemplateError> {
        let tera_context = context.to_tera_context();

        tracing::debug!("Rendering template for job '{}'", context.job_name);
        Self::log_context_as_kv(&tera_context);

        let links = context.links_by_name();
        let mut tera = Tera::default();
        tera.register_function(
            "p",
            functions::create_p_function(context.manifest_properties.clone(), context.spec.clone()),
        );
        tera.register_function(
            "has_p",
            functions::create_has_p_function(
                context.manifest_properties.clone(),
                context.spec.clone(),
            ),
        );
        tera.register_function("link_p", functions::create_link_p_function(links.clone()));
        tera.register_function("has_link", functions::create_has_link_function(links));

        let rendered = tera
            .render_str(template_content, &tera_context)
            .map_err(|e| Self::parse_tera_error(&e, template_content, &tera_context, metadata))?;

        tracing::debug!("Template rendering complete");
        Ok(rendered)
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(
        error: &tera::Error,
        template_content: &str,
        context: &TeraContext,
        metadata: Option<&RenderingMetadata>,
    ) -> TemplateError {
        let line_number = Self::extract_line_from_tera_error(error);
        let context_lines = line_number
            .map(|line| Self::extract_context_lines(template_content, line, CONTEXT_LINES))
            .filter(|lines| !lines.is_empty());
        let location = Box::new(Self::build_error_location(metadata, line_number, context_lines));

        if let Some((function, message, cause)) = Self::find_function_failure(error) {
            return TemplateError::FunctionFailed {
                function,
                message,
                cause: cause.map(Box::new),
                location,
            };
        }

        let messages = Self::error_chain(error);
        if let Some(name) = messages.iter().find_map(|msg| Self::extract_variable_name(msg)) {
            let available_variables = Self::extract_available_variables(context);
            let suggestions = Self::find_similar_variables(&name, &available_variables);
            return TemplateError::VariableNotFound {
                variable: name,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location,
            };
        }

        TemplateError::SyntaxError {
            message: Self::format_tera_error(error),
            location,
        }
    }

    fn error_chain(error: &tera::Error) -> Vec<String> {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }

    /// Name of the failing template function and the innermost message.
    fn find_function_failure(
        error: &tera::Error,
    ) -> Option<(String, String, Option<RunTemplateError>)> {
        let mut function = match &error.kind {
            tera::ErrorKind::CallFunction(name) => Some(name.clone()),
            _ => None,
        };
        let mut innermost = error.to_string();
        let mut cause = None;

        let mut current = error.source();
        while let Some(err) = current {
            if let Some(tera::Error {
                kind: tera::ErrorKind::CallFunction(name),
                ..
            }) = err.downcast_ref::<tera::Error>()
            {
                function = Some(name.clone());
            }
            if let Some(run_error) = err.downcast_ref::<RunTemplateError>() {
                cause = Some(run_error.clone());
            }
            innermost = err.to_string();
            current = err.source();
        }

        function.map(|name| (name, innermost, cause))
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Dotted paths of every leaf in the context
    fn extract_available_variables(context: &TeraContext) -> Vec<String> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
            match value {
                serde_json::Value::Object(map) if !map.is_empty() => {
                    for (key, child) in map {
                        let path = if prefix.is_empty() {
                            key.clone()
                        } else {
                            format!("{prefix}.{key}")
                        };
                        walk(&path, child, out);
                    }
                }
                _ => {
                    if !prefix.is_empty() {
                        out.push(prefix.to_string());
                    }
                }
            }
        }

        let mut vars = Vec::new();
        walk("", &context.clone().into_json(), &mut vars);
        vars
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Lines around `error_line` with their 1-indexed numbers.
    fn extract_context_lines(
        content: &str,
        error_line: usize,
        context_size: usize,
    ) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, line.to_string()))
            .collect()
    }

    /// Extract line number from Tera error message
    ///
    /// Tera parse errors carry a `--> line:column` marker.
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = Self::error_chain(error).join("\n");

        let re = Regex::new(r"--> (\d+):(\d+)").ok()?;
        re.captures(&error_msg)
            .and_then(|caps| caps.get(1))
            .and_then(|line| line.as_str().parse::<usize>().ok())
    }

    fn build_error_location(
        metadata: Option<&RenderingMetadata>,
        line_number: Option<usize>,
        context_lines: Option<Vec<(usize, String)>>,
    ) -> ErrorLocation {
        let meta = metadata.cloned().unwrap_or_else(|| RenderingMetadata {
            job_name: "unknown".to_string(),
            template_name: "unknown".to_string(),
            source_path: None,
        });

        ErrorLocation {
            job_name: meta.job_name,
            template_name: meta.template_name,
            file_path: meta.source_path,
            line_number,
            context_lines,
        }
    }

    /// Format a Tera error chain, dropping Tera's internal one-off template name.
    pub fn format_tera_error(error: &tera::Error) -> String {
        let messages: Vec<String> = Self::error_chain(error)
            .into_iter()
            .map(|msg| {
                msg.replace("while rendering '__tera_one_off'", "")
                    .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                    .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                    .replace("'__tera_one_off'", "template")
                    .trim()
                    .to_string()
            })
            .filter(|msg| {
                !msg.is_empty()
                    && msg != "Template rendering failed"
                    && msg != "Template syntax error"
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error (see details above)".to_string()
        } else {
            messages.join("\n  -> ")
        }
    }

    /// Log the template context as key-value pairs at debug level.
    fn log_context_as_kv(context: &TeraContext) {
        let json = context.clone().into_json();
        for var in Self::extract_available_variables(context) {
            let pointer = format!("/{}", var.replace('.', "/"));
            if let Some(value) = json.pointer(&pointer) {
                tracing::debug!("  {} = {}", var, value);
            }
        }
    }
}
