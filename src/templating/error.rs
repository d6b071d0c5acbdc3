//! Structured template errors
//!
//! Tera failures are converted into [`TemplateError`] so the CLI can show
//! where in which template the render went wrong.

use std::path::PathBuf;

use crate::core::RunTemplateError;

/// Template errors with location context
#[derive(Debug)]
pub enum TemplateError {
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    FunctionFailed {
        function: String,
        message: String,
        /// Typed error raised inside the function, if it raised one
        cause: Option<Box<RunTemplateError>>,
        location: Box<ErrorLocation>,
    },

    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Location information for template errors
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Job owning the template
    pub job_name: String,
    /// Rendered name of the template
    pub template_name: String,
    /// Template source file if known
    pub file_path: Option<PathBuf>,
    /// Line number if available from Tera
    pub line_number: Option<usize>,
    /// Lines around the error, 1-indexed
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                ..
            } => {
                write!(f, "Template variable not found: '{}'", variable)
            }
            TemplateError::FunctionFailed {
                function,
                message,
                ..
            } => {
                write!(f, "Template function '{}' failed: {}", function, message)
            }
            TemplateError::SyntaxError {
                message,
                ..
            } => {
                write!(f, "Template syntax error: {}", message)
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause().map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl TemplateError {
    /// Typed error a template function failed with.
    pub fn cause(&self) -> Option<&RunTemplateError> {
        match self {
            TemplateError::FunctionFailed {
                cause,
                ..
            } => cause.as_deref(),
            _ => None,
        }
    }

    /// Generate user-friendly error message with context and suggestions
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            TemplateError::FunctionFailed {
                function,
                message,
                location,
                ..
            } => format_function_error(function, message, location),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
        }
    }
}

fn format_location(location: &ErrorLocation, msg: &mut String) {
    msg.push_str(&format!("Template: {} (job {})\n", location.template_name, location.job_name));
    if let Some(path) = &location.file_path {
        msg.push_str(&format!("File: {}\n", path.display()));
    }
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }
    if let Some(lines) = &location.context_lines {
        msg.push('\n');
        for (number, text) in lines {
            let marker = if Some(*number) == location.line_number {
                ">"
            } else {
                " "
            };
            msg.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
        }
    }
    msg.push('\n');
}

fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    msg.push_str(&format!("Variable: {}\n", variable));
    format_location(location, &mut msg);

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
        msg.push('\n');
    }

    if !available_variables.is_empty() {
        msg.push_str("Available variables in this context:\n");

        // Group by prefix
        let mut grouped = std::collections::BTreeMap::new();
        for var in available_variables {
            let prefix = var.split('.').take(2).collect::<Vec<_>>().join(".");
            grouped.entry(prefix).or_insert_with(Vec::new).push(var.clone());
        }

        for (prefix, vars) in grouped.iter().take(8) {
            if vars.len() <= 3 {
                for var in vars {
                    msg.push_str(&format!("  {}\n", var));
                }
            } else {
                msg.push_str(&format!("  {}.*  ({} variables)\n", prefix, vars.len()));
            }
        }

        if grouped.len() > 8 {
            msg.push_str(&format!("  ... and {} more\n", grouped.len() - 8));
        }
        msg.push('\n');
    }

    msg.push_str("SUGGESTION: Use p(name=\"...\", default=...) for optional properties.\n");
    msg
}

fn format_function_error(function: &str, message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Function Failed\n\n");
    msg.push_str(&format!("Function: {}\n", function));
    msg.push_str(&format!("Error: {}\n", message));
    format_location(location, &mut msg);

    match function {
        "p" => msg.push_str(
            "SUGGESTION: Set the property in the manifest, give it a default in the job spec,\n\
             or pass default=... to p().\n",
        ),
        "link_p" => msg.push_str(
            "SUGGESTION: Check that the job consumes the link and that the providing job\n\
             lists the property under provides[].properties.\n",
        ),
        _ => {}
    }
    msg
}

fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    msg.push_str(&format!("Error: {}\n", message));
    format_location(location, &mut msg);

    msg.push_str("SUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - ERB syntax (<%= %>) left over in a Tera template\n");
    msg.push_str("  - Missing quotes around string arguments\n");

    msg
}
