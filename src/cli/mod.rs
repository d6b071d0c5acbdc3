//! Command-line interface for run_template.
//!
//! ```text
//! run_template <job_name> <manifest_filename> <template_name>
//! ```
//!
//! `template_name` is the rendered name of the template as listed under the
//! job spec's `templates`. Jobs are looked up under `<release-dir>/jobs`.
//!
//! # Global Options
//!
//! - `--release-dir <DIR>` - Release root (default: current directory)
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//!
//! Logging goes to stderr. Without `--verbose` or `--quiet` the `RUST_LOG`
//! environment variable is honored, falling back to `warn`.

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::core::RunTemplateError;
use crate::runner::{RunRequest, run_template};

/// Log level used when neither a flag nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime configuration derived from the parsed flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliConfig {
    /// Explicit log filter. `None` defers to `RUST_LOG`, then
    /// [`DEFAULT_LOG_LEVEL`].
    pub log_level: Option<String>,

    /// Release root containing `jobs/`.
    pub release_dir: PathBuf,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for the tracing subscriber.
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        }
    }
}

/// Install the stderr tracing subscriber once per process.
pub fn init_logging(config: &CliConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Render one job template from a release against a deployment manifest.
#[derive(Parser, Debug)]
#[command(
    name = "run_template",
    about = "Render a job template with properties and links resolved from a manifest",
    version,
    long_about = "Resolves the job's properties from the manifest and the job spec, builds a \
                  synthetic link for every job that provides one, and prints the rendered \
                  template to stdout. Nothing is deployed."
)]
pub struct Cli {
    /// Job to render, as named in the manifest and under jobs/
    job_name: String,

    /// Deployment manifest (YAML)
    manifest_filename: PathBuf,

    /// Rendered template name from the job spec's `templates`
    template_name: String,

    /// Release root containing the jobs/ directory
    #[arg(long, value_name = "DIR")]
    release_dir: Option<PathBuf>,

    /// Enable debug output on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

/// Parse arguments, mapping any arity or flag mistake to [`RunTemplateError::Usage`].
///
/// `--help` and `--version` print and exit the process as clap normally does.
pub fn parse_args<I, T>(args: I) -> Result<Cli, RunTemplateError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            tracing::debug!("Argument parsing failed: {}", e);
            Err(RunTemplateError::Usage)
        }
    }
}

impl Cli {
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            release_dir: self.release_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn request(&self, config: &CliConfig) -> RunRequest {
        RunRequest {
            job_name: self.job_name.clone(),
            manifest_path: self.manifest_filename.clone(),
            template_name: self.template_name.clone(),
            release_dir: config.release_dir.clone(),
        }
    }

    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Render and write the result to stdout, newline-terminated.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(&config);

        let request = self.request(&config);
        tracing::debug!("Running {:?}", request);

        let rendered = run_template(&request)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(line_terminated(rendered).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Append a newline unless the text already ends with one.
fn line_terminated(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_terminated_adds_at_most_one_newline() {
        assert_eq!(line_terminated("port: 1".to_string()), "port: 1\n");
        assert_eq!(line_terminated("port: 1\n".to_string()), "port: 1\n");
        assert_eq!(line_terminated("a\n\n".to_string()), "a\n\n");
        assert_eq!(line_terminated(String::new()), "\n");
    }

    #[test]
    fn test_three_positionals() {
        let cli = parse_args(["run_template", "web", "manifest.yml", "config.yml"]).unwrap();

        assert_eq!(cli.job_name, "web");
        assert_eq!(cli.manifest_filename, PathBuf::from("manifest.yml"));
        assert_eq!(cli.template_name, "config.yml");
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_wrong_arity_is_usage() {
        assert_eq!(
            parse_args(["run_template", "web", "manifest.yml"]).unwrap_err(),
            RunTemplateError::Usage
        );
        assert_eq!(parse_args(["run_template"]).unwrap_err(), RunTemplateError::Usage);
        assert_eq!(
            parse_args(["run_template", "a", "b", "c", "d"]).unwrap_err(),
            RunTemplateError::Usage
        );
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(parse_args(["run_template", "-v", "-q", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_build_config_levels() {
        let cli = parse_args(["run_template", "a", "b", "c"]).unwrap();
        assert_eq!(
            cli.build_config(),
            CliConfig {
                log_level: None,
                release_dir: PathBuf::from("."),
            }
        );

        let cli = parse_args(["run_template", "--verbose", "a", "b", "c"]).unwrap();
        assert_eq!(cli.build_config().log_level, Some("debug".to_string()));

        let cli = parse_args(["run_template", "-q", "a", "b", "c"]).unwrap();
        assert_eq!(cli.build_config().log_level, Some("error".to_string()));
    }

    #[test]
    fn test_release_dir_flag_reaches_request() {
        let cli =
            parse_args(["run_template", "--release-dir", "/tmp/rel", "web", "m.yml", "t"]).unwrap();
        let config = cli.build_config();
        let request = cli.request(&config);

        assert_eq!(request.release_dir, PathBuf::from("/tmp/rel"));
        assert_eq!(request.job_name, "web");
        assert_eq!(request.manifest_path, PathBuf::from("m.yml"));
        assert_eq!(request.template_name, "t");
    }
}
