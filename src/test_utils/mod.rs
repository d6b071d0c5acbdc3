//! Test utilities for run_template
//!
//! Helpers for writing tests against a throwaway release tree:
//! - [`ReleaseFixture`] writes job specs, templates and a manifest into a
//!   temporary directory
//! - [`init_test_logging`] wires tracing into the test harness
//!
//! # Example
//!
//! ```rust,ignore
//! use run_template::test_utils::ReleaseFixture;
//!
//! let fixture = ReleaseFixture::new()?
//!     .with_job("web", "templates:\n  config.tera: config.yml\n")?
//!     .with_template("web", "config.tera", "port: {{ p(name=\"port\", default=80) }}")?
//!     .with_manifest("instance_groups:\n  - jobs:\n      - name: web\n")?;
//!
//! assert!(fixture.path().join("jobs/web/spec").exists());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod fixtures;

pub use fixtures::{ReleaseFixture, database_release};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
