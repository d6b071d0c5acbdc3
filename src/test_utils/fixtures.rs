//! Throwaway release trees for tests
//!
//! Layout written by [`ReleaseFixture`]:
//!
//! ```text
//! <tmp>/
//!   manifest.yml
//!   jobs/<job>/spec
//!   jobs/<job>/templates/<file>
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::release::ReleaseDir;

/// File name used by [`ReleaseFixture::with_manifest`].
pub const MANIFEST_FILE: &str = "manifest.yml";

/// A release root in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct ReleaseFixture {
    temp_dir: TempDir,
}

impl ReleaseFixture {
    /// Empty release with a `jobs/` directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir for release fixture")?;
        fs::create_dir_all(temp_dir.path().join("jobs"))?;
        Ok(Self {
            temp_dir,
        })
    }

    /// Write `jobs/<name>/spec`.
    pub fn with_job(self, name: &str, spec_yaml: &str) -> Result<Self> {
        let job_dir = self.path().join("jobs").join(name);
        fs::create_dir_all(job_dir.join("templates"))?;
        fs::write(job_dir.join("spec"), spec_yaml)
            .with_context(|| format!("Failed to write spec for job '{name}'"))?;
        Ok(self)
    }

    /// Write `jobs/<job>/templates/<file>`.
    pub fn with_template(self, job: &str, file: &str, content: &str) -> Result<Self> {
        let path = self.path().join("jobs").join(job).join("templates").join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write template {}", path.display()))?;
        Ok(self)
    }

    /// Write [`MANIFEST_FILE`] at the release root.
    pub fn with_manifest(self, manifest_yaml: &str) -> Result<Self> {
        fs::write(self.manifest_path(), manifest_yaml).context("Failed to write manifest")?;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join(MANIFEST_FILE)
    }

    pub fn release_dir(&self) -> ReleaseDir {
        ReleaseDir::new(self.path())
    }
}

/// A `consumer` job reading the `db` link that `provider` offers.
///
/// The manifest sets `port: 5432` for `consumer` and the provider's spec
/// defaults `address` to `localhost`. The template `config/db.yml` prints
/// both link properties.
pub fn database_release() -> Result<ReleaseFixture> {
    ReleaseFixture::new()?
        .with_job(
            "consumer",
            r#"
name: consumer
templates:
  db.yml.tera: config/db.yml
consumes:
  - name: db
    type: database
properties:
  port:
    description: Port the consumer listens on
    default: 8080
"#,
        )?
        .with_template(
            "consumer",
            "db.yml.tera",
            "address: {{ link_p(link=\"db\", name=\"address\") }}\nport: {{ link_p(link=\"db\", name=\"port\") }}",
        )?
        .with_job(
            "provider",
            r#"
name: provider
provides:
  - name: db
    type: database
    properties: [address, port]
properties:
  address:
    default: localhost
  port:
    default: 3306
"#,
        )?
        .with_manifest(
            r#"
name: demo
instance_groups:
  - name: app
    jobs:
      - name: consumer
        release: demo
        properties:
          port: 5432
  - name: data
    jobs:
      - name: provider
        release: demo
"#,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_release_layout() {
        let fixture = database_release().unwrap();

        assert!(fixture.path().join("jobs/consumer/spec").is_file());
        assert!(fixture.path().join("jobs/consumer/templates/db.yml.tera").is_file());
        assert!(fixture.path().join("jobs/provider/templates").is_dir());
        assert!(fixture.manifest_path().is_file());
        assert_eq!(fixture.release_dir().job_names().unwrap(), vec!["consumer", "provider"]);
    }
}
