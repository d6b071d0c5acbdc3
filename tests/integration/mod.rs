//! Integration test suite for run_template
//!
//! End-to-end runs of the `run_template` binary against release trees
//! written into temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument handling and exit status
//! - **links**: link construction across jobs of a release
//! - **render**: template rendering and error reporting

use assert_cmd::Command;
use run_template::test_utils::ReleaseFixture;

mod cli;
mod links;
mod render;

/// `run_template --release-dir <fixture> <args...>`
pub fn run_template_cmd(fixture: &ReleaseFixture, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("run_template").unwrap();
    cmd.arg("--release-dir").arg(fixture.path()).args(args).env_remove("RUST_LOG");
    cmd
}
