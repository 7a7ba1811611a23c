//! Integration tests for `npm-publisher publish`
//!
//! These exercise the failure paths that end before any real npm or GitHub
//! traffic; the full stage chain is covered by the unit tests with fakes.

use crate::helpers::{TestProject, run_publisher, run_publisher_ok};
use anyhow::Result;

#[test]
fn test_publish_help() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;

  let output = run_publisher_ok(&project.path, &["publish", "--help"], &[])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("--tag"));
  assert!(stdout.contains("--dry-run"));

  Ok(())
}

#[test]
fn test_publish_without_root_manifest_exits_1() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;
  project.remove_file("package.json")?;

  let output = run_publisher(&project.path, &["publish"], &[])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Root manifest not found"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_publish_rejects_non_semver_version() -> Result<()> {
  let project = TestProject::new("x", "not-a-version")?;

  let output = run_publisher(&project.path, &["publish"], &[])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid package version"));

  Ok(())
}

#[test]
fn test_publish_missing_source_file_exits_1() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;
  project.remove_file("npm/index.js")?;

  let output = run_publisher(&project.path, &["publish", "--dry-run"], &[])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("index.js"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_publish_unreachable_release_host_exits_1() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;
  project.write_config(
    r#"
[release]
api_url = "http://127.0.0.1:9"
"#,
  )?;

  let output = run_publisher(&project.path, &["publish", "--json"], &[])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("http://127.0.0.1:9/repos/postmanlabs/electron/releases"), "stderr: {}", stderr);
  assert!(stderr.contains("find-release"), "stderr: {}", stderr);
  // --json keeps stage chatter off stdout
  assert!(output.stdout.is_empty());

  Ok(())
}

#[test]
fn test_publish_invalid_config_exits_1() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;
  project.write_config(
    r#"
[package]
root_files = ["CHANGELOG.md"]
"#,
  )?;

  let output = run_publisher(&project.path, &["publish"], &[])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("root_files"));

  Ok(())
}

#[test]
fn test_publish_with_explicit_root() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;
  project.remove_file("LICENSE")?;
  let root = project.path.to_string_lossy().to_string();

  let elsewhere = tempfile::TempDir::new()?;
  let output = run_publisher(elsewhere.path(), &["publish", "--root", &root], &[])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("LICENSE"), "stderr: {}", stderr);

  Ok(())
}
