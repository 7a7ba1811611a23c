//! Integration tests for `npm-publisher pipeline`

use crate::helpers::{TestProject, run_publisher_ok};
use anyhow::Result;

#[test]
fn test_pipeline_without_pull_request_is_empty() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;

  let output = run_publisher_ok(&project.path, &["pipeline"], &[("BUILDKITE_PULL_REQUEST", "false")])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout), "[]\n");

  let output = run_publisher_ok(&project.path, &["pipeline"], &[])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout), "[]\n");

  Ok(())
}

#[test]
fn test_pipeline_with_pull_request() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;

  let output = run_publisher_ok(&project.path, &["pipeline"], &[("BUILDKITE_PULL_REQUEST", "1234")])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let steps: serde_json::Value = serde_json::from_str(&stdout)?;
  let steps = steps.as_array().expect("pipeline should be a JSON array");
  assert_eq!(steps.len(), 3);
  assert_eq!(steps[0]["label"], ":windows: :electron: Build");
  assert_eq!(steps[1], serde_json::json!({ "wait": true }));
  assert_eq!(steps[2]["label"], ":windows: :electron: Test");
  assert_eq!(steps[0]["agents"], steps[2]["agents"]);

  // 4-space indentation, nothing but the JSON on stdout
  assert!(stdout.starts_with("[\n    {\n        \"label\""));
  assert!(stdout.ends_with("]\n"));

  Ok(())
}

#[test]
fn test_pipeline_reads_configured_signal() -> Result<()> {
  let project = TestProject::new("x", "1.0.0")?;
  project.write_config(
    r#"
[pipeline]
signal_env = "CI_MERGE_REQUEST_IID"
agents = ["os=linux"]
"#,
  )?;

  let output = run_publisher_ok(
    &project.path,
    &["pipeline"],
    &[("BUILDKITE_PULL_REQUEST", "99"), ("CI_MERGE_REQUEST_IID", "false")],
  )?;
  assert_eq!(String::from_utf8_lossy(&output.stdout), "[]\n");

  let output = run_publisher_ok(&project.path, &["pipeline"], &[("CI_MERGE_REQUEST_IID", "5")])?;
  let steps: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(steps[0]["agents"], serde_json::json!(["os=linux"]));

  Ok(())
}
