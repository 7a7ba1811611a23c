//! Buildkite pipeline generation
//!
//! `generate` is pure: it maps the step definitions and the pull-request
//! signal to a list of steps. Reading the environment and printing happen in
//! `commands::pipeline`, once, at the edge.

use crate::core::config::PipelineConfig;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, Write};

/// One pipeline step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Step {
  /// Labeled shell command pinned to agents
  Command {
    label: String,
    command: String,
    agents: Vec<String>,
  },
  /// Barrier: later steps wait for earlier ones
  Wait { wait: bool },
}

impl Step {
  pub fn wait() -> Self {
    Step::Wait { wait: true }
  }

  pub fn command(label: &str, command: &str, agents: &[String]) -> Self {
    Step::Command {
      label: label.to_string(),
      command: command.to_string(),
      agents: agents.to_vec(),
    }
  }
}

/// Whether the change being built has an open pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequest {
  None,
  Open,
}

impl PullRequest {
  /// Interpret the raw signal; unset, empty and "false" all mean no PR
  pub fn from_signal(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      None | Some("") | Some("false") => PullRequest::None,
      Some(_) => PullRequest::Open,
    }
  }
}

/// Steps to run for this build: nothing until a pull request exists,
/// then build, wait, test.
pub fn generate(config: &PipelineConfig, pull_request: &PullRequest) -> Vec<Step> {
  if *pull_request == PullRequest::None {
    return Vec::new();
  }

  vec![
    Step::command(&config.build_label, &config.build_command, &config.agents),
    Step::wait(),
    Step::command(&config.test_label, &config.test_command, &config.agents),
  ]
}

/// Serialize steps as 4-space indented JSON followed by a newline
pub fn write_pipeline<W: Write>(steps: &[Step], mut writer: W) -> io::Result<()> {
  let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
  steps.serialize(&mut serializer)?;
  writer.write_all(b"\n")?;
  writer.flush()
}
