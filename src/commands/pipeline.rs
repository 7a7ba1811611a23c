//! Pipeline command implementation

use crate::core::config::PublishConfig;
use crate::core::error::{PublishResult, ResultExt};
use crate::pipeline::{PullRequest, generate, write_pipeline};
use std::path::Path;

/// Print the pipeline for this build to stdout
pub fn run_pipeline(root: &Path) -> PublishResult<()> {
  let config = PublishConfig::load(root)?.pipeline;

  let signal = std::env::var(&config.signal_env).ok();
  let pull_request = PullRequest::from_signal(signal.as_deref());

  let steps = generate(&config, &pull_request);
  write_pipeline(&steps, std::io::stdout().lock()).context("Failed to write pipeline to stdout")
}
