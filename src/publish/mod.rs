//! Publish orchestration
//!
//! A publish run drives one staging workspace through a fixed chain of
//! stages:
//!
//! ```text
//! workspace -> stage files -> merge manifest -> find release
//!           -> download artifact -> pack -> install check -> publish
//! ```
//!
//! Each stage reads what earlier stages left on the run and the first failure
//! ends the run. The workspace is a `TempDir` owned by the run, so it is
//! removed when the run is dropped, whichever stage failed.

mod report;
mod stages;

pub use report::RunReport;
pub use stages::STAGES;

use crate::core::context::PublishContext;
use crate::core::error::{PublishError, PublishResult};
use crate::github::{Release, ReleaseHost};
use crate::npm::PackageTool;
use crate::ui::StageReporter;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stages of a publish run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Workspace,
  StageFiles,
  MergeManifest,
  FindRelease,
  DownloadArtifact,
  Pack,
  InstallCheck,
  Publish,
}

impl Stage {
  pub fn name(self) -> &'static str {
    match self {
      Stage::Workspace => "workspace",
      Stage::StageFiles => "stage-files",
      Stage::MergeManifest => "merge-manifest",
      Stage::FindRelease => "find-release",
      Stage::DownloadArtifact => "download-artifact",
      Stage::Pack => "pack",
      Stage::InstallCheck => "install-check",
      Stage::Publish => "publish",
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      Stage::Workspace => "📁",
      Stage::StageFiles => "📄",
      Stage::MergeManifest => "📝",
      Stage::FindRelease => "🔎",
      Stage::DownloadArtifact => "⬇️",
      Stage::Pack => "📦",
      Stage::InstallCheck => "🧪",
      Stage::Publish => "🚀",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Stage::Workspace => "Creating temporary workspace",
      Stage::StageFiles => "Copying files to the workspace",
      Stage::MergeManifest => "Merging package.json fields from the root manifest",
      Stage::FindRelease => "Getting the releases from GitHub",
      Stage::DownloadArtifact => "Downloading the release artifact",
      Stage::Pack => "Running npm pack",
      Stage::InstallCheck => "Testing that the package installs",
      Stage::Publish => "Running npm publish",
    }
  }
}

/// Lifecycle of the run's workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
  Uninitialized,
  Created,
  Populated,
  Archived,
  Verified,
  Published,
  Aborted,
}

/// Caller-controlled knobs for one run
#[derive(Debug, Clone)]
pub struct PublishOptions {
  /// npm dist-tag
  pub tag: String,
  /// Pass --dry-run to npm publish
  pub dry_run: bool,
}

impl Default for PublishOptions {
  fn default() -> Self {
    Self {
      tag: "latest".to_string(),
      dry_run: false,
    }
  }
}

/// External collaborators the stages call through
pub struct Services<'a> {
  pub ctx: &'a PublishContext,
  pub host: &'a dyn ReleaseHost,
  pub tools: &'a dyn PackageTool,
}

/// State accumulated by one publish attempt
pub struct PublishRun {
  pub tag: String,
  pub dry_run: bool,
  pub files: Vec<String>,
  pub fields: Vec<String>,
  pub state: RunState,
  workspace: Option<TempDir>,
  release: Option<Release>,
  artifact_sha256: Option<String>,
  tarball: Option<PathBuf>,
  tarball_sha256: Option<String>,
  completed: Vec<Stage>,
}

impl PublishRun {
  pub fn new(ctx: &PublishContext, options: &PublishOptions) -> Self {
    Self {
      tag: options.tag.clone(),
      dry_run: options.dry_run,
      files: ctx.config.package.files.clone(),
      fields: ctx.config.package.fields.clone(),
      state: RunState::Uninitialized,
      workspace: None,
      release: None,
      artifact_sha256: None,
      tarball: None,
      tarball_sha256: None,
      completed: Vec::new(),
    }
  }

  /// Workspace directory, once the first stage has created it
  pub fn workspace_path(&self) -> Option<&Path> {
    self.workspace.as_ref().map(TempDir::path)
  }

  fn workspace(&self) -> PublishResult<&Path> {
    self
      .workspace_path()
      .ok_or_else(|| PublishError::message("Workspace has not been created"))
  }

  pub fn completed(&self) -> &[Stage] {
    &self.completed
  }
}

/// Run every stage in order, stopping at the first failure.
///
/// On failure the run is marked `Aborted` and the error comes back wrapped in
/// `PublishError::Stage`, naming the failing stage. The workspace stays owned by `run`.
pub fn execute(run: &mut PublishRun, services: &Services<'_>, reporter: &mut StageReporter) -> PublishResult<()> {
  for (stage, stage_fn) in STAGES {
    reporter.start(stage);
    if let Err(err) = stage_fn(run, services, reporter) {
      run.state = RunState::Aborted;
      reporter.fail(stage);
      return Err(PublishError::stage(stage.name(), err));
    }
    run.completed.push(stage);
    reporter.finish(stage);
  }
  Ok(())
}

/// Perform one complete publish attempt and summarize it.
///
/// The workspace is dropped (and deleted) before this returns, on success and
/// on failure.
pub fn publish(
  ctx: &PublishContext,
  host: &dyn ReleaseHost,
  tools: &dyn PackageTool,
  options: &PublishOptions,
  reporter: &mut StageReporter,
) -> PublishResult<RunReport> {
  let services = Services { ctx, host, tools };
  let mut run = PublishRun::new(ctx, options);

  execute(&mut run, &services, reporter)?;

  RunReport::from_run(ctx, &run)
}
