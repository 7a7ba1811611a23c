//! The stage functions, in execution order

use super::{PublishRun, RunState, Services, Stage};
use crate::core::error::{PublishError, PublishResult, ResultExt};
use crate::github::find_release;
use crate::manifest::Manifest;
use crate::ui::StageReporter;
use sha2::{Digest, Sha256};
use std::fs;

pub type StageFn = fn(&mut PublishRun, &Services<'_>, &mut StageReporter) -> PublishResult<()>;

/// Every stage of a publish run, in the only order they ever run
pub const STAGES: [(Stage, StageFn); 8] = [
  (Stage::Workspace, create_workspace),
  (Stage::StageFiles, stage_files),
  (Stage::MergeManifest, merge_manifest),
  (Stage::FindRelease, lookup_release),
  (Stage::DownloadArtifact, download_artifact),
  (Stage::Pack, pack),
  (Stage::InstallCheck, install_check),
  (Stage::Publish, publish),
];

pub(super) fn create_workspace(
  run: &mut PublishRun,
  services: &Services<'_>,
  reporter: &mut StageReporter,
) -> PublishResult<()> {
  let prefix = &services.ctx.config.npm.workspace_prefix;
  let dir = tempfile::Builder::new()
    .prefix(prefix)
    .tempdir()
    .context("Failed to create temporary workspace")?;

  reporter.detail(dir.path().display().to_string());
  run.workspace = Some(dir);
  run.state = RunState::Created;
  Ok(())
}

pub(super) fn stage_files(run: &mut PublishRun, services: &Services<'_>, reporter: &mut StageReporter) -> PublishResult<()> {
  let workspace = run.workspace()?.to_path_buf();
  let package = &services.ctx.config.package;

  for file in &run.files {
    let source = package.source_path(services.ctx.project_root(), file);
    let content = fs::read(&source).with_context(|| format!("Failed to read {}", source.display()))?;

    let target = workspace.join(file);
    fs::write(&target, content).with_context(|| format!("Failed to write {}", target.display()))?;
    reporter.detail(file);
  }

  Ok(())
}

pub(super) fn merge_manifest(
  run: &mut PublishRun,
  services: &Services<'_>,
  _reporter: &mut StageReporter,
) -> PublishResult<()> {
  let path = run.workspace()?.join(&services.ctx.config.package.manifest);

  let mut staged = Manifest::load(&path)?;
  staged.merge_from(&services.ctx.manifest.manifest, &run.fields)?;
  staged.save()?;

  run.state = RunState::Populated;
  Ok(())
}

pub(super) fn lookup_release(
  run: &mut PublishRun,
  services: &Services<'_>,
  reporter: &mut StageReporter,
) -> PublishResult<()> {
  let tag = services.ctx.manifest.release_tag();
  let releases = services.host.list_releases()?;
  let release = find_release(&releases, &tag)?;

  reporter.detail(format!("Found release {} ({} assets)", release.tag_name, release.assets.len()));
  run.release = Some(release.clone());
  Ok(())
}

pub(super) fn download_artifact(
  run: &mut PublishRun,
  services: &Services<'_>,
  reporter: &mut StageReporter,
) -> PublishResult<()> {
  let release = run
    .release
    .as_ref()
    .ok_or_else(|| PublishError::message("No release was matched before download"))?;
  let asset = release.find_asset(&services.ctx.config.release.asset)?;

  reporter.detail(format!(
    "{} from {}",
    asset.name,
    asset.browser_download_url.as_deref().unwrap_or(&asset.url)
  ));
  let body = services.host.download_asset(asset)?;

  let target = run.workspace()?.join(&asset.name);
  fs::write(&target, &body).with_context(|| format!("Failed to write {}", target.display()))?;

  run.artifact_sha256 = Some(sha256_hex(&body));
  Ok(())
}

pub(super) fn pack(run: &mut PublishRun, services: &Services<'_>, reporter: &mut StageReporter) -> PublishResult<()> {
  let workspace = run.workspace()?.to_path_buf();
  services.tools.pack(&workspace)?;

  let tarball = workspace.join(services.ctx.manifest.tarball_name());
  let content = fs::read(&tarball).map_err(|e| {
    PublishError::with_help(
      format!("npm pack did not produce {}: {}", tarball.display(), e),
      "The archive name comes from the merged name and version; check the staged package.json.",
    )
  })?;

  reporter.detail(services.ctx.manifest.tarball_name());
  run.tarball_sha256 = Some(sha256_hex(&content));
  run.tarball = Some(tarball);
  run.state = RunState::Archived;
  Ok(())
}

pub(super) fn install_check(
  run: &mut PublishRun,
  services: &Services<'_>,
  _reporter: &mut StageReporter,
) -> PublishResult<()> {
  let workspace = run.workspace()?.to_path_buf();
  let tarball = run
    .tarball
    .as_deref()
    .ok_or_else(|| PublishError::message("No archive to install"))?;

  services.tools.install(tarball, &workspace)?;
  run.state = RunState::Verified;
  Ok(())
}

pub(super) fn publish(run: &mut PublishRun, services: &Services<'_>, reporter: &mut StageReporter) -> PublishResult<()> {
  let tarball = run
    .tarball
    .as_deref()
    .ok_or_else(|| PublishError::message("No archive to publish"))?;

  services.tools.publish(tarball, &run.tag, run.dry_run)?;

  if run.dry_run {
    reporter.detail(format!("Dry run: npm did not upload (tag {})", run.tag));
  } else {
    reporter.detail(format!("Published with tag {}", run.tag));
  }
  run.state = RunState::Published;
  Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
  format!("{:x}", Sha256::digest(bytes))
}
