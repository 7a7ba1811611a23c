use super::PublishRun;
use crate::core::context::PublishContext;
use crate::core::error::{PublishError, PublishResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a successful publish run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub package: String,
  pub version: String,
  pub tag: String,
  pub prerelease: bool,
  pub dry_run: bool,
  pub release_tag: String,
  pub tarball: String,
  pub artifact_sha256: String,
  pub tarball_sha256: String,
  pub stages: Vec<String>,
  pub finished_at: DateTime<Utc>,
}

impl RunReport {
  pub(super) fn from_run(ctx: &PublishContext, run: &PublishRun) -> PublishResult<Self> {
    let missing = |what: &str| PublishError::message(format!("Run finished without {}", what));

    Ok(Self {
      package: ctx.manifest.name.clone(),
      version: ctx.manifest.version.clone(),
      tag: run.tag.clone(),
      prerelease: ctx.manifest.is_prerelease(),
      dry_run: run.dry_run,
      release_tag: ctx.manifest.release_tag(),
      tarball: ctx.manifest.tarball_name(),
      artifact_sha256: run.artifact_sha256.clone().ok_or_else(|| missing("an artifact digest"))?,
      tarball_sha256: run.tarball_sha256.clone().ok_or_else(|| missing("an archive digest"))?,
      stages: run.completed.iter().map(|s| s.name().to_string()).collect(),
      finished_at: Utc::now(),
    })
  }

  /// Human-readable summary, printed after the stage log
  pub fn print(&self) {
    println!();
    if self.dry_run {
      println!("✅ Dry run complete for {}@{}", self.package, self.version);
    } else {
      println!("🎉 Published {}@{} (tag: {})", self.package, self.version, self.tag);
    }
    if self.prerelease && self.tag == "latest" {
      println!("   ⚠️  {} is a prerelease published under the latest tag", self.version);
    }
    println!("   Release:  {}", self.release_tag);
    println!("   Archive:  {} (sha256 {})", self.tarball, self.tarball_sha256);
    println!("   Artifact: sha256 {}", self.artifact_sha256);
  }
}
