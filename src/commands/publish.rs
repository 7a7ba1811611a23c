//! Publish command implementation

use crate::core::context::PublishContext;
use crate::core::error::PublishResult;
use crate::github::GitHubClient;
use crate::npm::NpmCli;
use crate::publish::{self, PublishOptions, STAGES};
use crate::ui::StageReporter;
use std::path::Path;

/// Run the publish command
pub fn run_publish(root: &Path, tag: String, dry_run: bool, json: bool) -> PublishResult<()> {
  let ctx = PublishContext::build(root)?;

  let host = GitHubClient::new(&ctx.config.release)?;
  let tools = NpmCli::new(&ctx.config.npm, ctx.project_root());
  let options = PublishOptions { tag, dry_run };

  let mut reporter = if json {
    StageReporter::quiet()
  } else {
    println!(
      "📦 Publishing {}@{} (tag: {}){}",
      ctx.manifest.name,
      ctx.manifest.version,
      options.tag,
      if dry_run { " [dry-run]" } else { "" }
    );
    println!();
    StageReporter::terminal(STAGES.len())
  };

  let report = publish::publish(&ctx, &host, &tools, &options, &mut reporter)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    report.print();
  }

  Ok(())
}
