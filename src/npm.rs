//! npm subprocess invocations (pack, install, publish)

use crate::core::config::NpmConfig;
use crate::core::error::{PublishResult, ToolError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Package tooling contract: archive, smoke-install, publish
pub trait PackageTool {
  /// Build the installable archive from the package in `dir`
  fn pack(&self, dir: &Path) -> PublishResult<()>;

  /// Install `tarball` inside `dir`, with caches redirected into `dir`
  fn install(&self, tarball: &Path, dir: &Path) -> PublishResult<()>;

  /// Publish `tarball` to the registry under `tag`
  fn publish(&self, tarball: &Path, tag: &str, dry_run: bool) -> PublishResult<()>;
}

/// `PackageTool` backed by the npm CLI
pub struct NpmCli {
  program: String,
  cache_env: String,
  /// Working directory for `npm publish`, so the project's .npmrc applies
  project_root: PathBuf,
}

impl NpmCli {
  pub fn new(config: &NpmConfig, project_root: &Path) -> Self {
    Self {
      program: config.program.clone(),
      cache_env: config.cache_env.clone(),
      project_root: project_root.to_path_buf(),
    }
  }

  fn command(&self, cwd: &Path, args: &[OsString]) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.current_dir(cwd).args(args);
    cmd
  }

  fn run(&self, mut cmd: Command, args: &[OsString]) -> PublishResult<()> {
    let display = display_command(&self.program, args);

    let output = cmd.output().map_err(|e| ToolError::Spawn {
      program: self.program.clone(),
      message: e.to_string(),
    })?;

    if !output.status.success() {
      return Err(
        ToolError::Failed {
          command: display,
          status: output.status.code(),
          stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }
}

impl PackageTool for NpmCli {
  fn pack(&self, dir: &Path) -> PublishResult<()> {
    let args = vec![OsString::from("pack")];
    self.run(self.command(dir, &args), &args)
  }

  fn install(&self, tarball: &Path, dir: &Path) -> PublishResult<()> {
    let args = vec![
      OsString::from("install"),
      tarball.as_os_str().to_os_string(),
      OsString::from("--force"),
      OsString::from("--silent"),
    ];
    let mut cmd = self.command(dir, &args);
    cmd.env(&self.cache_env, dir);
    self.run(cmd, &args)
  }

  fn publish(&self, tarball: &Path, tag: &str, dry_run: bool) -> PublishResult<()> {
    let args = publish_args(tarball, tag, dry_run);
    self.run(self.command(&self.project_root, &args), &args)
  }
}

fn publish_args(tarball: &Path, tag: &str, dry_run: bool) -> Vec<OsString> {
  let mut args = vec![
    OsString::from("publish"),
    tarball.as_os_str().to_os_string(),
    OsString::from("--tag"),
    OsString::from(tag),
  ];
  if dry_run {
    args.push(OsString::from("--dry-run"));
  }
  args
}

fn display_command(program: &str, args: &[OsString]) -> String {
  let mut parts = vec![program.to_string()];
  parts.extend(args.iter().map(|a| a.to_string_lossy().to_string()));
  parts.join(" ")
}
