//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A project laid out the way the publisher expects: root package.json,
/// README.md and LICENSE at the top, npm package sources under npm/
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project with root manifest `name`@`version`
  pub fn new(name: &str, version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("package.json"),
      format!(
        r#"{{
  "name": "{}",
  "version": "{}",
  "repository": "https://github.com/postmanlabs/electron",
  "description": "Build cross platform desktop apps",
  "license": "MIT",
  "author": "Electron Community",
  "keywords": ["electron"]
}}
"#,
        name, version
      ),
    )?;
    std::fs::write(path.join("README.md"), format!("# {}\n", name))?;
    std::fs::write(path.join("LICENSE"), "MIT\n")?;

    let npm = path.join("npm");
    std::fs::create_dir_all(&npm)?;
    std::fs::write(npm.join("cli.js"), "#!/usr/bin/env node\n")?;
    std::fs::write(npm.join("index.js"), "module.exports = 'electron'\n")?;
    std::fs::write(npm.join("install.js"), "// fetch binaries\n")?;
    std::fs::write(
      npm.join("package.json"),
      r#"{
  "name": "electron",
  "version": "0.0.0",
  "main": "index.js",
  "bin": { "electron": "cli.js" },
  "scripts": { "postinstall": "node install.js" }
}
"#,
    )?;

    Ok(Self { _root: root, path })
  }

  /// Write publish.toml at the project root
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("publish.toml"), content)?;
    Ok(())
  }

  /// Remove a file relative to the project root
  pub fn remove_file(&self, path: &str) -> Result<()> {
    std::fs::remove_file(self.path.join(path))?;
    Ok(())
  }
}

/// Run npm-publisher and return its output whatever the exit status
pub fn run_publisher(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_npm-publisher");

  let mut cmd = Command::new(bin);
  cmd
    .current_dir(cwd)
    .args(args)
    .env_remove("BUILDKITE_PULL_REQUEST")
    .env_remove("GITHUB_TOKEN");
  for (key, value) in env {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run npm-publisher")
}

/// Run npm-publisher and fail unless it exits successfully
pub fn run_publisher_ok(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let output = run_publisher(cwd, args, env)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "npm-publisher command failed: npm-publisher {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
