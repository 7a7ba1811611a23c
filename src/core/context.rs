//! Project context - build once, pass everywhere
//!
//! Holds the project root, the loaded `publish.toml` (or defaults) and the
//! root manifest. Built once per process in the command layer, then passed
//! by reference to the publish stages.

use crate::core::config::PublishConfig;
use crate::core::error::PublishResult;
use crate::manifest::RootManifest;
use std::path::{Path, PathBuf};

pub struct PublishContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// publish.toml, or the built-in defaults
  pub config: PublishConfig,

  /// The root project's package.json
  pub manifest: RootManifest,
}

impl PublishContext {
  /// Build the context for the project at `root`
  pub fn build(root: &Path) -> PublishResult<Self> {
    let config = PublishConfig::load(root)?;
    let manifest = RootManifest::load(&root.join(&config.package.manifest))?;

    Ok(Self {
      root: root.to_path_buf(),
      config,
      manifest,
    })
  }

  /// Get project root as Path reference (convenience)
  pub fn project_root(&self) -> &Path {
    &self.root
  }
}
