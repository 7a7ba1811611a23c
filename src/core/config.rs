use crate::core::error::{ConfigError, PublishError, PublishResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for npm-publisher
/// Searched in order: publish.toml, .publish.toml, .config/publish.toml
///
/// Every key has a default, so a project without a config file publishes
/// with the built-in layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
  #[serde(default)]
  pub package: PackageConfig,
  #[serde(default)]
  pub release: ReleaseConfig,
  #[serde(default)]
  pub npm: NpmConfig,
  #[serde(default)]
  pub pipeline: PipelineConfig,
}

/// What gets staged and which manifest fields are carried forward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
  /// Directory (relative to the project root) holding the npm package sources
  #[serde(default = "default_source_dir")]
  pub source_dir: PathBuf,

  /// Manifest file name, both for the root project and the staged package
  #[serde(default = "default_manifest")]
  pub manifest: String,

  /// Files copied into the workspace
  #[serde(default = "default_files")]
  pub files: Vec<String>,

  /// Files read from the project root instead of `source_dir`
  #[serde(default = "default_root_files")]
  pub root_files: Vec<String>,

  /// Manifest fields overwritten from the root manifest
  #[serde(default = "default_fields")]
  pub fields: Vec<String>,
}

fn default_source_dir() -> PathBuf {
  PathBuf::from("npm")
}

fn default_manifest() -> String {
  "package.json".to_string()
}

fn default_files() -> Vec<String> {
  ["cli.js", "index.js", "install.js", "package.json", "README.md", "LICENSE"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_root_files() -> Vec<String> {
  vec!["README.md".to_string(), "LICENSE".to_string()]
}

fn default_fields() -> Vec<String> {
  ["name", "version", "repository", "description", "license", "author", "keywords"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for PackageConfig {
  fn default() -> Self {
    Self {
      source_dir: default_source_dir(),
      manifest: default_manifest(),
      files: default_files(),
      root_files: default_root_files(),
      fields: default_fields(),
    }
  }
}

impl PackageConfig {
  /// Source location of a staged file: the project root for the exception
  /// list, `source_dir` for everything else.
  pub fn source_path(&self, root: &Path, file: &str) -> PathBuf {
    if self.root_files.iter().any(|f| f == file) {
      root.join(file)
    } else {
      root.join(&self.source_dir).join(file)
    }
  }

  pub fn validate(&self) -> PublishResult<()> {
    if !self.files.iter().any(|f| f == &self.manifest) {
      return Err(invalid("package.files", format!("must include the manifest '{}'", self.manifest)));
    }

    if let Some(stray) = self.root_files.iter().find(|f| !self.files.contains(*f)) {
      return Err(invalid(
        "package.root_files",
        format!("'{}' is not listed in package.files", stray),
      ));
    }

    for required in ["name", "version"] {
      if !self.fields.iter().any(|f| f == required) {
        return Err(invalid("package.fields", format!("must include '{}'", required)));
      }
    }

    Ok(())
  }
}

/// Where the upstream release lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default = "default_api_url")]
  pub api_url: String,
  #[serde(default = "default_owner")]
  pub owner: String,
  #[serde(default = "default_repo")]
  pub repo: String,

  /// Asset downloaded from the matched release
  #[serde(default = "default_asset")]
  pub asset: String,

  #[serde(default = "default_user_agent")]
  pub user_agent: String,

  /// Environment variable holding the API token (optional at runtime)
  #[serde(default = "default_token_env")]
  pub token_env: String,
}

fn default_api_url() -> String {
  "https://api.github.com".to_string()
}

fn default_owner() -> String {
  "postmanlabs".to_string()
}

fn default_repo() -> String {
  "electron".to_string()
}

fn default_asset() -> String {
  "electron.d.ts".to_string()
}

fn default_user_agent() -> String {
  "electron-npm-publisher".to_string()
}

fn default_token_env() -> String {
  "GITHUB_TOKEN".to_string()
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      api_url: default_api_url(),
      owner: default_owner(),
      repo: default_repo(),
      asset: default_asset(),
      user_agent: default_user_agent(),
      token_env: default_token_env(),
    }
  }
}

impl ReleaseConfig {
  pub fn validate(&self) -> PublishResult<()> {
    for (key, value) in [
      ("release.api_url", &self.api_url),
      ("release.owner", &self.owner),
      ("release.repo", &self.repo),
      ("release.asset", &self.asset),
    ] {
      if value.trim().is_empty() {
        return Err(invalid(key, "must not be empty"));
      }
    }
    Ok(())
  }

  /// Read the API token, if any, from the configured environment variable
  pub fn token(&self) -> Option<String> {
    std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmConfig {
  /// npm executable
  #[serde(default = "default_program")]
  pub program: String,

  /// Environment variable pointed at the workspace during the install check
  #[serde(default = "default_cache_env")]
  pub cache_env: String,

  #[serde(default = "default_workspace_prefix")]
  pub workspace_prefix: String,
}

fn default_program() -> String {
  "npm".to_string()
}

fn default_cache_env() -> String {
  "electron_config_cache".to_string()
}

fn default_workspace_prefix() -> String {
  "electron-npm".to_string()
}

impl Default for NpmConfig {
  fn default() -> Self {
    Self {
      program: default_program(),
      cache_env: default_cache_env(),
      workspace_prefix: default_workspace_prefix(),
    }
  }
}

/// Buildkite pipeline definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
  /// Environment variable telling whether a pull request is open
  #[serde(default = "default_signal_env")]
  pub signal_env: String,
  #[serde(default = "default_agents")]
  pub agents: Vec<String>,
  #[serde(default = "default_build_label")]
  pub build_label: String,
  #[serde(default = "default_build_command")]
  pub build_command: String,
  #[serde(default = "default_test_label")]
  pub test_label: String,
  #[serde(default = "default_test_command")]
  pub test_command: String,
}

fn default_signal_env() -> String {
  "BUILDKITE_PULL_REQUEST".to_string()
}

fn default_agents() -> Vec<String> {
  vec!["os=windows".to_string(), "queue=electron-build".to_string()]
}

fn default_build_label() -> String {
  ":windows: :electron: Build".to_string()
}

fn default_build_command() -> String {
  ".\\.buildkite\\windows\\build-and-upload".to_string()
}

fn default_test_label() -> String {
  ":windows: :electron: Test".to_string()
}

fn default_test_command() -> String {
  ".\\.buildkite\\windows\\run-tests".to_string()
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      signal_env: default_signal_env(),
      agents: default_agents(),
      build_label: default_build_label(),
      build_command: default_build_command(),
      test_label: default_test_label(),
      test_command: default_test_command(),
    }
  }
}

fn invalid(key: &str, reason: impl Into<String>) -> PublishError {
  PublishError::Config(ConfigError::InvalidValue {
    key: key.to_string(),
    reason: reason.into(),
  })
}

impl PublishConfig {
  /// Find config file in search order: publish.toml, .publish.toml, .config/publish.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("publish.toml"),
      path.join(".publish.toml"),
      path.join(".config").join("publish.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the project root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> PublishResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: PublishConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  pub fn validate(&self) -> PublishResult<()> {
    self.package.validate()?;
    self.release.validate()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let config = PublishConfig::load(dir.path()).unwrap();
    assert_eq!(config.package.files.len(), 6);
    assert_eq!(config.release.asset, "electron.d.ts");
    assert_eq!(config.npm.program, "npm");
    assert_eq!(config.pipeline.agents, vec!["os=windows", "queue=electron-build"]);
  }

  #[test]
  fn test_source_path_exceptions() {
    let package = PackageConfig::default();
    let root = Path::new("/project");
    assert_eq!(package.source_path(root, "README.md"), PathBuf::from("/project/README.md"));
    assert_eq!(package.source_path(root, "LICENSE"), PathBuf::from("/project/LICENSE"));
    assert_eq!(package.source_path(root, "cli.js"), PathBuf::from("/project/npm/cli.js"));
    assert_eq!(
      package.source_path(root, "package.json"),
      PathBuf::from("/project/npm/package.json")
    );
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
      dir.path().join("publish.toml"),
      "[release]\nowner = \"electron\"\n\n[npm]\nprogram = \"pnpm\"\n",
    )
    .unwrap();

    let config = PublishConfig::load(dir.path()).unwrap();
    assert_eq!(config.release.owner, "electron");
    assert_eq!(config.release.repo, "electron");
    assert_eq!(config.npm.program, "pnpm");
    assert_eq!(config.npm.cache_env, "electron_config_cache");
  }

  #[test]
  fn test_config_in_dot_config_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".config")).unwrap();
    std::fs::write(dir.path().join(".config/publish.toml"), "[npm]\nprogram = \"yarn\"\n").unwrap();

    let config = PublishConfig::load(dir.path()).unwrap();
    assert_eq!(config.npm.program, "yarn");
  }

  #[test]
  fn test_root_files_must_be_staged() {
    let package = PackageConfig {
      root_files: vec!["CHANGELOG.md".to_string()],
      ..Default::default()
    };
    assert!(package.validate().is_err());
  }

  #[test]
  fn test_fields_require_version() {
    let package = PackageConfig {
      fields: vec!["name".to_string()],
      ..Default::default()
    };
    assert!(package.validate().is_err());
  }

  #[test]
  fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("publish.toml"), "[release]\nasset = \"\"\n").unwrap();
    assert!(PublishConfig::load(dir.path()).is_err());
  }
}
