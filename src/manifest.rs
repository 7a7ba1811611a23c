//! package.json handling
//!
//! The staged manifest is the npm template with a fixed set of fields copied
//! over from the root project manifest. Manifests are kept as ordered JSON maps
//! so fields we don't know about (bin, scripts, dependencies) survive untouched
//! and the template's key order is preserved on rewrite.

use crate::core::error::{ConfigError, PublishError, PublishResult, ResultExt};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// An npm package manifest as an ordered JSON object
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
  path: PathBuf,
  fields: Map<String, Value>,
}

impl Manifest {
  /// Read and parse a manifest from disk
  pub fn load(path: &Path) -> PublishResult<Self> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(path, &content)
  }

  fn parse(path: &Path, content: &str) -> PublishResult<Self> {
    let value: Value =
      serde_json::from_str(content).with_context(|| format!("Failed to parse {}", path.display()))?;

    match value {
      Value::Object(fields) => Ok(Self {
        path: path.to_path_buf(),
        fields,
      }),
      _ => Err(PublishError::message(format!(
        "{} must contain a JSON object",
        path.display()
      ))),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn get(&self, field: &str) -> Option<&Value> {
    self.fields.get(field)
  }

  /// String value of a field, if present and a string
  pub fn get_str(&self, field: &str) -> Option<&str> {
    self.fields.get(field).and_then(Value::as_str)
  }

  /// Overwrite `fields` with the root manifest's values.
  ///
  /// A field the template declares must be present in the root manifest.
  /// Fields missing from the template are added; fields missing from both are
  /// skipped. Every other key is left as the template had it.
  pub fn merge_from(&mut self, root: &Manifest, fields: &[String]) -> PublishResult<()> {
    for field in fields {
      match root.get(field) {
        Some(value) => {
          self.fields.insert(field.clone(), value.clone());
        }
        None if self.fields.contains_key(field) => {
          return Err(PublishError::Config(ConfigError::MissingField {
            field: field.clone(),
            manifest: root.path.clone(),
          }));
        }
        None => {}
      }
    }
    Ok(())
  }

  /// Serialize as pretty-printed JSON (2-space indent)
  pub fn to_pretty_string(&self) -> PublishResult<String> {
    Ok(serde_json::to_string_pretty(&self.fields)?)
  }

  /// Rewrite the manifest file in place
  pub fn save(&self) -> PublishResult<()> {
    let content = self.to_pretty_string()?;
    fs::write(&self.path, content).with_context(|| format!("Failed to write {}", self.path.display()))
  }
}

/// The root project's manifest: identity and version of the release
#[derive(Debug, Clone)]
pub struct RootManifest {
  pub name: String,
  /// Version exactly as written in the manifest
  pub version: String,
  pub semver: semver::Version,
  pub manifest: Manifest,
}

impl RootManifest {
  pub fn load(path: &Path) -> PublishResult<Self> {
    if !path.exists() {
      return Err(PublishError::Config(ConfigError::ManifestNotFound {
        path: path.to_path_buf(),
      }));
    }
    Self::from_manifest(Manifest::load(path)?)
  }

  fn from_manifest(manifest: Manifest) -> PublishResult<Self> {
    let name = required_str(&manifest, "name")?;
    let version = required_str(&manifest, "version")?;

    let semver = semver::Version::parse(&version).map_err(|e| {
      PublishError::Config(ConfigError::InvalidVersion {
        version: version.clone(),
        reason: e.to_string(),
      })
    })?;

    Ok(Self {
      name,
      version,
      semver,
      manifest,
    })
  }

  /// Tag of the upstream release matching this version
  pub fn release_tag(&self) -> String {
    format!("v{}", self.version)
  }

  /// Package name as npm writes it into archive file names
  pub fn sanitized_name(&self) -> String {
    sanitize_package_name(&self.name)
  }

  /// File name `npm pack` produces for this package
  pub fn tarball_name(&self) -> String {
    format!("{}-{}.tgz", self.sanitized_name(), self.version)
  }

  pub fn is_prerelease(&self) -> bool {
    !self.semver.pre.is_empty()
  }
}

fn required_str(manifest: &Manifest, field: &str) -> PublishResult<String> {
  manifest
    .get_str(field)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .ok_or_else(|| {
      PublishError::Config(ConfigError::MissingField {
        field: field.to_string(),
        manifest: manifest.path().to_path_buf(),
      })
    })
}

/// `@scope/pkg` -> `scope-pkg`
pub fn sanitize_package_name(name: &str) -> String {
  name.replace('/', "-").replace('@', "")
}
