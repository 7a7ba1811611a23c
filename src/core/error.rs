//! Error types for npm-publisher with contextual messages
//!
//! Every fatal condition in a publish run maps to one `PublishError` variant.
//! Lookup misses (no release, no asset) are kept apart from transport failures
//! so a missing upstream release is never reported as a network problem.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Process exit status for any fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Main error type for npm-publisher
#[derive(Debug)]
pub enum PublishError {
  /// Configuration and manifest errors
  Config(ConfigError),

  /// Release or asset not present on the release host
  Lookup(LookupError),

  /// HTTP failures talking to the release host
  Transport(TransportError),

  /// External tool (npm) failures
  Tool(ToolError),

  /// I/O errors
  Io(io::Error),

  /// Failure inside a publish stage, keeping the underlying variant
  Stage {
    stage: &'static str,
    source: Box<PublishError>,
  },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PublishError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Attribute an error to the publish stage it came from
  pub fn stage(stage: &'static str, source: PublishError) -> Self {
    PublishError::Stage {
      stage,
      source: Box::new(source),
    }
  }

  /// The error beneath any stage attribution
  pub fn root_cause(&self) -> &PublishError {
    match self {
      PublishError::Stage { source, .. } => source.root_cause(),
      other => other,
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are promoted to messages so the context (usually a path)
  /// survives; typed errors keep their variant.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PublishError::Message { message, context, help } => PublishError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PublishError::Io(err) => PublishError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PublishError::Config(e) => e.help_message(),
      PublishError::Lookup(e) => e.help_message(),
      PublishError::Transport(e) => e.help_message(),
      PublishError::Tool(e) => e.help_message(),
      PublishError::Message { help, .. } => help.clone(),
      PublishError::Stage { source, .. } => source.help_message(),
      PublishError::Io(_) => None,
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::Config(e) => write!(f, "{}", e),
      PublishError::Lookup(e) => write!(f, "{}", e),
      PublishError::Transport(e) => write!(f, "{}", e),
      PublishError::Tool(e) => write!(f, "{}", e),
      PublishError::Io(e) => write!(f, "I/O error: {}", e),
      PublishError::Stage { stage, source } => write!(f, "Stage '{}' failed: {}", stage, source),
      PublishError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PublishError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PublishError::Io(e) => Some(e),
      PublishError::Stage { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for PublishError {
  fn from(err: io::Error) -> Self {
    PublishError::Io(err)
  }
}

impl From<ConfigError> for PublishError {
  fn from(err: ConfigError) -> Self {
    PublishError::Config(err)
  }
}

impl From<LookupError> for PublishError {
  fn from(err: LookupError) -> Self {
    PublishError::Lookup(err)
  }
}

impl From<TransportError> for PublishError {
  fn from(err: TransportError) -> Self {
    PublishError::Transport(err)
  }
}

impl From<ToolError> for PublishError {
  fn from(err: ToolError) -> Self {
    PublishError::Tool(err)
  }
}

impl From<serde_json::Error> for PublishError {
  fn from(err: serde_json::Error) -> Self {
    PublishError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for PublishError {
  fn from(err: toml_edit::de::Error) -> Self {
    PublishError::message(format!("TOML deserialization error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Root project manifest not found
  ManifestNotFound { path: PathBuf },

  /// A recognized field the template expects is missing from the root manifest
  MissingField { field: String, manifest: PathBuf },

  /// Manifest version is not valid semver
  InvalidVersion { version: String, reason: String },

  /// Invalid value in publish.toml
  InvalidValue { key: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::ManifestNotFound { .. } => {
        Some("Run from the project root or pass --root <DIR> pointing at it.".to_string())
      }
      ConfigError::MissingField { field, .. } => Some(format!(
        "Add \"{}\" to the root package.json or drop it from [package].fields in publish.toml.",
        field
      )),
      ConfigError::InvalidVersion { .. } => {
        Some("The version is used to find the upstream release tag and must look like 1.2.3.".to_string())
      }
      ConfigError::InvalidValue { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::ManifestNotFound { path } => {
        write!(f, "Root manifest not found: {}", path.display())
      }
      ConfigError::MissingField { field, manifest } => {
        write!(f, "Field '{}' is missing from {}", field, manifest.display())
      }
      ConfigError::InvalidVersion { version, reason } => {
        write!(f, "Invalid package version '{}': {}", version, reason)
      }
      ConfigError::InvalidValue { key, reason } => {
        write!(f, "Invalid value for '{}' in publish.toml: {}", key, reason)
      }
    }
  }
}

/// Lookup misses on the release host
#[derive(Debug, PartialEq, Eq)]
pub enum LookupError {
  /// No release carries the expected tag
  ReleaseNotFound { tag: String },

  /// The release exists but lacks the expected asset
  AssetNotFound { asset: String, tag: String },
}

impl LookupError {
  fn help_message(&self) -> Option<String> {
    match self {
      LookupError::ReleaseNotFound { tag } => Some(format!(
        "Publish the upstream release {} first; the npm package wraps its binaries.",
        tag
      )),
      LookupError::AssetNotFound { asset, .. } => {
        Some(format!("Check that the release workflow uploaded {}.", asset))
      }
    }
  }
}

impl fmt::Display for LookupError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LookupError::ReleaseNotFound { tag } => {
        write!(f, "Cannot find release with tag {}", tag)
      }
      LookupError::AssetNotFound { asset, tag } => {
        write!(f, "Cannot find {} in {} release assets", asset, tag)
      }
    }
  }
}

/// HTTP failures
#[derive(Debug)]
pub enum TransportError {
  /// Server answered with a non-success status
  Status { url: String, status: u16 },

  /// Request could not be sent or the body could not be read
  Request { url: String, message: String },
}

impl TransportError {
  fn help_message(&self) -> Option<String> {
    match self {
      TransportError::Status { status, .. } if *status == 401 || *status == 403 || *status == 404 => {
        Some(
          "Export a token with read access to the release repository in the variable named by [release].token_env in publish.toml (GITHUB_TOKEN unless configured).".to_string(),
        )
      }
      _ => None,
    }
  }
}

impl fmt::Display for TransportError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransportError::Status { url, status } => {
        write!(f, "Request to {} failed with HTTP {}", url, status)
      }
      TransportError::Request { url, message } => {
        write!(f, "Request to {} failed: {}", url, message)
      }
    }
  }
}

/// External tool failures
#[derive(Debug)]
pub enum ToolError {
  /// The tool could not be started
  Spawn { program: String, message: String },

  /// The tool exited unsuccessfully
  Failed {
    command: String,
    status: Option<i32>,
    stderr: String,
  },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { program, .. } => Some(format!(
        "Make sure '{}' is installed and on PATH, or set [npm].program in publish.toml.",
        program
      )),
      ToolError::Failed { stderr, .. } => {
        if stderr.contains("ENEEDAUTH") || stderr.contains("E401") {
          Some("Log in with `npm login` or provide NODE_AUTH_TOKEN via .npmrc.".to_string())
        } else if stderr.contains("E403") {
          Some("The version may already be published; npm refuses to overwrite it.".to_string())
        } else {
          None
        }
      }
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, message } => {
        write!(f, "Failed to run {}: {}", program, message)
      }
      ToolError::Failed { command, status, stderr } => {
        match status {
          Some(code) => write!(f, "Command failed with exit code {}: {}", code, command)?,
          None => write!(f, "Command terminated by signal: {}", command)?,
        }
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for npm-publisher
pub type PublishResult<T> = Result<T, PublishError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PublishResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PublishError>,
{
  fn context(self, ctx: impl Into<String>) -> PublishResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PublishError) {
  eprintln!("\n❌ Error: {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
