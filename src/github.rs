//! Upstream release lookup over the GitHub REST API
//!
//! The orchestrator only sees the `ReleaseHost` trait; `GitHubClient` is the
//! production implementation built on reqwest's blocking client.

use crate::core::config::ReleaseConfig;
use crate::core::error::{LookupError, PublishError, PublishResult, TransportError};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

const PER_PAGE: usize = 100;

/// A release on the remote host
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
  pub tag_name: String,
  #[serde(default)]
  pub assets: Vec<Asset>,
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
  pub name: String,
  /// API URL; serves the raw bytes when asked for application/octet-stream
  pub url: String,
  #[serde(default)]
  pub browser_download_url: Option<String>,
}

impl Release {
  pub fn find_asset(&self, name: &str) -> Result<&Asset, LookupError> {
    self
      .assets
      .iter()
      .find(|asset| asset.name == name)
      .ok_or_else(|| LookupError::AssetNotFound {
        asset: name.to_string(),
        tag: self.tag_name.clone(),
      })
  }
}

/// Find the release carrying exactly `tag`
pub fn find_release<'a>(releases: &'a [Release], tag: &str) -> Result<&'a Release, LookupError> {
  releases
    .iter()
    .find(|release| release.tag_name == tag)
    .ok_or_else(|| LookupError::ReleaseNotFound { tag: tag.to_string() })
}

/// Remote release host contract
pub trait ReleaseHost {
  /// All releases of the configured upstream project
  fn list_releases(&self) -> PublishResult<Vec<Release>>;

  /// Raw bytes of a release asset
  fn download_asset(&self, asset: &Asset) -> PublishResult<Vec<u8>>;
}

/// GitHub implementation of `ReleaseHost`
pub struct GitHubClient {
  client: Client,
  api_url: String,
  owner: String,
  repo: String,
  token: Option<String>,
}

impl GitHubClient {
  pub fn new(config: &ReleaseConfig) -> PublishResult<Self> {
    let client = Client::builder()
      .user_agent(config.user_agent.clone())
      .build()
      .map_err(|e| PublishError::message(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      api_url: config.api_url.trim_end_matches('/').to_string(),
      owner: config.owner.clone(),
      repo: config.repo.clone(),
      token: config.token(),
    })
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    match &self.token {
      Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
      None => request,
    }
  }

  fn releases_url(&self, page: usize) -> String {
    format!(
      "{}/repos/{}/{}/releases?per_page={}&page={}",
      self.api_url, self.owner, self.repo, PER_PAGE, page
    )
  }
}

impl ReleaseHost for GitHubClient {
  fn list_releases(&self) -> PublishResult<Vec<Release>> {
    let mut releases = Vec::new();
    let mut page = 1;

    loop {
      let url = self.releases_url(page);
      let request = self
        .authorized(self.client.get(&url))
        .header(ACCEPT, "application/vnd.github+json");
      let response = request.send().map_err(|e| request_error(&url, e))?;

      if response.status() != StatusCode::OK {
        return Err(status_error(&url, response.status()));
      }

      let batch: Vec<Release> = response.json().map_err(|e| request_error(&url, e))?;
      let done = batch.len() < PER_PAGE;
      releases.extend(batch);

      if done {
        return Ok(releases);
      }
      page += 1;
    }
  }

  fn download_asset(&self, asset: &Asset) -> PublishResult<Vec<u8>> {
    let request = self
      .authorized(self.client.get(&asset.url))
      .header(ACCEPT, "application/octet-stream");
    let response = request.send().map_err(|e| request_error(&asset.url, e))?;

    if response.status() != StatusCode::OK {
      return Err(status_error(&asset.url, response.status()));
    }

    let body = response.bytes().map_err(|e| request_error(&asset.url, e))?;
    Ok(body.to_vec())
  }
}

fn request_error(url: &str, err: reqwest::Error) -> PublishError {
  PublishError::Transport(TransportError::Request {
    url: url.to_string(),
    message: err.to_string(),
  })
}

fn status_error(url: &str, status: StatusCode) -> PublishError {
  PublishError::Transport(TransportError::Status {
    url: url.to_string(),
    status: status.as_u16(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn releases() -> Vec<Release> {
    serde_json::from_str(
      r#"[
        {
          "tag_name": "v1.8.5",
          "draft": false,
          "assets": []
        },
        {
          "tag_name": "v1.8.4",
          "assets": [
            {
              "name": "electron-v1.8.4-win32-x64.zip",
              "url": "https://api.github.com/repos/postmanlabs/electron/releases/assets/1",
              "browser_download_url": "https://github.com/postmanlabs/electron/releases/download/v1.8.4/electron-v1.8.4-win32-x64.zip"
            },
            {
              "name": "electron.d.ts",
              "url": "https://api.github.com/repos/postmanlabs/electron/releases/assets/2"
            }
          ]
        }
      ]"#,
    )
    .unwrap()
  }

  #[test]
  fn test_find_release_by_exact_tag() {
    let releases = releases();
    let release = find_release(&releases, "v1.8.4").unwrap();
    assert_eq!(release.assets.len(), 2);
  }

  #[test]
  fn test_find_release_missing() {
    let releases = releases();
    let err = find_release(&releases, "v9.9.9").unwrap_err();
    assert_eq!(err, LookupError::ReleaseNotFound { tag: "v9.9.9".into() });
    assert!(find_release(&releases, "1.8.4").is_err());
  }

  #[test]
  fn test_find_asset() {
    let releases = releases();
    let asset = releases[1].find_asset("electron.d.ts").unwrap();
    assert!(asset.url.ends_with("/assets/2"));
    assert!(asset.browser_download_url.is_none());
  }

  #[test]
  fn test_find_asset_missing() {
    let releases = releases();
    let err = releases[0].find_asset("electron.d.ts").unwrap_err();
    assert_eq!(
      err,
      LookupError::AssetNotFound {
        asset: "electron.d.ts".into(),
        tag: "v1.8.5".into()
      }
    );
  }

  #[test]
  fn test_releases_url() {
    let config = ReleaseConfig {
      api_url: "https://github.example.com/api/v3/".to_string(),
      token_env: "NPM_PUBLISHER_TEST_UNSET_TOKEN".to_string(),
      ..Default::default()
    };
    let client = GitHubClient::new(&config).unwrap();
    assert_eq!(
      client.releases_url(2),
      "https://github.example.com/api/v3/repos/postmanlabs/electron/releases?per_page=100&page=2"
    );
    assert!(client.token.is_none());
  }
}
