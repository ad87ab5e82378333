//! GitHub releases API: payloads, endpoints and the HTTP transport
//!
//! The transport only moves bytes and reports the status; deciding what
//! status counts as success is the publisher's job.

use crate::core::error::{ConfigError, ShipError, ShipResult};
use crate::utils::split_repository;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Media type sent with every uploaded artifact
pub const ASSET_CONTENT_TYPE: &str = "application/x-executable";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Request body for creating a release
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease<'a> {
  pub tag_name: &'a str,
  pub name: &'a str,
  pub body: &'a str,
}

/// The parts of the create-release response that we use
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRelease {
  /// URI template, e.g. `https://uploads.github.com/.../assets{?name,label}`
  pub upload_url: String,
  #[serde(default)]
  pub html_url: Option<String>,
}

/// Status and body of an API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body: String,
}

pub trait Transport {
  /// Authenticated POST of a JSON document
  fn post_json(&self, url: &str, token: &str, payload: &serde_json::Value) -> ShipResult<ApiResponse>;

  /// Authenticated POST of raw bytes
  fn post_bytes(&self, url: &str, token: &str, content_type: &str, bytes: Vec<u8>) -> ShipResult<ApiResponse>;
}

/// Blocking HTTPS transport
pub struct HttpTransport {
  client: reqwest::blocking::Client,
}

impl HttpTransport {
  pub fn new() -> ShipResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .connect_timeout(Duration::from_secs(30))
      // Artifacts can be tens of megabytes on slow uplinks
      .timeout(Duration::from_secs(600))
      .build()?;
    Ok(Self { client })
  }

  fn finish(request: reqwest::blocking::RequestBuilder) -> ShipResult<ApiResponse> {
    let response = request.send()?;
    let status = response.status().as_u16();
    let body = response.text()?;
    log::debug!("response: HTTP {} ({} bytes)", status, body.len());
    Ok(ApiResponse { status, body })
  }
}

impl Transport for HttpTransport {
  fn post_json(&self, url: &str, token: &str, payload: &serde_json::Value) -> ShipResult<ApiResponse> {
    log::debug!("POST {}", url);
    Self::finish(
      self
        .client
        .post(url)
        .bearer_auth(token)
        .header(ACCEPT, GITHUB_ACCEPT)
        .json(payload),
    )
  }

  fn post_bytes(&self, url: &str, token: &str, content_type: &str, bytes: Vec<u8>) -> ShipResult<ApiResponse> {
    log::debug!("POST {} ({} bytes)", url, bytes.len());
    Self::finish(
      self
        .client
        .post(url)
        .bearer_auth(token)
        .header(ACCEPT, GITHUB_ACCEPT)
        .header(CONTENT_TYPE, content_type)
        .body(bytes),
    )
  }
}

/// `{api}/repos/{owner}/{name}/releases`
pub fn releases_endpoint(api_url: &str, repository: &str) -> ShipResult<String> {
  let (owner, name) = split_repository(repository).ok_or_else(|| {
    ShipError::Config(ConfigError::BadRepository {
      value: repository.to_string(),
    })
  })?;

  let endpoint = format!("{}/repos/{}/{}/releases", api_url.trim_end_matches('/'), owner, name);
  Url::parse(&endpoint).map_err(|e| {
    ShipError::Config(ConfigError::BadUrl {
      url: endpoint.clone(),
      reason: e.to_string(),
    })
  })?;
  Ok(endpoint)
}

/// Concrete upload URL for one asset
///
/// Drops the RFC 6570 query template GitHub appends (`{?name,label}`) and
/// adds `name` as a properly encoded query parameter.
pub fn asset_upload_url(upload_url: &str, asset_name: &str) -> ShipResult<Url> {
  let base = match upload_url.find('{') {
    Some(idx) => &upload_url[..idx],
    None => upload_url,
  };

  let mut url = Url::parse(base).map_err(|e| {
    ShipError::Config(ConfigError::BadUrl {
      url: upload_url.to_string(),
      reason: e.to_string(),
    })
  })?;

  if url.cannot_be_a_base() {
    return Err(ShipError::Config(ConfigError::BadUrl {
      url: upload_url.to_string(),
      reason: "not a hierarchical URL".to_string(),
    }));
  }

  url.query_pairs_mut().append_pair("name", asset_name);
  Ok(url)
}
