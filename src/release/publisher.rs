//! Release publishing: Resolve -> Describe -> Create -> Upload
//!
//! Each stage runs only if the previous one succeeded. Create and every
//! upload must answer 201 Created; anything else stops the run with the
//! status and response body. Nothing is retried or rolled back.

use super::changelog::Changelog;
use super::github::{ASSET_CONTENT_TYPE, CreatedRelease, NewRelease, Transport, asset_upload_url, releases_endpoint};
use crate::build::list_artifacts;
use crate::core::context::RunContext;
use crate::core::error::{ApiError, ResultExt, ShipError, ShipResult};
use crate::core::resolver::{GITHUB_OAUTH_TOKEN, RELEASE_NAME, VarResolver, VarSpec};
use crate::ui::progress::StepProgress;
use std::fs;
use std::path::{Path, PathBuf};

const HTTP_CREATED: u16 = 201;

/// Everything the Resolve stage produces
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
  pub token: String,
  pub repository: String,
  pub tag: String,
  pub name: String,
}

/// Outcome of a successful publish
#[derive(Debug, Clone)]
pub struct PublishReport {
  pub tag: String,
  pub changelog: Changelog,
  pub html_url: Option<String>,
  pub uploaded: Vec<String>,
}

/// Resolve token, repository, tag and display name, in that order
pub fn resolve_request(ctx: &RunContext, resolver: &mut VarResolver) -> ShipResult<ReleaseRequest> {
  let token = resolver.resolve(VarSpec::new(GITHUB_OAUTH_TOKEN).secret())?;
  let repository = ctx.resolve_repository(resolver)?;
  let tag = ctx.resolve_tag(resolver)?;
  let name = resolver.resolve(VarSpec::new(RELEASE_NAME).default_value(Some(tag.as_str())))?;

  Ok(ReleaseRequest {
    token,
    repository,
    tag,
    name,
  })
}

pub struct Publisher<'a> {
  transport: &'a dyn Transport,
  api_url: &'a str,
}

impl<'a> Publisher<'a> {
  pub fn new(transport: &'a dyn Transport, api_url: &'a str) -> Self {
    Self { transport, api_url }
  }

  /// Create the release; only 201 counts as success
  pub fn create(&self, request: &ReleaseRequest, body: &str) -> ShipResult<CreatedRelease> {
    let endpoint = releases_endpoint(self.api_url, &request.repository)?;
    let payload = serde_json::to_value(NewRelease {
      tag_name: &request.tag,
      name: &request.name,
      body,
    })?;

    let response = self.transport.post_json(&endpoint, &request.token, &payload)?;
    if response.status != HTTP_CREATED {
      return Err(ShipError::Api(ApiError::UnexpectedStatus {
        action: format!("Create release {}", request.tag),
        status: response.status,
        body: response.body,
      }));
    }

    let created: CreatedRelease = serde_json::from_str(&response.body).context("Unreadable create-release response")?;
    Ok(created)
  }

  /// Upload one asset; only 201 counts as success
  pub fn upload(&self, token: &str, release: &CreatedRelease, file: &Path) -> ShipResult<String> {
    let asset_name = file
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .ok_or_else(|| ShipError::message(format!("Not a file: {}", file.display())))?;

    let url = asset_upload_url(&release.upload_url, &asset_name)?;
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let response = self
      .transport
      .post_bytes(url.as_str(), token, ASSET_CONTENT_TYPE, bytes)?;
    if response.status != HTTP_CREATED {
      return Err(ShipError::Api(ApiError::UnexpectedStatus {
        action: format!("Upload {}", asset_name),
        status: response.status,
        body: response.body,
      }));
    }

    Ok(asset_name)
  }

  /// Upload every file in order, stopping at the first failure
  pub fn upload_all(&self, token: &str, release: &CreatedRelease, files: &[PathBuf]) -> ShipResult<Vec<String>> {
    let mut progress = StepProgress::new(files.len(), "Uploading");
    let mut uploaded = Vec::with_capacity(files.len());

    for file in files {
      log::info!("uploading {}", file.display());
      uploaded.push(self.upload(token, release, file)?);
      progress.inc();
    }

    Ok(uploaded)
  }
}

/// Run all four stages against the artifacts currently in the output directory
pub fn publish(ctx: &RunContext, resolver: &mut VarResolver, transport: &dyn Transport) -> ShipResult<PublishReport> {
  // 1. Resolve
  let request = resolve_request(ctx, resolver)?;

  // 2. Describe
  let changelog = Changelog::generate(ctx.require_git()?, &request.tag)?;
  log::debug!("changelog has {} entr(ies)", changelog.entries.len());

  // 3. Create
  let publisher = Publisher::new(transport, &ctx.config.release.api_url);
  let created = publisher.create(&request, &changelog.to_body())?;

  // 4. Upload whatever is in the output directory right now
  let files = list_artifacts(&ctx.output_dir)?;
  let uploaded = publisher.upload_all(&request.token, &created, &files)?;

  Ok(PublishReport {
    tag: request.tag,
    changelog,
    html_url: created.html_url,
    uploaded,
  })
}
