use crate::core::error::{ConfigError, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file at the repository root
pub const CONFIG_FILE: &str = "tagship.toml";

/// Configuration for tagship
///
/// Every field has a default, so a repository without `tagship.toml` works
/// out of the box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipConfig {
  #[serde(default)]
  pub release: ReleaseSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseSettings {
  /// Output directory for artifacts, relative to the repository root
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,

  /// Remote whose push URL yields the default `owner/name`
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Base URL of the hosting API
  #[serde(default = "default_api_url")]
  pub api_url: String,

  /// Host prefix of the module path used for injected symbols
  #[serde(default = "default_host")]
  pub host: String,

  /// Package (relative to the module root) that holds `Tag` and `BuildTime`
  #[serde(default = "default_version_package")]
  pub version_package: String,
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("release")
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_api_url() -> String {
  "https://api.github.com".to_string()
}

fn default_host() -> String {
  "github.com".to_string()
}

fn default_version_package() -> String {
  "version".to_string()
}

impl Default for ReleaseSettings {
  fn default() -> Self {
    Self {
      output_dir: default_output_dir(),
      remote: default_remote(),
      api_url: default_api_url(),
      host: default_host(),
      version_package: default_version_package(),
    }
  }
}

impl ShipConfig {
  /// Load `tagship.toml` from the repository root, or defaults when absent
  pub fn load(root: &Path) -> ShipResult<Self> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
      log::debug!("no {} at {}, using defaults", CONFIG_FILE, root.display());
      return Ok(Self::default());
    }

    let content = fs::read_to_string(&path)?;
    Self::parse(&content).map_err(|e| {
      ShipError::Config(ConfigError::Invalid {
        path: path.clone(),
        reason: e.to_string(),
      })
    })
  }

  pub fn parse(content: &str) -> Result<Self, toml_edit::de::Error> {
    toml_edit::de::from_str(content)
  }

  /// Apply environment overrides
  pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
      self.release.api_url = url;
    }
    self
  }
}
