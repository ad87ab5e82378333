//! Run context - build once, pass everywhere
//!
//! `RunContext` resolves the repository root, loads `tagship.toml` and opens
//! git a single time in `main`, then every step borrows it.

use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::resolver::{GITHUB_API_URL, GITHUB_REPOSITORY, GIT_TAG, VarResolver, VarSpec};
use crate::core::vcs::SystemGit;
use crate::utils::parse_repository_slug;
use std::path::{Path, PathBuf};

pub struct RunContext {
  /// Repository root (git top-level, or the starting directory outside git)
  pub root: PathBuf,

  /// Artifact directory (absolute)
  pub output_dir: PathBuf,

  pub config: ShipConfig,

  /// None when not running inside a git work tree
  pub git: Option<SystemGit>,
}

impl RunContext {
  /// Build the context for a run started in `cwd`
  ///
  /// `api_url_override` is the value of `GITHUB_API_URL`, if set.
  pub fn build(cwd: &Path, api_url_override: Option<String>) -> ShipResult<Self> {
    let git = SystemGit::discover(cwd);
    let root = match &git {
      Some(git) => git.work_tree().to_path_buf(),
      None => cwd.to_path_buf(),
    };

    let config = ShipConfig::load(&root)?.with_api_url_override(api_url_override);
    let output_dir = root.join(&config.release.output_dir);

    log::debug!("repository root: {}", root.display());
    log::debug!("output directory: {}", output_dir.display());

    Ok(Self {
      root,
      output_dir,
      config,
      git,
    })
  }

  /// Build the context using the resolver's environment snapshot
  pub fn from_resolver(cwd: &Path, resolver: &VarResolver) -> ShipResult<Self> {
    Self::build(cwd, resolver.peek(GITHUB_API_URL).map(str::to_string))
  }

  /// Get git or error if not in a repository
  pub fn require_git(&self) -> ShipResult<&SystemGit> {
    self.git.as_ref().ok_or_else(|| {
      ShipError::with_help(
        format!("{} is not inside a git repository", self.root.display()),
        "Changelog generation needs git history; run tagship from the repository.",
      )
    })
  }

  /// Resolve the release tag, defaulting to the latest git tag
  pub fn resolve_tag(&self, resolver: &mut VarResolver) -> ShipResult<String> {
    let default = match (resolver.peek(GIT_TAG), &self.git) {
      // Known already, skip the git call
      (Some(_), _) => None,
      (None, Some(git)) => git.latest_tag()?,
      (None, None) => None,
    };
    resolver.resolve(VarSpec::new(GIT_TAG).default_value(default.as_deref()))
  }

  /// Resolve `owner/name`, defaulting to the configured push remote
  pub fn resolve_repository(&self, resolver: &mut VarResolver) -> ShipResult<String> {
    let default = match (resolver.peek(GITHUB_REPOSITORY), &self.git) {
      (Some(_), _) => None,
      (None, Some(git)) => git
        .push_url(&self.config.release.remote)?
        .and_then(|url| parse_repository_slug(&url)),
      (None, None) => None,
    };
    resolver.resolve(VarSpec::new(GITHUB_REPOSITORY).default_value(default.as_deref()))
  }
}
