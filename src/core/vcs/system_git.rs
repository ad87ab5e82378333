//! System git backend
//!
//! Every query is one `git` subprocess with captured output. Commands run
//! with an isolated environment so user-level config and hooks cannot change
//! what gets parsed.

use super::CommitSummary;
use crate::core::error::{ShipError, ShipResult, ToolError};
use crate::utils::run_captured;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the repository containing `path`
  ///
  /// Fails with `ToolError::CommandFailed` when `path` is not inside a work
  /// tree, or `ToolError::Spawn` when git is not installed.
  pub fn open(path: &Path) -> ShipResult<Self> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(path).args(["rev-parse", "--show-toplevel"]);
    let work_tree = run_captured(&mut cmd)?;

    Ok(Self {
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Open the repository if there is one, logging why not otherwise
  pub fn discover(path: &Path) -> Option<Self> {
    match Self::open(path) {
      Ok(git) => Some(git),
      Err(e) => {
        log::debug!("no git repository at {}: {}", path.display(), e);
        None
      }
    }
  }

  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Most recent tag reachable from HEAD, if any
  pub fn latest_tag(&self) -> ShipResult<Option<String>> {
    match run_captured(self.git_cmd().args(["describe", "--tags", "--abbrev=0"])) {
      Ok(tag) if !tag.is_empty() => Ok(Some(tag)),
      Ok(_) => Ok(None),
      // "fatal: No names found" on a repository without tags
      Err(ShipError::Tool(ToolError::CommandFailed { stderr, .. })) => {
        log::debug!("git describe found no tag: {}", stderr.trim());
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  /// All tags, newest first by creation date
  pub fn tags_by_creation_date(&self) -> ShipResult<Vec<String>> {
    let stdout = run_captured(self.git_cmd().args(["tag", "--sort=-creatordate"]))?;
    Ok(
      stdout
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// The tag created immediately before `tag`
  ///
  /// When `tag` does not exist yet, the newest existing tag is returned.
  pub fn previous_tag(&self, tag: &str) -> ShipResult<Option<String>> {
    Ok(preceding_tag(&self.tags_by_creation_date()?, tag))
  }

  /// Whether `tag` exists as a local tag ref
  pub fn tag_exists(&self, tag: &str) -> ShipResult<bool> {
    let refname = format!("refs/tags/{}", tag);
    match run_captured(self.git_cmd().args(["rev-parse", "--verify", "--quiet", &refname])) {
      Ok(_) => Ok(true),
      Err(ShipError::Tool(ToolError::CommandFailed { .. })) => Ok(false),
      Err(e) => Err(e),
    }
  }

  /// Non-merge commits in `from..to` (or everything reachable from `to`
  /// when `from` is None), newest first
  pub fn commit_summaries(&self, from: Option<&str>, to: &str) -> ShipResult<Vec<CommitSummary>> {
    let range = match from {
      Some(from) => format!("{}..{}", from, to),
      None => to.to_string(),
    };

    let stdout = run_captured(
      self
        .git_cmd()
        .args(["log", "--no-merges", "--format=%h %s", &range, "--"]),
    )?;

    Ok(stdout.lines().filter_map(CommitSummary::parse_line).collect())
  }

  /// Push URL of a remote, if the remote exists
  pub fn push_url(&self, remote: &str) -> ShipResult<Option<String>> {
    match run_captured(self.git_cmd().args(["remote", "get-url", "--push", remote])) {
      Ok(url) if !url.is_empty() => Ok(Some(url)),
      Ok(_) => Ok(None),
      Err(ShipError::Tool(ToolError::CommandFailed { stderr, .. })) => {
        log::debug!("remote '{}' unavailable: {}", remote, stderr.trim());
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the work tree
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false");
    cmd.arg("-c").arg("log.showSignature=false");
    cmd.arg("-c").arg("color.ui=false");

    cmd
  }
}

/// Pick the tag that precedes `tag` in a newest-first list
fn preceding_tag(newest_first: &[String], tag: &str) -> Option<String> {
  match newest_first.iter().position(|t| t == tag) {
    Some(idx) => newest_first.get(idx + 1).cloned(),
    None => newest_first.first().cloned(),
  }
}
