//! Changelog generation from the commits between two tags
//!
//! One bullet per unique commit subject, newest first. When several commits
//! share a subject only the newest one is kept.

use crate::core::error::ShipResult;
use crate::core::vcs::{CommitSummary, SystemGit};
use std::collections::HashSet;
use std::fmt;

/// Deduplicated commit list for one release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
  /// Tag the range starts after, None for the first release
  pub previous_tag: Option<String>,
  pub entries: Vec<CommitSummary>,
}

impl Changelog {
  /// Build from newest-first commits, keeping the first commit per subject
  pub fn from_commits(previous_tag: Option<String>, commits: impl IntoIterator<Item = CommitSummary>) -> Self {
    let mut seen = HashSet::new();
    let entries = commits
      .into_iter()
      .filter(|c| seen.insert(c.subject.clone()))
      .collect();

    Self { previous_tag, entries }
  }

  /// Collect the changelog for `tag` from git history
  ///
  /// A tag that does not exist yet is created by the release from the
  /// current commit, so the range ends at `HEAD`.
  pub fn generate(git: &SystemGit, tag: &str) -> ShipResult<Self> {
    let previous_tag = git.previous_tag(tag)?;
    let end = if git.tag_exists(tag)? { tag } else { "HEAD" };
    match &previous_tag {
      Some(prev) => log::debug!("changelog range {}..{}", prev, end),
      None => log::debug!("no tag before {}, using full history", tag),
    }

    let commits = git.commit_summaries(previous_tag.as_deref(), end)?;
    Ok(Self::from_commits(previous_tag, commits))
  }

  /// Rendered bullet lines, `* {short-hash} {subject}`
  pub fn lines(&self) -> Vec<String> {
    self
      .entries
      .iter()
      .map(|c| format!("* {} {}", c.short_sha, c.subject).trim_end().to_string())
      .collect()
  }

  /// Release body: bullet lines joined by newlines
  pub fn to_body(&self) -> String {
    self.lines().join("\n")
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Display for Changelog {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_body())
  }
}
