pub mod system_git;

pub use system_git::SystemGit;

/// One line of `git log --format='%h %s'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
  pub short_sha: String,
  pub subject: String,
}

impl CommitSummary {
  pub fn new(short_sha: impl Into<String>, subject: impl Into<String>) -> Self {
    Self {
      short_sha: short_sha.into(),
      subject: subject.into(),
    }
  }

  /// Parse a `{short-hash} {subject}` line; the subject may be empty
  pub fn parse_line(line: &str) -> Option<Self> {
    let line = line.trim_end();
    if line.is_empty() {
      return None;
    }
    let (sha, subject) = line.split_once(' ').unwrap_or((line, ""));
    Some(Self::new(sha, subject))
  }
}
