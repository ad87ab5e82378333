//! Subprocess and remote-URL helpers shared by the git and toolchain layers

use crate::core::error::{ShipError, ShipResult, ToolError};
use std::path::Path;
use std::process::Command;

/// Render a command line for logs and error messages
pub fn describe_command(cmd: &Command) -> String {
  let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
  parts.extend(cmd.get_args().map(|a| a.to_string_lossy().to_string()));
  parts.join(" ")
}

/// Run a command to completion and return its trimmed stdout
///
/// A non-zero exit is turned into `ToolError::CommandFailed` carrying the
/// command's stderr and exit code.
pub fn run_captured(cmd: &mut Command) -> ShipResult<String> {
  let command = describe_command(cmd);
  log::debug!("exec: {}", command);

  let output = cmd.output().map_err(|e| {
    ShipError::Tool(ToolError::Spawn {
      program: cmd.get_program().to_string_lossy().to_string(),
      reason: e.to_string(),
    })
  })?;

  if !output.status.success() {
    return Err(ShipError::Tool(ToolError::CommandFailed {
      command,
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a remote is a local filesystem path (not a hosted URL)
///
/// Returns true for absolute and `./`/`../` relative paths, Windows drive
/// paths, UNC paths and `file://` URLs.
pub fn is_local_path(path: &str) -> bool {
  if path.starts_with("./") || path.starts_with("../") || path.starts_with("file://") {
    return true;
  }

  // Must check before the URL check since Windows paths contain ':'
  if path.len() >= 3 {
    let bytes = path.as_bytes();
    if bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/') {
      return true;
    }
  }

  if path.starts_with("\\\\") {
    return true;
  }

  if path.starts_with('/') && !path.contains("://") && !path.contains('@') {
    return true;
  }

  Path::new(path).is_absolute() && !path.contains("://")
}

/// Extract `owner/name` from a hosted remote URL
///
/// Handles the usual shapes:
/// - `git@github.com:owner/name.git`
/// - `https://github.com/owner/name.git`
/// - `ssh://git@github.com/owner/name`
///
/// Returns None for local paths and URLs with fewer than two path segments.
pub fn parse_repository_slug(url: &str) -> Option<String> {
  let url = url.trim();
  if url.is_empty() || is_local_path(url) {
    return None;
  }

  let path = if let Some((_, rest)) = url.split_once("://") {
    // scheme://[user@]host[:port]/owner/name
    rest.split_once('/').map(|(_, p)| p)?
  } else {
    // scp-like: [user@]host:owner/name
    url.split_once(':').map(|(_, p)| p)?
  };

  let path = path.trim_end_matches('/');
  let path = path.strip_suffix(".git").unwrap_or(path);

  let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
  let name = segments.next()?;
  let owner = segments.next()?;

  Some(format!("{}/{}", owner, name))
}

/// Split `owner/name` into its two parts
pub fn split_repository(slug: &str) -> Option<(&str, &str)> {
  let (owner, name) = slug.split_once('/')?;
  if owner.is_empty() || name.is_empty() || name.contains('/') {
    return None;
  }
  Some((owner, name))
}
