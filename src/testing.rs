//! Shared fixtures for unit tests that need a real git repository

use crate::core::context::RunContext;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Temporary git repository with deterministic, strictly increasing
/// commit dates so tag creation order is well defined
pub(crate) struct GitFixture {
  _root: TempDir,
  pub(crate) path: PathBuf,
  clock: Cell<i64>,
}

impl GitFixture {
  pub(crate) fn new() -> Self {
    let root = TempDir::new().unwrap();
    let path = root.path().to_path_buf();
    let fx = Self {
      _root: root,
      path,
      clock: Cell::new(1_767_225_600),
    };
    fx.git(&["init", "--initial-branch=main"]);
    fx.git(&["config", "user.name", "Test User"]);
    fx.git(&["config", "user.email", "test@example.com"]);
    fx.git(&["config", "commit.gpgsign", "false"]);
    fx.git(&["config", "tag.gpgsign", "false"]);
    fx
  }

  /// Run git in the fixture, panicking on failure
  pub(crate) fn git(&self, args: &[&str]) -> String {
    let date = format!("@{} +0000", self.clock.get());
    let output = Command::new("git")
      .current_dir(&self.path)
      .env("GIT_AUTHOR_DATE", &date)
      .env("GIT_COMMITTER_DATE", &date)
      .args(args)
      .output()
      .unwrap();
    assert!(
      output.status.success(),
      "git {} failed: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
  }

  /// Empty commit with `message`, one minute after the previous one
  pub(crate) fn commit(&self, message: &str) -> String {
    self.clock.set(self.clock.get() + 60);
    self.git(&["commit", "--allow-empty", "-m", message]);
    self.git(&["rev-parse", "--short", "HEAD"])
  }

  /// Lightweight tag on HEAD
  pub(crate) fn tag(&self, name: &str) {
    self.git(&["tag", name]);
  }

  /// Files in the default output directory
  pub(crate) fn write_artifacts(&self, names: &[&str]) {
    let dir = self.path.join("release");
    fs::create_dir_all(&dir).unwrap();
    for name in names {
      fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
  }

  pub(crate) fn context(&self) -> RunContext {
    RunContext::build(&self.path, None).unwrap()
  }

  pub(crate) fn path(&self) -> &Path {
    &self.path
  }
}
