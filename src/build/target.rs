use std::fmt;

/// An (operating system, architecture) pair to cross-compile for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
  pub os: &'static str,
  pub arch: &'static str,
}

impl Target {
  pub const fn new(os: &'static str, arch: &'static str) -> Self {
    Self { os, arch }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}

/// Every build produces one artifact per program for each of these
pub const TARGETS: [Target; 3] = [
  Target::new("linux", "amd64"),
  Target::new("linux", "386"),
  Target::new("darwin", "amd64"),
];

/// File name of the artifact for `binary` built for `target` at `tag`
pub fn artifact_name(binary: &str, target: Target, tag: &str) -> String {
  format!("{}_{}_{}_{}", binary, target.os, target.arch, tag)
}
