//! Compiler toolchain abstraction
//!
//! The builder only needs two things from a toolchain: which programs exist,
//! and how to compile one of them for one target. `GoToolchain` shells out
//! to `go`; tests substitute a fake that writes files directly.

use super::target::Target;
use crate::core::error::ShipResult;
use crate::utils::run_captured;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Version values injected into every artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamp {
  /// Fully-qualified package that declares `Tag` and `BuildTime`
  pub symbol_package: String,
  pub tag: String,
  /// `%Y-%m-%d_%H:%M:%S`, UTC
  pub build_time: String,
}

impl VersionStamp {
  /// Stamp for `owner/name` hosted on `host`, timestamped now
  pub fn new(host: &str, repository: &str, version_package: &str, tag: &str) -> Self {
    let build_time = chrono::Utc::now().format("%Y-%m-%d_%H:%M:%S").to_string();
    Self::at(host, repository, version_package, tag, build_time)
  }

  pub fn at(host: &str, repository: &str, version_package: &str, tag: &str, build_time: String) -> Self {
    let package = version_package.trim_matches('/');
    let symbol_package = if package.is_empty() {
      format!("{}/{}", host, repository)
    } else {
      format!("{}/{}/{}", host, repository, package)
    };

    Self {
      symbol_package,
      tag: tag.to_string(),
      build_time,
    }
  }

  /// Linker flags: strip symbols and inject the two version values
  pub fn ldflags(&self) -> String {
    format!(
      "-s -w -X {pkg}.Tag={tag} -X {pkg}.BuildTime={time}",
      pkg = self.symbol_package,
      tag = self.tag,
      time = self.build_time
    )
  }
}

/// One compiler invocation
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
  /// Program directory as returned by discovery
  pub source: &'a Path,
  pub target: Target,
  pub output: &'a Path,
  pub stamp: &'a VersionStamp,
}

pub trait Toolchain {
  /// Short name for logs
  fn name(&self) -> &str;

  /// Directories of every executable program under `root`
  fn discover(&self, root: &Path) -> ShipResult<Vec<PathBuf>>;

  /// Compile one program for one target into `request.output`
  fn compile(&self, root: &Path, request: &CompileRequest<'_>) -> ShipResult<()>;
}

/// The Go toolchain: programs are packages named `main`
pub struct GoToolchain {
  program: String,
}

impl GoToolchain {
  pub fn new() -> Self {
    Self {
      program: "go".to_string(),
    }
  }

  fn go_cmd(&self, root: &Path) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.current_dir(root);
    cmd
  }

  /// Statically linked `go build` for one program and target
  pub fn compile_command(&self, root: &Path, request: &CompileRequest<'_>) -> Command {
    let mut cmd = self.go_cmd(root);
    cmd
      .env("GOOS", request.target.os)
      .env("GOARCH", request.target.arch)
      .env("CGO_ENABLED", "0")
      .arg("build")
      .arg("-ldflags")
      .arg(request.stamp.ldflags())
      .arg("-o")
      .arg(request.output)
      .arg(package_arg(root, request.source));
    cmd
  }
}

impl Default for GoToolchain {
  fn default() -> Self {
    Self::new()
  }
}

impl Toolchain for GoToolchain {
  fn name(&self) -> &str {
    &self.program
  }

  fn discover(&self, root: &Path) -> ShipResult<Vec<PathBuf>> {
    let stdout = run_captured(self.go_cmd(root).args(["list", "-f", "{{.Name}} {{.Dir}}", "./..."]))?;
    Ok(parse_main_packages(&stdout))
  }

  fn compile(&self, root: &Path, request: &CompileRequest<'_>) -> ShipResult<()> {
    run_captured(&mut self.compile_command(root, request))?;
    Ok(())
  }
}

/// Keep the directories of `main` packages from `go list` output
fn parse_main_packages(stdout: &str) -> Vec<PathBuf> {
  stdout
    .lines()
    .filter_map(|line| line.trim().split_once(' '))
    .filter(|(name, _)| *name == "main")
    .map(|(_, dir)| PathBuf::from(dir))
    .collect()
}

/// `./relative/dir` when the program lives under the root, else the path as-is
fn package_arg(root: &Path, source: &Path) -> String {
  match source.strip_prefix(root) {
    Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
    Ok(rel) => format!("./{}", rel.to_string_lossy().replace('\\', "/")),
    Err(_) => source.to_string_lossy().to_string(),
  }
}

/// Binary name of a program: the last component of its directory
pub fn binary_name(source: &Path) -> String {
  source
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| "main".to_string())
}
