//! Cross-compilation of every discovered program for every target
//!
//! Builds are strictly sequential: programs in discovery order, targets in
//! `TARGETS` order. The first failing compile aborts the whole build and
//! leaves whatever was already written in the output directory.

pub mod output;
pub mod target;
pub mod toolchain;

pub use output::{list_artifacts, reset_output_dir, sha256_file};
pub use target::{TARGETS, Target, artifact_name};
pub use toolchain::{CompileRequest, GoToolchain, Toolchain, VersionStamp, binary_name};

use crate::core::error::ShipResult;
use crate::ui::progress::StepProgress;
use std::path::{Path, PathBuf};

/// A binary written by the build
#[derive(Debug, Clone)]
pub struct Artifact {
  pub binary: String,
  pub target: Target,
  pub path: PathBuf,
  pub sha256: String,
}

impl Artifact {
  pub fn file_name(&self) -> String {
    self
      .path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default()
  }
}

/// Wipe `output_dir`, then compile every program for every target into it
pub fn build_all(
  toolchain: &dyn Toolchain,
  root: &Path,
  output_dir: &Path,
  stamp: &VersionStamp,
) -> ShipResult<Vec<Artifact>> {
  reset_output_dir(output_dir)?;

  let programs = toolchain.discover(root)?;
  log::debug!("{} discovered {} program(s)", toolchain.name(), programs.len());

  let mut progress = StepProgress::new(programs.len() * TARGETS.len(), "Building");
  let mut artifacts = Vec::with_capacity(programs.len() * TARGETS.len());

  for source in &programs {
    let binary = binary_name(source);

    for target in TARGETS {
      let path = output_dir.join(artifact_name(&binary, target, &stamp.tag));
      log::info!("building {} for {} -> {}", binary, target, path.display());

      toolchain.compile(
        root,
        &CompileRequest {
          source,
          target,
          output: &path,
          stamp,
        },
      )?;

      let sha256 = sha256_file(&path)?;
      artifacts.push(Artifact {
        binary: binary.clone(),
        target,
        path,
        sha256,
      });
      progress.inc();
    }
  }

  Ok(artifacts)
}
