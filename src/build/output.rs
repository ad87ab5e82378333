//! Output directory handling shared by clean, build and release

use crate::core::error::{ResultExt, ShipResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Remove everything in `dir`, leaving it present and empty
pub fn reset_output_dir(dir: &Path) -> ShipResult<()> {
  if dir.exists() {
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
  }
  fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
  Ok(())
}

/// Regular files directly inside `dir`, sorted by file name
///
/// A missing directory yields an empty list.
pub fn list_artifacts(dir: &Path) -> ShipResult<Vec<PathBuf>> {
  if !dir.exists() {
    return Ok(Vec::new());
  }

  let mut files = Vec::new();
  for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
    let entry = entry?;
    if entry.file_type()?.is_file() {
      files.push(entry.path());
    }
  }
  files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
  Ok(files)
}

/// Hex SHA-256 of a file's contents
pub fn sha256_file(path: &Path) -> ShipResult<String> {
  let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(format!("{:x}", Sha256::digest(&bytes)))
}
