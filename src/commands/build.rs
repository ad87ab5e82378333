//! Build command: cross-compile every program into the output directory

use crate::build::{Artifact, Toolchain, VersionStamp, build_all};
use crate::core::context::RunContext;
use crate::core::error::{ConfigError, ShipError, ShipResult};
use crate::core::resolver::VarResolver;
use crate::utils::split_repository;

/// Run the build command
pub fn run_build(ctx: &RunContext, resolver: &mut VarResolver, toolchain: &dyn Toolchain) -> ShipResult<Vec<Artifact>> {
  let tag = ctx.resolve_tag(resolver)?;
  let repository = ctx.resolve_repository(resolver)?;

  // The injected symbol path is derived from owner/name
  if split_repository(&repository).is_none() {
    return Err(ShipError::Config(ConfigError::BadRepository { value: repository }));
  }

  let settings = &ctx.config.release;
  let stamp = VersionStamp::new(&settings.host, &repository, &settings.version_package, &tag);

  println!("🔨 Building {} ({})", tag, stamp.build_time);
  let artifacts = build_all(toolchain, &ctx.root, &ctx.output_dir, &stamp)?;

  if artifacts.is_empty() {
    println!("⚠️  No programs found to build");
    return Ok(artifacts);
  }

  for artifact in &artifacts {
    log::debug!("{} built for {}", artifact.binary, artifact.target);
    println!("   ✅ {}  sha256:{}", artifact.file_name(), artifact.sha256);
  }
  println!("📦 {} artifact(s) in {}", artifacts.len(), ctx.output_dir.display());

  Ok(artifacts)
}
