use crate::build::reset_output_dir;
use crate::core::context::RunContext;
use crate::core::error::ShipResult;

/// Empty the output directory, creating it if needed
pub fn run_clean(ctx: &RunContext) -> ShipResult<()> {
  reset_output_dir(&ctx.output_dir)?;
  println!("🧹 Cleaned {}", ctx.output_dir.display());
  Ok(())
}
