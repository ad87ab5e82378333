//! Release command: publish the output directory as a tag-named release

use crate::core::context::RunContext;
use crate::core::error::ShipResult;
use crate::core::resolver::VarResolver;
use crate::release::github::Transport;
use crate::release::{PublishReport, publish};

/// Run the release command
pub fn run_release(ctx: &RunContext, resolver: &mut VarResolver, transport: &dyn Transport) -> ShipResult<PublishReport> {
  let report = publish(ctx, resolver, transport)?;

  println!();
  println!("📋 Changelog since {}", report.changelog.previous_tag.as_deref().unwrap_or("the beginning"));
  if report.changelog.is_empty() {
    println!("   (no commits)");
  }
  for line in report.changelog.lines() {
    println!("   {}", line);
  }
  println!();

  for asset in &report.uploaded {
    println!("   ⬆️  {}", asset);
  }
  println!("✅ Release {} published with {} asset(s)", report.tag, report.uploaded.len());
  if let Some(url) = &report.html_url {
    println!("   {}", url);
  }

  Ok(report)
}
