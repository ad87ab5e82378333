//! CLI commands for tagship
//!
//! - **clean**: empty the output directory
//! - **build**: cross-compile every program into the output directory
//! - **release**: publish the output directory as a tag-named release
//!
//! Steps run in the order given on the command line; the first failure stops
//! the run.

pub mod build;
pub mod clean;
pub mod release;

pub use build::run_build;
pub use clean::run_clean;
pub use release::run_release;

use crate::build::Toolchain;
use crate::core::context::RunContext;
use crate::core::error::ShipResult;
use crate::core::resolver::VarResolver;
use crate::release::github::Transport;
use std::fmt;

/// One pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Clean,
  Build,
  Release,
}

impl Step {
  /// Run when no step is named
  pub const ALL: [Step; 3] = [Step::Clean, Step::Build, Step::Release];

  pub fn from_arg(arg: &str) -> Option<Self> {
    match arg {
      "clean" => Some(Step::Clean),
      "build" => Some(Step::Build),
      "release" => Some(Step::Release),
      _ => None,
    }
  }

  /// Parse every argument, or return the first one that is not a step
  pub fn parse_all(args: &[String]) -> Result<Vec<Step>, String> {
    if args.is_empty() {
      return Ok(Step::ALL.to_vec());
    }
    args
      .iter()
      .map(|arg| Step::from_arg(arg).ok_or_else(|| arg.clone()))
      .collect()
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Clean => "clean",
      Step::Build => "build",
      Step::Release => "release",
    };
    write!(f, "{}", name)
  }
}

/// Collaborators the steps shell out to
pub struct Tools<'a> {
  pub toolchain: &'a dyn Toolchain,
  pub transport: &'a dyn Transport,
}

/// Run `steps` in order
pub fn run_steps(ctx: &RunContext, resolver: &mut VarResolver, steps: &[Step], tools: &Tools<'_>) -> ShipResult<()> {
  for step in steps {
    log::info!("step: {}", step);
    match step {
      Step::Clean => run_clean(ctx)?,
      Step::Build => {
        run_build(ctx, resolver, tools.toolchain)?;
      }
      Step::Release => {
        run_release(ctx, resolver, tools.transport)?;
      }
    }
  }
  Ok(())
}
