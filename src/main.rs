mod build;
mod commands;
mod core;
mod release;
mod ui;
mod utils;

#[cfg(test)]
mod testing;

use crate::build::GoToolchain;
use crate::commands::{Step, Tools, run_steps};
use crate::core::context::RunContext;
use crate::core::error::{ShipError, print_error};
use crate::core::resolver::VarResolver;
use crate::release::github::HttpTransport;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

/// Cross-compile the repository's programs and publish them as a tagged release
#[derive(Parser)]
#[command(name = "tagship")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
#[command(after_help = "Steps:
  clean    Empty the output directory
  build    Cross-compile every program for linux/amd64, linux/386 and darwin/amd64
  release  Create a release for the tag and upload everything in the output directory

Environment:
  GIT_TAG, GITHUB_REPOSITORY, GITHUB_OAUTH_TOKEN, RELEASE_NAME,
  SCRIPTS_NO_INTERACTIVE, GITHUB_API_URL, RUST_LOG")]
struct Cli {
  /// Steps to run in order (default: clean build release)
  #[arg(value_name = "STEP")]
  steps: Vec<String>,

  /// Never prompt; unset variables fall back to their defaults
  #[arg(long)]
  no_interactive: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    .format_timestamp(None)
    .init();
}

fn main() {
  init_logging();
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) if e.kind() == ErrorKind::UnknownArgument => {
      log::warn!("{}", e.to_string().lines().next().unwrap_or_default());
      print_usage();
      return;
    }
    // --help, --version and malformed input keep clap's own handling
    Err(e) => e.exit(),
  };

  // Validate every step before running any of them
  let steps = match Step::parse_all(&cli.steps) {
    Ok(steps) => steps,
    Err(unknown) => {
      log::warn!("unknown step '{}'", unknown);
      print_usage();
      return;
    }
  };

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(ShipError::message(format!("Failed to get current directory: {}", e))),
  };

  let mut resolver = VarResolver::from_env(cli.no_interactive);

  let ctx = match RunContext::from_resolver(&cwd, &resolver) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let transport = match HttpTransport::new() {
    Ok(transport) => transport,
    Err(e) => handle_error(e),
  };
  let toolchain = GoToolchain::new();
  let tools = Tools {
    toolchain: &toolchain,
    transport: &transport,
  };

  if let Err(err) = run_steps(&ctx, &mut resolver, &steps, &tools) {
    handle_error(err);
  }
}

/// Print usage to stdout
fn print_usage() {
  if let Err(e) = Cli::command().print_help() {
    handle_error(e.into());
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
