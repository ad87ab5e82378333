//! Variable resolution: environment first, then prompt, then default
//!
//! The resolver snapshots the relevant environment once at startup and
//! records every value it resolves, so a variable asked for by both `build`
//! and `release` is prompted for at most once per run.

use crate::core::error::{ShipError, ShipResult};
use std::collections::BTreeMap;
use std::io::{self, BufRead, IsTerminal, Write};

/// Release tag, defaulting to the latest git tag
pub const GIT_TAG: &str = "GIT_TAG";
/// `owner/name` of the hosted repository
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// API token (secret)
pub const GITHUB_OAUTH_TOKEN: &str = "GITHUB_OAUTH_TOKEN";
/// Display name of the release, defaulting to the tag
pub const RELEASE_NAME: &str = "RELEASE_NAME";
/// Any non-empty value disables prompting
pub const SCRIPTS_NO_INTERACTIVE: &str = "SCRIPTS_NO_INTERACTIVE";
/// Overrides the hosting API base URL
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";

const KNOWN_VARS: [&str; 6] = [
  GIT_TAG,
  GITHUB_REPOSITORY,
  GITHUB_OAUTH_TOKEN,
  RELEASE_NAME,
  SCRIPTS_NO_INTERACTIVE,
  GITHUB_API_URL,
];

/// How a variable is looked up
#[derive(Debug, Clone, Copy, Default)]
pub struct VarSpec<'a> {
  pub name: &'a str,
  pub default: Option<&'a str>,
  pub secret: bool,
}

impl<'a> VarSpec<'a> {
  pub fn new(name: &'a str) -> Self {
    Self {
      name,
      default: None,
      secret: false,
    }
  }

  pub fn default_value(mut self, default: Option<&'a str>) -> Self {
    self.default = default;
    self
  }

  pub fn secret(mut self) -> Self {
    self.secret = true;
    self
  }
}

pub struct VarResolver {
  vars: BTreeMap<String, String>,
  interactive: bool,
  /// Secrets are typed with echo off when prompting on a terminal
  terminal: bool,
  input: Box<dyn BufRead>,
  output: Box<dyn Write>,
}

impl VarResolver {
  /// Resolver over the process environment, prompting on stdin/stdout
  ///
  /// Prompting is disabled by `no_interactive` or a non-empty
  /// `SCRIPTS_NO_INTERACTIVE`.
  pub fn from_env(no_interactive: bool) -> Self {
    let vars: BTreeMap<String, String> = KNOWN_VARS
      .iter()
      .filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v)))
      .collect();

    let env_no_interactive = vars.get(SCRIPTS_NO_INTERACTIVE).is_some_and(|v| !v.is_empty());

    Self::new(
      vars,
      !(no_interactive || env_no_interactive),
      Box::new(io::BufReader::new(io::stdin())),
      Box::new(io::stdout()),
    )
    .with_terminal(io::stdin().is_terminal() && io::stdout().is_terminal())
  }

  pub fn new(vars: BTreeMap<String, String>, interactive: bool, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
    Self {
      vars,
      interactive,
      terminal: false,
      input,
      output,
    }
  }

  pub fn with_terminal(mut self, terminal: bool) -> Self {
    self.terminal = terminal;
    self
  }

  /// Whether a prompt for `var` reads without echoing
  fn reads_hidden(&self, var: &VarSpec<'_>) -> bool {
    var.secret && self.terminal
  }

  /// Already-known value of a variable, without prompting
  pub fn peek(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
  }

  /// Resolve a variable and echo the outcome
  ///
  /// An unresolvable variable becomes the empty string.
  pub fn resolve(&mut self, var: VarSpec<'_>) -> ShipResult<String> {
    let value = match self.peek(var.name) {
      Some(value) => value.to_string(),
      None if self.interactive => self.prompt(&var)?,
      None => var.default.unwrap_or_default().to_string(),
    };

    if var.secret {
      let shown = if value.is_empty() { "<empty>" } else { "<redacted>" };
      writeln!(self.output, "{}={}", var.name, shown)?;
    } else {
      writeln!(self.output, "{}={}", var.name, value)?;
    }
    self.output.flush()?;

    self.vars.insert(var.name.to_string(), value.clone());
    Ok(value)
  }

  fn prompt(&mut self, var: &VarSpec<'_>) -> ShipResult<String> {
    if self.reads_hidden(var) {
      let typed = inquire::Password::new(&format!("{}:", var.name))
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .prompt()
        .map_err(|e| ShipError::message(format!("Failed to read {}: {}", var.name, e)))?;
      let typed = typed.trim();
      return Ok(if typed.is_empty() {
        var.default.unwrap_or_default().to_string()
      } else {
        typed.to_string()
      });
    }

    match var.default {
      Some(default) if !var.secret => write!(self.output, "{} [{}]: ", var.name, default)?,
      _ => write!(self.output, "{}: ", var.name)?,
    }
    self.output.flush()?;

    let mut input = String::new();
    self.input.read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
      Ok(var.default.unwrap_or_default().to_string())
    } else {
      Ok(input.to_string())
    }
  }
}
