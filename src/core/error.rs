//! Error types for tagship with contextual messages and exit codes
//!
//! Every failure in the pipeline is fatal. Errors are categorized so that
//! `main` can print a useful diagnostic and pick the process exit code:
//! external commands propagate their own status, everything else exits 1.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit code for explicit fatal errors (HTTP, configuration, I/O)
pub const EXIT_FATAL: i32 = 1;

/// Main error type for tagship
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// External command (git, compiler toolchain) errors
  Tool(ToolError),

  /// Hosting API errors
  Api(ApiError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(e) => ShipError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Process exit code for this error
  ///
  /// A failed external command exits with the command's own status, the way
  /// a strict-mode shell pipeline would. Everything else is a plain fatal.
  pub fn exit_code(&self) -> i32 {
    match self {
      ShipError::Tool(ToolError::CommandFailed { code: Some(code), .. }) if *code != 0 => *code,
      _ => EXIT_FATAL,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Tool(e) => e.help_message(),
      ShipError::Api(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      ShipError::Io(_) => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Tool(e) => write!(f, "{}", e),
      ShipError::Api(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<reqwest::Error> for ShipError {
  fn from(err: reqwest::Error) -> Self {
    ShipError::Api(ApiError::Transport {
      reason: err.to_string(),
    })
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// tagship.toml exists but could not be parsed
  Invalid { path: PathBuf, reason: String },

  /// Repository identifier is not of the form `owner/name`
  BadRepository { value: String },

  /// A URL from configuration or the API could not be used
  BadUrl { url: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => Some("Fix or remove tagship.toml; every field in it is optional.".to_string()),
      ConfigError::BadRepository { .. } => Some(
        "Set GITHUB_REPOSITORY=owner/name, or add a push remote pointing at the hosted repository.".to_string(),
      ),
      ConfigError::BadUrl { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::BadRepository { value } => {
        write!(f, "Repository '{}' is not of the form owner/name", value)
      }
      ConfigError::BadUrl { url, reason } => {
        write!(f, "Unusable URL '{}': {}", url, reason)
      }
    }
  }
}

/// External command errors (git, compiler toolchain)
#[derive(Debug)]
pub enum ToolError {
  /// The program could not be started at all
  Spawn { program: String, reason: String },

  /// The command ran and exited unsuccessfully
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { program, .. } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      ToolError::CommandFailed { stderr, .. } if stderr.contains("not a git repository") => {
        Some("Run tagship from inside a git work tree.".to_string())
      }
      ToolError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, reason } => {
        write!(f, "Failed to execute {}: {}", program, reason)
      }
      ToolError::CommandFailed { command, code, stderr } => {
        match code {
          Some(code) => write!(f, "Command failed (exit {}): {}", code, command)?,
          None => write!(f, "Command terminated by signal: {}", command)?,
        }
        let stderr = stderr.trim();
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr)?;
        }
        Ok(())
      }
    }
  }
}

/// Hosting API errors
#[derive(Debug)]
pub enum ApiError {
  /// The API answered with something other than 201 Created
  UnexpectedStatus {
    action: String,
    status: u16,
    body: String,
  },

  /// The request never produced a response
  Transport { reason: String },
}

impl ApiError {
  fn help_message(&self) -> Option<String> {
    match self {
      ApiError::UnexpectedStatus { status: 401, .. } | ApiError::UnexpectedStatus { status: 403, .. } => {
        Some("Check that GITHUB_OAUTH_TOKEN is valid and allowed to write releases.".to_string())
      }
      ApiError::UnexpectedStatus { status: 422, .. } => {
        Some("A release for this tag, or an asset with this name, probably exists already.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::UnexpectedStatus { action, status, body } => {
        write!(f, "{} failed with HTTP {}\n{}", action, status, body)
      }
      ApiError::Transport { reason } => write!(f, "HTTP request failed: {}", reason),
    }
  }
}

/// Result type alias for tagship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
