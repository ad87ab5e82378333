//! Core building blocks shared by every command
//!
//! - **config**: optional `tagship.toml` settings
//! - **context**: repository root, output directory and git, built once per run
//! - **error**: error types with contextual help and exit codes
//! - **resolver**: environment/prompt/default variable resolution
//! - **vcs**: git queries via the system `git` binary

pub mod config;
pub mod context;
pub mod error;
pub mod resolver;
pub mod vcs;
