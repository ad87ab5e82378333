//! Integration tests for argument handling and the `clean` step

use crate::helpers::{TestRepo, run_tagship, stderr, stdout};
use anyhow::Result;

const NO_PROMPTS: (&str, &str) = ("SCRIPTS_NO_INTERACTIVE", "1");

#[test]
fn test_help_lists_steps() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = run_tagship(&repo.path, &["--help"], &[])?;

  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("Usage"));
  assert!(out.contains("clean"));
  assert!(out.contains("release"));
  Ok(())
}

#[test]
fn test_unknown_step_prints_usage_and_runs_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = run_tagship(&repo.path, &["deploy"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(0));
  assert!(stdout(&output).contains("Usage"));
  assert!(!repo.path.join("release").exists());
  Ok(())
}

#[test]
fn test_unknown_step_anywhere_blocks_known_steps() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_artifacts(&[("keep", "still here")])?;

  let output = run_tagship(&repo.path, &["clean", "deploy"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(0));
  assert_eq!(repo.artifact_names()?, vec!["keep"]);
  Ok(())
}

#[test]
fn test_unknown_flag_prints_usage_and_runs_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = run_tagship(&repo.path, &["--bogus"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(0));
  assert!(stdout(&output).contains("Usage"));
  assert!(!repo.path.join("release").exists());
  Ok(())
}

#[test]
fn test_unknown_short_flag_after_step_blocks_it() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_artifacts(&[("keep", "still here")])?;

  let output = run_tagship(&repo.path, &["clean", "-x"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(0));
  assert!(stdout(&output).contains("Usage"));
  assert_eq!(repo.artifact_names()?, vec!["keep"]);
  Ok(())
}

#[test]
fn test_version_flag_still_works() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = run_tagship(&repo.path, &["--version"], &[])?;

  assert!(output.status.success());
  assert!(stdout(&output).contains("tagship"));
  Ok(())
}

#[test]
fn test_misspelled_config_table_is_fatal() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("tagship.toml"), "[relase]\noutput_dir = \"dist\"\n")?;

  let output = run_tagship(&repo.path, &["clean"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(!repo.path.join("dist").exists());
  Ok(())
}

#[test]
fn test_clean_creates_output_dir() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = run_tagship(&repo.path, &["clean"], &[NO_PROMPTS])?;

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(repo.path.join("release").is_dir());
  assert!(repo.artifact_names()?.is_empty());
  Ok(())
}

#[test]
fn test_clean_empties_output_dir() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_artifacts(&[("old_linux_amd64_v0.1.0", "old"), ("notes.txt", "x")])?;

  let output = run_tagship(&repo.path, &["clean", "clean"], &[NO_PROMPTS])?;

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(repo.artifact_names()?.is_empty());
  Ok(())
}

#[test]
fn test_clean_from_subdirectory_uses_repository_root() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("initial import")?;
  let nested = repo.path.join("cmd").join("widgetd");
  std::fs::create_dir_all(&nested)?;

  let output = run_tagship(&nested, &["clean"], &[NO_PROMPTS])?;

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(repo.path.join("release").is_dir());
  assert!(!nested.join("release").exists());
  Ok(())
}

#[test]
fn test_output_dir_from_config_file() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("tagship.toml"), "[release]\noutput_dir = \"dist\"\n")?;

  let output = run_tagship(&repo.path, &["clean"], &[NO_PROMPTS])?;

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(repo.path.join("dist").is_dir());
  assert!(!repo.path.join("release").exists());
  Ok(())
}

#[test]
fn test_invalid_config_file_is_fatal() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("tagship.toml"), "[release]\nunknown_key = 1\n")?;

  let output = run_tagship(&repo.path, &["clean"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("tagship.toml"));
  Ok(())
}

#[test]
fn test_build_without_repository_fails() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("initial import")?;
  repo.tag("v0.1.0")?;

  let output = run_tagship(&repo.path, &["build"], &[NO_PROMPTS])?;

  assert_eq!(output.status.code(), Some(1));
  let out = stdout(&output);
  assert!(out.contains("GIT_TAG=v0.1.0"));
  assert!(out.contains("GITHUB_REPOSITORY="));
  assert!(stderr(&output).contains("not of the form owner/name"));
  Ok(())
}

#[test]
fn test_no_interactive_flag_skips_prompts() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("initial import")?;

  let output = run_tagship(&repo.path, &["--no-interactive", "build"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(!stdout(&output).contains("GIT_TAG: "));
  Ok(())
}
