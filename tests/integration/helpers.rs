//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Mutex;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A git repository with deterministic commit dates
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  clock: Mutex<i64>,
}

impl TestRepo {
  /// Create a new repository with `main` as default branch
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"], None)?;
    git(&path, &["config", "user.name", "Test User"], None)?;
    git(&path, &["config", "user.email", "test@example.com"], None)?;
    git(&path, &["config", "commit.gpgsign", "false"], None)?;

    Ok(Self {
      _root: root,
      path,
      clock: Mutex::new(1_767_225_600),
    })
  }

  /// Empty commit one minute after the previous one, returns the short SHA
  pub fn commit(&self, message: &str) -> Result<String> {
    let date = {
      let mut clock = self.clock.lock().map_err(|_| anyhow::anyhow!("clock poisoned"))?;
      *clock += 60;
      format!("@{} +0000", *clock)
    };
    git(&self.path, &["commit", "--allow-empty", "-m", message], Some(&date))?;

    let output = git(&self.path, &["rev-parse", "--short", "HEAD"], None)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Lightweight tag on HEAD
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name], None)?;
    Ok(())
  }

  pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
    git(&self.path, &["remote", "add", name, url], None)?;
    Ok(())
  }

  /// Write files into `release/`
  pub fn write_artifacts(&self, files: &[(&str, &str)]) -> Result<()> {
    let dir = self.path.join("release");
    std::fs::create_dir_all(&dir)?;
    for (name, content) in files {
      std::fs::write(dir.join(name), content)?;
    }
    Ok(())
  }

  /// File names in `release/`, sorted
  pub fn artifact_names(&self) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(self.path.join("release"))? {
      names.push(entry?.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str], date: Option<&str>) -> Result<Output> {
  let mut cmd = Command::new("git");
  cmd.current_dir(cwd).args(args);
  if let Some(date) = date {
    cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
  }
  let output = cmd.output().context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the tagship binary with a scrubbed environment plus `envs`
///
/// Returns the output whatever the exit status; tests assert on it.
pub fn run_tagship(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let tagship_bin = env!("CARGO_BIN_EXE_tagship");

  let mut cmd = Command::new(tagship_bin);
  cmd.current_dir(cwd).args(args).env_clear().stdin(Stdio::null());
  for key in ["PATH", "HOME"] {
    if let Ok(value) = std::env::var(key) {
      cmd.env(key, value);
    }
  }
  cmd.envs(envs.iter().copied());

  cmd.output().context("Failed to run tagship")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

/// Run the tagship binary on the blocking pool so a mock server on the
/// test runtime keeps serving while it runs
pub async fn run_tagship_async(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let cwd = cwd.to_path_buf();
  let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
  let envs: Vec<(String, String)> = envs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

  tokio::task::spawn_blocking(move || {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let envs: Vec<(&str, &str)> = envs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    run_tagship(&cwd, &args, &envs)
  })
  .await?
}

/// Path of the mocked upload endpoint for release 1
pub const UPLOAD_PATH: &str = "/uploads/repos/acme/widgets/releases/1/assets";

/// Mocked hosting API serving the `acme/widgets` repository
pub struct HostingApi {
  pub server: MockServer,
}

impl HostingApi {
  pub async fn start() -> Self {
    Self {
      server: MockServer::start().await,
    }
  }

  pub fn url(&self) -> String {
    self.server.uri()
  }

  /// Answer the create-release call with `status`; expected exactly once
  ///
  /// A 201 carries a release whose upload URL points back at this server.
  pub async fn create_responds(&self, status: u16) {
    let response = if status == 201 {
      ResponseTemplate::new(201).set_body_json(serde_json::json!({
        "id": 1,
        "upload_url": format!("{}{}{{?name,label}}", self.server.uri(), UPLOAD_PATH),
        "html_url": "https://github.com/acme/widgets/releases/tag/v1.2.0",
      }))
    } else {
      ResponseTemplate::new(status).set_body_json(serde_json::json!({ "message": "Validation Failed" }))
    };

    Mock::given(method("POST"))
      .and(path("/repos/acme/widgets/releases"))
      .and(header("authorization", "Bearer t0ken"))
      .and(header("accept", "application/vnd.github+json"))
      .respond_with(response)
      .expect(1)
      .mount(&self.server)
      .await;
  }

  /// Answer every asset upload with `status`; expected exactly `times` times
  pub async fn uploads_respond(&self, status: u16, times: u64) {
    Mock::given(method("POST"))
      .and(path(UPLOAD_PATH))
      .and(header("authorization", "Bearer t0ken"))
      .and(header("content-type", "application/x-executable"))
      .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({ "state": "uploaded" })))
      .expect(times)
      .mount(&self.server)
      .await;
  }

  /// Requests received so far, in arrival order
  pub async fn requests(&self) -> Vec<Request> {
    self.server.received_requests().await.unwrap_or_default()
  }
}
