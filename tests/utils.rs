#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Runs git in `dir` and returns its trimmed stdout.
pub async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await?;
    anyhow::ensure!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(String::from_utf8(output.stdout)?.trim_end().to_string())
}

/// Runs git in `dir` and reports only whether it succeeded.
pub async fn git_succeeds(dir: &Path, args: &[&str]) -> anyhow::Result<bool> {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    Ok(status.success())
}

/// Sets the identity and signing config needed for commits.
pub async fn configure_identity(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["config", "user.name", "Test User"]).await?;
    git(dir, &["config", "user.email", "test@example.com"]).await?;
    git(dir, &["config", "commit.gpgsign", "false"]).await?;
    Ok(())
}

/// Creates a git repository on branch `main` in the given directory.
///
/// The directory should already exist.
pub async fn create_git_repo(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["init", "--quiet"]).await?;
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]).await?;
    configure_identity(dir).await?;
    Ok(())
}

/// Creates a bare repository whose default branch is `main`.
pub async fn create_bare_repo(dir: &Path) -> anyhow::Result<()> {
    git(dir, &["init", "--quiet", "--bare"]).await?;
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]).await?;
    Ok(())
}

/// Sets up a git remote origin for the repository.
pub async fn setup_git_remote(dir: &Path, remote_url: &Path) -> anyhow::Result<()> {
    git(dir, &["remote", "add", "origin", &remote_url.to_string_lossy()]).await?;
    Ok(())
}

/// Clones `remote` into `dir`, ready to commit.
pub async fn clone_repo(remote: &Path, dir: &Path) -> anyhow::Result<()> {
    let parent = dir.parent().unwrap_or(dir);
    git(
        parent,
        &[
            "clone",
            "--quiet",
            &remote.to_string_lossy(),
            &dir.to_string_lossy(),
        ],
    )
    .await?;
    configure_identity(dir).await?;
    Ok(())
}

/// Writes a file and commits it.
pub async fn commit_file(
    dir: &Path,
    filename: &str,
    contents: &str,
    message: &str,
) -> anyhow::Result<()> {
    tokio::fs::write(dir.join(filename), contents).await?;
    git(dir, &["add", filename]).await?;
    git(dir, &["commit", "--quiet", "-m", message]).await?;
    Ok(())
}

/// Commit subjects reachable from HEAD, newest first.
pub async fn log_subjects(dir: &Path) -> anyhow::Result<Vec<String>> {
    let log = git(dir, &["log", "--format=%s"]).await?;
    Ok(log.lines().map(|line| line.to_string()).collect())
}

/// Files touched by a single commit, including a root commit.
pub async fn commit_files(dir: &Path, revision: &str) -> anyhow::Result<Vec<String>> {
    let files = git(
        dir,
        &[
            "diff-tree",
            "--root",
            "--no-commit-id",
            "--name-only",
            "-r",
            revision,
        ],
    )
    .await?;
    Ok(files.lines().map(|line| line.to_string()).collect())
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_test_writer()
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
