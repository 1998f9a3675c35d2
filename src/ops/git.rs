#![allow(async_fn_in_trait)]

use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;
use std::process::Output;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use log::debug;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations for interacting with Git
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Whether the directory is inside a git repository at all.
    async fn is_repository(&self) -> Result<bool>;
    async fn is_bare(&self) -> Result<bool>;

    /// False inside the git dir itself, where there is no working copy.
    async fn is_inside_work_tree(&self) -> Result<bool>;
    async fn work_tree_root(&self) -> Result<PathBuf>;

    /// Name of the checked out branch. Fails on a detached HEAD.
    async fn current_branch(&self) -> Result<String>;

    /// Stage `path`, given relative to the working-copy root.
    async fn add_path(&self, path: &Path) -> Result<()>;
    async fn add_all(&self) -> Result<()>;

    /// Check if the index differs from HEAD.
    /// On an unborn branch every staged file counts as a change.
    async fn has_staged_changes(&self) -> Result<bool>;
    async fn untracked_files(&self) -> Result<Vec<String>>;

    /// Commit the whole index.
    async fn commit(&self, message: &str) -> Result<CommitId>;

    /// Commit only `path` (relative to the working-copy root), leaving
    /// anything else in the index staged.
    async fn commit_path(&self, path: &Path, message: &str) -> Result<CommitId>;

    async fn fetch(&self, remote: &str, branch: &str) -> Result<()>;
    async fn rebase(&self, upstream: &str) -> Result<()>;

    /// Whether a rebase has stopped part way, e.g. on a conflict.
    async fn rebase_in_progress(&self) -> Result<bool>;
    async fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Decorated one-line graph of all branches.
    async fn log_graph(&self) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitId(pub String);

impl Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit {
    path: PathBuf,
}

impl RealGit {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        debug!("git {}", args.join(" "));
        Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .output()
            .await
            .context("Failed to execute git command")
    }

    /// Run git and return its trimmed stdout, failing with git's stderr.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        Ok(String::from_utf8(output.stdout)?.trim_end().to_string())
    }

    async fn head(&self) -> Result<CommitId> {
        Ok(CommitId(self.run(&["rev-parse", "HEAD"]).await?))
    }

    async fn git_path_exists(&self, name: &str) -> Result<bool> {
        let git_path = self.run(&["rev-parse", "--git-path", name]).await?;
        // Relative paths are resolved against the directory git ran in
        Ok(tokio::fs::try_exists(self.path.join(git_path)).await?)
    }
}

/// Pathspec anchored at the working-copy root, whatever directory git runs in.
fn top_pathspec(path: &Path) -> String {
    format!(":(top){}", path.display())
}

impl GitOps for RealGit {
    #[instrument(skip(self))]
    async fn is_repository(&self) -> Result<bool> {
        let output = self.output(&["rev-parse", "--git-dir"]).await?;
        Ok(output.status.success())
    }

    #[instrument(skip(self))]
    async fn is_bare(&self) -> Result<bool> {
        Ok(self.run(&["rev-parse", "--is-bare-repository"]).await? == "true")
    }

    #[instrument(skip(self))]
    async fn is_inside_work_tree(&self) -> Result<bool> {
        Ok(self.run(&["rev-parse", "--is-inside-work-tree"]).await? == "true")
    }

    #[instrument(skip(self))]
    async fn work_tree_root(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(
            self.run(&["rev-parse", "--show-toplevel"]).await?,
        ))
    }

    #[instrument(skip(self))]
    async fn current_branch(&self) -> Result<String> {
        let output = self
            .output(&["symbolic-ref", "--quiet", "--short", "HEAD"])
            .await?;

        // Exit code 1 means HEAD is not a symbolic ref
        if !output.status.success() {
            bail!("HEAD is detached. Check out a branch first.");
        }

        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    #[instrument(skip(self))]
    async fn add_path(&self, path: &Path) -> Result<()> {
        self.run(&["add", "--", &top_pathspec(path)]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_all(&self) -> Result<()> {
        self.run(&["add", "--all"]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn has_staged_changes(&self) -> Result<bool> {
        let output = self.output(&["diff", "--cached", "--quiet"]).await?;

        // --quiet implies --exit-code: 0 means no changes, 1 means changes
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => bail!(
                "git diff failed: {}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            ),
        }
    }

    #[instrument(skip(self))]
    async fn untracked_files(&self) -> Result<Vec<String>> {
        let output = self
            .run(&["ls-files", "--others", "--exclude-standard"])
            .await?;

        Ok(output.lines().map(|line| line.to_string()).collect())
    }

    #[instrument(skip(self))]
    async fn commit(&self, message: &str) -> Result<CommitId> {
        self.run(&["commit", "--quiet", "-m", message]).await?;
        self.head().await
    }

    #[instrument(skip(self))]
    async fn commit_path(&self, path: &Path, message: &str) -> Result<CommitId> {
        let pathspec = top_pathspec(path);
        self.run(&["commit", "--quiet", "-m", message, "--only", "--", &pathspec])
            .await?;
        self.head().await
    }

    #[instrument(skip(self))]
    async fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", remote, branch]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rebase(&self, upstream: &str) -> Result<()> {
        self.run(&["rebase", upstream]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rebase_in_progress(&self) -> Result<bool> {
        // rebase-merge for the merge backend, rebase-apply for the apply backend
        Ok(self.git_path_exists("rebase-merge").await?
            || self.git_path_exists("rebase-apply").await?)
    }

    #[instrument(skip(self))]
    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn log_graph(&self) -> Result<String> {
        self.run(&["log", "--oneline", "--graph", "--all", "--decorate"])
            .await
    }
}
