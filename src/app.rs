use std::path::PathBuf;

use anyhow::Result;
use anyhow::bail;
use colored::Colorize;
use log::warn;

use crate::config::Config;
use crate::ops::git::CommitId;
use crate::ops::git::GitOps;

pub struct App<G: GitOps> {
    pub config: Config,
    pub git: G,
}

impl<G: GitOps> App<G> {
    pub fn new(config: Config, git: G) -> Self {
        Self { config, git }
    }
}

/// Shared helper methods for App
impl<G: GitOps> App<G> {
    /// Validate that we are inside a non-bare working copy and return its root
    pub(crate) async fn open_repository(&self) -> Result<PathBuf> {
        if !self.git.is_repository().await?
            || self.git.is_bare().await?
            || !self.git.is_inside_work_tree().await?
        {
            bail!("No git repository found here.");
        }

        self.git.work_tree_root().await
    }

    /// Create and commit the ignore-file if it does not exist yet.
    /// Returns the new commit, or None if the file was already there.
    pub(crate) async fn ensure_ignore_file(
        &self,
        root: &std::path::Path,
        stdout: &mut impl std::io::Write,
    ) -> Result<Option<CommitId>> {
        let path = root.join(&self.config.ignore_file);
        if tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }

        let name = self.config.ignore_file.display();
        writeln!(stdout, "Creating {}", name)?;
        tokio::fs::write(&path, &self.config.ignore_file_content).await?;

        self.git.add_path(&self.config.ignore_file).await?;
        let commit = self
            .git
            .commit_path(
                &self.config.ignore_file,
                &self.config.ignore_file_commit_message,
            )
            .await?;
        writeln!(stdout, "Committed {}: {}", name, commit)?;

        Ok(Some(commit))
    }

    /// Stage everything and commit it, unless there is nothing to commit
    pub(crate) async fn commit_all(
        &self,
        message: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<Option<CommitId>> {
        self.git.add_all().await?;
        writeln!(stdout, "Staged all changes")?;

        let has_changes = self.git.has_staged_changes().await?
            || !self.git.untracked_files().await?.is_empty();
        if !has_changes {
            writeln!(stdout, "Nothing to commit")?;
            return Ok(None);
        }

        let commit = self.git.commit(message).await?;
        writeln!(stdout, "Committed changes: {} ({})", message, commit)?;

        Ok(Some(commit))
    }

    /// Fetch the upstream branch and rebase `branch` onto it
    pub(crate) async fn rebase_onto_upstream(
        &self,
        branch: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let upstream = self.config.upstream_ref();
        writeln!(
            stdout,
            "Rebasing {} onto {}",
            branch.cyan(),
            upstream.cyan()
        )?;

        self.git
            .fetch(&self.config.remote, &self.config.upstream_branch)
            .await?;

        if let Err(err) = self.git.rebase(&upstream).await {
            // The rebase is left in place for the user to resolve
            if matches!(self.git.rebase_in_progress().await, Ok(true)) {
                warn!("rebase of {} onto {} stopped part way", branch, upstream);
                return Err(err.context(format!(
                    "Rebase of {} onto {} stopped with conflicts. Resolve them and run 'git rebase --continue', or run 'git rebase --abort'.",
                    branch, upstream
                )));
            }
            return Err(err);
        }

        Ok(())
    }
}
