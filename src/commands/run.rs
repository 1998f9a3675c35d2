use anyhow::Result;
use anyhow::bail;
use colored::Colorize;

use crate::App;
use crate::ops::git::GitOps;

impl<G: GitOps> App<G> {
    /// Commit everything, rebase onto upstream, push, and show the graph.
    ///
    /// Steps run one after the other and the first failure aborts the rest.
    /// Nothing already done is rolled back.
    pub async fn cmd_run(&self, message: &str, stdout: &mut impl std::io::Write) -> Result<()> {
        if message.trim().is_empty() {
            bail!("Commit message must not be empty");
        }

        let root = self.open_repository().await?;
        let branch = self.git.current_branch().await?;
        writeln!(stdout, "Current branch: {}", branch.cyan())?;

        self.ensure_ignore_file(&root, stdout).await?;
        self.commit_all(message, stdout).await?;
        self.rebase_onto_upstream(&branch, stdout).await?;

        writeln!(
            stdout,
            "Pushing {} to {}",
            branch.cyan(),
            self.config.remote.cyan()
        )?;
        self.git.push(&self.config.remote, &branch).await?;

        let graph = self.git.log_graph().await?;
        writeln!(stdout)?;
        writeln!(stdout, "{}", "Commit graph:".bold())?;
        writeln!(stdout, "{}", graph)?;

        writeln!(stdout)?;
        writeln!(
            stdout,
            "Done: {} rebased onto {} and pushed",
            branch.cyan(),
            self.config.upstream_ref().cyan()
        )?;

        Ok(())
    }
}
