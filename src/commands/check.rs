use crate::areas::editor::Editor;
use crate::remote::RemoteRepository;
use anyhow::Context;
use colored::Colorize;

impl<R: RemoteRepository> Editor<R> {
    /// Verify the credential, repository access and base branch in that order
    pub async fn check(&self) -> anyhow::Result<()> {
        let user = self
            .remote()
            .authenticated_user()
            .await
            .context("could not authenticate")?;
        writeln!(self.writer(), "{} authenticated as {}", "ok".green(), user)?;

        let repository = self
            .remote()
            .repository_name()
            .await
            .context("could not access repository")?;
        writeln!(self.writer(), "{} repository {}", "ok".green(), repository)?;

        let base = self.config().base_branch();
        let head = self
            .remote()
            .branch_head(base)
            .await
            .with_context(|| format!("could not resolve branch {base}"))?;
        writeln!(
            self.writer(),
            "{} branch {} at {}",
            "ok".green(),
            base,
            head.to_short_hash()
        )?;

        if let Some(protected) = &self.config().protected_branch {
            writeln!(
                self.writer(),
                "changes are proposed as pull requests into {}",
                protected
            )?;
        } else {
            writeln!(self.writer(), "changes are committed directly to {}", base)?;
        }

        Ok(())
    }
}
