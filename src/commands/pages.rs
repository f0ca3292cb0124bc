//! Page and asset edits
//!
//! Each entry point turns user input into a [`ChangeRequest`] against the
//! configured base branch, runs it through the submitter and reports where the
//! change landed.

use crate::areas::editor::Editor;
use crate::artifacts::change::outcome::SubmitOutcome;
use crate::artifacts::change::request::ChangeRequest;
use crate::artifacts::paths;
use crate::remote::RemoteRepository;
use colored::Colorize;

/// Starting body of a page created without explicit content
pub fn default_page_body(title: &str) -> String {
    format!("# {title}\n\nWrite your content here.\n")
}

impl<R: RemoteRepository> Editor<R> {
    /// Create a page at `relative_path` under the docs root
    pub async fn create_page(
        &mut self,
        relative_path: &str,
        title: &str,
        body: Option<String>,
        message: Option<&str>,
    ) -> anyhow::Result<SubmitOutcome> {
        let path = paths::join(&self.config().docs_root, relative_path);
        let body = body.unwrap_or_else(|| default_page_body(title));
        let request = ChangeRequest::create(
            path,
            body,
            message.unwrap_or_default(),
            self.config().base_branch(),
        );

        let outcome = self.submit(request).await?;
        self.report(&outcome)?;
        writeln!(
            self.writer(),
            "remember to add {} to the site navigation",
            outcome.path()
        )?;

        Ok(outcome)
    }

    /// Replace the content of an existing page
    pub async fn edit_page(
        &mut self,
        path: &str,
        body: String,
        message: Option<&str>,
    ) -> anyhow::Result<SubmitOutcome> {
        let request = ChangeRequest::update(
            path,
            body,
            message.unwrap_or_default(),
            self.config().base_branch(),
        );

        let outcome = self.submit(request).await?;
        self.report(&outcome)?;

        Ok(outcome)
    }

    /// Delete a page; refuses to run unless `confirmed`
    pub async fn delete_page(
        &mut self,
        path: &str,
        message: Option<&str>,
        confirmed: bool,
    ) -> anyhow::Result<SubmitOutcome> {
        if !confirmed {
            anyhow::bail!("refusing to delete {} without confirmation", path);
        }

        let request =
            ChangeRequest::delete(path, message.unwrap_or_default(), self.config().base_branch());

        let outcome = self.submit(request).await?;
        self.report(&outcome)?;

        Ok(outcome)
    }

    /// Store `data` as `name` under the assets directory, replacing any existing file
    pub async fn upload_asset(
        &mut self,
        name: &str,
        data: Vec<u8>,
        message: Option<&str>,
    ) -> anyhow::Result<SubmitOutcome> {
        let path = paths::join(&self.config().assets_dir, name);
        let request = ChangeRequest::upload(
            path,
            data,
            message.unwrap_or_default(),
            self.config().base_branch(),
        );

        let outcome = self.submit(request).await?;
        self.report(&outcome)?;

        let link = paths::relative_to(&self.config().docs_root, outcome.path());
        writeln!(self.writer(), "use it in Markdown like:")?;
        writeln!(self.writer(), "![Alt text]({})", link)?;

        Ok(outcome)
    }

    fn report(&self, outcome: &SubmitOutcome) -> anyhow::Result<()> {
        match outcome {
            SubmitOutcome::Committed {
                operation,
                path,
                branch,
                hash,
            } => {
                let hash = hash
                    .as_ref()
                    .map(|hash| format!(" ({})", hash.to_short_hash()))
                    .unwrap_or_default();
                writeln!(
                    self.writer(),
                    "{} {} {} on {}{}",
                    "committed".green(),
                    operation,
                    path,
                    branch,
                    hash
                )?;
            }
            SubmitOutcome::PullRequestOpened {
                operation,
                path,
                branch,
                pull_request,
            } => {
                writeln!(
                    self.writer(),
                    "{} {} {} on {} into {}",
                    "proposed".green(),
                    operation,
                    path,
                    branch.name,
                    branch.base
                )?;
                writeln!(self.writer(), "pull request: {}", pull_request.url)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::config::Config;
    use crate::artifacts::errors::{ErrorKind, SubmitError};
    use crate::artifacts::objects::remote_file::Content;
    use crate::remote::memory::MemoryRemote;
    use crate::test_support::SharedBuffer;
    use fake::Fake;
    use fake::faker::lorem::en::Paragraph;
    use pretty_assertions::assert_eq;

    fn editor(config: Config, buffer: SharedBuffer) -> Editor<MemoryRemote> {
        colored::control::set_override(false);
        let remote = MemoryRemote::new("acme/handbook", "main");
        remote.seed("main", &[("docs/index.md", "# Home\n")]);

        Editor::new(config, remote, Box::new(buffer))
    }

    #[tokio::test]
    async fn created_page_gets_default_body_and_reminder() {
        let buffer = SharedBuffer::default();
        let mut editor = editor(Config::new("t0ken", "acme/handbook"), buffer.clone());

        editor
            .create_page("user-guide/intro.md", "Intro", None, None)
            .await
            .unwrap();

        assert_eq!(
            editor.remote().file("main", "docs/user-guide/intro.md"),
            Some(Content::from("# Intro\n\nWrite your content here.\n"))
        );
        let output = buffer.text();
        assert!(output.starts_with("committed create docs/user-guide/intro.md on main ("));
        assert!(output.ends_with("remember to add docs/user-guide/intro.md to the site navigation\n"));
    }

    #[tokio::test]
    async fn edited_page_keeps_supplied_body() {
        let mut editor = editor(Config::new("t0ken", "acme/handbook"), SharedBuffer::default());
        let body: String = Paragraph(3..6).fake();

        editor
            .edit_page("docs/index.md", body.clone(), Some("Reword home"))
            .await
            .unwrap();

        assert_eq!(
            editor.remote().file("main", "docs/index.md"),
            Some(Content::from(body))
        );
        assert_eq!(
            editor.remote().commit_log().last().map(|c| c.message.clone()),
            Some("Reword home".to_string())
        );
    }

    #[tokio::test]
    async fn upload_prints_link_relative_to_docs_root() {
        let buffer = SharedBuffer::default();
        let mut editor = editor(Config::new("t0ken", "acme/handbook"), buffer.clone());

        editor
            .upload_asset("diagrams/flow.png", vec![1, 2, 3], None)
            .await
            .unwrap();

        assert!(editor.remote().file("main", "docs/assets/diagrams/flow.png").is_some());
        assert!(buffer.text().ends_with("![Alt text](assets/diagrams/flow.png)\n"));
    }

    #[tokio::test]
    async fn unconfirmed_delete_does_not_reach_the_remote() {
        let mut editor = editor(Config::new("t0ken", "acme/handbook"), SharedBuffer::default());

        let error = editor
            .delete_page("docs/index.md", None, false)
            .await
            .unwrap_err();

        assert!(error.to_string().contains("without confirmation"));
        assert!(editor.remote().calls().is_empty());
    }

    #[tokio::test]
    async fn protected_delete_reports_pull_request() {
        let buffer = SharedBuffer::default();
        let mut config = Config::new("t0ken", "acme/handbook");
        config.protected_branch = Some("main".to_string());
        let mut editor = editor(config, buffer.clone());

        editor
            .delete_page("docs/index.md", None, true)
            .await
            .unwrap();

        let output = buffer.text();
        assert!(output.starts_with("proposed delete docs/index.md on docs-edit-"));
        assert!(output.ends_with("pull request: https://github.com/acme/handbook/pull/1\n"));
    }

    #[tokio::test]
    async fn create_escaping_docs_root_is_rejected() {
        let mut editor = editor(Config::new("t0ken", "acme/handbook"), SharedBuffer::default());

        let error = editor
            .create_page("../outside.md", "Outside", None, None)
            .await
            .unwrap_err();

        let error = error.downcast::<SubmitError>().unwrap();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }
}
