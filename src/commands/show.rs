use crate::areas::editor::Editor;
use crate::artifacts::objects::remote_file::{Content, RemoteFile};
use crate::artifacts::paths;
use crate::remote::RemoteRepository;
use anyhow::Context;

impl<R: RemoteRepository> Editor<R> {
    /// Fetch a file from the listing branch
    pub async fn fetch(&self, path: &str) -> anyhow::Result<RemoteFile> {
        let path = paths::normalize(path);
        let branch = &self.config().branch;

        self.remote()
            .read_file(&path, branch)
            .await
            .with_context(|| format!("could not read {path}"))
    }

    /// Print a page's decoded text
    pub async fn show(&self, path: &str) -> anyhow::Result<()> {
        let file = self.fetch(path).await?;

        match &file.content {
            Content::Text(text) => write!(self.writer(), "{}", text)?,
            Content::Binary(bytes) => writeln!(
                self.writer(),
                "{} is binary ({} bytes, {})",
                file.path,
                bytes.len(),
                file.hash.to_short_hash()
            )?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::config::Config;
    use crate::areas::editor::Editor;
    use crate::remote::memory::MemoryRemote;
    use crate::test_support::SharedBuffer;
    use pretty_assertions::assert_eq;

    fn editor(buffer: SharedBuffer) -> Editor<MemoryRemote> {
        let remote = MemoryRemote::new("acme/handbook", "main");
        remote.seed("main", &[("docs/index.md", "# Home\n\nWelcome.\n")]);
        remote.seed("main", &[("docs/assets/logo.png", vec![0x89u8, 0x50, 0xff])]);

        Editor::new(
            Config::new("t0ken", "acme/handbook"),
            remote,
            Box::new(buffer),
        )
    }

    #[tokio::test]
    async fn show_prints_page_text() {
        let buffer = SharedBuffer::default();

        editor(buffer.clone()).show("/docs/index.md").await.unwrap();

        assert_eq!(buffer.text(), "# Home\n\nWelcome.\n");
    }

    #[tokio::test]
    async fn show_summarizes_binary_files() {
        let buffer = SharedBuffer::default();

        editor(buffer.clone())
            .show("docs/assets/logo.png")
            .await
            .unwrap();

        assert!(buffer.text().starts_with("docs/assets/logo.png is binary (3 bytes, "));
    }

    #[tokio::test]
    async fn show_of_missing_page_names_the_path() {
        let error = editor(SharedBuffer::default())
            .show("docs/missing.md")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "could not read docs/missing.md");
    }
}
