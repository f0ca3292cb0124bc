use crate::areas::config::PAGE_EXTENSION;
use crate::areas::editor::Editor;
use crate::artifacts::errors::RemoteResult;
use crate::artifacts::paths;
use crate::remote::RemoteRepository;

impl<R: RemoteRepository> Editor<R> {
    /// Markdown pages under the docs root on the listing branch, sorted
    pub async fn page_paths(&mut self) -> RemoteResult<Vec<String>> {
        let docs_root = self.config().docs_root.clone();

        self.files_under(&docs_root, |path| path.ends_with(PAGE_EXTENSION))
            .await
    }

    /// Every file under the assets directory, sorted
    pub async fn asset_paths(&mut self) -> RemoteResult<Vec<String>> {
        let assets_dir = self.config().assets_dir.clone();

        self.files_under(&assets_dir, |_| true).await
    }

    pub async fn list_pages(&mut self) -> anyhow::Result<()> {
        let pages = self.page_paths().await?;
        if pages.is_empty() {
            writeln!(
                self.writer(),
                "no pages under {}",
                self.config().docs_root
            )?;
        }
        for page in pages {
            writeln!(self.writer(), "{}", page)?;
        }

        Ok(())
    }

    pub async fn list_assets(&mut self) -> anyhow::Result<()> {
        let assets = self.asset_paths().await?;
        if assets.is_empty() {
            writeln!(
                self.writer(),
                "no assets under {}",
                self.config().assets_dir
            )?;
        }
        for asset in assets {
            writeln!(self.writer(), "{}", asset)?;
        }

        Ok(())
    }

    async fn files_under(
        &mut self,
        root: &str,
        keep: impl Fn(&str) -> bool,
    ) -> RemoteResult<Vec<String>> {
        let branch = self.config().branch.clone();
        let (cache, remote) = self.cache_and_remote();
        let listing = cache.get(remote, &branch).await?;

        let mut files = listing
            .iter()
            .filter(|entry| entry.is_file())
            .filter(|entry| paths::is_under(root, &entry.path) && keep(&entry.path))
            .map(|entry| entry.path.clone())
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }
}
