//! Editor configuration
//!
//! Built once at start-up and passed by reference to every component; nothing
//! else reads the environment.

use anyhow::Context;
use derive_new::new;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);
pub const PAGE_EXTENSION: &str = ".md";

/// Identity recorded on every commit the editor makes
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Where a submission lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    /// Commit straight onto the branch
    Direct { branch: String },
    /// Stage on an ephemeral branch and open a pull request into `base`
    PullRequest { base: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    /// `owner/name`
    pub repo: String,
    /// Branch pages are listed from and, without a protected branch, committed to
    pub branch: String,
    /// When set, changes go through pull requests into this branch
    pub protected_branch: Option<String>,
    pub pr_title_prefix: String,
    pub docs_root: String,
    pub assets_dir: String,
    pub committer: Committer,
    pub api_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn new(token: impl Into<String>, repo: impl Into<String>) -> Self {
        Config {
            token: token.into(),
            repo: repo.into(),
            branch: "main".to_string(),
            protected_branch: None,
            pr_title_prefix: "docs".to_string(),
            docs_root: "docs".to_string(),
            assets_dir: "docs/assets".to_string(),
            committer: Committer::new(
                "Docs Editor Bot".to_string(),
                "docs-editor@example.com".to_string(),
            ),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn load_from_env() -> anyhow::Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source; empty values count as unset
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = var("DOCS_EDITOR_TOKEN").context("DOCS_EDITOR_TOKEN not set")?;
        let repo = var("DOCS_EDITOR_REPO").context("DOCS_EDITOR_REPO not set")?;
        if repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
            anyhow::bail!("DOCS_EDITOR_REPO must look like owner/name, got '{}'", repo);
        }

        let mut config = Config::new(token, repo);

        if let Some(branch) = var("DOCS_EDITOR_BRANCH") {
            config.branch = branch;
        }
        config.protected_branch = var("DOCS_EDITOR_PROTECTED_BRANCH");
        if let Some(prefix) = var("DOCS_EDITOR_PR_PREFIX") {
            config.pr_title_prefix = prefix;
        }
        if let Some(docs_root) = var("DOCS_EDITOR_DOCS_ROOT") {
            config.docs_root = docs_root;
        }
        if let Some(assets_dir) = var("DOCS_EDITOR_ASSETS_DIR") {
            config.assets_dir = assets_dir;
        }
        if let Some(name) = var("DOCS_EDITOR_COMMITTER_NAME") {
            config.committer.name = name;
        }
        if let Some(email) = var("DOCS_EDITOR_COMMITTER_EMAIL") {
            config.committer.email = email;
        }
        if let Some(api_url) = var("DOCS_EDITOR_API_URL") {
            config.api_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = var("DOCS_EDITOR_TIMEOUT_SECS") {
            config.timeout = parse_seconds("DOCS_EDITOR_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(ttl) = var("DOCS_EDITOR_CACHE_TTL_SECS") {
            config.cache_ttl = parse_seconds("DOCS_EDITOR_CACHE_TTL_SECS", &ttl)?;
        }

        Ok(config)
    }

    pub fn submit_mode(&self) -> SubmitMode {
        match &self.protected_branch {
            Some(base) => SubmitMode::PullRequest { base: base.clone() },
            None => SubmitMode::Direct {
                branch: self.branch.clone(),
            },
        }
    }

    /// Branch every change request is based on
    pub fn base_branch(&self) -> &str {
        self.protected_branch.as_deref().unwrap_or(&self.branch)
    }
}

fn parse_seconds(key: &str, value: &str) -> anyhow::Result<Duration> {
    let seconds = value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of seconds, got '{value}'"))?;
    Ok(Duration::from_secs(seconds))
}
