use crate::common::fake_github::{self, FakeGitHub, REPO, TOKEN};
use assert_cmd::Command;
use docs_editor::remote::memory::MemoryRemote;
use rstest::fixture;

pub const HOME_PAGE: &str = "# Home\n\nWelcome to the handbook.\n";
pub const SETUP_PAGE: &str = "# Setup\n\nInstall the tools.\n";

fn seeded_remote() -> MemoryRemote {
    let remote = MemoryRemote::new(REPO, "main");
    remote.seed(
        "main",
        &[
            ("README.md", "# Handbook\n"),
            ("mkdocs.yml", "site_name: Handbook\n"),
            ("docs/index.md", HOME_PAGE),
            ("docs/guide/setup.md", SETUP_PAGE),
            ("docs/old.md", "# Old\n"),
        ],
    );
    remote.seed("main", &[("docs/assets/logo.png", vec![0x89u8, 0x50, 0x4e, 0x47])]);
    remote
}

/// Fake API over a small handbook on `main`
#[fixture]
pub fn github() -> FakeGitHub {
    fake_github::start(seeded_remote())
}

/// Command for the editor binary wired to `github`, committing directly to `main`
pub fn run_docs_editor_command(github: &FakeGitHub, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("docs-editor").expect("Failed to find docs-editor binary");
    cmd.env_clear();
    cmd.envs(vec![
        ("DOCS_EDITOR_TOKEN", TOKEN),
        ("DOCS_EDITOR_REPO", REPO),
        ("DOCS_EDITOR_API_URL", github.url.as_str()),
        ("DOCS_EDITOR_TIMEOUT_SECS", "5"),
        ("NO_COLOR", "1"),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Same as [`run_docs_editor_command`] with `main` protected
pub fn run_protected_docs_editor_command(github: &FakeGitHub, args: &[&str]) -> Command {
    let mut cmd = run_docs_editor_command(github, args);
    cmd.env("DOCS_EDITOR_PROTECTED_BRANCH", "main");
    cmd
}

/// Messages of every commit landed on `branch`
pub fn commit_messages(github: &FakeGitHub, branch: &str) -> Vec<String> {
    github
        .remote
        .commit_log()
        .into_iter()
        .filter(|commit| commit.branch == branch)
        .map(|commit| commit.message)
        .collect()
}
