use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docs_editor::areas::config::Config;
use docs_editor::areas::editor::Editor;
use docs_editor::remote::github::GitHubClient;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "docs-editor",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Edit documentation in a remote repository",
    long_about = "This tool edits the Markdown pages and assets of a documentation site \
    hosted in a remote repository, without a local checkout. \
    Changes are committed directly, or proposed as pull requests when the target branch is protected. \
    Configuration is read from DOCS_EDITOR_* environment variables.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "check",
        about = "Test the connection",
        long_about = "This command verifies the credential, access to the repository and the existence of the base branch."
    )]
    Check,
    #[command(
        name = "pages",
        about = "List documentation pages",
        long_about = "This command lists every Markdown page under the docs root."
    )]
    Pages,
    #[command(
        name = "assets",
        about = "List documentation assets",
        long_about = "This command lists every file under the assets directory."
    )]
    Assets,
    #[command(
        name = "show",
        about = "Print a page",
        long_about = "This command prints the content of a file on the listing branch."
    )]
    Show {
        #[arg(index = 1, help = "The repository path of the page")]
        path: String,
    },
    #[command(
        name = "edit",
        about = "Replace the content of a page",
        long_about = "This command replaces the content of an existing page. \
        The new content is read from a file, or from stdin when no file is given."
    )]
    Edit {
        #[arg(index = 1, help = "The repository path of the page")]
        path: String,
        #[arg(short, long, help = "File holding the new content")]
        file: Option<PathBuf>,
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "create",
        about = "Create a new page",
        long_about = "This command creates a new page at a path relative to the docs root. \
        Without a content file the page starts with its title and a placeholder paragraph."
    )]
    Create {
        #[arg(index = 1, help = "The page path, relative to the docs root")]
        path: String,
        #[arg(short, long, help = "The page title")]
        title: String,
        #[arg(short, long, help = "File holding the page content")]
        file: Option<PathBuf>,
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "upload",
        about = "Upload an asset",
        long_about = "This command uploads a local file to the assets directory, \
        replacing any file already stored under the same name."
    )]
    Upload {
        #[arg(index = 1, help = "The local file to upload")]
        file: PathBuf,
        #[arg(short, long, help = "Target name, relative to the assets directory")]
        name: Option<String>,
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "delete",
        about = "Delete a page",
        long_about = "This command deletes a page. It requires --yes to confirm."
    )]
    Delete {
        #[arg(index = 1, help = "The repository path of the page")]
        path: String,
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
        #[arg(short, long, required = false, help = "Confirm the deletion")]
        yes: bool,
    },
}

fn read_body(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("could not read content from stdin")?;
            Ok(body)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load_from_env()?;
    let remote = GitHubClient::new(&config)?;
    let mut editor = Editor::new(config, remote, Box::new(std::io::stdout()));

    match &cli.command {
        Commands::Check => editor.check().await?,
        Commands::Pages => editor.list_pages().await?,
        Commands::Assets => editor.list_assets().await?,
        Commands::Show { path } => editor.show(path).await?,
        Commands::Edit {
            path,
            file,
            message,
        } => {
            let body = read_body(file.as_deref())?;
            editor.edit_page(path, body, message.as_deref()).await?;
        }
        Commands::Create {
            path,
            title,
            file,
            message,
        } => {
            let body = file.as_deref().map(|file| read_body(Some(file))).transpose()?;
            editor
                .create_page(path, title, body, message.as_deref())
                .await?;
        }
        Commands::Upload {
            file,
            name,
            message,
        } => {
            let data =
                std::fs::read(file).with_context(|| format!("could not read {}", file.display()))?;
            let name = match name {
                Some(name) => name.clone(),
                None => file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .with_context(|| format!("{} has no file name", file.display()))?,
            };
            editor
                .upload_asset(&name, data, message.as_deref())
                .await?;
        }
        Commands::Delete { path, message, yes } => {
            editor.delete_page(path, message.as_deref(), *yes).await?;
        }
    }

    Ok(())
}
