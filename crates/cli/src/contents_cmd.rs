use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use repoedit_api_client::cancellable;
use repoedit_core::{ContentError, MutationResult, RevisionTag};
use tracing::debug;

use crate::output::{self, OutputFormat};
use crate::remote::{Remote, parse_repo};

#[derive(Debug, Clone, Args)]
pub struct LsArgs {
    /// Repository as `owner/name` or a github.com URL.
    pub repo: String,
    /// Directory inside the repository (root when omitted).
    #[arg(default_value = "")]
    pub path: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct CatArgs {
    pub repo: String,
    pub path: String,
    /// Print the file's revision tag to stderr.
    #[arg(long)]
    pub show_sha: bool,
}

#[derive(Debug, Clone, Args)]
pub struct PutArgs {
    pub repo: String,
    pub path: String,
    /// Read new content from this file instead of stdin.
    #[arg(long, short)]
    pub file: Option<PathBuf>,
    /// Commit message (defaults to the configured template).
    #[arg(long, short)]
    pub message: Option<String>,
    /// Revision tag the edit is based on.
    #[arg(long, conflicts_with = "create")]
    pub sha: Option<String>,
    /// Only create; fail if the path already exists.
    #[arg(long)]
    pub create: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RmArgs {
    pub repo: String,
    pub path: String,
    /// Revision tag being deleted (fetched first when omitted).
    #[arg(long)]
    pub sha: Option<String>,
    #[arg(long, short)]
    pub message: Option<String>,
}

pub async fn run_ls(args: LsArgs) -> Result<()> {
    let repo = parse_repo(&args.repo)?;
    let remote = Remote::connect()?;
    let entries = cancellable(
        &remote.interrupt.token(),
        remote.client.list(&remote.session, &repo, &args.path),
    )
    .await
    .with_context(|| format!("list {repo}:{}", display_path(&args.path)))?;
    output::print_entries(&entries, args.format)
}

pub async fn run_cat(args: CatArgs) -> Result<()> {
    let repo = parse_repo(&args.repo)?;
    let remote = Remote::connect()?;
    let file = cancellable(
        &remote.interrupt.token(),
        remote.client.read(&remote.session, &repo, &args.path),
    )
    .await
    .with_context(|| format!("read {repo}:{}", args.path))?;

    if args.show_sha {
        eprintln!("revision: {}", file.revision_tag);
    }
    let text = file
        .text()
        .map_err(ContentError::from)
        .with_context(|| format!("read {repo}:{}", args.path))?;
    print!("{text}");
    Ok(())
}

pub async fn run_put(args: PutArgs) -> Result<()> {
    let repo = parse_repo(&args.repo)?;
    let text = read_input(args.file.as_ref())?;
    let remote = Remote::connect()?;
    let message = args
        .message
        .clone()
        .unwrap_or_else(|| remote.config.editor.commit_message(&args.path));
    let (client, session, interrupt) = (&remote.client, &remote.session, &remote.interrupt);

    let base = if args.create {
        None
    } else if let Some(sha) = &args.sha {
        Some(RevisionTag::new(sha.clone()))
    } else {
        let token = interrupt.token();
        let current = cancellable(&token, client.read(session, &repo, &args.path));
        match current.await {
            Ok(current) => {
                if current.text().ok() == Some(text.as_str()) {
                    println!("{} is unchanged; nothing to commit.", args.path);
                    return Ok(());
                }
                Some(current.revision_tag)
            }
            Err(ContentError::NotFound { .. }) => {
                debug!(%repo, path = %args.path, "no current revision, creating");
                None
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read {repo}:{}", args.path));
            }
        }
    };

    let result = match &base {
        None => cancellable(
            &interrupt.token(),
            client.create(session, &repo, &args.path, &text, &message),
        )
        .await
        .with_context(|| format!("create {repo}:{}", args.path))?,
        Some(tag) => cancellable(
            &interrupt.token(),
            client.update(session, &repo, &args.path, &text, &message, tag),
        )
        .await
        .with_context(|| format!("update {repo}:{}", args.path))?,
    };

    let verb = if base.is_some() { "Updated" } else { "Created" };
    print_mutation(verb, &args.path, &result);
    Ok(())
}

pub async fn run_rm(args: RmArgs) -> Result<()> {
    let repo = parse_repo(&args.repo)?;
    let remote = Remote::connect()?;
    let (client, session, interrupt) = (&remote.client, &remote.session, &remote.interrupt);

    let tag = match &args.sha {
        Some(sha) => RevisionTag::new(sha.clone()),
        None => {
            cancellable(&interrupt.token(), client.read(session, &repo, &args.path))
                .await
                .with_context(|| format!("read {repo}:{}", args.path))?
                .revision_tag
        }
    };
    let message = args
        .message
        .clone()
        .unwrap_or_else(|| format!("Delete {} via repoedit", args.path));

    let result = cancellable(
        &interrupt.token(),
        client.delete(session, &repo, &args.path, &message, &tag),
    )
    .await
    .with_context(|| format!("delete {repo}:{}", args.path))?;
    print_mutation("Deleted", &args.path, &result);
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read content from stdin")?;
            Ok(buf)
        }
    }
}

fn print_mutation(verb: &str, path: &str, result: &MutationResult) {
    println!("{verb} {path}");
    println!("  commit:   {}", result.commit_id);
    if let Some(tag) = &result.new_revision_tag {
        println!("  revision: {tag}");
    }
}

fn display_path(path: &str) -> &str {
    if path.trim_matches('/').is_empty() {
        "/"
    } else {
        path
    }
}
