use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use clap::Args;
use dialoguer::{Confirm, Editor, Input, Select};
use repoedit_api_client::{EditorSession, RepoBrowser};
use repoedit_core::{ContentError, ErrorKind, PathEntry};

use crate::output::{self, entry_line};
use crate::remote::{Remote, parse_repo};

#[derive(Debug, Clone, Args)]
pub struct BrowseArgs {
    /// Repository as `owner/name` or a github.com URL.
    pub repo: String,
}

enum Choice {
    Entry(PathEntry),
    Up,
    Crumbs,
    NewFile,
    Refresh,
    Quit,
}

/// Interactive directory walk with in-place editing of text files.
pub async fn run(args: BrowseArgs) -> Result<()> {
    if !(std::io::stdin().is_terminal() && std::io::stdout().is_terminal()) {
        bail!("browse needs an interactive terminal; use `repoedit ls` and `repoedit cat` instead");
    }
    let repo = parse_repo(&args.repo)?;
    let remote = Remote::connect()?;
    let mut browser = RepoBrowser::new(remote.client.clone(), remote.session.clone(), repo)
        .with_cancellation(remote.interrupt.clone());

    let mut entries = browser.refresh().await.context("list repository root")?;
    loop {
        let (labels, choices) = menu(&browser, &entries);
        let header = format!("{}:/{}", browser.repo(), browser.current_path());
        let picked = Select::new()
            .with_prompt(header)
            .items(&labels)
            .default(0)
            .interact()
            .context("failed to read selection")?;

        let moved = match &choices[picked] {
            Choice::Quit => return Ok(()),
            Choice::Refresh => browser.refresh().await,
            Choice::Up => browser.go_up().await,
            Choice::Crumbs => {
                let crumbs = browser.breadcrumbs();
                let labels: Vec<String> = crumbs
                    .iter()
                    .map(|c| if c.path.is_empty() { "/".to_string() } else { c.path.clone() })
                    .collect();
                let idx = Select::new()
                    .with_prompt("Jump to")
                    .items(&labels)
                    .default(crumbs.len().saturating_sub(1))
                    .interact()
                    .context("failed to read selection")?;
                browser.go_to_crumb(crumbs[idx].depth).await
            }
            Choice::Entry(entry) if entry.is_dir() => browser.open_dir(&entry.name).await,
            Choice::Entry(entry) => {
                let path = browser.child_path(&entry.name);
                edit_file(&remote, &browser, &path).await?;
                browser.refresh().await
            }
            Choice::NewFile => {
                let name: String = Input::new()
                    .with_prompt("New file name")
                    .interact_text()
                    .context("failed to read file name")?;
                let path = browser.child_path(name.trim());
                let editor = EditorSession::new_file(browser.repo().clone(), path);
                edit_loop(&remote, editor).await?;
                browser.refresh().await
            }
        };

        match moved {
            Ok(listing) => entries = listing,
            Err(err) => show_error(&err),
        }
    }
}

fn menu(browser: &RepoBrowser, entries: &[PathEntry]) -> (Vec<String>, Vec<Choice>) {
    let mut labels = Vec::new();
    let mut choices = Vec::new();
    if !browser.is_root() {
        labels.push("..".to_string());
        choices.push(Choice::Up);
    }
    for entry in entries {
        labels.push(entry_line(entry));
        choices.push(Choice::Entry(entry.clone()));
    }
    labels.push("[new file]".to_string());
    choices.push(Choice::NewFile);
    if !browser.is_root() {
        labels.push("[jump to parent…]".to_string());
        choices.push(Choice::Crumbs);
    }
    labels.push("[refresh]".to_string());
    choices.push(Choice::Refresh);
    labels.push("[quit]".to_string());
    choices.push(Choice::Quit);
    (labels, choices)
}

async fn edit_file(remote: &Remote, browser: &RepoBrowser, path: &str) -> Result<()> {
    let opened = EditorSession::open(
        &remote.client,
        &remote.session,
        browser.repo().clone(),
        path,
        Some(&remote.interrupt.token()),
    )
    .await;
    match opened {
        Ok(editor) => {
            println!(
                "{} ({} lines, revision {})",
                editor.path(),
                editor.line_count(),
                editor.revision_tag().map(|t| t.as_str()).unwrap_or("-")
            );
            edit_loop(remote, editor).await
        }
        Err(err) => {
            show_error(&err);
            Ok(())
        }
    }
}

/// Edit in `$EDITOR` and save until the buffer is committed or abandoned.
async fn edit_loop(remote: &Remote, mut editor: EditorSession) -> Result<()> {
    loop {
        let edited = Editor::new()
            .edit(editor.text())
            .context("failed to run editor")?;
        let Some(text) = edited else {
            println!("Edit aborted.");
            return Ok(());
        };
        editor.set_text(text);
        if !editor.is_modified() {
            println!("No changes.");
            return Ok(());
        }

        let message: String = Input::new()
            .with_prompt("Commit message")
            .default(remote.config.editor.commit_message(editor.path()))
            .interact_text()
            .context("failed to read commit message")?;

        match editor
            .save(&remote.client, &remote.session, &message, Some(&remote.interrupt.token()))
            .await
        {
            Ok(result) => {
                println!("Saved {} (commit {})", editor.path(), result.commit_id);
                return Ok(());
            }
            Err(err) if err.kind() == ErrorKind::Conflict => {
                show_error(&err);
                let reload = Confirm::new()
                    .with_prompt("Discard your edit and load the current version?")
                    .default(false)
                    .interact()
                    .context("failed to read answer")?;
                if !reload {
                    return Ok(());
                }
                if let Err(err) = editor
                    .reload(&remote.client, &remote.session, Some(&remote.interrupt.token()))
                    .await
                {
                    show_error(&err);
                    return Ok(());
                }
            }
            Err(err) => {
                show_error(&err);
                return Ok(());
            }
        }
    }
}

fn show_error(err: &ContentError) {
    eprintln!("Error: {err}");
    if let Some(hint) = output::hint(err.kind()) {
        eprintln!("hint: {hint}");
    }
}
