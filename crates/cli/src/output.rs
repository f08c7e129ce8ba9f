use repoedit_core::{ContentError, ErrorKind, PathEntry, RepositorySummary};

/// Process exit codes, stable for scripting.
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFLICT: i32 = 2;
pub const EXIT_UNAUTHORIZED: i32 = 3;
pub const EXIT_NOT_FOUND: i32 = 4;

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// First [`ContentError`] anywhere in the chain.
pub fn content_error(err: &anyhow::Error) -> Option<&ContentError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ContentError>())
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    match content_error(err).map(ContentError::kind) {
        Some(ErrorKind::Conflict) => EXIT_CONFLICT,
        Some(ErrorKind::Unauthorized) => EXIT_UNAUTHORIZED,
        Some(ErrorKind::NotFound) => EXIT_NOT_FOUND,
        _ => EXIT_FAILURE,
    }
}

/// What the user can do about a failure of this kind.
pub fn hint(kind: ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::Unauthorized => {
            Some("set a valid token with `repoedit token set <TOKEN>` or REPOEDIT_TOKEN")
        }
        ErrorKind::NotFound => {
            Some("check the repository and path; private repositories need a token with access")
        }
        ErrorKind::Conflict => {
            Some("the file changed on the server; fetch it with `repoedit cat` and redo the edit")
        }
        ErrorKind::NetworkUnavailable => {
            Some("check your connection, or raise the timeout with `repoedit config --timeout`")
        }
        ErrorKind::Decode => {
            Some("the file is not UTF-8 text or the server sent an unexpected payload")
        }
        ErrorKind::Unknown => None,
        ErrorKind::Cancelled => {
            Some("interrupted before the server replied; a write may or may not have been applied")
        }
    }
}

pub fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);
    if let Some(hint) = content_error(err).and_then(|e| hint(e.kind())) {
        eprintln!("hint: {hint}");
    }
}

pub fn print_entries(entries: &[PathEntry], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("(empty directory)");
            }
            for entry in entries {
                println!("{}", entry_line(entry));
            }
        }
    }
    Ok(())
}

pub fn entry_line(entry: &PathEntry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name)
    } else {
        format!("{:<40} {:>10}", entry.name, format_size(entry.size))
    }
}

pub fn print_repositories(repos: &[RepositorySummary], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(repos)?),
        OutputFormat::Text => {
            if repos.is_empty() {
                println!("No repositories found.");
            }
            for repo in repos {
                let language = repo.language.as_deref().unwrap_or("-");
                println!(
                    "{:<40} {:<12} ★{:<5} updated {}",
                    repo.full_name, language, repo.stars, repo.updated_at
                );
                if let Some(desc) = repo.description.as_deref().filter(|d| !d.trim().is_empty()) {
                    println!("    {desc}");
                }
            }
        }
    }
    Ok(())
}

pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
