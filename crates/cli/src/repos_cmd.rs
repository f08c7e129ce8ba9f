use anyhow::{Context, Result};
use clap::Args;
use repoedit_api_client::cancellable;
use repoedit_core::model::filter_repositories;

use crate::output::{self, OutputFormat};
use crate::remote::Remote;

#[derive(Debug, Clone, Args)]
pub struct ReposArgs {
    /// Keep repositories whose name or description contains this text.
    #[arg(long, short)]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// List repositories visible to the configured token.
pub async fn run(args: ReposArgs) -> Result<()> {
    let remote = Remote::connect()?;
    let repos = cancellable(
        &remote.interrupt.token(),
        remote.client.list_repositories(&remote.session),
    )
    .await
    .context("list repositories")?;
    let repos = filter_repositories(&repos, args.search.as_deref().unwrap_or_default());
    output::print_repositories(&repos, args.format)
}
