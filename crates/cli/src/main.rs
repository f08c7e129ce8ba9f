mod browse_cmd;
mod config;
mod contents_cmd;
mod credentials;
mod output;
mod remote;
mod repos_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "repoedit",
    version,
    about = "Browse and edit repository files through the contents API"
)]
struct Cli {
    /// Log requests and responses (same as RUST_LOG=debug).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show or set configuration
    Config {
        /// Set the API base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Set connect and read timeouts, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List repositories the token can access, most recently updated first
    Repos(repos_cmd::ReposArgs),

    /// List a directory
    Ls(contents_cmd::LsArgs),

    /// Print a file
    Cat(contents_cmd::CatArgs),

    /// Create or update a file from a local file or stdin
    Put(contents_cmd::PutArgs),

    /// Delete a file
    Rm(contents_cmd::RmArgs),

    /// Walk a repository interactively and edit files in $EDITOR
    Browse(browse_cmd::BrowseArgs),
}

#[derive(Subcommand)]
enum TokenAction {
    /// Validate and save a token
    Set {
        /// Personal access token (`ghp_…`, `github_pat_…`)
        token: String,
    },
    /// Show the masked token and where it comes from
    Show,
    /// Remove the saved token
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Token { action } => match action {
            TokenAction::Set { token } => credentials::run_set(&token),
            TokenAction::Show => credentials::run_show(),
            TokenAction::Clear => credentials::run_clear(),
        },
        Commands::Config { api_url, timeout } => {
            if api_url.is_none() && timeout.is_none() {
                config::show_config()
            } else {
                config::set_config(api_url, timeout)
            }
        }
        Commands::Repos(args) => repos_cmd::run(args).await,
        Commands::Ls(args) => contents_cmd::run_ls(args).await,
        Commands::Cat(args) => contents_cmd::run_cat(args).await,
        Commands::Put(args) => contents_cmd::run_put(args).await,
        Commands::Rm(args) => contents_cmd::run_rm(args).await,
        Commands::Browse(args) => browse_cmd::run(args).await,
    };

    if let Err(e) = result {
        output::report_error(&e);
        std::process::exit(output::exit_code(&e));
    }
}
