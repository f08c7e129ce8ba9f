use anyhow::{Context, Result};
use repoedit_api_client::{CancelScope, ContentClient, Session};
use repoedit_core::RepositoryRef;
use repoedit_runtime_config::RepoEditConfig;
use tracing::{debug, info};

use crate::config;
use crate::credentials::FileCredentialStore;

/// Everything a command needs to talk to the server.
pub struct Remote {
    pub client: ContentClient,
    pub session: Session,
    pub config: RepoEditConfig,
    /// Ctrl+C cancels whichever call holds the current token; the next
    /// `token()` starts fresh.
    pub interrupt: CancelScope,
}

impl Remote {
    /// Load config and credentials, build the client, and route Ctrl+C to
    /// the in-flight call.
    pub fn connect() -> Result<Self> {
        let config = config::load_config()?;
        let settings = config::effective_api_settings(&config);
        let client = ContentClient::new(&settings).context("Failed to build HTTP client")?;
        let store = FileCredentialStore::new()?;
        let session = Session::from_store(&store).context("Failed to load credentials")?;
        debug!(
            base_url = client.base_url(),
            has_token = session.has_token(),
            "connected"
        );

        let interrupt = CancelScope::new();
        let trigger = interrupt.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C");
                trigger.cancel();
            }
        });

        Ok(Self {
            client,
            session,
            config,
            interrupt,
        })
    }
}

pub fn parse_repo(input: &str) -> Result<RepositoryRef> {
    RepositoryRef::parse(input).with_context(|| format!("invalid repository `{input}`"))
}
