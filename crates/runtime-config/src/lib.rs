//! Shared runtime configuration types.
//!
//! The CLI reads and writes `repoedit.toml` using these types; the API client
//! takes its transport settings from [`ApiSettings`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "repoedit.toml";

/// Default REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Placeholder substituted with the file path in commit messages.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Top-level configuration (persisted as `repoedit.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepoEditConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub credentials: CredentialSettings,
    #[serde(default)]
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Base URL without a trailing slash, falling back to the default when blank.
    pub fn effective_base_url(&self) -> String {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            default_api_url()
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialSettings {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorSettings {
    #[serde(default = "default_commit_message_template")]
    pub commit_message_template: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            commit_message_template: default_commit_message_template(),
        }
    }
}

impl EditorSettings {
    pub fn commit_message(&self, path: &str) -> String {
        render_commit_message(&self.commit_message_template, path)
    }
}

/// Substitute `{path}` in a commit message template.
pub fn render_commit_message(template: &str, path: &str) -> String {
    let template = if template.trim().is_empty() {
        default_commit_message_template()
    } else {
        template.to_string()
    };
    template.replace(PATH_PLACEHOLDER, path)
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("repoedit/{}", env!("CARGO_PKG_VERSION"))
}
fn default_commit_message_template() -> String {
    "Update {path} via repoedit".to_string()
}
