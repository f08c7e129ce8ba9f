use std::path::PathBuf;

use anyhow::{Context, Result};
use repoedit_api_client::{CredentialError, CredentialStore};
use repoedit_core::Token;
use repoedit_runtime_config::RepoEditConfig;
use tracing::debug;

use crate::config::{self, TOKEN_ENV};

/// Token kept in the `[credentials]` table of `repoedit.toml`.
///
/// `REPOEDIT_TOKEN` wins over the stored value when set.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    env_token: Option<String>,
}

impl FileCredentialStore {
    /// Store backed by the canonical config file, honoring `REPOEDIT_TOKEN`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: config::config_path()?,
            env_token: config::env_value(TOKEN_ENV),
        })
    }

    /// Store backed by `path` alone.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_token: None,
        }
    }

    fn load(&self) -> Result<RepoEditConfig, CredentialError> {
        config::load_config_from(&self.path).map_err(storage_error)
    }

    fn update(&self, token: String) -> Result<(), CredentialError> {
        let mut cfg = self.load()?;
        cfg.credentials.token = token;
        config::save_config_to(&self.path, &cfg).map_err(storage_error)
    }
}

impl CredentialStore for FileCredentialStore {
    fn current_token(&self) -> Result<Option<Token>, CredentialError> {
        if let Some(token) = &self.env_token {
            debug!("using token from {TOKEN_ENV}");
            return Ok(Some(Token::new(token.clone())));
        }
        Ok(stored_token(&self.load()?))
    }

    fn save_token(&mut self, token: Token) -> Result<(), CredentialError> {
        let token = Token::parse(token.expose())?;
        self.update(token.expose().to_string())
    }

    fn clear_token(&mut self) -> Result<(), CredentialError> {
        self.update(String::new())
    }
}

fn storage_error(err: anyhow::Error) -> CredentialError {
    CredentialError::Storage(format!("{err:#}"))
}

fn stored_token(cfg: &RepoEditConfig) -> Option<Token> {
    let token = Token::new(cfg.credentials.token.trim());
    (!token.is_blank()).then_some(token)
}

/// Masked description for display, noting where the token comes from.
pub fn describe_token(cfg: &RepoEditConfig) -> String {
    if let Some(token) = config::env_value(TOKEN_ENV) {
        return format!("{} (from {TOKEN_ENV})", Token::new(token).masked());
    }
    match stored_token(cfg) {
        Some(token) => token.masked(),
        None => "(not set)".to_string(),
    }
}

pub fn run_set(token: &str) -> Result<()> {
    let mut store = FileCredentialStore::new()?;
    store
        .save_token(Token::new(token))
        .context("Failed to save token")?;
    println!("Token saved to {}", config::config_path()?.display());
    if config::env_value(TOKEN_ENV).is_some() {
        eprintln!("Warning: {TOKEN_ENV} is set and takes precedence over the saved token.");
    }
    Ok(())
}

pub fn run_show() -> Result<()> {
    let cfg = config::load_config()?;
    println!("{}", describe_token(&cfg));
    Ok(())
}

pub fn run_clear() -> Result<()> {
    let mut store = FileCredentialStore::new()?;
    store.clear_token().context("Failed to clear token")?;
    println!("Token cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repoedit_runtime_config::CONFIG_FILE_NAME;

    #[test]
    fn missing_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::at(dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(store.current_token().unwrap(), None);
    }

    #[test]
    fn unreadable_config_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[credentials\ntoken = ").unwrap();
        let store = FileCredentialStore::at(&path);

        let err = store.current_token().unwrap_err();
        assert!(matches!(err, CredentialError::Storage(_)), "got {err:?}");
    }

    #[test]
    fn saved_token_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut store = FileCredentialStore::at(&path);

        store.save_token(Token::new("ghp_stored")).unwrap();
        assert_eq!(
            store.current_token().unwrap(),
            Some(Token::new("ghp_stored"))
        );

        store.clear_token().unwrap();
        assert_eq!(store.current_token().unwrap(), None);
        assert!(path.exists());
    }

    #[test]
    fn malformed_token_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut store = FileCredentialStore::at(&path);

        assert!(store.save_token(Token::new("nope")).is_err());
        assert!(!path.exists());
    }
}
