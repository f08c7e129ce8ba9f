//! Token gate: every request passes through a [`Session`] that either yields
//! the authorization header or fails before any network traffic.

use repoedit_core::{ContentError, Token, TokenError};

/// Per-call authentication context. Cheap to clone; holds no other state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<Token>,
}

impl Session {
    pub fn new(token: Option<Token>) -> Self {
        Self { token }
    }

    pub fn with_token(token: Token) -> Self {
        Self { token: Some(token) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session over the store's current token. A store that cannot be read
    /// is an error, not an anonymous session.
    pub fn from_store(store: &dyn CredentialStore) -> Result<Self, CredentialError> {
        Ok(Self::new(store.current_token()?))
    }

    pub fn has_token(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_blank())
    }

    /// `Authorization` header value, or `Unauthorized` when no usable token
    /// is configured. Format is not checked here.
    pub fn authorization(&self) -> Result<String, ContentError> {
        match &self.token {
            Some(token) if !token.is_blank() => Ok(format!("token {}", token.expose().trim())),
            _ => Err(ContentError::Unauthorized),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("credential storage failed: {0}")]
    Storage(String),
}

/// Source of the token used for requests.
///
/// Implementations validate the token's shape in `save_token`; reads return
/// whatever was stored, and `Ok(None)` only when nothing is.
pub trait CredentialStore {
    fn current_token(&self) -> Result<Option<Token>, CredentialError>;

    fn save_token(&mut self, token: Token) -> Result<(), CredentialError>;

    fn clear_token(&mut self) -> Result<(), CredentialError>;
}

/// In-process store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Option<Token>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn current_token(&self) -> Result<Option<Token>, CredentialError> {
        Ok(self.token.clone())
    }

    fn save_token(&mut self, token: Token) -> Result<(), CredentialError> {
        let token = Token::parse(token.expose())?;
        self.token = Some(token);
        Ok(())
    }

    fn clear_token(&mut self) -> Result<(), CredentialError> {
        self.token = None;
        Ok(())
    }
}
