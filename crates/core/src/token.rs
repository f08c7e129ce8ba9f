use serde::{Deserialize, Serialize};
use std::fmt;

const CLASSIC_PREFIX: &str = "ghp_";
const FINE_GRAINED_PREFIX: &str = "github_pat_";
const MIN_OPAQUE_LEN: usize = 40;

/// Personal access token. `Debug` and `masked()` never print the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token cannot be empty")]
    Empty,
    #[error(
        "invalid token format: expected a 'ghp_' or 'github_pat_' prefix, or at least 40 characters"
    )]
    InvalidFormat,
}

impl Token {
    /// Wrap a value without checking its shape. Use [`Token::parse`] before
    /// persisting user input.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Trim and validate a token for storage.
    pub fn parse(input: &str) -> Result<Self, TokenError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(TokenError::Empty);
        }
        if !is_valid_token_format(value) {
            return Err(TokenError::InvalidFormat);
        }
        Ok(Self(value.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First few characters followed by an ellipsis.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"***").finish()
    }
}

pub fn is_valid_token_format(value: &str) -> bool {
    value.starts_with(CLASSIC_PREFIX)
        || value.starts_with(FINE_GRAINED_PREFIX)
        || value.chars().count() >= MIN_OPAQUE_LEN
}
