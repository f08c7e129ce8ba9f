//! Closed failure taxonomy for remote content operations and the pure
//! classifier that maps HTTP outcomes onto it.

use serde::Deserialize;

use crate::codec::DecodeError;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("unauthorized: token missing, invalid or expired")]
    Unauthorized,

    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("revision conflict on {path}: re-read before retrying")]
    Conflict { path: String },

    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("unexpected status {status}: {message}")]
    Unknown { status: u16, message: String },

    /// The caller cancelled before the call completed. Whether a mutation
    /// reached the server is unknown.
    #[error("operation cancelled before completion")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// Fieldless mirror of [`ContentError`] for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Conflict,
    NetworkUnavailable,
    Decode,
    Unknown,
    Cancelled,
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NetworkUnavailable(_) => ErrorKind::NetworkUnavailable,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Unknown { .. } => ErrorKind::Unknown,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Which operation produced a status. Some codes mean different things
/// depending on the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    List,
    Read,
    Create,
    Update,
    Delete,
    ListRepositories,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ListRepositories => "list_repositories",
        }
    }
}

/// Map a non-2xx status to its error kind.
///
/// Create sends no revision tag, so the server rejects an existing path with
/// 422 ("sha wasn't supplied") as well as 409; both are a conflict for create.
/// A 404 on create names a missing repository or branch, not the file.
pub fn classify_status(status: u16, call: CallKind, path: &str, message: String) -> ContentError {
    match (status, call) {
        (401, _) => ContentError::Unauthorized,
        (404, CallKind::Create) => ContentError::Unknown { status, message },
        (404, _) => ContentError::NotFound {
            path: path.to_string(),
        },
        (409, _) | (422, CallKind::Create) => ContentError::Conflict {
            path: path.to_string(),
        },
        _ => ContentError::Unknown { status, message },
    }
}

#[derive(Deserialize)]
struct ServerErrorBody {
    message: String,
}

/// Pull the `message` field out of an error body, falling back to the raw text.
pub fn server_message(body: &str) -> String {
    serde_json::from_str::<ServerErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
