use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::codec::{self, DecodeError, PayloadEncoding};

/// Identifies a remote repository as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RepositoryRefError {
    #[error("expected owner/name, got {0:?}")]
    InvalidFormat(String),
    #[error("owner and name must not be empty: {0:?}")]
    EmptySegment(String),
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`, `https://github.com/owner/name[.git]` or
    /// `git@github.com:owner/name.git`.
    pub fn parse(input: &str) -> Result<Self, RepositoryRefError> {
        let trimmed = input.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let body = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .or_else(|| trimmed.strip_prefix("git@github.com:"))
            .unwrap_or(trimmed);

        let mut parts = body.split('/');
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RepositoryRefError::InvalidFormat(input.to_string()));
        };
        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(RepositoryRefError::EmptySegment(input.to_string()));
        }
        Ok(Self::new(owner.trim(), name.trim()))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = RepositoryRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Content-derived identifier of one file revision (the server's `sha`).
///
/// Opaque: it is compared and echoed back, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionTag(String);

impl RevisionTag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RevisionTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RevisionTag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    /// Map the wire `type` field. Symlinks and submodules are listed as files.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "dir" => Self::Directory,
            _ => Self::File,
        }
    }
}

/// One item of a directory listing. `size` is meaningless for directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
    pub revision_tag: RevisionTag,
}

impl PathEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A file fetched from the repository, payload already base64-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub revision_tag: RevisionTag,
    pub size: u64,
    pub payload: Vec<u8>,
    pub encoding: PayloadEncoding,
}

impl FileContent {
    /// Borrow the payload as UTF-8 text.
    pub fn text(&self) -> Result<&str, DecodeError> {
        codec::payload_text(&self.payload)
    }
}

/// Outcome of a create/update/delete.
///
/// `new_revision_tag` must replace whatever tag the caller held for the path.
/// It is `None` after a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult {
    pub new_revision_tag: Option<RevisionTag>,
    pub commit_id: String,
    pub commit_message: String,
}

/// Repository picker row (`GET /user/repos`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub updated_at: String,
}

impl RepositorySummary {
    pub fn repository_ref(&self) -> RepositoryRef {
        RepositoryRef::new(self.owner.clone(), self.name.clone())
    }
}

/// Most recently updated first. ISO-8601 timestamps compare lexically.
pub fn sort_repositories(repos: &mut [RepositorySummary]) {
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Keep repositories whose name or description contains `query`,
/// ignoring case. An empty query keeps everything.
pub fn filter_repositories(repos: &[RepositorySummary], query: &str) -> Vec<RepositorySummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return repos.to_vec();
    }
    repos
        .iter()
        .filter(|repo| {
            repo.name.to_lowercase().contains(&needle)
                || repo
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
