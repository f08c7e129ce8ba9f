//! JSON shapes of the contents API.

use serde::{Deserialize, Serialize};

use repoedit_core::{
    EntryKind, MutationResult, PathEntry, RepositorySummary, RevisionTag,
};

#[derive(Debug, Deserialize)]
pub(crate) struct WireEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    pub sha: String,
}

impl From<WireEntry> for PathEntry {
    fn from(entry: WireEntry) -> Self {
        PathEntry {
            kind: EntryKind::from_wire(&entry.kind),
            name: entry.name,
            path: entry.path,
            size: entry.size,
            revision_tag: RevisionTag::from(entry.sha),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFile {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// `GET contents/{path}` answers with an array for a directory and an
/// object for anything else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    Directory(Vec<WireEntry>),
    Object(WireFile),
}

#[derive(Debug, Serialize)]
pub(crate) struct PutContentsRequest<'a> {
    pub message: &'a str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteContentsRequest<'a> {
    pub message: &'a str,
    pub sha: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCommit {
    pub sha: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireContentRef {
    pub sha: String,
}

/// Envelope returned by PUT and DELETE. `content` is null after a delete.
#[derive(Debug, Deserialize)]
pub(crate) struct MutationEnvelope {
    #[serde(default)]
    pub content: Option<WireContentRef>,
    pub commit: WireCommit,
}

impl From<MutationEnvelope> for MutationResult {
    fn from(envelope: MutationEnvelope) -> Self {
        MutationResult {
            new_revision_tag: envelope.content.map(|c| RevisionTag::from(c.sha)),
            commit_id: envelope.commit.sha,
            commit_message: envelope.commit.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOwner {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: WireOwner,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub updated_at: String,
}

impl From<WireRepository> for RepositorySummary {
    fn from(repo: WireRepository) -> Self {
        RepositorySummary {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            owner: repo.owner.login,
            description: repo.description,
            html_url: repo.html_url,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            updated_at: repo.updated_at,
        }
    }
}
