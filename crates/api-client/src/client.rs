use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use repoedit_core::codec::{self, DecodeError, PayloadEncoding};
use repoedit_core::error::{classify_status, server_message};
use repoedit_core::model::sort_repositories;
use repoedit_core::navigation::normalize_path;
use repoedit_core::ordering::sort_entries;
use repoedit_core::{
    CallKind, ContentError, FileContent, MutationResult, PathEntry, RepositoryRef,
    RepositorySummary, Result, RevisionTag,
};
use repoedit_runtime_config::ApiSettings;

use crate::session::Session;
use crate::wire::{
    ContentsResponse, DeleteContentsRequest, MutationEnvelope, PutContentsRequest,
    WireRepository,
};

const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Typed client for the repository contents API.
///
/// Holds only the shared HTTP transport and the base URL; the token arrives
/// with each call through a [`Session`]. Cloning is cheap and clones share
/// the connection pool.
#[derive(Debug, Clone)]
pub struct ContentClient {
    client: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    /// Build a client with the configured timeouts and user agent.
    pub fn new(settings: &ApiSettings) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .read_timeout(settings.read_timeout())
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .build()?;
        Ok(Self::with_client(client, &settings.effective_base_url()))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn contents_url(&self, repo: &RepositoryRef, path: &str) -> String {
        let mut url = format!(
            "{}/repos/{}/{}/contents",
            self.base_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        );
        let encoded = encode_path(path);
        if !encoded.is_empty() {
            url.push('/');
            url.push_str(&encoded);
        }
        url
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// List the directory at `path` (`""` for the root), directories first.
    pub async fn list(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<Vec<PathEntry>> {
        let path = normalize_path(path);
        let auth = session.authorization()?;
        let req = self.client.get(self.contents_url(repo, &path));
        let resp = self.send(CallKind::List, repo, &path, req, &auth).await?;

        match parse_json::<ContentsResponse>(resp).await? {
            ContentsResponse::Directory(items) => {
                for odd in items.iter().filter(|i| i.kind != "file" && i.kind != "dir") {
                    warn!(%repo, path = %odd.path, kind = %odd.kind, "listing entry shown as file");
                }
                let mut entries: Vec<PathEntry> = items.into_iter().map(PathEntry::from).collect();
                sort_entries(&mut entries);
                debug!(%repo, path = %path, count = entries.len(), "listed directory");
                Ok(entries)
            }
            ContentsResponse::Object(obj) => {
                debug!(%repo, path = %path, kind = %obj.kind, "list target is not a directory");
                Err(ContentError::NotFound { path })
            }
        }
    }

    /// Fetch one file's metadata and decoded payload.
    pub async fn read(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<FileContent> {
        let path = normalize_path(path);
        let auth = session.authorization()?;
        let req = self.client.get(self.contents_url(repo, &path));
        let resp = self.send(CallKind::Read, repo, &path, req, &auth).await?;

        let file = match parse_json::<ContentsResponse>(resp).await? {
            ContentsResponse::Object(file) if file.kind == "file" => file,
            ContentsResponse::Object(other) => {
                warn!(%repo, path = %path, kind = %other.kind, "read target is not a regular file");
                return Err(ContentError::NotFound { path });
            }
            ContentsResponse::Directory(_) => return Err(ContentError::NotFound { path }),
        };

        let declared = file.encoding.as_deref().unwrap_or_default();
        let payload = codec::decode_payload(declared, file.content.as_deref().unwrap_or_default())?;
        Ok(FileContent {
            path: file.path,
            revision_tag: RevisionTag::from(file.sha),
            size: file.size,
            payload,
            encoding: PayloadEncoding::Base64,
        })
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Create a new file. Fails with `Conflict` if `path` already exists.
    pub async fn create(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        path: &str,
        text: &str,
        message: &str,
    ) -> Result<MutationResult> {
        self.put_contents(CallKind::Create, session, repo, path, text, message, None)
            .await
    }

    /// Replace a file's content. `revision_tag` must be the tag last observed
    /// for `path`; a stale tag fails with `Conflict`.
    pub async fn update(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        path: &str,
        text: &str,
        message: &str,
        revision_tag: &RevisionTag,
    ) -> Result<MutationResult> {
        self.put_contents(
            CallKind::Update,
            session,
            repo,
            path,
            text,
            message,
            Some(revision_tag),
        )
        .await
    }

    /// Remove a file; same staleness rule as [`ContentClient::update`].
    pub async fn delete(
        &self,
        session: &Session,
        repo: &RepositoryRef,
        path: &str,
        message: &str,
        revision_tag: &RevisionTag,
    ) -> Result<MutationResult> {
        let path = normalize_path(path);
        let auth = session.authorization()?;
        let body = DeleteContentsRequest {
            message,
            sha: revision_tag.as_str(),
        };
        let req = self.client.delete(self.contents_url(repo, &path)).json(&body);
        let resp = self.send(CallKind::Delete, repo, &path, req, &auth).await?;
        let envelope: MutationEnvelope = parse_json(resp).await?;
        Ok(envelope.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn put_contents(
        &self,
        call: CallKind,
        session: &Session,
        repo: &RepositoryRef,
        path: &str,
        text: &str,
        message: &str,
        revision_tag: Option<&RevisionTag>,
    ) -> Result<MutationResult> {
        let path = normalize_path(path);
        let auth = session.authorization()?;
        let body = PutContentsRequest {
            message,
            content: codec::encode_text(text),
            sha: revision_tag.map(RevisionTag::as_str),
        };
        let req = self.client.put(self.contents_url(repo, &path)).json(&body);
        let resp = self.send(call, repo, &path, req, &auth).await?;
        let envelope: MutationEnvelope = parse_json(resp).await?;
        Ok(envelope.into())
    }

    // ── Repositories ──────────────────────────────────────────────────────

    /// Repositories visible to the token, most recently updated first.
    pub async fn list_repositories(&self, session: &Session) -> Result<Vec<RepositorySummary>> {
        let auth = session.authorization()?;
        let req = self
            .client
            .get(format!("{}/user/repos", self.base_url))
            .query(&[("per_page", "100"), ("sort", "updated")]);
        let resp = self
            .send_raw(CallKind::ListRepositories, "user/repos", "", req, &auth)
            .await?;
        let repos: Vec<WireRepository> = parse_json(resp).await?;
        let mut repos: Vec<RepositorySummary> = repos.into_iter().map(Into::into).collect();
        sort_repositories(&mut repos);
        Ok(repos)
    }

    // ── Transport ─────────────────────────────────────────────────────────

    async fn send(
        &self,
        call: CallKind,
        repo: &RepositoryRef,
        path: &str,
        req: RequestBuilder,
        auth: &str,
    ) -> Result<Response> {
        self.send_raw(call, &repo.full_name(), path, req, auth).await
    }

    async fn send_raw(
        &self,
        call: CallKind,
        endpoint: &str,
        path: &str,
        req: RequestBuilder,
        auth: &str,
    ) -> Result<Response> {
        debug!(call = call.as_str(), endpoint, path, "sending request");
        let resp = req
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = classify_status(status.as_u16(), call, path, server_message(&body));
        debug!(
            call = call.as_str(),
            endpoint,
            path,
            status = status.as_u16(),
            kind = ?err.kind(),
            "request failed"
        );
        Err(err)
    }
}

/// Percent-encode each segment of a repository path, keeping `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Map a reqwest failure that produced no HTTP status.
fn transport_error(err: reqwest::Error) -> ContentError {
    if err.is_builder() {
        return ContentError::Unknown {
            status: 0,
            message: err.to_string(),
        };
    }
    ContentError::NetworkUnavailable(err.to_string())
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ContentError::Decode(DecodeError::MalformedResponse(e.to_string())))
}
