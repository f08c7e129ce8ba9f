//! In-process fake of the repository contents API.
//!
//! Stores files in memory, issues a fresh `sha` on every write and enforces
//! the same optimistic-concurrency rules as the real service: PUT without a
//! `sha` on an existing path is 422, a `sha` that is not current is 409.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};

use repoedit_api_client::{ContentClient, Session};
use repoedit_core::{RepositoryRef, Token, testing};

pub const OWNER: &str = "octo";
pub const REPO: &str = "notes";
pub const TOKEN: &str = "ghp_fake_server_token";

#[derive(Debug, Clone)]
struct StoredFile {
    content_b64: String,
    sha: String,
}

#[derive(Default)]
struct Inner {
    files: BTreeMap<String, StoredFile>,
    empty_dirs: BTreeSet<String>,
    revision: u64,
    fail_next: Option<(u16, String)>,
    encoding_override: Option<String>,
    delay: Option<Duration>,
    repositories: Vec<Value>,
}

/// Shared handle to the fake server state.
#[derive(Clone, Default)]
pub struct FakeContents {
    inner: Arc<Mutex<Inner>>,
    requests: Arc<AtomicUsize>,
}

impl FakeContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, returning its revision tag.
    pub fn put_file(&self, path: &str, text: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.revision += 1;
        let sha = format!("sha-{:04}", inner.revision);
        inner.files.insert(
            path.to_string(),
            StoredFile {
                content_b64: STANDARD.encode(text.as_bytes()),
                sha: sha.clone(),
            },
        );
        sha
    }

    pub fn put_file_with_sha(&self, path: &str, text: &str, sha: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.files.insert(
            path.to_string(),
            StoredFile {
                content_b64: STANDARD.encode(text.as_bytes()),
                sha: sha.to_string(),
            },
        );
    }

    pub fn add_empty_dir(&self, path: &str) {
        self.inner.lock().unwrap().empty_dirs.insert(path.to_string());
    }

    pub fn text_of(&self, path: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(path).map(|f| {
            String::from_utf8(STANDARD.decode(&f.content_b64).expect("stored base64"))
                .expect("stored utf-8")
        })
    }

    pub fn sha_of(&self, path: &str) -> Option<String> {
        self.inner.lock().unwrap().files.get(path).map(|f| f.sha.clone())
    }

    pub fn fail_next(&self, status: u16, message: &str) {
        self.inner.lock().unwrap().fail_next = Some((status, message.to_string()));
    }

    pub fn declare_encoding(&self, encoding: &str) {
        self.inner.lock().unwrap().encoding_override = Some(encoding.to_string());
    }

    pub fn delay_responses(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    pub fn add_repository(&self, name: &str, description: Option<&str>, updated_at: &str) {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.repositories.len() as u64 + 1;
        inner.repositories.push(json!({
            "id": id,
            "name": name,
            "full_name": format!("{OWNER}/{name}"),
            "owner": { "login": OWNER },
            "description": description,
            "html_url": format!("https://github.com/{OWNER}/{name}"),
            "language": "Rust",
            "stargazers_count": 3,
            "forks_count": 1,
            "updated_at": updated_at,
        }));
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Running fake plus a client pointed at it.
pub struct TestContext {
    pub fake: FakeContents,
    pub client: ContentClient,
    pub base_url: String,
}

impl TestContext {
    pub async fn start() -> Self {
        let fake = FakeContents::new();
        let base_url = spawn(fake.clone()).await;
        let client = ContentClient::with_client(reqwest::Client::new(), &base_url);
        Self {
            fake,
            client,
            base_url,
        }
    }

    pub fn session(&self) -> Session {
        Session::with_token(Token::new(TOKEN))
    }

    pub fn repo(&self) -> RepositoryRef {
        testing::repo()
    }
}

pub async fn spawn(fake: FakeContents) -> String {
    let app = Router::new()
        .route(
            "/repos/{owner}/{repo}/contents",
            get(get_root).put(put_root).delete(delete_root),
        )
        .route(
            "/repos/{owner}/{repo}/contents/{*path}",
            get(get_path).put(put_path).delete(delete_path),
        )
        .route("/user/repos", get(list_repositories))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake");
    });
    format!("http://{addr}")
}

#[derive(Debug, Deserialize)]
struct PutBody {
    message: String,
    content: String,
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
    message: String,
    sha: String,
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Shared preamble: count, delay, auth, injected failure, repository check.
async fn gate(
    fake: &FakeContents,
    headers: &HeaderMap,
    owner: &str,
    repo: &str,
) -> Option<Response> {
    fake.requests.fetch_add(1, Ordering::SeqCst);

    let delay = fake.inner.lock().unwrap().delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let expected = format!("token {TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return Some(error(StatusCode::UNAUTHORIZED, "Bad credentials"));
    }

    if let Some((status, message)) = fake.inner.lock().unwrap().fail_next.take() {
        let status = StatusCode::from_u16(status).expect("valid status");
        return Some(error(status, &message));
    }

    if owner != OWNER || repo != REPO {
        return Some(error(StatusCode::NOT_FOUND, "Not Found"));
    }
    None
}

fn wrap_base64(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| format!("{}\n", std::str::from_utf8(chunk).expect("ascii")))
        .collect()
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn entry_json(path: &str, kind: &str, size: usize, sha: &str) -> Value {
    json!({
        "name": name_of(path),
        "path": path,
        "type": kind,
        "size": size,
        "sha": sha,
        "url": format!("https://api.example.test/{path}"),
    })
}

fn read_contents(fake: &FakeContents, path: &str) -> Response {
    let inner = fake.inner.lock().unwrap();

    if let Some(file) = inner.files.get(path) {
        let size = STANDARD.decode(&file.content_b64).map(|b| b.len()).unwrap_or(0);
        let encoding = inner
            .encoding_override
            .clone()
            .unwrap_or_else(|| "base64".to_string());
        let mut body = entry_json(path, "file", size, &file.sha);
        body["content"] = Value::String(wrap_base64(&file.content_b64));
        body["encoding"] = Value::String(encoding);
        return Json(body).into_response();
    }

    let prefix = if path.is_empty() {
        String::new()
    } else {
        format!("{path}/")
    };
    let mut dirs = BTreeSet::new();
    let mut entries = Vec::new();
    let all_paths = inner
        .files
        .keys()
        .map(String::as_str)
        .chain(inner.empty_dirs.iter().map(String::as_str));
    for full in all_paths {
        let Some(rest) = full.strip_prefix(&prefix) else {
            continue;
        };
        match rest.split_once('/') {
            Some((dir, _)) => {
                dirs.insert(dir.to_string());
            }
            None if inner.files.contains_key(full) => {
                let file = &inner.files[full];
                let size = STANDARD.decode(&file.content_b64).map(|b| b.len()).unwrap_or(0);
                entries.push(entry_json(full, "file", size, &file.sha));
            }
            None => {
                dirs.insert(rest.to_string());
            }
        }
    }
    for dir in dirs {
        let full = format!("{prefix}{dir}");
        entries.push(entry_json(&full, "dir", 0, &format!("tree-{full}")));
    }

    let exists = path.is_empty() || !entries.is_empty() || inner.empty_dirs.contains(path);
    if !exists {
        return error(StatusCode::NOT_FOUND, "Not Found");
    }
    // Deliberately unsorted: files first, reverse order.
    entries.reverse();
    Json(Value::Array(entries)).into_response()
}

fn write_contents(fake: &FakeContents, path: &str, body: PutBody) -> Response {
    let mut inner = fake.inner.lock().unwrap();
    let existing = inner.files.get(path).cloned();

    let status = match (&existing, &body.sha) {
        (Some(_), None) => {
            return error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid request.\n\n\"sha\" wasn't supplied.",
            );
        }
        (Some(current), Some(sha)) if *sha != current.sha => {
            return error(
                StatusCode::CONFLICT,
                &format!("{path} does not match {sha}"),
            );
        }
        (None, Some(_)) => return error(StatusCode::NOT_FOUND, "Not Found"),
        (Some(_), Some(_)) => StatusCode::OK,
        (None, None) => StatusCode::CREATED,
    };

    if STANDARD.decode(&body.content).is_err() {
        return error(StatusCode::BAD_REQUEST, "content is not valid Base64");
    }

    inner.revision += 1;
    let sha = format!("sha-{:04}", inner.revision);
    let commit = format!("commit-{:04}", inner.revision);
    let size = STANDARD.decode(&body.content).map(|b| b.len()).unwrap_or(0);
    inner.files.insert(
        path.to_string(),
        StoredFile {
            content_b64: body.content,
            sha: sha.clone(),
        },
    );

    (
        status,
        Json(json!({
            "content": entry_json(path, "file", size, &sha),
            "commit": {
                "sha": commit,
                "url": format!("https://api.example.test/commits/{commit}"),
                "message": body.message,
            },
        })),
    )
        .into_response()
}

fn remove_contents(fake: &FakeContents, path: &str, body: DeleteBody) -> Response {
    let mut inner = fake.inner.lock().unwrap();
    let Some(current) = inner.files.get(path).cloned() else {
        return error(StatusCode::NOT_FOUND, "Not Found");
    };
    if current.sha != body.sha {
        return error(
            StatusCode::CONFLICT,
            &format!("{path} does not match {}", body.sha),
        );
    }
    inner.files.remove(path);
    inner.revision += 1;
    let commit = format!("commit-{:04}", inner.revision);
    Json(json!({
        "content": null,
        "commit": {
            "sha": commit,
            "url": format!("https://api.example.test/commits/{commit}"),
            "message": body.message,
        },
    }))
    .into_response()
}

async fn get_root(
    State(fake): State<FakeContents>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(resp) = gate(&fake, &headers, &owner, &repo).await {
        return resp;
    }
    read_contents(&fake, "")
}

async fn get_path(
    State(fake): State<FakeContents>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(resp) = gate(&fake, &headers, &owner, &repo).await {
        return resp;
    }
    read_contents(&fake, path.trim_matches('/'))
}

async fn put_root(
    State(fake): State<FakeContents>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(resp) = gate(&fake, &headers, &owner, &repo).await {
        return resp;
    }
    error(StatusCode::NOT_FOUND, "Not Found")
}

async fn put_path(
    State(fake): State<FakeContents>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<PutBody>,
) -> Response {
    if let Some(resp) = gate(&fake, &headers, &owner, &repo).await {
        return resp;
    }
    write_contents(&fake, path.trim_matches('/'), body)
}

async fn delete_root(
    State(fake): State<FakeContents>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(resp) = gate(&fake, &headers, &owner, &repo).await {
        return resp;
    }
    error(StatusCode::NOT_FOUND, "Not Found")
}

async fn delete_path(
    State(fake): State<FakeContents>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<DeleteBody>,
) -> Response {
    if let Some(resp) = gate(&fake, &headers, &owner, &repo).await {
        return resp;
    }
    remove_contents(&fake, path.trim_matches('/'), body)
}

async fn list_repositories(State(fake): State<FakeContents>, headers: HeaderMap) -> Response {
    if let Some(resp) = gate(&fake, &headers, OWNER, REPO).await {
        return resp;
    }
    let repos = fake.inner.lock().unwrap().repositories.clone();
    Json(Value::Array(repos)).into_response()
}
