use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use repoedit_core::{ContentError, MutationResult, RepositoryRef, Result, RevisionTag};

use crate::cancel::maybe_cancellable;
use crate::client::ContentClient;
use crate::session::Session;

/// Working copy of one remote text file.
///
/// Holds the revision tag observed at the last read or save. `save` creates
/// the file when no tag is held and updates it otherwise; after a successful
/// save the returned tag replaces the held one. A `Conflict` leaves the tag
/// untouched so the caller can `reload` before trying again.
#[derive(Debug, Clone)]
pub struct EditorSession {
    repo: RepositoryRef,
    path: String,
    revision_tag: Option<RevisionTag>,
    text: String,
    modified: bool,
}

impl EditorSession {
    /// Start editing a file that does not exist yet.
    pub fn new_file(repo: RepositoryRef, path: impl Into<String>) -> Self {
        Self {
            repo,
            path: repoedit_core::navigation::normalize_path(&path.into()),
            revision_tag: None,
            text: String::new(),
            modified: false,
        }
    }

    /// Read `path` and start editing it.
    pub async fn open(
        client: &ContentClient,
        session: &Session,
        repo: RepositoryRef,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Self> {
        let mut editor = Self::new_file(repo, path);
        editor.reload(client, session, cancel).await?;
        Ok(editor)
    }

    /// Re-read the file, discarding local edits and adopting the current tag.
    pub async fn reload(
        &mut self,
        client: &ContentClient,
        session: &Session,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let file = maybe_cancellable(cancel, client.read(session, &self.repo, &self.path)).await?;
        let text = file.text()?.to_string();
        debug!(repo = %self.repo, path = %self.path, tag = %file.revision_tag, "loaded file");
        self.text = text;
        self.revision_tag = Some(file.revision_tag);
        self.modified = false;
        Ok(())
    }

    pub fn repo(&self) -> &RepositoryRef {
        &self.repo
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn revision_tag(&self) -> Option<&RevisionTag> {
        self.revision_tag.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_new(&self) -> bool {
        self.revision_tag.is_none()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.modified = true;
        }
    }

    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Persist the buffer with `message`.
    pub async fn save(
        &mut self,
        client: &ContentClient,
        session: &Session,
        message: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<MutationResult> {
        let outcome = match &self.revision_tag {
            None => {
                maybe_cancellable(
                    cancel,
                    client.create(session, &self.repo, &self.path, &self.text, message),
                )
                .await
            }
            Some(tag) => {
                maybe_cancellable(
                    cancel,
                    client.update(session, &self.repo, &self.path, &self.text, message, tag),
                )
                .await
            }
        };

        let result = outcome.inspect_err(|err| {
            if matches!(err, ContentError::Conflict { .. }) {
                info!(repo = %self.repo, path = %self.path, "save rejected: file changed remotely");
            }
        })?;

        if let Some(tag) = &result.new_revision_tag {
            self.revision_tag = Some(tag.clone());
        }
        self.modified = false;
        Ok(result)
    }
}
