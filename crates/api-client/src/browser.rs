use tracing::debug;

use repoedit_core::{Breadcrumb, PathEntry, PathStack, RepositoryRef, Result};

use crate::cancel::{CancelScope, maybe_cancellable};
use crate::client::ContentClient;
use crate::session::Session;

/// Directory navigation over one repository.
///
/// Nothing is cached: every move re-queries the listing. When a move fails
/// the path stack is put back, so `current_path()` always names the
/// directory whose listing was last returned.
pub struct RepoBrowser {
    client: ContentClient,
    session: Session,
    repo: RepositoryRef,
    stack: PathStack,
    cancel: Option<CancelScope>,
}

impl RepoBrowser {
    pub fn new(client: ContentClient, session: Session, repo: RepositoryRef) -> Self {
        Self {
            client,
            session,
            repo,
            stack: PathStack::new(),
            cancel: None,
        }
    }

    /// Make every listing cancellable through `scope`. Each listing takes
    /// its own token, so an interrupted move does not poison later ones.
    pub fn with_cancellation(mut self, scope: CancelScope) -> Self {
        self.cancel = Some(scope);
        self
    }

    pub fn repo(&self) -> &RepositoryRef {
        &self.repo
    }

    pub fn current_path(&self) -> String {
        self.stack.current()
    }

    pub fn is_root(&self) -> bool {
        self.stack.is_root()
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.stack.breadcrumbs()
    }

    /// Path of a child of the current directory, for opening files.
    pub fn child_path(&self, name: &str) -> String {
        self.stack.child_path(name)
    }

    /// Re-list the current directory.
    pub async fn refresh(&self) -> Result<Vec<PathEntry>> {
        let path = self.stack.current();
        debug!(repo = %self.repo, path = %path, "listing");
        let token = self.cancel.as_ref().map(CancelScope::token);
        maybe_cancellable(
            token.as_ref(),
            self.client.list(&self.session, &self.repo, &path),
        )
        .await
    }

    /// Descend into a child directory.
    pub async fn open_dir(&mut self, name: &str) -> Result<Vec<PathEntry>> {
        self.navigate(|stack| stack.enter(name)).await
    }

    /// Go to the parent directory. At the root this simply re-lists.
    pub async fn go_up(&mut self) -> Result<Vec<PathEntry>> {
        self.navigate(|stack| {
            stack.up();
        })
        .await
    }

    /// Jump back to a breadcrumb (0 = root).
    pub async fn go_to_crumb(&mut self, depth: usize) -> Result<Vec<PathEntry>> {
        self.navigate(|stack| stack.jump_to(depth)).await
    }

    pub async fn go_root(&mut self) -> Result<Vec<PathEntry>> {
        self.navigate(PathStack::reset).await
    }

    async fn navigate(&mut self, step: impl FnOnce(&mut PathStack)) -> Result<Vec<PathEntry>> {
        let previous = self.stack.clone();
        step(&mut self.stack);
        match self.refresh().await {
            Ok(entries) => Ok(entries),
            Err(err) => {
                debug!(
                    repo = %self.repo,
                    attempted = %self.stack.current(),
                    kind = ?err.kind(),
                    "navigation failed, restoring path"
                );
                self.stack = previous;
                Err(err)
            }
        }
    }
}
