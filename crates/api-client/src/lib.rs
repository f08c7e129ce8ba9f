//! Remote content synchronization over the repository contents API.
//!
//! [`ContentClient`] issues list/read/create/update/delete calls, each gated
//! by a [`Session`] that supplies the token. Optimistic concurrency is carried
//! entirely by the revision tag sent with each mutation; the client keeps no
//! state between calls.

pub mod browser;
pub mod cancel;
pub mod client;
pub mod editor;
pub mod session;
mod wire;

pub use browser::RepoBrowser;
pub use cancel::{CancelScope, cancellable};
pub use client::ContentClient;
pub use editor::EditorSession;
pub use repoedit_core;
pub use session::{CredentialError, CredentialStore, MemoryCredentialStore, Session};
pub use tokio_util::sync::CancellationToken;
