pub mod codec;
pub mod error;
pub mod model;
pub mod navigation;
pub mod ordering;
pub mod token;

pub use codec::{DecodeError, PayloadEncoding};
pub use error::{CallKind, ContentError, ErrorKind, Result};
pub use model::{
    EntryKind, FileContent, MutationResult, PathEntry, RepositoryRef, RepositoryRefError,
    RepositorySummary, RevisionTag,
};
pub use navigation::{Breadcrumb, PathStack};
pub use token::{Token, TokenError};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
