//! Editing-session state for client-side editors (the resume builder being
//! the main one). A session is an explicit container the caller owns and
//! passes around; persistence goes through a [`DraftStore`].

mod router;
mod session;
mod store;

pub use router::draft_router;
pub use session::DraftSession;
pub use store::{DraftStore, FileDraftStore, MemoryDraftStore};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft key '{0}' must be non-empty and use only letters, digits, '-' or '_'")]
    InvalidKey(String),
    #[error("failed to access draft file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("draft payload is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("draft store unavailable: {0}")]
    Unavailable(String),
}

pub(crate) fn validate_key(key: &str) -> Result<(), DraftError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(DraftError::InvalidKey(key.to_string()))
    }
}
