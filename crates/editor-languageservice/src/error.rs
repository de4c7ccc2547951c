//! Error types.

use thiserror::Error;

/// Errors surfaced by the language-service adapters.
///
/// Absent and stale provider results are not errors; adapters report them as "nothing to show".
#[derive(Debug, Error)]
pub enum Error {
    /// The editor state was created without the [`text_document`](crate::text_document)
    /// extension.
    #[error("no text document is installed on this editor state; add `text_document()` to its extensions")]
    DocumentNotInstalled,

    /// A provider callback failed. The provider's error is passed through unchanged.
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
