//! The versioned text document mirrored from editor state.
//!
//! [`text_document`] installs a state field that keeps an LSP-shaped [`TextDocument`] in sync
//! with the editor: created at version 0, bumped by exactly one whenever the text or the
//! language id changes, and replaced at version 0 when the URI changes. Transactions that touch
//! none of these keep the previous document (the same `Arc`).

use crate::error::{Error, Result};
use crate::position;
use crate::protocol::{Position, Range, TextDocumentItem};
use editor_state::{
    EditorState, Extension, FieldUpdate, Language, StateField, Transaction,
};
use ropey::Rope;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Language id used when the state has no (named) language.
pub const FALLBACK_LANGUAGE_ID: &str = "plaintext";

/// An immutable snapshot of the editor document in LSP terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    version: i32,
    text: Rope,
}

impl TextDocument {
    /// Create a document.
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<Rope>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }

    /// The document URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The language id.
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// The version number.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// The text as a rope.
    pub fn text(&self) -> &Rope {
        &self.text
    }

    /// The full text.
    pub fn get_text(&self) -> String {
        self.text.to_string()
    }

    /// The text covered by `range`.
    pub fn get_text_in(&self, range: &Range) -> String {
        let (from, to) = position::offsets_for_range(&self.text, range);
        self.text.slice(from..to).to_string()
    }

    /// Number of lines. An empty document has one line.
    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Convert a position to a character offset, clamping out-of-range positions.
    pub fn offset_at(&self, position: Position) -> usize {
        position::offset_at(&self.text, position)
    }

    /// Convert a character offset to a position, clamping out-of-range offsets.
    pub fn position_at(&self, offset: usize) -> Position {
        position::position_at(&self.text, offset)
    }

    /// The document as a `TextDocumentItem`.
    pub fn to_item(&self) -> TextDocumentItem {
        TextDocumentItem {
            uri: self.uri.clone(),
            language_id: self.language_id.clone(),
            version: self.version,
            text: self.get_text(),
        }
    }
}

/// Hands out `inmemory://N` URIs with an increasing counter starting at 1.
#[derive(Debug, Default)]
pub struct UriAllocator {
    last: AtomicU64,
}

impl UriAllocator {
    /// A fresh allocator.
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// The next unused URI.
    pub fn allocate(&self) -> String {
        let n = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        format!("inmemory://{n}")
    }
}

static DEFAULT_URIS: UriAllocator = UriAllocator::new();

fn language_id(state: &EditorState) -> &str {
    state
        .language()
        .map(Language::name)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_LANGUAGE_ID)
}

struct TextDocumentField {
    uri: String,
}

impl StateField for TextDocumentField {
    type Value = TextDocument;

    fn create(&self, state: &EditorState) -> Arc<TextDocument> {
        Arc::new(TextDocument::new(
            self.uri.clone(),
            language_id(state),
            0,
            state.doc().clone(),
        ))
    }

    fn update(&self, value: &Arc<TextDocument>, update: &FieldUpdate<'_>) -> Arc<TextDocument> {
        let language_id = language_id(update.state);

        if value.uri != self.uri {
            return self.create(update.state);
        }

        if update.doc_changed() || value.language_id != language_id {
            return Arc::new(TextDocument::new(
                self.uri.clone(),
                language_id,
                value.version.wrapping_add(1),
                update.state.doc().clone(),
            ));
        }

        Arc::clone(value)
    }
}

/// Mirror the editor document as a [`TextDocument`].
///
/// Without a URI (or with an empty one) an `inmemory://N` URI is allocated from a process-wide
/// counter. Reconfiguring the state with another `text_document` extension switches the URI and
/// restarts the version at 0.
pub fn text_document(uri: Option<&str>) -> Extension {
    text_document_with(uri, &DEFAULT_URIS)
}

/// Like [`text_document`], allocating missing URIs from `allocator`.
pub fn text_document_with(uri: Option<&str>, allocator: &UriAllocator) -> Extension {
    let uri = match uri {
        Some(uri) if !uri.is_empty() => uri.to_string(),
        _ => allocator.allocate(),
    };
    Extension::field(TextDocumentField { uri })
}

/// The document mirrored on `state`.
pub fn get_text_document(state: &EditorState) -> Result<Arc<TextDocument>> {
    state
        .field::<TextDocumentField>()
        .ok_or(Error::DocumentNotInstalled)
}

/// Returns `true` if `tr` replaced the mirrored document.
pub fn document_changed(tr: &Transaction) -> bool {
    let before = tr.start_state().field::<TextDocumentField>();
    let after = tr.state().field::<TextDocumentField>();
    match (before, after) {
        (Some(before), Some(after)) => !Arc::ptr_eq(&before, &after),
        (None, None) => false,
        _ => true,
    }
}

/// Check a provider's result against the document current on `state`.
///
/// Returns `false` (and logs) when the document moved on while the provider was running.
pub(crate) fn still_current(requested: &TextDocument, state: &EditorState) -> Result<bool> {
    let current = get_text_document(state)?;
    if current.version == requested.version && current.uri == requested.uri {
        return Ok(true);
    }

    tracing::debug!(
        uri = %requested.uri,
        requested_version = requested.version,
        current_version = current.version,
        "discarding stale provider result"
    );
    Ok(false)
}
