#![warn(missing_docs)]
//! `editor-languageservice` - LSP-shaped language providers for `editor-state`.
//!
//! This crate keeps a versioned LSP text document in sync with an editor state and adapts
//! provider callbacks (`do_complete`, `do_hover`, `do_diagnostics`) to the editor's completion,
//! tooltip and lint structures. Providers work purely in LSP terms (UTF-16 line/character
//! positions, protocol structs); the adapters do the coordinate conversion and discard answers
//! that arrive after the document has changed.
//!
//! There is no transport here: providers are in-process async callbacks.
//!
//! ```rust
//! use editor_languageservice::{get_text_document, text_document};
//! use editor_state::{EditorState, EditorStateConfig, Language};
//!
//! let state = EditorState::create(
//!     EditorStateConfig::new("{}\n")
//!         .with_extension(Language::new("json"))
//!         .with_extension(text_document(Some("file:///settings.json"))),
//! );
//!
//! let document = get_text_document(&state).unwrap();
//! assert_eq!(document.uri(), "file:///settings.json");
//! assert_eq!(document.language_id(), "json");
//! assert_eq!(document.version(), 0);
//! ```

pub mod completion;
pub mod config;
pub mod error;
pub mod hover_tooltip;
pub mod lint;
pub mod markup_content;
pub mod position;
pub mod protocol;
pub mod text_document;
pub mod text_edit;

pub use completion::{
    CompletionOptions, CompletionSource, create_completion_source,
    default_from_completion_item_kind, normalize_snippet,
};
pub use config::{CompletionSettings, DocumentSettings, LanguageServiceSettings, LintSettings};
pub use error::{Error, Result};
pub use hover_tooltip::{HoverTooltipOptions, HoverTooltipSource, create_hover_tooltip_source};
pub use lint::{
    DEPRECATED_MARK_CLASS, LintOptions, LintSource, UNNECESSARY_MARK_CLASS, create_lint_source,
    default_format_source, severity_from_lsp,
};
pub use markup_content::{MarkupOptions, from_markup_content};
pub use position::{offset_at, offsets_for_range, position_at};
pub use text_document::{
    FALLBACK_LANGUAGE_ID, TextDocument, UriAllocator, document_changed, get_text_document,
    text_document, text_document_with,
};
pub use text_edit::dispatch_text_edits;
