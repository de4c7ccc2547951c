#![warn(missing_docs)]
//! Editor State - headless editor state model
//!
//! # Overview
//!
//! `editor-state` holds the pieces an editor integration plugs into: an immutable
//! [`EditorState`] backed by a [`ropey::Rope`], offset-addressed [`ChangeSet`]s, transactions with
//! [`StateEffect`]s, and [`StateField`]s that keep derived values current. A shared
//! [`EditorView`] applies dispatched transactions.
//!
//! On top of that it describes the native UI an integration produces, without rendering it:
//! completion results, hover [`Tooltip`]s, lint [`Diagnostic`]s and [`Node`] trees.
//!
//! # Quick Start
//!
//! ```rust
//! use editor_state::{ChangeSpec, EditorState, EditorStateConfig, EditorView, TransactionSpec};
//!
//! let view = EditorView::new(EditorState::create(EditorStateConfig::new("Hello")));
//! let tr = view.dispatch(TransactionSpec::new().change(ChangeSpec::insert(5, ", world")));
//!
//! assert!(tr.doc_changed());
//! assert_eq!(view.state().text(), "Hello, world");
//! ```
//!
//! # Module Description
//!
//! - [`changes`] - change specs and normalized change sets
//! - [`state`] - editor state, transactions and effects
//! - [`field`] - state fields and extensions
//! - [`language`] - language descriptors
//! - [`view`] - the shared live view
//! - [`snippet`] - snippet templates and tab-stop sessions
//! - [`autocomplete`] - completion sources and results
//! - [`tooltip`] - hover tooltips
//! - [`lint`] - diagnostics
//! - [`dom`] - presentation nodes
//!
//! All offsets are character offsets (Unicode scalar values).

pub mod autocomplete;
pub mod changes;
pub mod dom;
pub mod field;
pub mod language;
pub mod lint;
pub mod snippet;
pub mod state;
pub mod tooltip;
pub mod view;

pub use autocomplete::{
    Completion, CompletionApply, CompletionContext, CompletionInfo, CompletionResult,
    insert_completion_text,
};
pub use changes::{Assoc, ChangeSet, ChangeSpec};
pub use dom::{Element, Fragment, Node, ParentNode};
pub use field::{Extension, FieldExtension, FieldUpdate, StateField};
pub use language::Language;
pub use lint::{Diagnostic, RenderMessage, Severity};
pub use snippet::{
    Snippet, SnippetField, SnippetSession, clear_snippet, has_next_snippet_field,
    has_prev_snippet_field, next_snippet_field, prev_snippet_field, snippet,
};
pub use state::{
    EditorState, EditorStateConfig, Selection, StateEffect, Transaction, TransactionSpec,
};
pub use tooltip::{Tooltip, TooltipView};
pub use view::EditorView;

pub use ropey;
