//! Immutable editor state and transactions.
//!
//! An [`EditorState`] is a cheap-to-clone snapshot: the document rope, the selection, the active
//! configuration and the values of all installed [`StateField`]s. Every modification goes
//! through [`EditorState::update`], which produces a [`Transaction`] holding both the start state
//! and the resulting state.

use crate::changes::{Assoc, ChangeSet, ChangeSpec};
use crate::field::{Extension, FieldExtension, FieldUpdate, FieldValue, StateField, resolve};
use crate::language::Language;
use crate::snippet::SnippetSession;
use ropey::Rope;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A selection range in character offsets. `anchor == head` is a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: usize,
    /// The moving end of the selection (where the cursor is drawn).
    pub head: usize,
}

impl Selection {
    /// A cursor at `pos`.
    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// A range from `anchor` to `head`.
    pub fn range(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// The smaller end.
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// The larger end.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Returns `true` for a cursor.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Map both ends through `changes`.
    pub fn map(&self, changes: &ChangeSet) -> Self {
        Self {
            anchor: changes.map_pos(self.anchor, Assoc::After),
            head: changes.map_pos(self.head, Assoc::After),
        }
    }

    fn clamp(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }
}

/// Initial configuration for [`EditorState::create`].
#[derive(Debug, Clone, Default)]
pub struct EditorStateConfig {
    /// Initial document text.
    pub doc: String,
    /// Initial selection. Defaults to a cursor at offset 0.
    pub selection: Option<Selection>,
    /// Installed extensions.
    pub extensions: Vec<Extension>,
}

impl EditorStateConfig {
    /// Configuration with the given document text.
    pub fn new(doc: impl Into<String>) -> Self {
        Self {
            doc: doc.into(),
            ..Self::default()
        }
    }

    /// Set the initial selection.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Add an extension.
    pub fn with_extension(mut self, extension: impl Into<Extension>) -> Self {
        self.extensions.push(extension.into());
        self
    }
}

/// A side effect carried by a transaction.
#[derive(Debug, Clone)]
pub enum StateEffect {
    /// Replace the whole configuration.
    Reconfigure(Vec<Extension>),
    /// Append extensions to the configuration.
    AppendConfig(Vec<Extension>),
    /// Install an active snippet session, replacing any current one.
    StartSnippet(SnippetSession),
    /// Drop the active snippet session.
    ClearSnippet,
}

/// Describes a transaction to apply with [`EditorState::update`].
#[derive(Debug, Clone, Default)]
pub struct TransactionSpec {
    /// Document changes, all addressing the start document.
    pub changes: Vec<ChangeSpec>,
    /// Explicit selection in post-change offsets. When absent the current selection is mapped.
    pub selection: Option<Selection>,
    /// Effects applied after the document changes.
    pub effects: Vec<StateEffect>,
}

impl TransactionSpec {
    /// An empty transaction spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one change.
    pub fn change(mut self, change: ChangeSpec) -> Self {
        self.changes.push(change);
        self
    }

    /// Add several changes.
    pub fn changes(mut self, changes: impl IntoIterator<Item = ChangeSpec>) -> Self {
        self.changes.extend(changes);
        self
    }

    /// Set the resulting selection.
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Add an effect.
    pub fn effect(mut self, effect: StateEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// The result of applying a [`TransactionSpec`].
#[derive(Debug, Clone)]
pub struct Transaction {
    start_state: EditorState,
    state: EditorState,
    changes: ChangeSet,
    reconfigured: bool,
}

impl Transaction {
    /// The state before the transaction.
    pub fn start_state(&self) -> &EditorState {
        &self.start_state
    }

    /// The state after the transaction.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Consume the transaction and return the new state.
    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// The normalized document changes.
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Returns `true` if the document changed.
    pub fn doc_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Returns `true` if the configuration was replaced or extended.
    pub fn reconfigured(&self) -> bool {
        self.reconfigured
    }
}

#[derive(Clone)]
struct FieldSlot {
    field: FieldExtension,
    value: FieldValue,
}

/// An immutable editor state snapshot.
#[derive(Clone)]
pub struct EditorState {
    doc: Rope,
    selection: Selection,
    extensions: Arc<Vec<Extension>>,
    language: Option<Language>,
    fields: Arc<HashMap<TypeId, FieldSlot>>,
    snippet: Option<Arc<SnippetSession>>,
}

impl EditorState {
    /// Create a new state from `config`.
    pub fn create(config: EditorStateConfig) -> Self {
        let doc = Rope::from_str(&config.doc);
        let len = doc.len_chars();
        let resolved = resolve(&config.extensions);

        let mut state = Self {
            doc,
            selection: config.selection.unwrap_or_default().clamp(len),
            extensions: Arc::new(config.extensions),
            language: resolved.language,
            fields: Arc::default(),
            snippet: None,
        };

        let fields = resolved
            .fields
            .into_iter()
            .map(|field| {
                let value = field.create_value(&state);
                (field.id(), FieldSlot { field, value })
            })
            .collect();
        state.fields = Arc::new(fields);

        tracing::trace!(len, "created editor state");
        state
    }

    /// The document.
    pub fn doc(&self) -> &Rope {
        &self.doc
    }

    /// The full document text.
    pub fn text(&self) -> String {
        self.doc.to_string()
    }

    /// Document length in characters.
    pub fn len_chars(&self) -> usize {
        self.doc.len_chars()
    }

    /// The text between two character offsets. Offsets are clamped and may be given in either
    /// order.
    pub fn slice_doc(&self, from: usize, to: usize) -> String {
        let len = self.doc.len_chars();
        let (a, b) = (from.min(len), to.min(len));
        self.doc.slice(a.min(b)..a.max(b)).to_string()
    }

    /// The current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The active language, if one is configured.
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// The configured extensions.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// The value of field `F`, or `None` when `F` is not installed.
    pub fn field<F: StateField>(&self) -> Option<Arc<F::Value>> {
        let slot = self.fields.get(&TypeId::of::<F>())?;
        Arc::clone(&slot.value).downcast::<F::Value>().ok()
    }

    /// The active snippet session, if any.
    pub fn snippet_session(&self) -> Option<&SnippetSession> {
        self.snippet.as_deref()
    }

    /// Apply `spec` and return the resulting transaction. `self` is left untouched.
    pub fn update(&self, spec: TransactionSpec) -> Transaction {
        let changes = ChangeSet::of(spec.changes, self.doc.len_chars());
        let mut doc = self.doc.clone();
        changes.apply_to(&mut doc);

        let mut extensions = Arc::clone(&self.extensions);
        let mut reconfigured = false;
        let mut snippet = match &self.snippet {
            Some(session) if !changes.is_empty() => Some(Arc::new(session.map(&changes))),
            other => other.clone(),
        };

        for effect in spec.effects {
            match effect {
                StateEffect::Reconfigure(next) => {
                    extensions = Arc::new(next);
                    reconfigured = true;
                }
                StateEffect::AppendConfig(more) => {
                    let mut next = extensions.as_ref().clone();
                    next.extend(more);
                    extensions = Arc::new(next);
                    reconfigured = true;
                }
                StateEffect::StartSnippet(session) => snippet = Some(Arc::new(session)),
                StateEffect::ClearSnippet => snippet = None,
            }
        }

        let (language, field_extensions) = if reconfigured {
            let resolved = resolve(&extensions);
            (resolved.language, resolved.fields)
        } else {
            let fields = self.fields.values().map(|slot| slot.field.clone()).collect();
            (self.language.clone(), fields)
        };

        let len = doc.len_chars();
        let selection = spec
            .selection
            .unwrap_or_else(|| self.selection.map(&changes))
            .clamp(len);

        let mut state = Self {
            doc,
            selection,
            extensions,
            language,
            fields: Arc::default(),
            snippet,
        };

        let update = FieldUpdate {
            start_state: self,
            state: &state,
            changes: &changes,
        };
        let fields: HashMap<TypeId, FieldSlot> = field_extensions
            .into_iter()
            .map(|field: FieldExtension| {
                let id = field.id();
                let value = match self.fields.get(&id) {
                    Some(previous) => field.update_value(&previous.value, &update),
                    None => field.create_value(update.state),
                };
                (id, FieldSlot { field, value })
            })
            .collect();
        state.fields = Arc::new(fields);

        tracing::trace!(
            changes = changes.changes().len(),
            reconfigured,
            len,
            "applied transaction"
        );

        Transaction {
            start_state: self.clone(),
            state,
            changes,
            reconfigured,
        }
    }
}

impl fmt::Debug for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorState")
            .field("doc", &self.doc.to_string())
            .field("selection", &self.selection)
            .field("language", &self.language)
            .field("fields", &self.fields.len())
            .field("snippet", &self.snippet)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_leaves_start_state_untouched() {
        let state = EditorState::create(EditorStateConfig::new("hello"));
        let tr = state.update(TransactionSpec::new().change(ChangeSpec::insert(5, " world")));

        assert_eq!(state.text(), "hello");
        assert_eq!(tr.start_state().text(), "hello");
        assert_eq!(tr.state().text(), "hello world");
        assert!(tr.doc_changed());
    }

    #[test]
    fn test_selection_mapped_and_clamped() {
        let state = EditorState::create(
            EditorStateConfig::new("abcdef").with_selection(Selection::cursor(4)),
        );
        let tr = state.update(TransactionSpec::new().change(ChangeSpec::delete(0, 2)));
        assert_eq!(tr.state().selection(), Selection::cursor(2));

        let tr = state.update(TransactionSpec::new().selection(Selection::cursor(99)));
        assert_eq!(tr.state().selection(), Selection::cursor(6));
    }

    #[test]
    fn test_slice_doc_clamps() {
        let state = EditorState::create(EditorStateConfig::new("héllo"));
        assert_eq!(state.slice_doc(1, 3), "él");
        assert_eq!(state.slice_doc(3, 1), "él");
        assert_eq!(state.slice_doc(2, 50), "llo");
    }

    #[test]
    fn test_last_language_wins() {
        let state = EditorState::create(
            EditorStateConfig::new("")
                .with_extension(Language::new("json"))
                .with_extension(vec![Extension::from(Language::new("yaml"))]),
        );
        assert_eq!(state.language().map(Language::name), Some("yaml"));

        let tr = state.update(TransactionSpec::new().effect(StateEffect::Reconfigure(vec![])));
        assert!(tr.reconfigured());
        assert!(tr.state().language().is_none());
    }

    #[test]
    fn test_append_config_extends_extensions() {
        let state = EditorState::create(
            EditorStateConfig::new("").with_extension(Language::new("json")),
        );
        assert_eq!(state.extensions().len(), 1);

        let tr = state.update(
            TransactionSpec::new()
                .effect(StateEffect::AppendConfig(vec![Language::new("toml").into()])),
        );
        assert!(tr.reconfigured());
        assert_eq!(tr.state().extensions().len(), 2);
        assert_eq!(tr.state().language().map(Language::name), Some("toml"));
        assert_eq!(state.extensions().len(), 1);
    }
}
