//! State fields and extensions.
//!
//! A [`StateField`] derives a value from an [`EditorState`] and keeps it current across
//! transactions. Fields are installed through [`Extension`]s, stored type-erased per field type,
//! and read back with [`EditorState::field`].

use crate::changes::ChangeSet;
use crate::language::Language;
use crate::state::EditorState;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Context passed to [`StateField::update`].
pub struct FieldUpdate<'a> {
    /// The state the transaction started from.
    pub start_state: &'a EditorState,
    /// The new state. Its document, selection, language and extensions are final; other field
    /// values are not available yet.
    pub state: &'a EditorState,
    /// The changes applied by the transaction.
    pub changes: &'a ChangeSet,
}

impl FieldUpdate<'_> {
    /// Returns `true` if the transaction changed the document.
    pub fn doc_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// A value derived from editor state and maintained across transactions.
///
/// The field type itself is the key: installing two instances of the same type keeps the last
/// one. On reconfiguration the new instance receives the value computed by the old one, so a
/// field can react to its own configuration changing.
pub trait StateField: Send + Sync + 'static {
    /// The stored value.
    type Value: Send + Sync + 'static;

    /// Compute the initial value for a state that did not carry this field before.
    fn create(&self, state: &EditorState) -> Arc<Self::Value>;

    /// Compute the value after a transaction. Returning a clone of `value` keeps the previous
    /// value (and its identity).
    fn update(&self, value: &Arc<Self::Value>, update: &FieldUpdate<'_>) -> Arc<Self::Value>;
}

pub(crate) type FieldValue = Arc<dyn Any + Send + Sync>;

trait ErasedField: Send + Sync {
    fn field_id(&self) -> TypeId;
    fn create_value(&self, state: &EditorState) -> FieldValue;
    fn update_value(&self, value: &FieldValue, update: &FieldUpdate<'_>) -> FieldValue;
}

impl<F: StateField> ErasedField for F {
    fn field_id(&self) -> TypeId {
        TypeId::of::<F>()
    }

    fn create_value(&self, state: &EditorState) -> FieldValue {
        self.create(state)
    }

    fn update_value(&self, value: &FieldValue, update: &FieldUpdate<'_>) -> FieldValue {
        match Arc::clone(value).downcast::<F::Value>() {
            Ok(typed) => self.update(&typed, update),
            Err(_) => self.create(update.state),
        }
    }
}

/// A type-erased installed field.
#[derive(Clone)]
pub struct FieldExtension {
    inner: Arc<dyn ErasedField>,
    name: &'static str,
}

impl FieldExtension {
    pub(crate) fn id(&self) -> TypeId {
        self.inner.field_id()
    }

    pub(crate) fn create_value(&self, state: &EditorState) -> FieldValue {
        self.inner.create_value(state)
    }

    pub(crate) fn update_value(&self, value: &FieldValue, update: &FieldUpdate<'_>) -> FieldValue {
        self.inner.update_value(value, update)
    }
}

impl fmt::Debug for FieldExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldExtension").field(&self.name).finish()
    }
}

/// Configuration installed on an editor state.
#[derive(Debug, Clone)]
pub enum Extension {
    /// Sets the active language. The last language in the configuration wins.
    Language(Language),
    /// Installs a state field.
    Field(FieldExtension),
    /// A nested list of extensions.
    Group(Vec<Extension>),
}

impl Extension {
    /// Wrap a state field as an extension.
    pub fn field<F: StateField>(field: F) -> Self {
        Self::Field(FieldExtension {
            inner: Arc::new(field),
            name: std::any::type_name::<F>(),
        })
    }
}

impl From<Language> for Extension {
    fn from(language: Language) -> Self {
        Self::Language(language)
    }
}

impl From<Vec<Extension>> for Extension {
    fn from(extensions: Vec<Extension>) -> Self {
        Self::Group(extensions)
    }
}

/// The result of flattening a configuration.
#[derive(Default)]
pub(crate) struct ResolvedConfig {
    pub(crate) language: Option<Language>,
    pub(crate) fields: Vec<FieldExtension>,
}

pub(crate) fn resolve(extensions: &[Extension]) -> ResolvedConfig {
    fn walk(extensions: &[Extension], out: &mut ResolvedConfig) {
        for extension in extensions {
            match extension {
                Extension::Language(language) => out.language = Some(language.clone()),
                Extension::Field(field) => {
                    let id = field.id();
                    out.fields.retain(|existing| existing.id() != id);
                    out.fields.push(field.clone());
                }
                Extension::Group(group) => walk(group, out),
            }
        }
    }

    let mut out = ResolvedConfig::default();
    walk(extensions, &mut out);
    out
}
