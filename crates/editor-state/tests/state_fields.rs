use editor_state::{
    ChangeSpec, EditorState, EditorStateConfig, Extension, FieldUpdate, Language, StateEffect,
    StateField, TransactionSpec,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Counts document-changing transactions.
struct EditCount;

impl StateField for EditCount {
    type Value = usize;

    fn create(&self, _state: &EditorState) -> Arc<usize> {
        Arc::new(0)
    }

    fn update(&self, value: &Arc<usize>, update: &FieldUpdate<'_>) -> Arc<usize> {
        if update.doc_changed() {
            Arc::new(**value + 1)
        } else {
            Arc::clone(value)
        }
    }
}

/// Remembers the label it was configured with, keeping the old value's counter.
struct Labelled(&'static str);

impl StateField for Labelled {
    type Value = (String, usize);

    fn create(&self, _state: &EditorState) -> Arc<(String, usize)> {
        Arc::new((self.0.to_string(), 0))
    }

    fn update(
        &self,
        value: &Arc<(String, usize)>,
        update: &FieldUpdate<'_>,
    ) -> Arc<(String, usize)> {
        if value.0 == self.0 && !update.doc_changed() {
            return Arc::clone(value);
        }
        Arc::new((self.0.to_string(), value.1 + 1))
    }
}

#[test]
fn test_field_tracks_document_changes() {
    let state = EditorState::create(
        EditorStateConfig::new("one").with_extension(Extension::field(EditCount)),
    );
    assert_eq!(state.field::<EditCount>().as_deref(), Some(&0));

    let tr = state.update(TransactionSpec::new().change(ChangeSpec::insert(3, " two")));
    let changed = tr.into_state();
    assert_eq!(changed.field::<EditCount>().as_deref(), Some(&1));

    let tr = changed.update(TransactionSpec::new());
    assert!(!tr.doc_changed());
    let before = changed.field::<EditCount>();
    let after = tr.state().field::<EditCount>();
    assert!(matches!((before, after), (Some(a), Some(b)) if Arc::ptr_eq(&a, &b)));
}

#[test]
fn test_missing_field_is_none() {
    let state = EditorState::create(EditorStateConfig::new(""));
    assert!(state.field::<EditCount>().is_none());
}

#[test]
fn test_reconfigure_hands_value_to_new_instance() {
    let state = EditorState::create(
        EditorStateConfig::new("")
            .with_extension(Language::new("json"))
            .with_extension(Extension::field(Labelled("a"))),
    );
    assert_eq!(
        state.field::<Labelled>().as_deref(),
        Some(&("a".to_string(), 0))
    );

    let tr = state.update(TransactionSpec::new().effect(StateEffect::Reconfigure(vec![
        Language::new("json").into(),
        Extension::field(Labelled("b")),
    ])));
    assert!(tr.reconfigured());
    assert_eq!(
        tr.state().field::<Labelled>().as_deref(),
        Some(&("b".to_string(), 1))
    );
}

#[test]
fn test_append_config_creates_new_field() {
    let state = EditorState::create(EditorStateConfig::new("x"));
    let tr = state.update(
        TransactionSpec::new()
            .change(ChangeSpec::insert(1, "y"))
            .effect(StateEffect::AppendConfig(vec![Extension::field(EditCount)])),
    );

    // Created against the new state rather than updated.
    assert_eq!(tr.state().field::<EditCount>().as_deref(), Some(&0));
    assert_eq!(tr.state().text(), "xy");
}

#[test]
fn test_reconfigure_drops_removed_field() {
    let state = EditorState::create(
        EditorStateConfig::new("").with_extension(Extension::field(EditCount)),
    );
    let tr = state.update(TransactionSpec::new().effect(StateEffect::Reconfigure(Vec::new())));
    assert!(tr.state().field::<EditCount>().is_none());
}
