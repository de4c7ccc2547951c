use editor_languageservice::protocol::{Position, TextDocumentItem};
use editor_languageservice::{
    DocumentSettings, Error, LanguageServiceSettings, UriAllocator, document_changed,
    get_text_document, text_document, text_document_with,
};
use editor_state::{
    ChangeSpec, EditorState, EditorStateConfig, Language, Selection, StateEffect, TransactionSpec,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn uri_number(uri: &str) -> u64 {
    uri.strip_prefix("inmemory://")
        .and_then(|n| n.parse().ok())
        .expect("in-memory uri")
}

#[test]
fn test_created_at_version_zero() {
    let state = EditorState::create(
        EditorStateConfig::new("Text\n")
            .with_extension(Language::new("markdown"))
            .with_extension(text_document(Some("file:///readme.md"))),
    );

    let document = get_text_document(&state).unwrap();
    assert_eq!(
        document.to_item(),
        TextDocumentItem {
            uri: "file:///readme.md".to_string(),
            language_id: "markdown".to_string(),
            version: 0,
            text: "Text\n".to_string(),
        }
    );
}

#[test]
fn test_language_falls_back_to_plaintext() {
    let state = EditorState::create(
        EditorStateConfig::new("").with_extension(text_document(Some("file:///a"))),
    );
    assert_eq!(get_text_document(&state).unwrap().language_id(), "plaintext");

    let anonymous = EditorState::create(
        EditorStateConfig::new("")
            .with_extension(Language::new(""))
            .with_extension(text_document(Some("file:///a"))),
    );
    assert_eq!(
        get_text_document(&anonymous).unwrap().language_id(),
        "plaintext"
    );
}

#[test]
fn test_auto_uris_increase() {
    let allocator = UriAllocator::new();
    let first = EditorState::create(
        EditorStateConfig::new("").with_extension(text_document_with(None, &allocator)),
    );
    let second = EditorState::create(
        EditorStateConfig::new("").with_extension(text_document_with(Some(""), &allocator)),
    );
    assert_eq!(get_text_document(&first).unwrap().uri(), "inmemory://1");
    assert_eq!(get_text_document(&second).unwrap().uri(), "inmemory://2");

    // The process-wide allocator is shared with other tests, so only ordering is checked.
    let a = EditorState::create(EditorStateConfig::new("").with_extension(text_document(None)));
    let b = EditorState::create(EditorStateConfig::new("").with_extension(text_document(None)));
    let a = uri_number(get_text_document(&a).unwrap().uri());
    let b = uri_number(get_text_document(&b).unwrap().uri());
    assert!(b > a);
}

#[test]
fn test_version_bumps_on_text_change() {
    let state = EditorState::create(
        EditorStateConfig::new("Hello").with_extension(text_document(Some("file:///a"))),
    );

    let tr = state.update(TransactionSpec::new().change(ChangeSpec::insert(5, "!")));
    let document = get_text_document(tr.state()).unwrap();
    assert!(document_changed(&tr));
    assert_eq!(document.version(), 1);
    assert_eq!(document.get_text(), "Hello!");

    let tr = tr
        .state()
        .update(TransactionSpec::new().change(ChangeSpec::delete(0, 1)));
    assert_eq!(get_text_document(tr.state()).unwrap().version(), 2);
}

#[test]
fn test_unrelated_transaction_keeps_document() {
    let state = EditorState::create(
        EditorStateConfig::new("Hello").with_extension(text_document(Some("file:///a"))),
    );

    let tr = state.update(TransactionSpec::new().selection(Selection::cursor(2)));
    let before = get_text_document(&state).unwrap();
    let after = get_text_document(tr.state()).unwrap();

    assert!(!document_changed(&tr));
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_version_bumps_on_language_change() {
    let mirror = text_document(Some("file:///a"));
    let state = EditorState::create(EditorStateConfig::new("{}").with_extension(mirror.clone()));

    let tr = state.update(TransactionSpec::new().effect(StateEffect::Reconfigure(vec![
        Language::new("json").into(),
        mirror.clone(),
    ])));
    let document = get_text_document(tr.state()).unwrap();
    assert_eq!(document.version(), 1);
    assert_eq!(document.language_id(), "json");

    // Same configuration again: nothing relevant changed.
    let again = tr.state().update(TransactionSpec::new().effect(StateEffect::Reconfigure(vec![
        Language::new("json").into(),
        mirror,
    ])));
    assert!(!document_changed(&again));
}

#[test]
fn test_uri_change_resets_version() {
    let state = EditorState::create(
        EditorStateConfig::new("x").with_extension(text_document(Some("file:///a"))),
    );
    let edited = state
        .update(TransactionSpec::new().change(ChangeSpec::insert(1, "y")))
        .into_state();
    assert_eq!(get_text_document(&edited).unwrap().version(), 1);

    let tr = edited.update(
        TransactionSpec::new()
            .change(ChangeSpec::insert(2, "z"))
            .effect(StateEffect::Reconfigure(vec![text_document(Some(
                "file:///b",
            ))])),
    );
    let document = get_text_document(tr.state()).unwrap();
    assert_eq!(document.uri(), "file:///b");
    assert_eq!(document.version(), 0);
    assert_eq!(document.get_text(), "xyz");
}

#[test]
fn test_document_settings_extension() {
    let settings: LanguageServiceSettings =
        serde_json::from_value(json!({ "document": { "uri": "file:///from-settings" } }))
            .unwrap();
    let state = EditorState::create(
        EditorStateConfig::new("").with_extension(settings.document.extension()),
    );
    assert_eq!(
        get_text_document(&state).unwrap().uri(),
        "file:///from-settings"
    );

    let allocator = UriAllocator::new();
    let state = EditorState::create(
        EditorStateConfig::new("")
            .with_extension(DocumentSettings::default().extension_with(&allocator)),
    );
    assert_eq!(get_text_document(&state).unwrap().uri(), "inmemory://1");
}

#[test]
fn test_not_installed() {
    let state = EditorState::create(EditorStateConfig::new(""));
    assert!(matches!(
        get_text_document(&state),
        Err(Error::DocumentNotInstalled)
    ));
}

#[test]
fn test_position_helpers() {
    let state = EditorState::create(
        EditorStateConfig::new("ab\ncd\n").with_extension(text_document(Some("file:///a"))),
    );
    let document = get_text_document(&state).unwrap();

    assert_eq!(document.line_count(), 3);
    assert_eq!(document.position_at(4), Position::new(1, 1));
    assert_eq!(document.offset_at(Position::new(1, 1)), 4);
    assert_eq!(document.offset_at(Position::new(0, 99)), 2);
    for offset in 0..=6 {
        assert_eq!(document.offset_at(document.position_at(offset)), offset);
    }
}
