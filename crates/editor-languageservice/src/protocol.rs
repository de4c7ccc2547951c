//! LSP data model.
//!
//! The subset of Language Server Protocol 3.17 shapes that providers exchange with the adapters.
//! Field names serialize in camelCase, so values can be built directly or deserialized from
//! `serde_json::Value` payloads produced by an existing language service.
//!
//! Numeric protocol enums are open newtypes with associated constants: values this crate does not
//! know about still round-trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $value:expr,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            $($(#[$variant_meta])* pub const $variant: Self = Self($value);)*
        }
    };
}

/// A zero-based line/character position. `character` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-based).
    pub line: u32,
    /// Character offset in UTF-16 code units (0-based).
    pub character: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range between two positions; `end` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a range.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A textual replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    /// The range to replace.
    pub range: Range,
    /// The replacement text.
    pub new_text: String,
}

impl TextEdit {
    /// Create a text edit.
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

/// A completion edit with separate insert and replace ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertReplaceEdit {
    /// The replacement text.
    pub new_text: String,
    /// The range used when inserting.
    pub insert: Range,
    /// The range used when replacing.
    pub replace: Range,
}

/// The edit carried by a completion item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionTextEdit {
    /// A single range.
    Edit(TextEdit),
    /// Separate insert and replace ranges.
    InsertAndReplace(InsertReplaceEdit),
}

impl CompletionTextEdit {
    /// The replacement text.
    pub fn new_text(&self) -> &str {
        match self {
            Self::Edit(edit) => &edit.new_text,
            Self::InsertAndReplace(edit) => &edit.new_text,
        }
    }

    /// The range the edit applies to. For insert/replace edits this is the insert range.
    pub fn range(&self) -> Range {
        match self {
            Self::Edit(edit) => edit.range,
            Self::InsertAndReplace(edit) => edit.insert,
        }
    }
}

impl From<TextEdit> for CompletionTextEdit {
    fn from(edit: TextEdit) -> Self {
        Self::Edit(edit)
    }
}

impl From<InsertReplaceEdit> for CompletionTextEdit {
    fn from(edit: InsertReplaceEdit) -> Self {
        Self::InsertAndReplace(edit)
    }
}

open_enum! {
    /// The kind of a completion item.
    CompletionItemKind {
        /// `Text`
        TEXT = 1,
        /// `Method`
        METHOD = 2,
        /// `Function`
        FUNCTION = 3,
        /// `Constructor`
        CONSTRUCTOR = 4,
        /// `Field`
        FIELD = 5,
        /// `Variable`
        VARIABLE = 6,
        /// `Class`
        CLASS = 7,
        /// `Interface`
        INTERFACE = 8,
        /// `Module`
        MODULE = 9,
        /// `Property`
        PROPERTY = 10,
        /// `Unit`
        UNIT = 11,
        /// `Value`
        VALUE = 12,
        /// `Enum`
        ENUM = 13,
        /// `Keyword`
        KEYWORD = 14,
        /// `Snippet`
        SNIPPET = 15,
        /// `Color`
        COLOR = 16,
        /// `File`
        FILE = 17,
        /// `Reference`
        REFERENCE = 18,
        /// `Folder`
        FOLDER = 19,
        /// `EnumMember`
        ENUM_MEMBER = 20,
        /// `Constant`
        CONSTANT = 21,
        /// `Struct`
        STRUCT = 22,
        /// `Event`
        EVENT = 23,
        /// `Operator`
        OPERATOR = 24,
        /// `TypeParameter`
        TYPE_PARAMETER = 25,
    }
}

open_enum! {
    /// Whether insert text is plain text or a snippet.
    InsertTextFormat {
        /// Plain text.
        PLAIN_TEXT = 1,
        /// A snippet with `$1` / `${1:placeholder}` fields.
        SNIPPET = 2,
    }
}

open_enum! {
    /// How completion was triggered.
    CompletionTriggerKind {
        /// Explicitly invoked.
        INVOKED = 1,
        /// Triggered by typing a trigger character.
        TRIGGER_CHARACTER = 2,
        /// Re-triggered because the previous list was incomplete.
        TRIGGER_FOR_INCOMPLETE_COMPLETIONS = 3,
    }
}

open_enum! {
    /// Diagnostic severity.
    DiagnosticSeverity {
        /// Error.
        ERROR = 1,
        /// Warning.
        WARNING = 2,
        /// Information.
        INFORMATION = 3,
        /// Hint.
        HINT = 4,
    }
}

open_enum! {
    /// Extra classification of a diagnostic.
    DiagnosticTag {
        /// Unused or unnecessary code.
        UNNECESSARY = 1,
        /// Deprecated or obsolete code.
        DEPRECATED = 2,
    }
}

/// Completion request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionContext {
    /// How completion was triggered.
    pub trigger_kind: CompletionTriggerKind,
    /// The typed character, for [`CompletionTriggerKind::TRIGGER_CHARACTER`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_character: Option<String>,
}

/// The format of [`MarkupContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupKind {
    /// Plain text.
    PlainText,
    /// Markdown.
    Markdown,
}

/// A string with a markup kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkupContent {
    /// The format of `value`.
    pub kind: MarkupKind,
    /// The content.
    pub value: String,
}

impl MarkupContent {
    /// Markdown content.
    pub fn markdown(value: impl Into<String>) -> Self {
        Self {
            kind: MarkupKind::Markdown,
            value: value.into(),
        }
    }

    /// Plain-text content.
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self {
            kind: MarkupKind::PlainText,
            value: value.into(),
        }
    }
}

/// Deprecated hover content: markdown, or a code block in a language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkedString {
    /// A markdown string.
    String(String),
    /// A code block.
    LanguageString(LanguageString),
}

/// A code block with a language identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageString {
    /// Language identifier (for example `"json"`).
    pub language: String,
    /// The code.
    pub value: String,
}

/// Content accepted by the markup renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoverContents {
    /// Markup content.
    Markup(MarkupContent),
    /// Several marked strings, rendered in order.
    Array(Vec<MarkedString>),
    /// A single marked string.
    Scalar(MarkedString),
}

impl From<MarkupContent> for HoverContents {
    fn from(content: MarkupContent) -> Self {
        Self::Markup(content)
    }
}

impl From<MarkedString> for HoverContents {
    fn from(content: MarkedString) -> Self {
        Self::Scalar(content)
    }
}

impl From<String> for HoverContents {
    fn from(content: String) -> Self {
        Self::Scalar(MarkedString::String(content))
    }
}

impl From<&str> for HoverContents {
    fn from(content: &str) -> Self {
        Self::from(content.to_string())
    }
}

/// Completion item documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Documentation {
    /// A plain string (rendered as markdown).
    String(String),
    /// Markup content.
    Markup(MarkupContent),
}

impl From<Documentation> for HoverContents {
    fn from(documentation: Documentation) -> Self {
        match documentation {
            Documentation::String(value) => Self::from(value),
            Documentation::Markup(markup) => Self::Markup(markup),
        }
    }
}

/// A hover result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hover {
    /// The hover content.
    pub contents: HoverContents,
    /// The range the hover applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

/// A completion candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    /// Display label.
    pub label: String,
    /// Item kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CompletionItemKind>,
    /// Short detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
    /// Sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    /// Filter key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    /// Text to insert when there is no edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    /// Format of the insert text or edit text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text_format: Option<InsertTextFormat>,
    /// Structured edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_edit: Option<CompletionTextEdit>,
    /// Replacement text used with the list's default edit range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_edit_text: Option<String>,
    /// Extra edits unrelated to the cursor position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_text_edits: Option<Vec<TextEdit>>,
    /// Characters that accept this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_characters: Option<Vec<String>>,
    /// Opaque provider data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CompletionItem {
    /// An item with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// Defaults shared by all items of a [`CompletionList`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItemDefaults {
    /// Default commit characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_characters: Option<Vec<String>>,
    /// Default insert text format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text_format: Option<InsertTextFormat>,
    /// Default opaque data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A completion list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionList {
    /// Whether typing further should re-request completions.
    #[serde(default)]
    pub is_incomplete: bool,
    /// Defaults applied to items that omit the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_defaults: Option<CompletionItemDefaults>,
    /// The items.
    pub items: Vec<CompletionItem>,
}

/// What a completion provider may return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionResponse {
    /// Bare items.
    Items(Vec<CompletionItem>),
    /// Items with shared defaults.
    List(CompletionList),
}

impl CompletionResponse {
    /// Split into items and optional defaults.
    pub fn into_parts(self) -> (Vec<CompletionItem>, Option<CompletionItemDefaults>) {
        match self {
            Self::Items(items) => (items, None),
            Self::List(list) => (list.items, list.item_defaults),
        }
    }
}

impl From<Vec<CompletionItem>> for CompletionResponse {
    fn from(items: Vec<CompletionItem>) -> Self {
        Self::Items(items)
    }
}

impl From<CompletionList> for CompletionResponse {
    fn from(list: CompletionList) -> Self {
        Self::List(list)
    }
}

/// A diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    /// A numeric code.
    Number(i32),
    /// A string code.
    String(String),
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// A link to documentation for a diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeDescription {
    /// The link target.
    pub href: String,
}

/// A diagnostic reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The affected range.
    pub range: Range,
    /// Severity; treated as an error when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosticSeverity>,
    /// Machine-readable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<NumberOrString>,
    /// Link describing the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_description: Option<CodeDescription>,
    /// Human-readable source (for example `"spell"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The message.
    pub message: String,
    /// Extra classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<DiagnosticTag>>,
    /// Opaque provider data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A full text document as sent in `textDocument/didOpen`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentItem {
    /// Document URI.
    pub uri: String,
    /// Language identifier.
    pub language_id: String,
    /// Document version.
    pub version: i32,
    /// Full content.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_response_shapes() {
        let items: CompletionResponse =
            serde_json::from_value(json!([{ "label": "a" }])).expect("items");
        assert_eq!(items, CompletionResponse::Items(vec![CompletionItem::new("a")]));

        let list: CompletionResponse = serde_json::from_value(json!({
            "isIncomplete": false,
            "itemDefaults": { "commitCharacters": ["a"], "insertTextFormat": 2 },
            "items": [{ "label": "b", "kind": 99 }]
        }))
        .expect("list");
        let (items, defaults) = list.into_parts();
        assert_eq!(items[0].kind, Some(CompletionItemKind(99)));
        let defaults = defaults.expect("defaults");
        assert_eq!(defaults.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(defaults.commit_characters, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_completion_text_edit_variants() {
        let edit: CompletionTextEdit = serde_json::from_value(json!({
            "newText": "x",
            "insert": { "start": { "line": 0, "character": 1 }, "end": { "line": 0, "character": 2 } },
            "replace": { "start": { "line": 0, "character": 1 }, "end": { "line": 0, "character": 4 } }
        }))
        .expect("insert/replace edit");
        assert!(matches!(edit, CompletionTextEdit::InsertAndReplace(_)));
        assert_eq!(edit.range(), Range::new(Position::new(0, 1), Position::new(0, 2)));
    }

    #[test]
    fn test_hover_contents_shapes() {
        let markup: HoverContents =
            serde_json::from_value(json!({ "kind": "plaintext", "value": "x" })).expect("markup");
        assert_eq!(markup, HoverContents::Markup(MarkupContent::plaintext("x")));

        let code: HoverContents =
            serde_json::from_value(json!({ "language": "js", "value": "1" })).expect("code");
        assert!(matches!(
            code,
            HoverContents::Scalar(MarkedString::LanguageString(_))
        ));

        let array: HoverContents =
            serde_json::from_value(json!(["a", { "language": "js", "value": "1" }]))
                .expect("array");
        assert!(matches!(array, HoverContents::Array(ref parts) if parts.len() == 2));
    }

    #[test]
    fn test_diagnostic_skips_absent_fields() {
        let diagnostic = Diagnostic {
            message: "oops".to_string(),
            code: Some(NumberOrString::Number(7)),
            ..Diagnostic::default()
        };
        assert_eq!(
            serde_json::to_value(&diagnostic).expect("serialize"),
            json!({
                "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 0, "character": 0 } },
                "code": 7,
                "message": "oops"
            })
        );
    }
}
