//! Deserializable settings.
//!
//! Hosts that keep editor configuration in JSON (or any serde format) can load a
//! [`LanguageServiceSettings`] and apply its sections to the adapter options. Every field is
//! optional; absent fields leave the options untouched.

use crate::text_document::{UriAllocator, text_document, text_document_with};
use editor_state::Extension;
use serde::{Deserialize, Serialize};

/// Settings for all adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageServiceSettings {
    /// Document mirror settings.
    pub document: DocumentSettings,
    /// Completion settings.
    pub completion: CompletionSettings,
    /// Lint settings.
    pub lint: LintSettings,
}

/// Document mirror settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSettings {
    /// Document URI. An `inmemory://N` URI is allocated when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl DocumentSettings {
    /// The document mirror extension for these settings.
    pub fn extension(&self) -> Extension {
        text_document(self.uri.as_deref())
    }

    /// Like [`DocumentSettings::extension`], allocating a missing URI from `allocator`.
    pub fn extension_with(&self, allocator: &UriAllocator) -> Extension {
        text_document_with(self.uri.as_deref(), allocator)
    }
}

/// Completion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionSettings {
    /// Section name for all completions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Extra trigger characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_characters: Option<String>,
}

/// Lint settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LintSettings {
    /// Base marker class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_class: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_settings_default_the_rest() {
        let settings: LanguageServiceSettings = serde_json::from_value(json!({
            "completion": { "triggerCharacters": ".:" },
            "lint": { "markClass": "squiggle" }
        }))
        .expect("settings");

        assert_eq!(settings.document, DocumentSettings::default());
        assert_eq!(settings.completion.trigger_characters.as_deref(), Some(".:"));
        assert_eq!(settings.completion.section, None);
        assert_eq!(settings.lint.mark_class.as_deref(), Some("squiggle"));
    }

    #[test]
    fn test_empty_object() {
        let settings: LanguageServiceSettings =
            serde_json::from_value(json!({})).expect("settings");
        assert_eq!(settings, LanguageServiceSettings::default());
    }
}
