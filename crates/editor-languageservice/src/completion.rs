//! Completion adapter.
//!
//! [`create_completion_source`] turns a `do_complete` provider into a source the editor queries
//! on typing or explicit invocation. The adapter:
//!
//! - decides whether an implicit request is worth making (the character before the cursor must
//!   be a trigger character: ASCII letters plus configured extras)
//! - calls the provider with the mirrored document and an LSP position
//! - drops the answer if the document changed while the provider was running
//! - converts items into editor completions, tracking the overall replaced span

use crate::config::CompletionSettings;
use crate::error::Result;
use crate::markup_content::{MarkupOptions, from_markup_content};
use crate::protocol::{
    CompletionContext as LspCompletionContext, CompletionItem, CompletionItemDefaults,
    CompletionItemKind, CompletionResponse, CompletionTriggerKind, HoverContents,
    InsertTextFormat, Position,
};
use crate::text_document::{TextDocument, get_text_document, still_current};
use editor_state::{
    Completion, CompletionApply, CompletionContext, CompletionInfo, CompletionResult, EditorView,
    Fragment, insert_completion_text, snippet,
};
use regex::Regex;
use std::future::Future;
use std::rc::Rc;
use std::sync::{Arc, LazyLock};

const DEFAULT_TRIGGER_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

static BARE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("valid placeholder regex"));

type KindMapper = Rc<dyn Fn(Option<CompletionItemKind>) -> Option<String>>;

/// Map an LSP completion item kind to an editor completion kind.
///
/// `File`, `Folder`, unknown kinds and a missing kind map to `None`.
pub fn default_from_completion_item_kind(kind: Option<CompletionItemKind>) -> Option<String> {
    let name = match kind? {
        CompletionItemKind::TEXT | CompletionItemKind::SNIPPET => "text",
        CompletionItemKind::METHOD => "method",
        CompletionItemKind::FUNCTION => "function",
        CompletionItemKind::CONSTRUCTOR | CompletionItemKind::CLASS => "class",
        CompletionItemKind::FIELD | CompletionItemKind::PROPERTY => "property",
        CompletionItemKind::VARIABLE
        | CompletionItemKind::VALUE
        | CompletionItemKind::REFERENCE
        | CompletionItemKind::EVENT => "variable",
        CompletionItemKind::INTERFACE
        | CompletionItemKind::STRUCT
        | CompletionItemKind::TYPE_PARAMETER => "type",
        CompletionItemKind::MODULE => "namespace",
        CompletionItemKind::ENUM | CompletionItemKind::ENUM_MEMBER => "enum",
        CompletionItemKind::UNIT | CompletionItemKind::KEYWORD | CompletionItemKind::OPERATOR => {
            "keyword"
        }
        CompletionItemKind::COLOR | CompletionItemKind::CONSTANT => "constant",
        _ => return None,
    };
    Some(name.to_string())
}

/// Rewrite bare `$n` placeholders to the `${n}` form.
pub fn normalize_snippet(text: &str) -> String {
    BARE_PLACEHOLDER.replace_all(text, "$${${1}}").into_owned()
}

/// Options for [`create_completion_source`].
pub struct CompletionOptions<F> {
    do_complete: F,
    markup: MarkupOptions,
    section: Option<String>,
    trigger_characters: Option<String>,
    from_completion_item_kind: KindMapper,
}

impl<F, Fut> CompletionOptions<F>
where
    F: Fn(Arc<TextDocument>, Position, LspCompletionContext) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<CompletionResponse>>>,
{
    /// Options with the required provider and markup renderer.
    ///
    /// `do_complete` receives the mirrored document, the cursor position and the LSP completion
    /// context, and resolves to `None` when it has nothing to offer.
    pub fn new(markup: MarkupOptions, do_complete: F) -> Self {
        Self {
            do_complete,
            markup,
            section: None,
            trigger_characters: None,
            from_completion_item_kind: Rc::new(default_from_completion_item_kind),
        }
    }
}

impl<F> CompletionOptions<F> {
    /// Section name attached to every completion.
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Extra characters that trigger implicit completion, in addition to ASCII letters.
    pub fn trigger_characters(mut self, characters: impl Into<String>) -> Self {
        self.trigger_characters = Some(characters.into());
        self
    }

    /// Override the item kind mapping.
    pub fn from_completion_item_kind(
        mut self,
        map: impl Fn(Option<CompletionItemKind>) -> Option<String> + 'static,
    ) -> Self {
        self.from_completion_item_kind = Rc::new(map);
        self
    }

    /// Apply deserialized settings. Only fields present in `settings` override.
    pub fn with_settings(mut self, settings: &CompletionSettings) -> Self {
        if let Some(section) = &settings.section {
            self.section = Some(section.clone());
        }
        if let Some(characters) = &settings.trigger_characters {
            self.trigger_characters = Some(characters.clone());
        }
        self
    }
}

/// A completion source backed by an LSP-shaped provider.
pub struct CompletionSource<F> {
    options: CompletionOptions<F>,
    trigger_characters: String,
}

/// Create a completion source from `options`.
pub fn create_completion_source<F>(options: CompletionOptions<F>) -> CompletionSource<F> {
    let mut trigger_characters = DEFAULT_TRIGGER_CHARACTERS.to_string();
    if let Some(extra) = &options.trigger_characters {
        trigger_characters.push_str(extra);
    }
    CompletionSource {
        options,
        trigger_characters,
    }
}

impl<F, Fut> CompletionSource<F>
where
    F: Fn(Arc<TextDocument>, Position, LspCompletionContext) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<CompletionResponse>>>,
{
    /// Answer a completion request.
    ///
    /// Returns `Ok(None)` when the request is suppressed, the provider has nothing, or the
    /// document changed before the provider resolved. Provider errors propagate.
    pub async fn complete(&self, context: &CompletionContext) -> Result<Option<CompletionResult>> {
        let document = get_text_document(context.state())?;
        let pos = context.pos();

        let lsp_context = if context.explicit() {
            LspCompletionContext {
                trigger_kind: CompletionTriggerKind::INVOKED,
                trigger_character: None,
            }
        } else {
            let before = pos
                .checked_sub(1)
                .map(|start| context.slice_doc(start, pos))
                .filter(|c| !c.is_empty() && self.trigger_characters.contains(c.as_str()));
            let Some(trigger_character) = before else {
                tracing::trace!(pos, "no trigger character before cursor");
                return Ok(None);
            };
            LspCompletionContext {
                trigger_kind: CompletionTriggerKind::TRIGGER_CHARACTER,
                trigger_character: Some(trigger_character),
            }
        };

        let position = document.position_at(pos);
        let response =
            (self.options.do_complete)(Arc::clone(&document), position, lsp_context).await?;
        let Some(response) = response else {
            return Ok(None);
        };

        let current = context
            .view()
            .map(EditorView::state)
            .unwrap_or_else(|| context.state().clone());
        if !still_current(&document, &current)? {
            return Ok(None);
        }

        let (items, defaults) = response.into_parts();
        if items.is_empty() {
            return Ok(None);
        }

        let mut from = pos;
        let mut to = pos;
        let options = items
            .into_iter()
            .map(|item| self.to_completion(&document, item, defaults.as_ref(), &mut from, &mut to))
            .collect();

        Ok(Some(CompletionResult {
            from,
            to,
            options,
            commit_characters: defaults.and_then(|defaults| defaults.commit_characters),
        }))
    }

    fn to_completion(
        &self,
        document: &TextDocument,
        item: CompletionItem,
        defaults: Option<&CompletionItemDefaults>,
        min_from: &mut usize,
        max_to: &mut usize,
    ) -> Completion {
        let info = item.documentation.map(|documentation| {
            let contents = HoverContents::from(documentation);
            let markup = self.options.markup.clone();
            CompletionInfo::new(move || from_markup_content(&contents, Fragment::new(), &markup))
        });

        let apply = if let Some(edit) = &item.text_edit {
            let range = edit.range();
            let from = document.offset_at(range.start);
            let to = document.offset_at(range.end);
            *min_from = (*min_from).min(from);
            *max_to = (*max_to).max(to);

            let format = item
                .insert_text_format
                .or_else(|| defaults.and_then(|defaults| defaults.insert_text_format));
            let text = edit.new_text().to_string();

            Some(if format == Some(InsertTextFormat::SNIPPET) {
                let template = snippet(&normalize_snippet(&text));
                CompletionApply::action(move |view, _, _| {
                    template.apply(view, from, to);
                })
            } else {
                CompletionApply::action(move |view, _, _| {
                    view.dispatch(insert_completion_text(&view.state(), &text, from, to));
                })
            })
        } else {
            item.text_edit_text
                .filter(|text| !text.is_empty())
                .map(CompletionApply::Text)
        };

        Completion {
            label: item.label,
            detail: item.detail,
            info,
            kind: (self.options.from_completion_item_kind)(item.kind),
            section: self.options.section.clone(),
            commit_characters: item.commit_characters,
            apply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_snippet() {
        assert_eq!(
            normalize_snippet("for (let ${0} = 0; ${0} < ${1}; $0++) { ${1} }"),
            "for (let ${0} = 0; ${0} < ${1}; ${0}++) { ${1} }"
        );
        assert_eq!(normalize_snippet("$12 ${3:x}"), "${12} ${3:x}");
    }

    #[test]
    fn test_default_kind_mapping() {
        let map = |kind| default_from_completion_item_kind(Some(CompletionItemKind(kind)));
        assert_eq!(map(1).as_deref(), Some("text"));
        assert_eq!(map(4).as_deref(), Some("class"));
        assert_eq!(map(20).as_deref(), Some("enum"));
        assert_eq!(map(25).as_deref(), Some("type"));
        assert_eq!(map(17), None);
        assert_eq!(map(19), None);
        assert_eq!(map(42), None);
        assert_eq!(default_from_completion_item_kind(None), None);
    }
}
