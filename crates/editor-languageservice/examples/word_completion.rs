//! Word completion, hover and a long-line lint over a small in-memory document.
//!
//! Run with `RUST_LOG=editor_languageservice=trace` to see the adapters' decisions.

use editor_languageservice::protocol::{
    CompletionItem, CompletionItemKind, CompletionResponse, CompletionTextEdit, Diagnostic,
    DiagnosticSeverity, Hover, MarkupContent, Position, Range, TextEdit,
};
use editor_languageservice::{
    CompletionOptions, HoverTooltipOptions, LintOptions, MarkupOptions, TextDocument,
    create_completion_source, create_hover_tooltip_source, create_lint_source, text_document,
};
use editor_state::{
    CompletionContext, EditorState, EditorStateConfig, EditorView, Language, Node, Selection,
};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};
use tracing_subscriber::EnvFilter;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

const MAX_LINE: usize = 40;

fn word_at(document: &TextDocument, offset: usize) -> Option<(usize, usize, String)> {
    let text = document.get_text();
    WORD.find_iter(&text).find_map(|m| {
        let from = text[..m.start()].chars().count();
        let to = from + m.as_str().chars().count();
        (from <= offset && offset <= to).then(|| (from, to, m.as_str().to_string()))
    })
}

async fn complete_words(
    document: Arc<TextDocument>,
    position: Position,
) -> anyhow::Result<Option<CompletionResponse>> {
    let cursor = document.offset_at(position);
    let Some((from, _, prefix)) = word_at(&document, cursor) else {
        return Ok(None);
    };
    let range = Range::new(document.position_at(from), position);
    let text = document.get_text();
    let words: BTreeSet<&str> = WORD
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|word| word.starts_with(&prefix) && *word != prefix)
        .collect();

    let items = words
        .into_iter()
        .map(|word| CompletionItem {
            kind: Some(CompletionItemKind::TEXT),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(range, word))),
            ..CompletionItem::new(word)
        })
        .collect();
    Ok(Some(CompletionResponse::Items(items)))
}

async fn hover_word(
    document: Arc<TextDocument>,
    position: Position,
) -> anyhow::Result<Option<Hover>> {
    let Some((from, to, word)) = word_at(&document, document.offset_at(position)) else {
        return Ok(None);
    };
    let count = WORD
        .find_iter(&document.get_text())
        .filter(|m| m.as_str() == word)
        .count();
    Ok(Some(Hover {
        contents: MarkupContent::markdown(format!("`{word}` appears {count} time(s)")).into(),
        range: Some(Range::new(
            document.position_at(from),
            document.position_at(to),
        )),
    }))
}

async fn long_lines(document: Arc<TextDocument>) -> anyhow::Result<Option<Vec<Diagnostic>>> {
    let diagnostics = document
        .get_text()
        .lines()
        .enumerate()
        .filter(|(_, line)| line.chars().count() > MAX_LINE)
        .map(|(line, _)| Diagnostic {
            range: Range::new(
                Position::new(line as u32, MAX_LINE as u32),
                Position::new(line as u32, u32::MAX),
            ),
            severity: Some(DiagnosticSeverity::WARNING),
            source: Some("width".to_string()),
            message: format!("line is longer than {MAX_LINE} characters"),
            ..Diagnostic::default()
        })
        .collect();
    Ok(Some(diagnostics))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = "The quick brown fox jumps over the lazy dog and keeps on running.\nqu";
    let view = EditorView::new(EditorState::create(
        EditorStateConfig::new(doc)
            .with_selection(Selection::cursor(doc.chars().count()))
            .with_extension(Language::new("plaintext"))
            .with_extension(text_document(Some("file:///notes.txt"))),
    ));
    let markup = MarkupOptions::new(|markdown: &str| vec![Node::text(markdown)]);

    let completions = create_completion_source(
        CompletionOptions::new(markup.clone(), |document, position, _| {
            complete_words(document, position)
        })
        .section("Words"),
    );
    let context = CompletionContext::new(view.state(), view.state().len_chars(), false)
        .with_view(view.clone());
    if let Some(result) = completions.complete(&context).await? {
        for option in &result.options {
            println!("completion: {} [{}..{}]", option.label, result.from, result.to);
        }
        if result.apply(&view, 0) {
            println!("after accepting: {:?}", view.state().text());
        }
    }

    let hovers = create_hover_tooltip_source(HoverTooltipOptions::new(markup, hover_word));
    if let Some(tooltip) = hovers.hover(&view, 5).await? {
        println!("hover at {}..{:?}: {}", tooltip.pos, tooltip.end, tooltip.create().dom);
    }

    let lint = create_lint_source(LintOptions::new(long_lines));
    for diagnostic in lint.lint(&view).await? {
        println!(
            "{} {}..{}: {}",
            diagnostic.severity, diagnostic.from, diagnostic.to, diagnostic.message
        );
    }

    Ok(())
}
