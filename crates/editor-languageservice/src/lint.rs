//! Lint adapter.
//!
//! Converts provider diagnostics into editor diagnostics: ranges become offsets, tags become
//! marker classes, severities map one to one (missing means error) and a `codeDescription`
//! turns the message into text followed by a link.

use crate::config::LintSettings;
use crate::error::Result;
use crate::protocol::{self, DiagnosticSeverity, DiagnosticTag, NumberOrString};
use crate::text_document::{TextDocument, get_text_document, still_current};
use editor_state::{Diagnostic, EditorView, Element, Fragment, Node, RenderMessage, Severity};
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

/// Marker class appended for [`DiagnosticTag::UNNECESSARY`].
pub const UNNECESSARY_MARK_CLASS: &str = "lint-range-unnecessary";

/// Marker class appended for [`DiagnosticTag::DEPRECATED`].
pub const DEPRECATED_MARK_CLASS: &str = "lint-range-deprecated";

type SourceFormatter = Rc<dyn Fn(&protocol::Diagnostic) -> Option<String>>;

/// Format the source label of a diagnostic.
///
/// `source:code` when both are present, otherwise whichever is present. Empty strings and a
/// numeric code of `0` count as absent.
pub fn default_format_source(diagnostic: &protocol::Diagnostic) -> Option<String> {
    let source = diagnostic.source.as_deref().filter(|s| !s.is_empty());
    let code = diagnostic.code.as_ref().filter(|code| match code {
        NumberOrString::String(s) => !s.is_empty(),
        NumberOrString::Number(n) => *n != 0,
    });

    match (source, code) {
        (Some(source), Some(code)) => Some(format!("{source}:{code}")),
        (Some(source), None) => Some(source.to_string()),
        (None, Some(code)) => Some(code.to_string()),
        (None, None) => None,
    }
}

/// Map an LSP severity to an editor severity. Missing or unknown severities are errors.
pub fn severity_from_lsp(severity: Option<DiagnosticSeverity>) -> Severity {
    match severity {
        Some(DiagnosticSeverity::HINT) => Severity::Hint,
        Some(DiagnosticSeverity::INFORMATION) => Severity::Info,
        Some(DiagnosticSeverity::WARNING) => Severity::Warning,
        _ => Severity::Error,
    }
}

/// Options for [`create_lint_source`].
pub struct LintOptions<F> {
    do_diagnostics: F,
    format_source: SourceFormatter,
    mark_class: String,
}

impl<F, Fut> LintOptions<F>
where
    F: Fn(Arc<TextDocument>) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<Vec<protocol::Diagnostic>>>>,
{
    /// Options with the required provider.
    pub fn new(do_diagnostics: F) -> Self {
        Self {
            do_diagnostics,
            format_source: Rc::new(default_format_source),
            mark_class: String::new(),
        }
    }
}

impl<F> LintOptions<F> {
    /// Override how the source label is formatted.
    pub fn format_source(
        mut self,
        format: impl Fn(&protocol::Diagnostic) -> Option<String> + 'static,
    ) -> Self {
        self.format_source = Rc::new(format);
        self
    }

    /// Base marker class for every diagnostic.
    pub fn mark_class(mut self, mark_class: impl Into<String>) -> Self {
        self.mark_class = mark_class.into();
        self
    }

    /// Apply deserialized settings.
    pub fn with_settings(mut self, settings: &LintSettings) -> Self {
        if let Some(mark_class) = &settings.mark_class {
            self.mark_class = mark_class.clone();
        }
        self
    }
}

/// A lint source backed by an LSP-shaped provider.
pub struct LintSource<F> {
    options: LintOptions<F>,
}

/// Create a lint source from `options`.
pub fn create_lint_source<F>(options: LintOptions<F>) -> LintSource<F> {
    LintSource { options }
}

impl<F, Fut> LintSource<F>
where
    F: Fn(Arc<TextDocument>) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<Vec<protocol::Diagnostic>>>>,
{
    /// Run the provider over the whole document.
    ///
    /// Returns an empty list when the provider has nothing or the document changed before it
    /// resolved.
    pub async fn lint(&self, view: &EditorView) -> Result<Vec<Diagnostic>> {
        let document = get_text_document(&view.state())?;

        let diagnostics = (self.options.do_diagnostics)(Arc::clone(&document)).await?;
        let Some(diagnostics) = diagnostics else {
            return Ok(Vec::new());
        };

        if !still_current(&document, &view.state())? {
            return Ok(Vec::new());
        }

        Ok(diagnostics
            .into_iter()
            .map(|diagnostic| self.to_diagnostic(&document, diagnostic))
            .collect())
    }

    fn to_diagnostic(
        &self,
        document: &TextDocument,
        diagnostic: protocol::Diagnostic,
    ) -> Diagnostic {
        let tags = diagnostic.tags.as_deref().unwrap_or_default();
        let mut mark_class = self.options.mark_class.clone();
        if tags.contains(&DiagnosticTag::UNNECESSARY) {
            mark_class.push(' ');
            mark_class.push_str(UNNECESSARY_MARK_CLASS);
        }
        if tags.contains(&DiagnosticTag::DEPRECATED) {
            mark_class.push(' ');
            mark_class.push_str(DEPRECATED_MARK_CLASS);
        }

        let source = (self.options.format_source)(&diagnostic);

        let render_message = diagnostic.code_description.as_ref().map(|description| {
            let message = diagnostic.message.clone();
            let href = description.href.clone();
            RenderMessage::new(move || {
                [
                    Node::text(message.clone()),
                    Element::new("br").into(),
                    Element::new("a").attr("href", &href).text(&href).into(),
                ]
                .into_iter()
                .collect::<Fragment>()
            })
        });

        Diagnostic {
            from: document.offset_at(diagnostic.range.start),
            to: document.offset_at(diagnostic.range.end),
            severity: severity_from_lsp(diagnostic.severity),
            mark_class,
            source,
            message: diagnostic.message,
            render_message,
        }
    }
}
