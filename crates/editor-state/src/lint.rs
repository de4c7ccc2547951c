//! Lint diagnostics as shown by the editor.

use crate::dom::Fragment;
use std::fmt;
use std::rc::Rc;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// A hint.
    Hint,
    /// Informational.
    Info,
    /// A warning.
    Warning,
    /// An error.
    Error,
}

impl Severity {
    /// Lowercase name (`"hint"`, `"info"`, `"warning"`, `"error"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazily rendered diagnostic message.
#[derive(Clone)]
pub struct RenderMessage(Rc<dyn Fn() -> Fragment>);

impl RenderMessage {
    /// Wrap a render callback.
    pub fn new(render: impl Fn() -> Fragment + 'static) -> Self {
        Self(Rc::new(render))
    }

    /// Render the message.
    pub fn render(&self) -> Fragment {
        (self.0)()
    }
}

impl fmt::Debug for RenderMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderMessage(..)")
    }
}

/// A diagnostic over `from..to`.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Start offset.
    pub from: usize,
    /// End offset.
    pub to: usize,
    /// Severity.
    pub severity: Severity,
    /// Extra class names for the underline (space separated, may be empty).
    pub mark_class: String,
    /// Where the diagnostic came from.
    pub source: Option<String>,
    /// Plain-text message.
    pub message: String,
    /// Rich rendering of the message, used instead of `message` when present.
    pub render_message: Option<RenderMessage>,
}

impl Diagnostic {
    /// A diagnostic with no marker classes, source or rich rendering.
    pub fn new(from: usize, to: usize, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            from,
            to,
            severity,
            mark_class: String::new(),
            source: None,
            message: message.into(),
            render_message: None,
        }
    }
}
