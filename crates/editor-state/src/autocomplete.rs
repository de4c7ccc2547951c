//! Completion sources and results.
//!
//! A completion source receives a [`CompletionContext`] and produces an optional
//! [`CompletionResult`]: the range to replace plus candidate [`Completion`]s. Hosts pick an
//! option and call [`CompletionResult::apply`].

use crate::changes::ChangeSpec;
use crate::dom::Fragment;
use crate::state::{EditorState, Selection, TransactionSpec};
use crate::view::EditorView;
use std::fmt;
use std::rc::Rc;

/// What a completion source is asked about.
#[derive(Debug, Clone)]
pub struct CompletionContext {
    state: EditorState,
    pos: usize,
    explicit: bool,
    view: Option<EditorView>,
}

impl CompletionContext {
    /// Completion at `pos` in `state`. `explicit` is `true` when the user asked for completion
    /// rather than typing.
    pub fn new(state: EditorState, pos: usize, explicit: bool) -> Self {
        Self {
            state,
            pos,
            explicit,
            view: None,
        }
    }

    /// Attach the live view.
    pub fn with_view(mut self, view: EditorView) -> Self {
        self.view = Some(view);
        self
    }

    /// The state completion was requested in.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// The cursor offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether completion was explicitly requested.
    pub fn explicit(&self) -> bool {
        self.explicit
    }

    /// The live view, when available.
    pub fn view(&self) -> Option<&EditorView> {
        self.view.as_ref()
    }

    /// Shorthand for `self.state().slice_doc(from, to)`.
    pub fn slice_doc(&self, from: usize, to: usize) -> String {
        self.state.slice_doc(from, to)
    }
}

/// Lazily rendered extra information for a completion option.
#[derive(Clone)]
pub struct CompletionInfo(Rc<dyn Fn() -> Fragment>);

impl CompletionInfo {
    /// Wrap a render callback.
    pub fn new(render: impl Fn() -> Fragment + 'static) -> Self {
        Self(Rc::new(render))
    }

    /// Render the info panel.
    pub fn render(&self) -> Fragment {
        (self.0)()
    }
}

impl fmt::Debug for CompletionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionInfo(..)")
    }
}

/// How accepting an option modifies the document.
#[derive(Clone)]
pub enum CompletionApply {
    /// Replace the result range with this text.
    Text(String),
    /// Run a custom action with the view and the range to replace.
    Action(Rc<dyn Fn(&EditorView, usize, usize)>),
}

impl CompletionApply {
    /// Wrap a custom apply action.
    pub fn action(apply: impl Fn(&EditorView, usize, usize) + 'static) -> Self {
        Self::Action(Rc::new(apply))
    }
}

impl fmt::Debug for CompletionApply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Action(_) => f.write_str("Action(..)"),
        }
    }
}

/// A single completion option.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Text shown in the list and matched against the typed prefix.
    pub label: String,
    /// Short detail shown next to the label.
    pub detail: Option<String>,
    /// Extra information rendered on demand.
    pub info: Option<CompletionInfo>,
    /// Icon class name (for example `"function"`).
    pub kind: Option<String>,
    /// Section name used to group options.
    pub section: Option<String>,
    /// Characters that accept this option when typed.
    pub commit_characters: Option<Vec<String>>,
    /// How to apply the option. Inserts the label when absent.
    pub apply: Option<CompletionApply>,
}

impl Completion {
    /// An option that inserts `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Apply this option to `view`, replacing `from..to`.
    pub fn apply_to(&self, view: &EditorView, from: usize, to: usize) {
        match &self.apply {
            Some(CompletionApply::Action(action)) => action(view, from, to),
            Some(CompletionApply::Text(text)) => {
                view.dispatch(insert_completion_text(&view.state(), text, from, to));
            }
            None => {
                view.dispatch(insert_completion_text(&view.state(), &self.label, from, to));
            }
        }
    }
}

/// The answer of a completion source.
#[derive(Debug, Clone, Default)]
pub struct CompletionResult {
    /// Start of the range options replace.
    pub from: usize,
    /// End of the range options replace.
    pub to: usize,
    /// Candidate options.
    pub options: Vec<Completion>,
    /// Default commit characters for all options.
    pub commit_characters: Option<Vec<String>>,
}

impl CompletionResult {
    /// Apply the option at `index`. Returns `false` when there is no such option.
    pub fn apply(&self, view: &EditorView, index: usize) -> bool {
        let Some(option) = self.options.get(index) else {
            return false;
        };
        option.apply_to(view, self.from, self.to);
        true
    }
}

/// A transaction spec that replaces `from..to` with `text` and puts the cursor after it.
pub fn insert_completion_text(
    state: &EditorState,
    text: &str,
    from: usize,
    to: usize,
) -> TransactionSpec {
    let len = state.len_chars();
    let (from, to) = (from.min(len), to.min(len));
    let start = from.min(to);
    TransactionSpec::new()
        .change(ChangeSpec::new(from, to, text))
        .selection(Selection::cursor(start + text.chars().count()))
}
