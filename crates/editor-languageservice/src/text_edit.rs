//! Applying LSP text edits to an editor view.

use crate::position::offset_at;
use crate::protocol::TextEdit;
use editor_state::{ChangeSpec, EditorView, Transaction, TransactionSpec};
use std::borrow::Borrow;

/// Apply `edits` to `view` as one transaction.
///
/// Every range addresses the current document; edits may come in any order. Characters past the
/// end of a line clamp to the end of that line, and each endpoint resolves against its own line.
pub fn dispatch_text_edits<I>(view: &EditorView, edits: I) -> Transaction
where
    I: IntoIterator,
    I::Item: Borrow<TextEdit>,
{
    let state = view.state();
    let changes = edits
        .into_iter()
        .map(|edit| {
            let edit = edit.borrow();
            ChangeSpec::new(
                offset_at(state.doc(), edit.range.start),
                offset_at(state.doc(), edit.range.end),
                edit.new_text.clone(),
            )
        })
        .collect::<Vec<_>>();

    tracing::trace!(edits = changes.len(), "dispatching text edits");
    view.dispatch(TransactionSpec::new().changes(changes))
}
