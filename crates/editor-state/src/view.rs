//! A shared, mutable handle over the current editor state.

use crate::state::{EditorState, Transaction, TransactionSpec};
use std::cell::RefCell;
use std::rc::Rc;

/// The live editor: holds the current [`EditorState`] and applies dispatched transactions.
///
/// Cloning a view yields another handle to the same editor. The handle is single-threaded, and
/// [`EditorView::state`] returns a snapshot so no borrow is held across an `.await`.
#[derive(Debug, Clone)]
pub struct EditorView {
    inner: Rc<RefCell<EditorState>>,
}

impl EditorView {
    /// Create a view showing `state`.
    pub fn new(state: EditorState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> EditorState {
        self.inner.borrow().clone()
    }

    /// Apply `spec` to the current state and make the result current.
    pub fn dispatch(&self, spec: TransactionSpec) -> Transaction {
        let tr = self.inner.borrow().update(spec);
        *self.inner.borrow_mut() = tr.state().clone();
        tr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChangeSpec, EditorStateConfig};

    #[test]
    fn test_dispatch_updates_all_handles() {
        let view = EditorView::new(EditorState::create(EditorStateConfig::new("ab")));
        let other = view.clone();

        let tr = view.dispatch(TransactionSpec::new().change(ChangeSpec::insert(1, "-")));

        assert_eq!(tr.start_state().text(), "ab");
        assert_eq!(other.state().text(), "a-b");
    }
}
