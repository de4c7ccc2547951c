//! Hover tooltips.

use crate::dom::Element;
use std::fmt;
use std::rc::Rc;

/// A tooltip anchored at `pos` (optionally spanning to `end`), with lazily created content.
#[derive(Clone)]
pub struct Tooltip {
    /// Anchor offset.
    pub pos: usize,
    /// End of the range the tooltip describes.
    pub end: Option<usize>,
    create: Rc<dyn Fn() -> Element>,
}

/// Rendered tooltip content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipView {
    /// The root element.
    pub dom: Element,
}

impl Tooltip {
    /// A tooltip whose content is built by `create` when shown.
    pub fn new(pos: usize, end: Option<usize>, create: impl Fn() -> Element + 'static) -> Self {
        Self {
            pos,
            end,
            create: Rc::new(create),
        }
    }

    /// Build the tooltip content.
    pub fn create(&self) -> TooltipView {
        TooltipView {
            dom: (self.create)(),
        }
    }
}

impl fmt::Debug for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tooltip")
            .field("pos", &self.pos)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}
