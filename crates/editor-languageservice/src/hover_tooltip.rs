//! Hover adapter.

use crate::error::Result;
use crate::markup_content::{MarkupOptions, from_markup_content};
use crate::protocol::{Hover, Position};
use crate::text_document::{TextDocument, get_text_document, still_current};
use editor_state::{EditorView, Element, Tooltip};
use std::future::Future;
use std::sync::Arc;

/// Options for [`create_hover_tooltip_source`].
pub struct HoverTooltipOptions<F> {
    do_hover: F,
    markup: MarkupOptions,
}

impl<F, Fut> HoverTooltipOptions<F>
where
    F: Fn(Arc<TextDocument>, Position) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<Hover>>>,
{
    /// Options with the required provider and markup renderer.
    pub fn new(markup: MarkupOptions, do_hover: F) -> Self {
        Self { do_hover, markup }
    }
}

/// A hover tooltip source backed by an LSP-shaped provider.
pub struct HoverTooltipSource<F> {
    options: HoverTooltipOptions<F>,
}

/// Create a hover tooltip source from `options`.
pub fn create_hover_tooltip_source<F>(options: HoverTooltipOptions<F>) -> HoverTooltipSource<F> {
    HoverTooltipSource { options }
}

impl<F, Fut> HoverTooltipSource<F>
where
    F: Fn(Arc<TextDocument>, Position) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<Hover>>>,
{
    /// Resolve a hover at `pos`.
    ///
    /// The tooltip is anchored at the start of the hover range (or at `pos` when the provider
    /// gives no range) and spans to the range end. Its body is rendered into a `<div>` when the
    /// host calls [`Tooltip::create`].
    pub async fn hover(&self, view: &EditorView, pos: usize) -> Result<Option<Tooltip>> {
        let document = get_text_document(&view.state())?;

        let position = document.position_at(pos);
        let hover = (self.options.do_hover)(Arc::clone(&document), position).await?;
        let Some(Hover { contents, range }) = hover else {
            return Ok(None);
        };

        if !still_current(&document, &view.state())? {
            return Ok(None);
        }

        let (start, end) = match range {
            Some(range) => (
                document.offset_at(range.start),
                Some(document.offset_at(range.end)),
            ),
            None => (pos, None),
        };

        let markup = self.options.markup.clone();
        Ok(Some(Tooltip::new(start, end, move || {
            from_markup_content(&contents, Element::new("div"), &markup)
        })))
    }
}
