//! Rendering LSP markup into presentation nodes.
//!
//! Markdown rendering is injected by the host through [`MarkupOptions`]; this module only decides
//! which parts go through it and builds the fixed structure around code blocks and plain text.

use crate::protocol::{HoverContents, MarkedString, MarkupContent, MarkupKind};
use editor_state::{Element, Node, ParentNode};
use std::fmt;
use std::rc::Rc;

/// Options shared by every adapter that renders markup.
#[derive(Clone)]
pub struct MarkupOptions {
    markdown_to_dom: Rc<dyn Fn(&str) -> Vec<Node>>,
}

impl MarkupOptions {
    /// Use `markdown_to_dom` to render markdown.
    pub fn new(markdown_to_dom: impl Fn(&str) -> Vec<Node> + 'static) -> Self {
        Self {
            markdown_to_dom: Rc::new(markdown_to_dom),
        }
    }

    /// Render markdown with the configured renderer.
    pub fn markdown_to_dom(&self, markdown: &str) -> Vec<Node> {
        (self.markdown_to_dom)(markdown)
    }
}

impl fmt::Debug for MarkupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupOptions").finish_non_exhaustive()
    }
}

fn append_markdown<P: ParentNode>(parent: &mut P, markdown: &str, options: &MarkupOptions) {
    for node in options.markdown_to_dom(markdown) {
        parent.append(node);
    }
}

fn append_markup<P: ParentNode>(parent: &mut P, content: &MarkupContent, options: &MarkupOptions) {
    match content.kind {
        MarkupKind::Markdown => append_markdown(parent, &content.value, options),
        MarkupKind::PlainText => parent.append(Element::new("p").text(&content.value).into()),
    }
}

fn append_marked<P: ParentNode>(parent: &mut P, content: &MarkedString, options: &MarkupOptions) {
    match content {
        MarkedString::String(markdown) => append_markdown(parent, markdown, options),
        MarkedString::LanguageString(code) => {
            let code_element = Element::new("code")
                .attr("class", format!("language-{}", code.language))
                .text(&code.value);
            parent.append(Element::new("pre").child(code_element).into());
        }
    }
}

/// Render `contents` into `parent` and return it.
///
/// - markdown strings and markdown content go through the injected renderer
/// - plain-text content becomes a `<p>`
/// - a language-tagged string becomes `<pre><code class="language-{id}">`
/// - arrays render each entry in order
pub fn from_markup_content<P: ParentNode>(
    contents: &HoverContents,
    mut parent: P,
    options: &MarkupOptions,
) -> P {
    match contents {
        HoverContents::Markup(content) => append_markup(&mut parent, content, options),
        HoverContents::Scalar(content) => append_marked(&mut parent, content, options),
        HoverContents::Array(contents) => {
            for content in contents {
                append_marked(&mut parent, content, options);
            }
        }
    }
    parent
}
