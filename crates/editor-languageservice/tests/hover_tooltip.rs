use editor_languageservice::protocol::{Hover, HoverContents, MarkupContent, Position, Range};
use editor_languageservice::{
    HoverTooltipOptions, MarkupOptions, create_hover_tooltip_source, text_document,
};
use editor_state::{
    ChangeSpec, EditorState, EditorStateConfig, EditorView, Node, TransactionSpec,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn markup() -> MarkupOptions {
    MarkupOptions::new(|markdown: &str| vec![Node::text(markdown)])
}

fn view() -> EditorView {
    EditorView::new(EditorState::create(
        EditorStateConfig::new("Text\nText\n").with_extension(text_document(None)),
    ))
}

#[tokio::test]
async fn test_tooltip_at_probe_without_range() {
    let view = view();
    let probed = Rc::new(Cell::new(None));
    let recorded = Rc::clone(&probed);
    let source = create_hover_tooltip_source(HoverTooltipOptions::new(
        markup(),
        move |_, position| {
            recorded.set(Some(position));
            async {
                anyhow::Ok(Some(Hover {
                    contents: MarkupContent::plaintext("Hello").into(),
                    range: None,
                }))
            }
        },
    ));

    let tooltip = source.hover(&view, 7).await.unwrap().unwrap();

    assert_eq!(probed.get(), Some(Position::new(1, 2)));
    assert_eq!(tooltip.pos, 7);
    assert_eq!(tooltip.end, None);
    assert_eq!(
        tooltip.create().dom.to_string(),
        "<div><p>Hello</p></div>"
    );
}

#[tokio::test]
async fn test_tooltip_spans_hover_range() {
    let view = view();
    let source = create_hover_tooltip_source(HoverTooltipOptions::new(markup(), |_, _| async {
        anyhow::Ok(Some(Hover {
            contents: HoverContents::from("**Text**"),
            range: Some(Range::new(Position::new(1, 0), Position::new(1, 4))),
        }))
    }));

    let tooltip = source.hover(&view, 7).await.unwrap().unwrap();

    assert_eq!(tooltip.pos, 5);
    assert_eq!(tooltip.end, Some(9));
    assert_eq!(tooltip.create().dom.to_string(), "<div>**Text**</div>");
}

#[tokio::test]
async fn test_body_is_built_lazily() {
    let view = view();
    let renders = Rc::new(Cell::new(0));
    let counter = Rc::clone(&renders);
    let markup = MarkupOptions::new(move |markdown: &str| {
        counter.set(counter.get() + 1);
        vec![Node::text(markdown)]
    });
    let source = create_hover_tooltip_source(HoverTooltipOptions::new(markup, |_, _| async {
        anyhow::Ok(Some(Hover {
            contents: HoverContents::from("docs"),
            range: None,
        }))
    }));

    let tooltip = source.hover(&view, 0).await.unwrap().unwrap();
    assert_eq!(renders.get(), 0);

    tooltip.create();
    assert_eq!(renders.get(), 1);
}

#[tokio::test]
async fn test_no_result_no_tooltip() {
    let view = view();
    let source = create_hover_tooltip_source(HoverTooltipOptions::new(markup(), |_, _| async {
        anyhow::Ok(None::<Hover>)
    }));

    assert!(source.hover(&view, 0).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stale_hover_is_discarded() {
    let view = view();
    let editor = view.clone();
    let source = create_hover_tooltip_source(HoverTooltipOptions::new(markup(), move |_, _| {
        let editor = editor.clone();
        async move {
            editor.dispatch(TransactionSpec::new().change(ChangeSpec::insert(0, "More ")));
            anyhow::Ok(Some(Hover {
                contents: HoverContents::from("late"),
                range: None,
            }))
        }
    }));

    assert!(source.hover(&view, 0).await.unwrap().is_none());
}
