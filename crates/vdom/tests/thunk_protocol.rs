use vdom::{Node, NodeKind, Thunk, ThunkError, VirtualNode, handle_thunk};
use vdom_test_support::doubles::{CountingThunk, StubWidget, call_log};

fn paragraph(text: &str) -> Node {
    VirtualNode::builder("p").text(text).into_node()
}

#[test]
fn new_thunk_receives_old_node_as_previous() {
    let old = paragraph("old");
    let rendered = paragraph("new");
    let (renderer, probe) = CountingThunk::new(rendered.clone());
    let new = Node::thunk(Thunk::new(renderer));

    let (a, b) = handle_thunk(&old, &new).expect("handle_thunk failed");
    assert!(Node::ptr_eq(&a, &old), "old non-thunk must pass through");
    assert!(Node::ptr_eq(&b, &rendered));
    assert_eq!(probe.renders(), 1);
    assert_eq!(probe.previous_kinds(), vec![Some(NodeKind::Element)]);
}

#[test]
fn old_thunk_is_resolved_with_no_previous() {
    let (renderer, probe) = CountingThunk::new(paragraph("cached"));
    let old = Node::thunk(Thunk::new(renderer));
    let new = paragraph("next");

    let (a, b) = handle_thunk(&old, &new).expect("handle_thunk failed");
    assert!(a.is_element());
    assert!(Node::ptr_eq(&b, &new));
    assert_eq!(probe.previous_kinds(), vec![None]);
}

#[test]
fn thunk_resolved_in_one_pass_is_reused_in_the_next() {
    let (renderer, probe) = CountingThunk::new(paragraph("once"));
    let thunk = Node::thunk(Thunk::new(renderer));

    // First pass: the thunk is new and is rendered against the old tree.
    let (_, first) = handle_thunk(&paragraph("before"), &thunk).expect("first pass failed");
    // Second pass: the same thunk is now on the old side.
    let (second, _) = handle_thunk(&thunk, &paragraph("after")).expect("second pass failed");

    assert!(Node::ptr_eq(&first, &second));
    assert_eq!(probe.renders(), 1);
    assert_eq!(probe.previous_kinds(), vec![Some(NodeKind::Element)]);
}

#[test]
fn both_sides_thunks_resolve_new_side_first() {
    let (old_renderer, old_probe) = CountingThunk::new(paragraph("a"));
    let (new_renderer, new_probe) = CountingThunk::new(paragraph("b"));
    let old = Node::thunk(Thunk::new(old_renderer));
    let new = Node::thunk(Thunk::new(new_renderer));

    let (a, b) = handle_thunk(&old, &new).expect("handle_thunk failed");
    assert!(a.is_element() && b.is_element());
    // The new thunk sees the old *thunk* as previous, not its render.
    assert_eq!(new_probe.previous_kinds(), vec![Some(NodeKind::Thunk)]);
    assert_eq!(old_probe.previous_kinds(), vec![None]);
}

#[test]
fn widget_and_text_are_valid_renders() {
    let log = call_log();
    let widget = Node::widget(StubWidget::new("map", &log));
    let thunk = Thunk::new(CountingThunk::new(widget.clone()).0);
    let resolved = thunk.resolve(None).expect("widget render is valid");
    assert!(Node::ptr_eq(&resolved, &widget));

    let thunk = Thunk::new(CountingThunk::new(Node::text("t")).0);
    assert!(thunk.resolve(None).expect("text render is valid").is_text());
}

#[test]
fn unresolved_render_fails_fast_through_handle_thunk() {
    let inner = Node::thunk(Thunk::from_fn(|_| Node::text("never")));
    let (renderer, probe) = CountingThunk::new(inner);
    let new = Node::thunk(Thunk::new(renderer));

    let err = handle_thunk(&Node::text("old"), &new).expect_err("expected failure");
    assert!(matches!(err, ThunkError::InvalidThunkResult(NodeKind::Thunk)));

    handle_thunk(&Node::text("old"), &new).expect_err("cached failure repeats");
    assert_eq!(probe.renders(), 1, "failed render must not be retried");
}

#[test]
fn failing_new_side_stops_before_old_side() {
    let (old_renderer, old_probe) = CountingThunk::new(paragraph("a"));
    let old = Node::thunk(Thunk::new(old_renderer));
    let bad = Node::thunk(Thunk::from_fn(|_| {
        Node::thunk(Thunk::from_fn(|_| Node::text("never")))
    }));

    handle_thunk(&old, &bad).expect_err("expected failure");
    assert_eq!(old_probe.renders(), 0);
}
