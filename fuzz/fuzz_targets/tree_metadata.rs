#![no_main]

use libfuzzer_sys::fuzz_target;
use std::any::Any;
use std::collections::BTreeSet;
use vdom::invariants::check_tree;
use vdom::{Node, Thunk, VirtualHook, VirtualNode, Widget, index_nodes, node_at_index};

#[derive(Debug)]
struct NopWidget;

impl Widget for NopWidget {}

#[derive(Debug)]
struct NopHook;

impl VirtualHook for NopHook {
    fn hook(&self, _target: &mut dyn Any, _property: &str) {}
    fn unhook(&self, _target: &mut dyn Any, _property: &str) {}
}

const MAX_DEPTH: usize = 24;

// Each byte drives one decision; running out of bytes closes every open node.
fn build(bytes: &mut std::slice::Iter<'_, u8>, depth: usize) -> Node {
    let Some(&op) = bytes.next() else {
        return Node::text("");
    };
    match op % 8 {
        0 => Node::widget(NopWidget),
        1 => Node::thunk(Thunk::from_fn(|_| Node::text("t"))),
        2 | 3 => Node::text("x"),
        _ if depth >= MAX_DEPTH => Node::text("deep"),
        _ => {
            let mut builder = VirtualNode::builder("e");
            if op & 0x10 != 0 {
                builder = builder.hook("h", NopHook);
            }
            if op & 0x20 != 0 {
                builder = builder.property("p", i32::from(op));
            }
            let children = usize::from(op >> 6) + 1;
            for _ in 0..children {
                builder = builder.child(build(bytes, depth + 1));
            }
            builder.into_node()
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let root = build(&mut data.iter(), 0);
    if let Err(err) = check_tree(&root) {
        panic!("{err}");
    }
    let last = root.count();
    assert!(node_at_index(&root, last).is_some());
    assert!(node_at_index(&root, last + 1).is_none());
    let wanted: BTreeSet<usize> = (0..=last).step_by(3).collect();
    let found = index_nodes(&root, &wanted);
    assert_eq!(found.len(), wanted.len());
});
