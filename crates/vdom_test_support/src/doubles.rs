//! Test doubles for the collaborator traits.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vdom::{Node, NodeKind, ThunkRender, VirtualHook, Widget};

/// Shared, ordered record of lifecycle calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().expect("call log poisoned").clone()
}

#[derive(Debug)]
pub struct RecordingHook {
    pub name: String,
    pub log: CallLog,
}

impl RecordingHook {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
        }
    }
}

impl VirtualHook for RecordingHook {
    fn hook(&self, _target: &mut dyn Any, property: &str) {
        push(&self.log, format!("hook {} on {property}", self.name));
    }

    fn unhook(&self, _target: &mut dyn Any, property: &str) {
        push(&self.log, format!("unhook {} on {property}", self.name));
    }
}

#[derive(Debug)]
pub struct StubWidget {
    pub name: String,
    pub log: CallLog,
}

impl StubWidget {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
        }
    }
}

impl Widget for StubWidget {
    fn init(&self) {
        push(&self.log, format!("init {}", self.name));
    }

    fn update(&self, _previous: &dyn Widget, _target: &mut dyn Any) {
        push(&self.log, format!("update {}", self.name));
    }

    fn destroy(&self, _target: &mut dyn Any) {
        push(&self.log, format!("destroy {}", self.name));
    }
}

/// Renders a fixed node and records every call it receives.
#[derive(Debug)]
pub struct CountingThunk {
    output: Node,
    renders: Arc<AtomicUsize>,
    previous_kinds: Arc<Mutex<Vec<Option<NodeKind>>>>,
}

/// Read side of a [`CountingThunk`], kept by the test after the thunk is
/// moved into a tree.
#[derive(Clone, Debug)]
pub struct RenderProbe {
    renders: Arc<AtomicUsize>,
    previous_kinds: Arc<Mutex<Vec<Option<NodeKind>>>>,
}

impl CountingThunk {
    pub fn new(output: Node) -> (Self, RenderProbe) {
        let renders = Arc::new(AtomicUsize::new(0));
        let previous_kinds = Arc::new(Mutex::new(Vec::new()));
        let probe = RenderProbe {
            renders: Arc::clone(&renders),
            previous_kinds: Arc::clone(&previous_kinds),
        };
        (
            Self {
                output,
                renders,
                previous_kinds,
            },
            probe,
        )
    }
}

impl ThunkRender for CountingThunk {
    fn render(&self, previous: Option<&Node>) -> Node {
        self.renders.fetch_add(1, Ordering::SeqCst);
        self.previous_kinds
            .lock()
            .expect("previous kinds poisoned")
            .push(previous.map(Node::kind));
        self.output.clone()
    }
}

impl RenderProbe {
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    /// Kind of the `previous` argument of each render, in call order.
    pub fn previous_kinds(&self) -> Vec<Option<NodeKind>> {
        self.previous_kinds
            .lock()
            .expect("previous kinds poisoned")
            .clone()
    }
}

fn push(log: &CallLog, entry: String) {
    log.lock().expect("call log poisoned").push(entry);
}
