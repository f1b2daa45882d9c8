//! In-memory page model.
//!
//! Stands in for a live document: an element tree implementing
//! [`ElementInspect`], a URL, a scroll offset, and "floating" nodes attached
//! beside the tree (the highlight overlay and click ripples, the equivalent of
//! nodes appended directly to `body`). Recording logic and its tests both run
//! against this model.

use crate::element::{ControlKind, ElementInspect, PageElement};
use crate::geometry::Rect;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

fn next_key() -> u64 {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}

/// A node attached beside the element tree, such as the highlight overlay or
/// a transient click ripple.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingNode {
    pub key: u64,
    pub label: String,
    pub rect: Rect,
    pub visible: bool,
}

struct DocumentState {
    url: String,
    scroll_x: f64,
    scroll_y: f64,
    floating: Vec<FloatingNode>,
}

struct DocumentInner {
    state: Mutex<DocumentState>,
    root: ElementNode,
}

/// An in-memory document: one root element plus page-level state.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    pub fn new(url: &str) -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                state: Mutex::new(DocumentState {
                    url: url.to_string(),
                    scroll_x: 0.0,
                    scroll_y: 0.0,
                    floating: Vec::new(),
                }),
                root: ElementNode::new_root(),
            }),
        }
    }

    pub fn url(&self) -> String {
        self.inner.state.lock().unwrap().url.clone()
    }

    pub fn set_url(&self, url: &str) {
        self.inner.state.lock().unwrap().url = url.to_string();
    }

    pub fn scroll_offset(&self) -> (f64, f64) {
        let state = self.inner.state.lock().unwrap();
        (state.scroll_x, state.scroll_y)
    }

    pub fn set_scroll_offset(&self, x: f64, y: f64) {
        let mut state = self.inner.state.lock().unwrap();
        state.scroll_x = x;
        state.scroll_y = y;
    }

    /// The root container (the `body` equivalent).
    pub fn root(&self) -> ElementNode {
        self.inner.root.clone()
    }

    /// Attach a floating node. It starts hidden with an empty box.
    pub fn attach_floating(&self, label: &str) -> FloatingHandle {
        let node = FloatingNode {
            key: next_key(),
            label: label.to_string(),
            rect: Rect::default(),
            visible: false,
        };
        let key = node.key;
        self.inner.state.lock().unwrap().floating.push(node);
        FloatingHandle {
            key,
            document: self.clone(),
        }
    }

    /// Snapshot of the currently attached floating nodes.
    pub fn floating_nodes(&self) -> Vec<FloatingNode> {
        self.inner.state.lock().unwrap().floating.clone()
    }

    fn update_floating(&self, key: u64, apply: impl FnOnce(&mut FloatingNode)) {
        let mut state = self.inner.state.lock().unwrap();
        if let Some(node) = state.floating.iter_mut().find(|n| n.key == key) {
            apply(node);
        }
    }

    fn remove_floating(&self, key: u64) {
        let mut state = self.inner.state.lock().unwrap();
        state.floating.retain(|n| n.key != key);
    }
}

/// Handle to one floating node. Removing it (or its document) invalidates the
/// handle; further updates are no-ops.
pub struct FloatingHandle {
    key: u64,
    document: Document,
}

impl FloatingHandle {
    pub fn set_rect(&self, rect: Rect) {
        self.document.update_floating(self.key, |n| n.rect = rect);
    }

    pub fn set_visible(&self, visible: bool) {
        self.document
            .update_floating(self.key, |n| n.visible = visible);
    }

    pub fn snapshot(&self) -> Option<FloatingNode> {
        self.document
            .floating_nodes()
            .into_iter()
            .find(|n| n.key == self.key)
    }

    pub fn remove(&self) {
        self.document.remove_floating(self.key);
    }
}

struct NodeData {
    key: u64,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    kind: ControlKind,
    value: Option<String>,
    rect: Rect,
    parent: Weak<Mutex<NodeData>>,
    children: Vec<ElementNode>,
    is_root: bool,
}

/// A mutable node in the in-memory element tree.
#[derive(Clone)]
pub struct ElementNode {
    data: Arc<Mutex<NodeData>>,
}

impl ElementNode {
    fn new_root() -> Self {
        Self {
            data: Arc::new(Mutex::new(NodeData {
                key: next_key(),
                tag: "body".to_string(),
                id: None,
                classes: Vec::new(),
                kind: ControlKind::Other,
                value: None,
                rect: Rect::default(),
                parent: Weak::new(),
                children: Vec::new(),
                is_root: true,
            })),
        }
    }

    /// Append a child element and return a handle to it.
    pub fn append_child(&self, tag: &str) -> ElementNode {
        let child = ElementNode {
            data: Arc::new(Mutex::new(NodeData {
                key: next_key(),
                tag: tag.to_string(),
                id: None,
                classes: Vec::new(),
                kind: control_kind_for_tag(tag),
                value: None,
                rect: Rect::default(),
                parent: Arc::downgrade(&self.data),
                children: Vec::new(),
                is_root: false,
            })),
        };
        self.data.lock().unwrap().children.push(child.clone());
        child
    }

    pub fn set_id(&self, id: &str) {
        self.data.lock().unwrap().id = Some(id.to_string());
    }

    pub fn set_classes(&self, classes: &[&str]) {
        self.data.lock().unwrap().classes = classes.iter().map(|c| c.to_string()).collect();
    }

    pub fn set_kind(&self, kind: ControlKind) {
        self.data.lock().unwrap().kind = kind;
    }

    pub fn set_value(&self, value: &str) {
        self.data.lock().unwrap().value = Some(value.to_string());
    }

    pub fn set_rect(&self, rect: Rect) {
        self.data.lock().unwrap().rect = rect;
    }

    /// View this node through the inspection capability.
    pub fn as_element(&self) -> PageElement {
        PageElement::new(self.clone())
    }
}

fn control_kind_for_tag(tag: &str) -> ControlKind {
    match tag.to_ascii_lowercase().as_str() {
        "input" | "textarea" => ControlKind::TextEntry,
        "select" => ControlKind::Selection,
        _ => ControlKind::Other,
    }
}

impl ElementInspect for ElementNode {
    fn node_key(&self) -> u64 {
        self.data.lock().unwrap().key
    }

    fn tag_name(&self) -> String {
        self.data.lock().unwrap().tag.clone()
    }

    fn id(&self) -> Option<String> {
        self.data.lock().unwrap().id.clone()
    }

    fn class_list(&self) -> Vec<String> {
        self.data.lock().unwrap().classes.clone()
    }

    fn parent(&self) -> Option<PageElement> {
        let parent = self.data.lock().unwrap().parent.upgrade()?;
        Some(PageElement::new(ElementNode { data: parent }))
    }

    fn children(&self) -> Vec<PageElement> {
        self.data
            .lock()
            .unwrap()
            .children
            .iter()
            .map(|c| c.as_element())
            .collect()
    }

    fn bounding_rect(&self) -> Rect {
        self.data.lock().unwrap().rect
    }

    fn control_kind(&self) -> ControlKind {
        self.data.lock().unwrap().kind
    }

    fn value(&self) -> Option<String> {
        self.data.lock().unwrap().value.clone()
    }

    fn is_root(&self) -> bool {
        self.data.lock().unwrap().is_root
    }
}
