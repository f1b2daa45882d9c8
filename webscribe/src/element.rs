use crate::geometry::Rect;
use std::fmt;
use std::sync::Arc;

/// How a control commits values the user typed or chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Free-text entry (`input`, `textarea`).
    TextEntry,
    /// Discrete choice (`select`).
    Selection,
    /// Anything else; value commits from these controls are not recorded.
    Other,
}

/// The inspection surface recording logic needs from a document node.
///
/// Selector generation and highlight tracking only ever look at structure
/// (tag, id, classes, parent/children) and geometry, so they can run against
/// the in-memory [`crate::model`] in tests exactly as they would against a
/// live page behind a browser-backed implementation.
pub trait ElementInspect: Send + Sync {
    /// Stable identity of the underlying node. Used to locate an element
    /// among its siblings; never shown to the user.
    fn node_key(&self) -> u64;

    fn tag_name(&self) -> String;

    fn id(&self) -> Option<String>;

    fn class_list(&self) -> Vec<String>;

    fn parent(&self) -> Option<PageElement>;

    fn children(&self) -> Vec<PageElement>;

    /// Current viewport-relative bounding box.
    fn bounding_rect(&self) -> Rect;

    fn control_kind(&self) -> ControlKind;

    /// Current committed value, for controls that carry one.
    fn value(&self) -> Option<String>;

    /// Whether this node is the root container (the `body` equivalent).
    /// Structural paths stop just below it.
    fn is_root(&self) -> bool;
}

/// Handle to a document element.
#[derive(Clone)]
pub struct PageElement {
    inner: Arc<dyn ElementInspect>,
}

impl PageElement {
    pub fn new(inner: impl ElementInspect + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn node_key(&self) -> u64 {
        self.inner.node_key()
    }

    pub fn tag_name(&self) -> String {
        self.inner.tag_name()
    }

    pub fn id(&self) -> Option<String> {
        self.inner.id()
    }

    pub fn class_list(&self) -> Vec<String> {
        self.inner.class_list()
    }

    pub fn parent(&self) -> Option<PageElement> {
        self.inner.parent()
    }

    pub fn children(&self) -> Vec<PageElement> {
        self.inner.children()
    }

    pub fn bounding_rect(&self) -> Rect {
        self.inner.bounding_rect()
    }

    pub fn control_kind(&self) -> ControlKind {
        self.inner.control_kind()
    }

    pub fn value(&self) -> Option<String> {
        self.inner.value()
    }

    pub fn is_root(&self) -> bool {
        self.inner.is_root()
    }

    /// 1-based position among the parent's children, with the sibling count.
    /// `None` for a node with no parent.
    pub fn sibling_position(&self) -> Option<(usize, usize)> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let index = siblings
            .iter()
            .position(|s| s.node_key() == self.node_key())?;
        Some((index + 1, siblings.len()))
    }
}

impl PartialEq for PageElement {
    fn eq(&self, other: &Self) -> bool {
        self.node_key() == other.node_key()
    }
}

impl Eq for PageElement {}

impl fmt::Debug for PageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageElement")
            .field("tag", &self.tag_name())
            .field("id", &self.id())
            .field("classes", &self.class_list())
            .finish()
    }
}
