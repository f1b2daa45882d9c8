//! Page inspection and selector generation for browser interaction recording
//!
//! This crate provides the document-side primitives a recording session needs:
//! a minimal element-inspection capability ([`ElementInspect`]), an in-memory
//! page model that implements it ([`model`]), and the structural selector
//! resolver ([`selector::resolve`]) that turns an arbitrary element into a
//! reproducible CSS path.

pub mod element;
pub mod geometry;
pub mod model;
pub mod selector;

pub use element::{ControlKind, ElementInspect, PageElement};
pub use geometry::{Position, Rect};
pub use model::{Document, ElementNode, FloatingHandle, FloatingNode};
pub use selector::resolve;
