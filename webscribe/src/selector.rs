//! Structural selector generation.
//!
//! Given an arbitrary element in an arbitrary page, compute a selector string
//! that re-locates it during replay. Reproducibility is favored over brevity:
//! no attempt is made to find the shortest unique selector. A non-empty `id`
//! short-circuits everything else; otherwise the full structural path from
//! just below the root container is emitted, with run-time-injected class
//! names filtered out.

use crate::element::PageElement;
use std::fmt;
use tracing::debug;

/// One level of a structural path: `tag.class1.class2:nth-child(n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub tag: String,
    pub classes: Vec<String>,
    /// 1-based position among siblings; omitted for an only child, where
    /// position is non-discriminating.
    pub position: Option<usize>,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if !self.classes.is_empty() {
            write!(f, ".{}", self.classes.join("."))?;
        }
        if let Some(position) = self.position {
            write!(f, ":nth-child({position})")?;
        }
        Ok(())
    }
}

/// Class names injected at run time (animation/utility classes) change between
/// page loads and would make the selector non-reproducible.
fn is_unstable_class(name: &str) -> bool {
    name.starts_with('_') || name.contains("generated")
}

/// Compute a selector that uniquely and stably identifies `element`.
///
/// Returns `None` when there is no element to resolve, or when the element
/// yields an empty path (the root container itself); such targets are not
/// reproducible automation targets and the caller drops the signal.
pub fn resolve(element: Option<&PageElement>) -> Option<String> {
    let element = element?;

    if let Some(id) = element.id().filter(|id| !id.is_empty()) {
        return Some(format!("#{id}"));
    }

    let mut segments = Vec::new();
    let mut current = element.clone();
    while !current.is_root() {
        segments.push(segment_for(&current));
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    if segments.is_empty() {
        debug!(tag = %element.tag_name(), "element has no structural path");
        return None;
    }

    segments.reverse();
    Some(
        segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" > "),
    )
}

fn segment_for(element: &PageElement) -> PathSegment {
    let classes = element
        .class_list()
        .into_iter()
        .filter(|c| !is_unstable_class(c))
        .collect();
    let position = element
        .sibling_position()
        .and_then(|(index, count)| (count > 1).then_some(index));
    PathSegment {
        tag: element.tag_name().to_lowercase(),
        classes,
        position,
    }
}
