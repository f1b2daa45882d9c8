//! Visual feedback: the hover highlight overlay and the click ripple.
//!
//! Purely cosmetic and fully decoupled from action recording; nothing here
//! carries recorded data or may delay emission.

use std::time::Duration;
use webscribe::{Document, FloatingHandle, PageElement, Position, Rect};

pub const OVERLAY_LABEL: &str = "highlight-overlay";
pub const RIPPLE_LABEL: &str = "click-ripple";

const RIPPLE_SIZE: f64 = 20.0;

/// Tracks the hovered element with a single overlay node.
///
/// The overlay is exclusively owned by the presenter. Each [`track`] call
/// fully supersedes the previous visual state, so being called on every
/// pointer movement accumulates nothing.
///
/// [`track`]: HighlightPresenter::track
pub struct HighlightPresenter {
    document: Document,
    overlay: FloatingHandle,
}

impl HighlightPresenter {
    /// Create the overlay node in the document, hidden.
    pub fn attach(document: &Document) -> Self {
        Self {
            document: document.clone(),
            overlay: document.attach_floating(OVERLAY_LABEL),
        }
    }

    /// Move the overlay onto `element`, or hide it for `None`.
    ///
    /// The box is the element's current viewport rect shifted by the page
    /// scroll offset, recomputed on every call.
    pub fn track(&self, element: Option<&PageElement>) {
        match element {
            Some(element) => {
                let (scroll_x, scroll_y) = self.document.scroll_offset();
                self.overlay
                    .set_rect(element.bounding_rect().offset(scroll_x, scroll_y));
                self.overlay.set_visible(true);
            }
            None => self.overlay.set_visible(false),
        }
    }

    /// Remove the overlay node from the document.
    pub fn detach(self) {
        self.overlay.remove();
    }

    /// Spawn a transient ripple centered on the click point.
    ///
    /// Removal is scheduled on the runtime when one is present and happens
    /// immediately otherwise; either way the caller never waits, and a
    /// ripple left in flight at disarm completes on its own.
    pub fn spawn_ripple(document: &Document, position: Position, duration: Duration) {
        let ripple = document.attach_floating(RIPPLE_LABEL);
        ripple.set_rect(Rect::new(
            position.y - RIPPLE_SIZE / 2.0,
            position.x - RIPPLE_SIZE / 2.0,
            RIPPLE_SIZE,
            RIPPLE_SIZE,
        ));
        ripple.set_visible(true);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    ripple.remove();
                });
            }
            Err(_) => ripple.remove(),
        }
    }
}
