//! Action recording for browser test generation
//!
//! This crate turns raw DOM input signals (pointer movement, clicks, value
//! commits) into a structured, ordered sequence of [`Action`] records with
//! reproducible selectors, emitted fire-and-forget over an injected
//! [`ActionSink`]. It also carries the consuming side: an order-preserving
//! accumulator and the formatter that renders an action sequence (or raw
//! generator output) into a presentable test script.

pub mod actions;
pub mod bridge;
pub mod formatter;
pub mod highlight;
pub mod recorder;
pub mod recording;

pub use actions::{Action, ActionKind};
pub use bridge::{
    ActionSink, BroadcastSink, CollectorSink, ControlMessage, OutboundMessage, SenderId,
};
pub use highlight::HighlightPresenter;
pub use recorder::{ActionRecorder, DomSignal, RecorderConfig};
pub use recording::ActionLog;
