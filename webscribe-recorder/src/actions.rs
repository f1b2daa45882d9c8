use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// An immutable record of one observed user interaction.
///
/// Created exclusively by the recorder at the moment a qualifying DOM signal
/// occurs, handed straight to the session bridge, never mutated afterwards.
/// Serializes flat, tagged by `type`:
/// `{"type":"click","timestamp":...,"selector":"#go"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Capture-time instant in Unix milliseconds, monotonically
    /// non-decreasing within a session.
    pub timestamp: u64,

    #[serde(flatten)]
    pub kind: ActionKind,
}

/// The interaction a recorded [`Action`] stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    /// The session opened (or was armed on) a location.
    Navigate { url: String },
    /// A primary click on a resolvable element.
    Click { selector: String },
    /// A committed free-text value.
    Fill { selector: String, value: String },
    /// A committed choice on a selection control.
    Select { selector: String, value: String },
}

impl Action {
    pub fn new(timestamp: u64, kind: ActionKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ActionKind::Navigate { .. } => "navigate",
            ActionKind::Click { .. } => "click",
            ActionKind::Fill { .. } => "fill",
            ActionKind::Select { .. } => "select",
        }
    }

    /// The resolved target, for action types that have one.
    pub fn selector(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Navigate { .. } => None,
            ActionKind::Click { selector }
            | ActionKind::Fill { selector, .. }
            | ActionKind::Select { selector, .. } => Some(selector),
        }
    }

    /// The captured input value, for `fill` and `select`.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Fill { value, .. } | ActionKind::Select { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The destination location, for `navigate`.
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Navigate { url } => Some(url),
            _ => None,
        }
    }
}

/// Current wall-clock time in Unix milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
