//! Session bridge: the channel carrying records between the recorded page and
//! the control surface.
//!
//! The recorder is constructed with an [`ActionSink`] capability instead of
//! talking to a transport directly: production wires a broadcast fan-out
//! ([`BroadcastSink`]) the control surface streams from, tests wire an
//! in-memory [`CollectorSink`]. The wire envelopes ([`ControlMessage`],
//! [`OutboundMessage`]) mirror the window-messaging protocol.

use crate::actions::Action;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::warn;

/// Identity of a window-message sender. Control messages are honored only
/// when they arrive from the window that opened the recorded page; the check
/// is on sender identity, never on payload content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderId(pub u64);

/// Inbound control signal from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    #[serde(rename = "INIT_RECORDING")]
    InitRecording,
    #[serde(rename = "STOP_RECORDING")]
    StopRecording,
}

/// Outbound message posted back to the opener, one per recorded action.
/// Delivery is fire-and-forget; no acknowledgement is awaited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "RECORD_ACTION")]
    RecordAction { data: Action },
}

/// Where the recorder hands each action the instant it is constructed.
pub trait ActionSink: Send {
    /// Deliver one action. Must not block: the recorder runs on the page's
    /// UI thread and has no feedback channel for delivery failures.
    fn emit(&self, action: Action);
}

/// In-memory sink that accumulates actions in emission order.
#[derive(Debug, Clone, Default)]
pub struct CollectorSink {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.actions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.lock().unwrap().is_empty()
    }
}

impl ActionSink for CollectorSink {
    fn emit(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }
}

/// Broadcast fan-out sink: every subscriber gets every action, in emission
/// order, without the recorder waiting on any of them.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<Action>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.tx.subscribe()
    }

    /// A stream of actions emitted after this call. A lagging consumer skips
    /// what it missed rather than ending the stream.
    pub fn action_stream(&self) -> impl Stream<Item = Action> {
        let mut rx = self.tx.subscribe();
        Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(action) => yield action,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("action stream lagged, skipped {skipped} actions");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl ActionSink for BroadcastSink {
    fn emit(&self, action: Action) {
        // No subscribers is not an error; emission is fire-and-forget.
        let _ = self.tx.send(action);
    }
}
