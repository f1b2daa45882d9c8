//! The action recorder state machine.

use crate::actions::{now_millis, Action, ActionKind};
use crate::bridge::{ActionSink, ControlMessage, SenderId};
use crate::highlight::HighlightPresenter;
use std::time::Duration;
use tracing::{debug, info};
use webscribe::{resolve, ControlKind, Document, PageElement, Position};

/// A raw DOM input signal, as delivered by the page.
#[derive(Debug, Clone)]
pub enum DomSignal {
    /// The pointer entered an element.
    PointerOver(PageElement),
    /// The pointer left the hovered element.
    PointerOut,
    /// A primary click.
    Click {
        target: PageElement,
        position: Position,
    },
    /// A value commit: covers both direct input changes and synthetic change
    /// events, so select choices and free-text values are each captured once.
    ValueCommit(PageElement),
}

/// Configuration for the action recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Track the hovered element with the highlight overlay.
    pub track_hover: bool,

    /// Spawn a transient ripple at click coordinates.
    pub click_feedback: bool,

    /// How long a ripple stays attached before self-removing.
    pub ripple_duration: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            track_hover: true,
            click_feedback: true,
            ripple_duration: Duration::from_millis(600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SessionState {
    #[default]
    Disarmed,
    Armed,
}

/// Observes raw DOM signals on one document and converts each qualifying one
/// into an [`Action`] emitted through the injected sink.
///
/// Owns the session lifecycle: `Disarmed` (initial) and `Armed`. Every
/// instance is independent; there is no ambient global state.
pub struct ActionRecorder {
    document: Document,
    opener: SenderId,
    sink: Box<dyn ActionSink>,
    config: RecorderConfig,
    state: SessionState,
    highlight: Option<HighlightPresenter>,
    last_timestamp: u64,
}

impl ActionRecorder {
    pub fn new(document: Document, opener: SenderId, sink: impl ActionSink + 'static) -> Self {
        Self::with_config(document, opener, sink, RecorderConfig::default())
    }

    pub fn with_config(
        document: Document,
        opener: SenderId,
        sink: impl ActionSink + 'static,
        config: RecorderConfig,
    ) -> Self {
        Self {
            document,
            opener,
            sink: Box::new(sink),
            config,
            state: SessionState::default(),
            highlight: None,
            last_timestamp: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state == SessionState::Armed
    }

    /// Handle a control message from the bridge. Messages from any sender
    /// other than the opener are ignored outright.
    pub fn on_message(&mut self, sender: SenderId, message: ControlMessage) {
        if sender != self.opener {
            debug!(?sender, "ignoring control message from non-opener");
            return;
        }
        match message {
            ControlMessage::InitRecording => self.arm(),
            ControlMessage::StopRecording => self.disarm(),
        }
    }

    /// Page teardown: forced disarm.
    pub fn on_unload(&mut self) {
        self.disarm();
    }

    /// Begin recording: emit the initial `navigate` action for the current
    /// location, attach the highlight overlay, and start observing signals.
    /// Arming an already-armed session is a no-op.
    pub fn arm(&mut self) {
        if self.state == SessionState::Armed {
            debug!("session already armed");
            return;
        }
        // Flipping the state and attaching observation are one logical step;
        // nothing runs between them on this thread.
        self.state = SessionState::Armed;
        let url = self.document.url();
        info!(%url, "recording session armed");
        self.emit(ActionKind::Navigate { url });
        self.highlight = Some(HighlightPresenter::attach(&self.document));
    }

    /// Stop recording: drop all observation, remove the overlay, discard
    /// hover state. Idempotent.
    pub fn disarm(&mut self) {
        if self.state == SessionState::Disarmed {
            return;
        }
        if let Some(highlight) = self.highlight.take() {
            highlight.detach();
        }
        self.state = SessionState::Disarmed;
        info!("recording session disarmed");
    }

    /// Route one raw DOM signal. While disarmed every signal is dropped
    /// wholesale; nothing is ever emitted.
    pub fn handle_signal(&mut self, signal: DomSignal) {
        if self.state != SessionState::Armed {
            return;
        }
        match signal {
            DomSignal::PointerOver(element) => {
                if self.config.track_hover {
                    if let Some(highlight) = &self.highlight {
                        highlight.track(Some(&element));
                    }
                }
            }
            DomSignal::PointerOut => {
                if let Some(highlight) = &self.highlight {
                    highlight.track(None);
                }
            }
            DomSignal::Click { target, position } => self.record_click(target, position),
            DomSignal::ValueCommit(target) => self.record_value_commit(target),
        }
    }

    fn record_click(&mut self, target: PageElement, position: Position) {
        let Some(selector) = resolve(Some(&target)) else {
            // An element with no discoverable path is not a reproducible
            // automation target; drop the signal silently.
            debug!(tag = %target.tag_name(), "dropping click with unresolvable selector");
            return;
        };
        self.emit(ActionKind::Click { selector });

        if self.config.click_feedback {
            HighlightPresenter::spawn_ripple(&self.document, position, self.config.ripple_duration);
        }
    }

    fn record_value_commit(&mut self, target: PageElement) {
        let Some(selector) = resolve(Some(&target)) else {
            return;
        };
        let value = target.value().unwrap_or_default();
        match target.control_kind() {
            ControlKind::Selection => self.emit(ActionKind::Select { selector, value }),
            ControlKind::TextEntry => self.emit(ActionKind::Fill { selector, value }),
            ControlKind::Other => {
                debug!(tag = %target.tag_name(), "value commit on non-input target dropped");
            }
        }
    }

    fn emit(&mut self, kind: ActionKind) {
        // Wall clocks can step backwards; recorded timestamps must not.
        self.last_timestamp = now_millis().max(self.last_timestamp);
        self.sink.emit(Action::new(self.last_timestamp, kind));
    }
}
