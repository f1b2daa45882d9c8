use crate::actions::{now_millis, Action};
use crate::formatter;

/// Order-preserving accumulator for the receiving side of the session bridge.
///
/// The recorder retains no copy of what it emits; whoever consumes the action
/// stream owns the sequence, and must keep it in emission order.
#[derive(Debug, Clone)]
pub struct ActionLog {
    pub name: String,
    pub started_at: u64,
    pub finished_at: Option<u64>,
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            started_at: now_millis(),
            finished_at: None,
            actions: Vec::new(),
        }
    }

    /// Append one action, in arrival order.
    pub fn record(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Mark the session finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(now_millis());
    }

    /// Render the accumulated sequence as a complete test file.
    pub fn to_script(&self) -> String {
        formatter::render_actions(&self.name, &self.actions)
    }
}
