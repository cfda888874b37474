//! Events that can reach a calculator session

use std::time::Instant;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// An actor pressed a button on the shared message
    ButtonPressed {
        actor_id: String,
        label: String,
        at: Instant,
    },
    /// The inactivity timer fired
    InactivityElapsed { at: Instant },
}

impl Event {
    pub fn press(actor_id: impl Into<String>, label: impl Into<String>, at: Instant) -> Self {
        Event::ButtonPressed {
            actor_id: actor_id.into(),
            label: label.into(),
            at,
        }
    }
}
