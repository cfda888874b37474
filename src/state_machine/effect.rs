//! Effects produced by state transitions

use crate::calculator::{DisplayPayload, EvalError};
use std::time::Instant;

/// Effects to be executed by the runtime after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Publish an updated display to observers
    Render { payload: DisplayPayload },

    /// (Re)arm the inactivity timer
    ArmExpiry { deadline: Instant },

    /// Push a render to the chat surface itself (expiry only)
    DeliverToSurface { payload: DisplayPayload },

    /// An evaluation failed and the buffer now shows the error marker
    RecordEvalError {
        expression: String,
        error: EvalError,
    },
}

impl Effect {
    pub fn render(payload: DisplayPayload) -> Self {
        Effect::Render { payload }
    }

    pub fn arm_expiry(deadline: Instant) -> Self {
        Effect::ArmExpiry { deadline }
    }
}
