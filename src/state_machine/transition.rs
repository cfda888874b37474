//! Pure state transition function
//!
//! Access guard first, then the expired check, then one dispatched operation.

use super::{CalcState, Effect, Event, SessionContext};
use crate::calculator::{self, resolve};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CalcState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CalcState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// True when the event was accepted as a mutation
    pub fn is_mutation(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, Effect::Render { .. }))
    }
}

/// Errors that can occur during transition. Neither touches the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("actor {actor_id} does not own this calculator")]
    UnauthorizedActor { actor_id: String },
    #[error("unknown button '{0}'")]
    UnknownButton(String),
}

/// Only the owner may press buttons. Checked on every event.
pub fn authorize(context: &SessionContext, actor_id: &str) -> bool {
    actor_id == context.owner_id
}

/// Pure transition function: same inputs, same outputs, no I/O.
pub fn transition(
    state: &CalcState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Button presses
        // ============================================================
        (_, Event::ButtonPressed { actor_id, .. }) if !authorize(context, &actor_id) => {
            Err(TransitionError::UnauthorizedActor { actor_id })
        }

        // Input after expiry is ignored, whatever the label
        (CalcState::Expired { .. }, Event::ButtonPressed { .. }) => {
            Ok(TransitionResult::new(state.clone()))
        }

        (CalcState::Active { buffer, .. }, Event::ButtonPressed { label, at, .. }) => {
            let operation = resolve(&label).ok_or(TransitionError::UnknownButton(label))?;
            if operation.is_noop() {
                return Ok(TransitionResult::new(state.clone()));
            }

            let mut buffer = buffer.clone();
            let expression = buffer.current_value().to_string();
            let eval_error = calculator::apply(&mut buffer, operation);

            let new_state = CalcState::Active {
                buffer,
                last_activity: at,
            };
            let payload = new_state.render();
            let deadline = at + context.inactivity_timeout;

            Ok(TransitionResult::new(new_state)
                .with_effects(
                    eval_error.map(|error| Effect::RecordEvalError { expression, error }),
                )
                .with_effect(Effect::render(payload))
                .with_effect(Effect::arm_expiry(deadline)))
        }

        // ============================================================
        // Inactivity
        // ============================================================
        (CalcState::Active { buffer, last_activity }, Event::InactivityElapsed { at }) => {
            let deadline = *last_activity + context.inactivity_timeout;
            if at < deadline {
                // Timer armed for an older deadline; activity moved it
                return Ok(TransitionResult::new(state.clone())
                    .with_effect(Effect::arm_expiry(deadline)));
            }

            let expired = CalcState::Expired {
                buffer: buffer.clone(),
                last_activity: *last_activity,
            };
            let payload = expired.render();
            Ok(TransitionResult::new(expired).with_effect(Effect::DeliverToSurface { payload }))
        }

        (CalcState::Expired { .. }, Event::InactivityElapsed { .. }) => {
            Ok(TransitionResult::new(state.clone()))
        }
    }
}
