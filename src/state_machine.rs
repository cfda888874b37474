//! Calculator session state machine
//!
//! Elm-style: a pure `transition` takes the current state and one event and
//! returns the next state plus the effects the runtime must carry out. Timing
//! enters only through timestamps carried on events.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{CalcState, SessionContext, SurfaceHandle};
pub use transition::{authorize, transition, TransitionError, TransitionResult};
