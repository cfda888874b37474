//! Property-based tests for the session state machine
//!
//! Invariants checked across arbitrary event sequences:
//! - the expression is never empty
//! - non-owners never change anything
//! - expiry is one-way and freezes the state
//! - only accepted mutations move `last_activity`

use super::*;
use crate::calculator::{SessionStatus, LAYOUT};
use proptest::prelude::*;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(60);
const OWNER: &str = "owner-1";

fn test_context() -> SessionContext {
    SessionContext::new("prop", OWNER, SurfaceHandle::new("surface", None), TIMEOUT)
}

/// Event description relative to a moving clock
#[derive(Debug, Clone)]
enum Step {
    Press {
        owner: bool,
        label: String,
        advance_ms: u64,
    },
    Elapse {
        advance_ms: u64,
    },
}

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        9 => prop::sample::select(LAYOUT.iter().map(|b| b.label.to_string()).collect::<Vec<_>>()),
        1 => "[a-z]{1,4}",
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (any::<bool>(), arb_label(), 0u64..30_000)
            .prop_map(|(owner, label, advance_ms)| Step::Press { owner, label, advance_ms }),
        1 => (0u64..120_000).prop_map(|advance_ms| Step::Elapse { advance_ms }),
    ]
}

fn to_event(step: &Step, now: Instant) -> Event {
    match step {
        Step::Press { owner, label, .. } => {
            let actor = if *owner { OWNER } else { "stranger" };
            Event::press(actor, label.clone(), now)
        }
        Step::Elapse { .. } => Event::InactivityElapsed { at: now },
    }
}

fn advance(step: &Step) -> Duration {
    match step {
        Step::Press { advance_ms, .. } | Step::Elapse { advance_ms } => {
            Duration::from_millis(*advance_ms)
        }
    }
}

proptest! {
    #[test]
    fn prop_expression_never_empty(steps in proptest::collection::vec(arb_step(), 0..50)) {
        let ctx = test_context();
        let mut now = Instant::now();
        let mut state = CalcState::new(now);
        for step in &steps {
            now += advance(step);
            if let Ok(result) = transition(&state, &ctx, to_event(step, now)) {
                state = result.new_state;
            }
            prop_assert!(!state.expression().is_empty());
        }
    }

    #[test]
    fn prop_non_owner_never_mutates(steps in proptest::collection::vec(arb_step(), 0..50)) {
        let ctx = test_context();
        let mut now = Instant::now();
        let mut state = CalcState::new(now);
        for step in &steps {
            now += advance(step);
            let before = state.clone();
            let result = transition(&state, &ctx, to_event(step, now));
            if let Step::Press { owner: false, .. } = step {
                let is_unauthorized = matches!(result, Err(TransitionError::UnauthorizedActor { .. }));
                prop_assert!(is_unauthorized);
                prop_assert_eq!(&state, &before);
            } else if let Ok(result) = result {
                state = result.new_state;
            }
        }
    }

    #[test]
    fn prop_expiry_is_terminal(steps in proptest::collection::vec(arb_step(), 0..50)) {
        let ctx = test_context();
        let mut now = Instant::now();
        let mut state = CalcState::new(now);
        let mut frozen: Option<CalcState> = None;
        for step in &steps {
            now += advance(step);
            if let Ok(result) = transition(&state, &ctx, to_event(step, now)) {
                state = result.new_state;
                if let Some(frozen) = &frozen {
                    prop_assert_eq!(&state, frozen);
                    let no_effects = result.effects.is_empty();
                    prop_assert!(no_effects);
                }
            }
            if state.status() == SessionStatus::Expired && frozen.is_none() {
                frozen = Some(state.clone());
            }
        }
    }

    #[test]
    fn prop_last_activity_moves_only_on_mutation(steps in proptest::collection::vec(arb_step(), 0..50)) {
        let ctx = test_context();
        let mut now = Instant::now();
        let mut state = CalcState::new(now);
        for step in &steps {
            now += advance(step);
            let before = state.last_activity();
            if let Ok(result) = transition(&state, &ctx, to_event(step, now)) {
                let mutated = result.is_mutation();
                state = result.new_state;
                if mutated {
                    prop_assert_eq!(state.last_activity(), now);
                } else {
                    prop_assert_eq!(state.last_activity(), before);
                }
            }
        }
    }

    #[test]
    fn prop_expires_only_after_timeout(steps in proptest::collection::vec(arb_step(), 0..50)) {
        let ctx = test_context();
        let mut now = Instant::now();
        let mut state = CalcState::new(now);
        for step in &steps {
            now += advance(step);
            let was_active = !state.is_expired();
            let last_activity = state.last_activity();
            if let Ok(result) = transition(&state, &ctx, to_event(step, now)) {
                state = result.new_state;
            }
            if was_active && state.is_expired() {
                prop_assert!(now >= last_activity + TIMEOUT);
            }
        }
    }

    #[test]
    fn prop_render_idempotent(steps in proptest::collection::vec(arb_step(), 0..30)) {
        let ctx = test_context();
        let mut now = Instant::now();
        let mut state = CalcState::new(now);
        for step in &steps {
            now += advance(step);
            if let Ok(result) = transition(&state, &ctx, to_event(step, now)) {
                state = result.new_state;
            }
        }
        let a = serde_json::to_string(&state.render()).unwrap();
        let b = serde_json::to_string(&state.render()).unwrap();
        prop_assert_eq!(a, b);
    }
}
