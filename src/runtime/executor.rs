//! Calculator session runtime executor

use super::traits::Surface;
use super::{InteractionOutcome, SessionError, SessionEvent, SessionRequest, REJECTION_NOTICE};
use crate::state_machine::{transition, CalcState, Effect, Event, SessionContext, TransitionError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Owns one session and processes its events strictly one at a time.
///
/// Presses, snapshots and the inactivity timer all funnel through `run`, so a
/// mutation and its render finish before the next event is looked at.
pub struct SessionRuntime<S>
where
    S: Surface + ?Sized + 'static,
{
    context: SessionContext,
    state: CalcState,
    surface: Arc<S>,
    request_rx: mpsc::Receiver<SessionRequest>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    /// Next inactivity deadline, re-armed by accepted mutations
    expiry_deadline: Option<Instant>,
    /// How long an expired session keeps answering before it is dropped
    retention: Duration,
    retain_until: Option<Instant>,
    shutdown: CancellationToken,
}

impl<S> SessionRuntime<S>
where
    S: Surface + ?Sized + 'static,
{
    pub fn new(
        context: SessionContext,
        state: CalcState,
        surface: Arc<S>,
        request_rx: mpsc::Receiver<SessionRequest>,
        broadcast_tx: broadcast::Sender<SessionEvent>,
        retention: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let expiry_deadline = state.expiry_deadline(context.inactivity_timeout);
        Self {
            context,
            state,
            surface,
            request_rx,
            broadcast_tx,
            expiry_deadline,
            retention,
            retain_until: None,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            owner = %self.context.owner_id,
            "Starting calculator session"
        );

        loop {
            let expiry = self.expiry_deadline;
            let retain_until = self.retain_until;

            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => {
                    tracing::debug!(session_id = %self.context.session_id, "Shutdown requested");
                    break;
                }

                request = self.request_rx.recv() => match request {
                    Some(SessionRequest::Discard) | None => break,
                    Some(request) => self.handle_request(request),
                },

                () = sleep_until(expiry) => {
                    self.expiry_deadline = None;
                    let event = Event::InactivityElapsed { at: Instant::now() };
                    if let Err(e) = self.process_event(event) {
                        tracing::error!(error = %e, "Timer event rejected");
                    }
                    if self.state.is_expired() && self.retain_until.is_none() {
                        self.retain_until = Some(Instant::now() + self.retention);
                    }
                }

                () = sleep_until(retain_until) => {
                    tracing::debug!(session_id = %self.context.session_id, "Retention elapsed");
                    break;
                }
            }
        }

        let _ = self.broadcast_tx.send(SessionEvent::Closed);
        tracing::info!(session_id = %self.context.session_id, "Calculator session stopped");
    }

    fn handle_request(&mut self, request: SessionRequest) {
        match request {
            SessionRequest::Interact {
                actor_id,
                label,
                reply,
            } => {
                let outcome = self.interact(actor_id, label);
                let _ = reply.send(outcome);
            }
            SessionRequest::Snapshot { reply } => {
                let _ = reply.send(self.state.render());
            }
            SessionRequest::Discard => {}
        }
    }

    fn interact(
        &mut self,
        actor_id: String,
        label: String,
    ) -> Result<InteractionOutcome, SessionError> {
        let event = Event::press(actor_id, label, Instant::now());
        match self.process_event(event) {
            Ok(true) => Ok(InteractionOutcome::Updated(self.state.render())),
            Ok(false) => Ok(InteractionOutcome::Unchanged(self.state.render())),
            Err(TransitionError::UnauthorizedActor { actor_id }) => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    actor_id = %actor_id,
                    "Rejected press from non-owner"
                );
                Ok(InteractionOutcome::Rejected {
                    notice: REJECTION_NOTICE.to_string(),
                })
            }
            Err(TransitionError::UnknownButton(label)) => Err(SessionError::UnknownButton(label)),
        }
    }

    /// Apply one event and run its effects. Returns whether it mutated.
    fn process_event(&mut self, event: Event) -> Result<bool, TransitionError> {
        let result = transition(&self.state, &self.context, event)?;
        let mutated = result.is_mutation();
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
        Ok(mutated)
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Render { payload } => {
                let _ = self.broadcast_tx.send(SessionEvent::Render { payload });
            }

            Effect::ArmExpiry { deadline } => {
                self.expiry_deadline = Some(deadline);
            }

            Effect::RecordEvalError { expression, error } => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    expression = %expression,
                    error = %error,
                    "Expression did not evaluate"
                );
            }

            Effect::DeliverToSurface { payload } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    "Session expired, disabling buttons"
                );
                let _ = self.broadcast_tx.send(SessionEvent::Expired {
                    payload: payload.clone(),
                });

                // Delivery runs beside the loop; failures are logged, never fatal
                let surface = self.surface.clone();
                let handle = self.context.surface.clone();
                let session_id = self.context.session_id.clone();
                let broadcast_tx = self.broadcast_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = surface.update(&handle, &payload).await {
                        tracing::warn!(
                            session_id = %session_id,
                            surface = %handle.id,
                            error = %e,
                            "Failed to update surface on expiry"
                        );
                        let _ = broadcast_tx.send(SessionEvent::DeliveryFailed {
                            message: e.to_string(),
                        });
                    }
                });
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
