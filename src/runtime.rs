//! Runtime for calculator sessions
//!
//! One tokio task per session owns its state; the manager only keeps the
//! channels needed to reach it. Sessions share nothing mutable.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::calculator::DisplayPayload;
use crate::state_machine::{CalcState, SessionContext, SurfaceHandle};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio_util::sync::CancellationToken;

/// Private notice shown to anyone pressing someone else's calculator
pub const REJECTION_NOTICE: &str = "This calculator is not yours.";

/// Timing knobs for every session created by a manager
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub inactivity_timeout: Duration,
    pub expired_retention: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(300),
            expired_retention: Duration::from_secs(600),
        }
    }
}

/// Requests delivered to a session runtime
#[derive(Debug)]
pub enum SessionRequest {
    Interact {
        actor_id: String,
        label: String,
        reply: oneshot::Sender<Result<InteractionOutcome, SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<DisplayPayload>,
    },
    /// The host removed the surface
    Discard,
}

/// What the host should do after a button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Redraw the message with this payload
    Updated(DisplayPayload),
    /// Nothing changed (spacer or expired session); payload is the last render
    Unchanged(DisplayPayload),
    /// Not the owner: show `notice` privately to the actor, touch nothing
    Rejected { notice: String },
}

/// Events sent to observers of a session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Render { payload: DisplayPayload },
    Expired { payload: DisplayPayload },
    DeliveryFailed { message: String },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("calculator session {0} not found")]
    NotFound(String),
    #[error("calculator session {0} has shut down")]
    Closed(String),
    #[error("unknown button '{0}'")]
    UnknownButton(String),
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub request_tx: mpsc::Sender<SessionRequest>,
    pub broadcast_tx: broadcast::Sender<SessionEvent>,
}

/// A freshly created session
#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub session_id: String,
    pub payload: DisplayPayload,
}

/// Manager for all calculator session runtimes
pub struct SessionManager {
    surface: Arc<dyn Surface>,
    config: SessionConfig,
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    shutdown: CancellationToken,
}

impl SessionManager {
    pub fn new(surface: Arc<dyn Surface>, config: SessionConfig) -> Self {
        Self {
            surface,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start a session owned by `owner_id` and return its first render
    pub async fn create(&self, owner_id: &str, callback_url: Option<String>) -> CreatedSession {
        let session_id = uuid::Uuid::new_v4().to_string();
        let surface = SurfaceHandle::new(session_id.clone(), callback_url);
        let context = SessionContext::new(
            session_id.clone(),
            owner_id,
            surface,
            self.config.inactivity_timeout,
        );
        let state = CalcState::new(Instant::now());
        let payload = state.render();

        let (request_tx, request_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(64);

        let runtime = SessionRuntime::new(
            context,
            state,
            self.surface.clone(),
            request_rx,
            broadcast_tx.clone(),
            self.config.expired_retention,
            self.shutdown.child_token(),
        );

        // Register before spawning so the task's cleanup always finds its entry
        self.sessions.write().await.insert(
            session_id.clone(),
            SessionHandle {
                request_tx,
                broadcast_tx,
            },
        );

        let sessions = self.sessions.clone();
        let id = session_id.clone();
        tokio::spawn(async move {
            runtime.run().await;
            sessions.write().await.remove(&id);
        });

        tracing::info!(session_id = %session_id, owner = %owner_id, "Calculator session created");

        CreatedSession {
            session_id,
            payload,
        }
    }

    async fn handle(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Host event boundary: an actor pressed a button
    pub async fn interact(
        &self,
        session_id: &str,
        actor_id: &str,
        label: &str,
    ) -> Result<InteractionOutcome, SessionError> {
        let handle = self.handle(session_id).await?;
        let closed = || SessionError::Closed(session_id.to_string());

        let (reply, rx) = oneshot::channel();
        handle
            .request_tx
            .send(SessionRequest::Interact {
                actor_id: actor_id.to_string(),
                label: label.to_string(),
                reply,
            })
            .await
            .map_err(|_| closed())?;

        rx.await.map_err(|_| closed())?
    }

    /// Current render of a session
    pub async fn snapshot(&self, session_id: &str) -> Result<DisplayPayload, SessionError> {
        let handle = self.handle(session_id).await?;
        let closed = || SessionError::Closed(session_id.to_string());

        let (reply, rx) = oneshot::channel();
        handle
            .request_tx
            .send(SessionRequest::Snapshot { reply })
            .await
            .map_err(|_| closed())?;
        rx.await.map_err(|_| closed())
    }

    /// Subscribe to session updates, along with the render to start from
    pub async fn subscribe(
        &self,
        session_id: &str,
    ) -> Result<(DisplayPayload, broadcast::Receiver<SessionEvent>), SessionError> {
        let handle = self.handle(session_id).await?;
        let rx = handle.broadcast_tx.subscribe();
        let payload = self.snapshot(session_id).await?;
        Ok((payload, rx))
    }

    /// The host discarded the surface; drop the session
    pub async fn discard(&self, session_id: &str) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        let _ = handle.request_tx.send(SessionRequest::Discard).await;
        tracing::info!(session_id = %session_id, "Calculator session discarded");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Stop every session runtime
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
