//! Calculator session state types

use crate::calculator::{render, DisplayPayload, ExpressionBuffer, SessionStatus};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Opaque reference to the chat message that displays a session.
///
/// Written once at creation and read on every render delivered by the
/// runtime. `callback_url`, when present, is where expiry renders are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl SurfaceHandle {
    pub fn new(id: impl Into<String>, callback_url: Option<String>) -> Self {
        Self {
            id: id.into(),
            callback_url,
        }
    }
}

/// Immutable facts about a session, fixed at creation
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    /// The only actor allowed to press buttons
    pub owner_id: String,
    pub surface: SurfaceHandle,
    pub inactivity_timeout: Duration,
}

impl SessionContext {
    pub fn new(
        session_id: impl Into<String>,
        owner_id: impl Into<String>,
        surface: SurfaceHandle,
        inactivity_timeout: Duration,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            owner_id: owner_id.into(),
            surface,
            inactivity_timeout,
        }
    }
}

/// Mutable session state. `Expired` is terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcState {
    Active {
        buffer: ExpressionBuffer,
        /// Time of the most recent accepted mutation
        last_activity: Instant,
    },
    Expired {
        buffer: ExpressionBuffer,
        last_activity: Instant,
    },
}

impl CalcState {
    /// Fresh session showing `0`
    pub fn new(now: Instant) -> Self {
        CalcState::Active {
            buffer: ExpressionBuffer::new(),
            last_activity: now,
        }
    }

    pub fn buffer(&self) -> &ExpressionBuffer {
        match self {
            CalcState::Active { buffer, .. } | CalcState::Expired { buffer, .. } => buffer,
        }
    }

    pub fn expression(&self) -> &str {
        self.buffer().current_value()
    }

    pub fn status(&self) -> SessionStatus {
        match self {
            CalcState::Active { .. } => SessionStatus::Active,
            CalcState::Expired { .. } => SessionStatus::Expired,
        }
    }

    pub fn last_activity(&self) -> Instant {
        match self {
            CalcState::Active { last_activity, .. } | CalcState::Expired { last_activity, .. } => {
                *last_activity
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, CalcState::Expired { .. })
    }

    /// When the session expires if nothing else happens
    pub fn expiry_deadline(&self, timeout: Duration) -> Option<Instant> {
        match self {
            CalcState::Active { last_activity, .. } => Some(*last_activity + timeout),
            CalcState::Expired { .. } => None,
        }
    }

    pub fn render(&self) -> DisplayPayload {
        render(self.expression(), self.status())
    }
}
