//! Trait abstractions for runtime I/O
//!
//! The runtime only ever talks to the chat surface through [`Surface`], so
//! tests can swap in the mocks from `testing`.

use crate::calculator::DisplayPayload;
use crate::state_machine::SurfaceHandle;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use thiserror::Error;

/// Failure to push a render to the host-managed message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("surface {0} no longer exists")]
    Gone(String),
    #[error("surface rejected update with HTTP {0}")]
    Rejected(u16),
    #[error("surface unreachable: {0}")]
    Transport(String),
}

/// Outbound render boundary
#[async_trait]
pub trait Surface: Send + Sync {
    /// Replace what the surface shows with `payload`
    async fn update(
        &self,
        handle: &SurfaceHandle,
        payload: &DisplayPayload,
    ) -> Result<(), SurfaceError>;
}

#[async_trait]
impl<T: Surface + ?Sized> Surface for Arc<T> {
    async fn update(
        &self,
        handle: &SurfaceHandle,
        payload: &DisplayPayload,
    ) -> Result<(), SurfaceError> {
        (**self).update(handle, payload).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Sends renders to the host's callback URL as a JSON `PATCH`.
///
/// Surfaces created without a callback are read by the host through the
/// snapshot and stream endpoints, so there is nothing to push.
#[derive(Clone)]
pub struct WebhookSurface {
    client: Client,
}

impl WebhookSurface {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Surface for WebhookSurface {
    async fn update(
        &self,
        handle: &SurfaceHandle,
        payload: &DisplayPayload,
    ) -> Result<(), SurfaceError> {
        let Some(url) = handle.callback_url.as_deref() else {
            return Ok(());
        };

        let response = self
            .client
            .patch(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SurfaceError::Transport(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(SurfaceError::Gone(handle.id.clone())),
            s => Err(SurfaceError::Rejected(s.as_u16())),
        }
    }
}
