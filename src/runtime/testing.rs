//! Mock implementations for testing
//!
//! These mocks let the session runtime run without a real chat host.

use super::traits::{Surface, SurfaceError};
use crate::calculator::DisplayPayload;
use crate::state_machine::SurfaceHandle;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Surface that records every delivery and can be told to fail
#[derive(Default)]
pub struct MockSurface {
    deliveries: Mutex<Vec<(SurfaceHandle, DisplayPayload)>>,
    failure: Option<SurfaceError>,
    /// Notified after each delivery attempt (for test synchronization)
    pub delivered: Arc<Notify>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface the host has already removed
    pub fn gone() -> Self {
        Self {
            failure: Some(SurfaceError::Gone("deleted".to_string())),
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<(SurfaceHandle, DisplayPayload)> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Surface for MockSurface {
    async fn update(
        &self,
        handle: &SurfaceHandle,
        payload: &DisplayPayload,
    ) -> Result<(), SurfaceError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((handle.clone(), payload.clone()));
        self.delivered.notify_one();
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
