//! HTTP API: the host boundary for calculator sessions and commands

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::commands::{CommandRegistry, CommandSettings};
use crate::runtime::SessionManager;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub commands: Arc<CommandRegistry>,
    pub http: Client,
    pub command_settings: Arc<CommandSettings>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionManager>,
        http: Client,
        command_settings: CommandSettings,
    ) -> Self {
        Self {
            sessions,
            commands: Arc::new(CommandRegistry::standard()),
            http,
            command_settings: Arc::new(command_settings),
        }
    }
}

/// Completes once `signal` does, after cancelling every calculator session.
///
/// Meant for `with_graceful_shutdown`: open session streams only end when
/// their session closes, so sessions must stop before the server drains.
pub async fn cancel_sessions_on<F>(signal: F, sessions: Arc<SessionManager>)
where
    F: Future<Output = ()>,
{
    signal.await;
    sessions.shutdown();
    tracing::info!("Calculator sessions cancelled, draining connections");
}
