//! API request and response types

use crate::calculator::DisplayPayload;
use crate::commands::CommandDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to open a calculator for an actor
#[derive(Debug, Deserialize)]
pub struct CreateCalculatorRequest {
    pub actor_id: String,
    /// Where the expiry render is pushed, if the host wants it pushed
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Response with a new calculator session
#[derive(Debug, Serialize)]
pub struct CreateCalculatorResponse {
    pub session_id: String,
    pub payload: DisplayPayload,
}

/// A button press on a calculator surface
#[derive(Debug, Deserialize)]
pub struct PressRequest {
    pub actor_id: String,
    pub label: String,
}

/// Response to a button press
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PressResponse {
    Updated { payload: DisplayPayload },
    Unchanged { payload: DisplayPayload },
    Rejected { notice: String, ephemeral: bool },
}

/// Response with the current calculator render
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub payload: DisplayPayload,
}

/// Request to run an informational command
#[derive(Debug, Deserialize)]
pub struct RunCommandRequest {
    pub actor_id: String,
    #[serde(default)]
    pub args: Value,
}

/// Response for command list
#[derive(Debug, Serialize)]
pub struct CommandsResponse {
    pub commands: Vec<CommandDefinition>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
