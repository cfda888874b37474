//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CommandsResponse, CreateCalculatorRequest, CreateCalculatorResponse, ErrorResponse,
    PressRequest, PressResponse, RunCommandRequest, SnapshotResponse, SuccessResponse,
};
use super::AppState;
use crate::commands::{CommandContext, CommandDefinition, CommandOutput};
use crate::runtime::{InteractionOutcome, SessionError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Calculator sessions
        .route("/api/calculator", post(create_calculator))
        .route(
            "/api/calculator/:id",
            get(get_calculator).delete(discard_calculator),
        )
        .route("/api/calculator/:id/press", post(press_button))
        .route("/api/calculator/:id/stream", get(stream_calculator))
        // Informational commands
        .route("/api/commands", get(list_commands))
        .route("/api/commands/:name", post(run_command))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Calculator Sessions
// ============================================================

async fn create_calculator(
    State(state): State<AppState>,
    Json(req): Json<CreateCalculatorRequest>,
) -> Result<Json<CreateCalculatorResponse>, AppError> {
    let actor_id = req.actor_id.trim();
    if actor_id.is_empty() {
        return Err(AppError::BadRequest("actor_id is required".to_string()));
    }

    let created = state.sessions.create(actor_id, req.callback_url).await;
    Ok(Json(CreateCalculatorResponse {
        session_id: created.session_id,
        payload: created.payload,
    }))
}

async fn get_calculator(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SnapshotResponse>, AppError> {
    let payload = state.sessions.snapshot(&id).await?;
    Ok(Json(SnapshotResponse { payload }))
}

async fn press_button(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PressRequest>,
) -> Result<Response, AppError> {
    let outcome = state
        .sessions
        .interact(&id, &req.actor_id, &req.label)
        .await?;

    let response = match outcome {
        InteractionOutcome::Updated(payload) => {
            Json(PressResponse::Updated { payload }).into_response()
        }
        InteractionOutcome::Unchanged(payload) => {
            Json(PressResponse::Unchanged { payload }).into_response()
        }
        InteractionOutcome::Rejected { notice } => (
            StatusCode::FORBIDDEN,
            Json(PressResponse::Rejected {
                notice,
                ephemeral: true,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

async fn stream_calculator(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (payload, broadcast_rx) = state.sessions.subscribe(&id).await?;
    Ok(sse_stream(payload, broadcast_rx))
}

async fn discard_calculator(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.discard(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Informational Commands
// ============================================================

async fn list_commands(State(state): State<AppState>) -> Json<CommandsResponse> {
    let mut commands = vec![CommandDefinition {
        name: "calculator".to_string(),
        description: "Open an interactive calculator".to_string(),
        input_schema: json!({ "type": "object", "properties": {} }),
        interactive: true,
    }];
    commands.extend(state.commands.definitions());
    Json(CommandsResponse { commands })
}

async fn run_command(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<RunCommandRequest>,
) -> Result<Json<CommandOutput>, AppError> {
    let ctx = CommandContext::new(
        state.http.clone(),
        state.command_settings.clone(),
        req.actor_id,
    );
    state
        .commands
        .execute(&name, req.args, ctx)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("unknown command '{name}'")))
}

async fn get_version() -> &'static str {
    concat!("assistant-bot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) | SessionError::Closed(_) => AppError::NotFound(e.to_string()),
            SessionError::UnknownButton(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
