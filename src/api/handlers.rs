//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, BoardView, Mutation};
use super::responses::{
    ApiResponse, HealthResponse, MinutesRequest, StatusRequest, StatusResponse,
};

type ApiResult = Result<Json<ApiResponse>, StatusCode>;

fn current_board(state: &AppState) -> Result<BoardView, StatusCode> {
    state.board().map_err(|e| {
        error!("Failed to render timer board: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Turn an operation outcome into a response with the board after it
fn respond(state: &AppState, action: &str, result: Result<Mutation, String>) -> ApiResult {
    match result {
        Ok(outcome) => {
            if outcome.is_applied() {
                info!("{} applied", action);
            }
            let board = current_board(state)?;
            Ok(Json(ApiResponse::from_mutation(
                outcome,
                format!("{} applied", action),
                board,
            )))
        }
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /timers - Render the board
pub async fn board_handler(State(state): State<Arc<AppState>>) -> Result<Json<BoardView>, StatusCode> {
    current_board(&state).map(Json)
}

/// Handle POST /timers - Add a custom timer
pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MinutesRequest>,
) -> ApiResult {
    let result = state.add_custom_timer(&request.minutes);
    respond(&state, "add", result)
}

/// Handle POST /timers/:index/toggle - Pause or resume
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult {
    let result = state.toggle(index);
    respond(&state, "toggle", result)
}

/// Handle PUT /timers/:index/status - Set an explicit status
pub async fn status_update_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(request): Json<StatusRequest>,
) -> ApiResult {
    let result = state.set_status(index, request.status);
    respond(&state, "set status", result)
}

/// Handle POST /timers/:index/restart - Restart from the full duration
pub async fn restart_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult {
    let result = state.restart(index);
    respond(&state, "restart", result)
}

/// Handle POST /timers/:index/edit - Open the editor on a custom timer
pub async fn begin_edit_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult {
    let result = state.begin_edit(index);
    respond(&state, "begin edit", result)
}

/// Handle PUT /timers/:index - Commit a new duration
pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(request): Json<MinutesRequest>,
) -> ApiResult {
    let result = state.edit(index, &request.minutes);
    respond(&state, "edit", result)
}

/// Handle DELETE /editing - Close the editor
pub async fn end_edit_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.end_edit();
    respond(&state, "end edit", result)
}

/// Handle DELETE /timers/:index - Remove a custom timer
pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult {
    let result = state.remove(index);
    respond(&state, "remove", result)
}

/// Handle GET /status - Server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let list = match state.snapshot() {
        Ok(list) => list,
        Err(e) => {
            error!("Failed to read timer list: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timers: list.len(),
        running: list
            .entries()
            .iter()
            .filter(|entry| entry.status.is_running())
            .count(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
