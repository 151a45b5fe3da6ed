//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{BoardView, Mutation, TimerStatus};

/// Body of the add and edit endpoints. `minutes` is the raw input field and
/// may be text or a number; anything non-numeric counts as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinutesRequest {
    #[serde(default)]
    pub minutes: Value,
}

/// Body of `PUT /timers/:index/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: TimerStatus,
}

/// Response to every board operation, carrying the resulting snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub board: BoardView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, board: BoardView) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            board,
        }
    }

    pub fn applied(message: String, board: BoardView) -> Self {
        Self::new("applied", message, board)
    }

    /// A silent no-op: nothing changed
    pub fn rejected(reason: String, board: BoardView) -> Self {
        Self::new("rejected", reason, board)
    }

    pub fn from_mutation(outcome: Mutation, message: String, board: BoardView) -> Self {
        match outcome {
            Mutation::Applied => Self::applied(message, board),
            Mutation::Rejected(reason) => Self::rejected(reason.to_string(), board),
        }
    }
}

/// Server status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: usize,
    pub running: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
