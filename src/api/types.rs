//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Task;

/// Request to analyze free-form text into tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// The user's description of their day
    pub input: String,
}

/// Response after an analysis: tasks in analysis order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub tasks: Vec<Task>,
}

/// Both views over the session's task collection.
#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    /// Analysis order; drives the table and the matrix
    pub tasks: Vec<Task>,

    /// Ranked order; drives "do next" style recommendations
    pub ranked: Vec<Task>,

    pub count: usize,
}

/// Top-1 recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct NextResponse {
    pub task: Task,

    /// Ready-to-display message for the chat transcript
    pub message: String,
}

/// Top-3 "reduce overwhelm" recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct RescueResponse {
    pub tasks: Vec<Task>,
    pub message: String,
}

/// Reminder scheduler status after a start/stop request.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderResponse {
    /// Whether the scheduler is running after this request
    pub running: bool,

    /// Whether this request changed the state (false on no-op)
    pub changed: bool,

    /// Configured reminder cadence in seconds
    pub interval_secs: u64,
}

/// Response after minting a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Classification model in use
    pub model: String,

    /// Whether a provider credential is configured
    pub api_key_configured: bool,
}
