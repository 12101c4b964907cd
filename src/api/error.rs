//! API error categories and their HTTP mappings.
//!
//! The engine itself never fails; everything here belongs to the
//! collaborators around it: input validation, configuration, and the
//! upstream classification provider. Oversized request bodies are
//! rejected with 413 by the body-limit layer before a handler runs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::llm::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Submitted text was empty after trimming.
    #[error("Input is required.")]
    EmptyInput,

    /// Re-run requested before any analysis happened.
    #[error("Nothing to re-run yet.")]
    NothingToRerun,

    /// A recommendation was requested against an empty task list.
    #[error("No tasks yet. Analyze your day first.")]
    NoTasks,

    /// Provider credential is not configured.
    #[error("Server missing OPENAI_API_KEY. Add it to the environment or .env file.")]
    MissingApiKey,

    /// The classification provider failed or returned garbage.
    #[error("Could not analyze tasks. Try again.")]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyInput | ApiError::NothingToRerun => StatusCode::BAD_REQUEST,
            ApiError::NoTasks => StatusCode::NOT_FOUND,
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Upstream(source) => {
                tracing::error!("Upstream analysis failure: {source}");
                json!({ "error": self.to_string(), "details": source.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (self.status(), Json(body)).into_response()
    }
}
