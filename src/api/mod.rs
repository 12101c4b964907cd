//! HTTP API for daymatrix.
//!
//! ## Endpoints
//!
//! - `GET  /api/health` - Health check
//! - `POST /api/session` - Mint a new session id
//! - `POST /api/analyze` - Analyze free-form input into tasks
//! - `POST /api/rerun` - Re-run the last analysis
//! - `GET  /api/tasks` - Task list (analysis order + ranked view)
//! - `DELETE /api/tasks` - Clear the session
//! - `GET  /api/next` - Top-1 recommendation
//! - `GET  /api/rescue` - Top-3 "reduce overwhelm" plan
//! - `POST /api/reminder/start` - Start focus reminders
//! - `POST /api/reminder/stop` - Stop focus reminders
//! - `GET  /api/reminder/stream` - Reminder events via SSE
//!
//! All session-scoped endpoints read the session id from the
//! `X-Session-Id` header. Everything else serves static assets.

pub mod error;
mod routes;
pub mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
pub use types::*;
