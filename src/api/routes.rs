//! HTTP route handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use tokio::sync::broadcast::error::RecvError;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use uuid::Uuid;

use crate::config::Config;
use crate::engine::{next_task, rank_tasks, top_tasks};
use crate::llm::{OpenAiClient, TaskClassifier};
use crate::session::{self, SessionStore, SharedSession};

use super::error::ApiError;
use super::types::*;

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 1_000_000;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Classifier boundary; `None` until a provider key is configured
    pub classifier: Option<Arc<dyn TaskClassifier>>,
    /// All live sessions
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let classifier = config.api_key.clone().map(|key| {
            Arc::new(OpenAiClient::new(key, config.model.clone())) as Arc<dyn TaskClassifier>
        });

        Self {
            config,
            classifier,
            sessions: SessionStore::new(),
        }
    }
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.public_dir.clone();

    Router::new()
        .route("/api/health", get(health))
        .route("/api/session", post(create_session))
        .route("/api/analyze", post(analyze))
        .route("/api/rerun", post(rerun))
        .route("/api/tasks", get(list_tasks).delete(clear_tasks))
        .route("/api/next", get(next_recommendation))
        .route("/api/rescue", get(rescue_plan))
        .route("/api/reminder/start", post(start_reminder))
        .route("/api/reminder/stop", post(stop_reminder))
        .route("/api/reminder/stream", get(reminder_stream))
        .fallback_service(ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Session id from the `X-Session-Id` header.
///
/// A missing or malformed header falls back to the shared nil session so
/// headerless clients (curl, the bare UI) still work.
fn session_id(headers: &HeaderMap) -> Uuid {
    headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::nil)
}

async fn session_for(state: &AppState, headers: &HeaderMap) -> SharedSession {
    state.sessions.get_or_create(session_id(headers)).await
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.model.clone(),
        api_key_configured: state.classifier.is_some(),
    })
}

/// Mint a new session id for the caller to send back in `X-Session-Id`.
async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id: state.sessions.create().await,
    })
}

/// Analyze free-form input into a prioritized task list.
async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let input = req.input.trim().to_string();
    if input.is_empty() {
        return Err(ApiError::EmptyInput);
    }

    let classifier = state.classifier.as_ref().ok_or(ApiError::MissingApiKey)?;
    let tasks = classifier.classify_tasks(&input).await?;
    tracing::info!("Analyzed input into {} task(s)", tasks.len());

    let session = session_for(&state, &headers).await;
    let mut guard = session.write().await;
    guard.last_input = Some(input);
    guard.replace_tasks(tasks.clone());

    Ok(Json(AnalyzeResponse { tasks }))
}

/// Re-run the analysis with the session's last input.
async fn rerun(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let session = session_for(&state, &headers).await;
    let input = session
        .read()
        .await
        .last_input
        .clone()
        .ok_or(ApiError::NothingToRerun)?;

    let classifier = state.classifier.as_ref().ok_or(ApiError::MissingApiKey)?;
    let tasks = classifier.classify_tasks(&input).await?;

    session.write().await.replace_tasks(tasks.clone());

    Ok(Json(AnalyzeResponse { tasks }))
}

/// Both views over the session's tasks: analysis order and ranked order.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<TaskListResponse> {
    let session = session_for(&state, &headers).await;
    let guard = session.read().await;
    let tasks = guard.tasks().to_vec();
    let ranked = rank_tasks(&tasks);
    let count = tasks.len();

    Json(TaskListResponse {
        tasks,
        ranked,
        count,
    })
}

/// Clear the session: tasks, last input, and any running reminder.
async fn clear_tasks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let session = session_for(&state, &headers).await;
    session.write().await.clear();
    Json(serde_json::json!({ "cleared": true }))
}

/// Top-1 recommendation: what to do right now.
async fn next_recommendation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<NextResponse>, ApiError> {
    let session = session_for(&state, &headers).await;
    let guard = session.read().await;
    let top = next_task(guard.tasks()).ok_or(ApiError::NoTasks)?;

    let message = format!(
        "Start with: \"{}\" ({}, {} min).",
        top.task,
        top.priority_bucket.as_str(),
        top.estimated_time_minutes
    );

    Ok(Json(NextResponse { task: top, message }))
}

/// Top-3 recommendation with the fixed encouragement template.
async fn rescue_plan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RescueResponse>, ApiError> {
    let session = session_for(&state, &headers).await;
    let guard = session.read().await;
    let top = top_tasks(guard.tasks(), 3);
    if top.is_empty() {
        return Err(ApiError::NoTasks);
    }

    let steps = top
        .iter()
        .enumerate()
        .map(|(idx, t)| format!("{}) {} ({} min)", idx + 1, t.task, t.estimated_time_minutes))
        .collect::<Vec<_>>()
        .join("\n");
    let message = format!(
        "Take one deep breath. We only need the next 3 steps:\n{steps}\n\
         Start with step 1 and ignore everything else for now."
    );

    Ok(Json(RescueResponse {
        tasks: top,
        message,
    }))
}

/// Start the session's reminder scheduler (Idle → Running).
async fn start_reminder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ReminderResponse>, ApiError> {
    let session = session_for(&state, &headers).await;
    if session.read().await.tasks().is_empty() {
        return Err(ApiError::NoTasks);
    }

    let interval_secs = state.config.reminder_interval_secs;
    let changed = session::start_reminder(&session, Duration::from_secs(interval_secs)).await;

    Ok(Json(ReminderResponse {
        running: true,
        changed,
        interval_secs,
    }))
}

/// Stop the session's reminder scheduler (Running → Idle).
async fn stop_reminder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<ReminderResponse> {
    let session = session_for(&state, &headers).await;
    let changed = session.write().await.stop_reminder();

    Json(ReminderResponse {
        running: false,
        changed,
        interval_secs: state.config.reminder_interval_secs,
    })
}

/// Query parameters for the reminder stream.
///
/// `EventSource` cannot set request headers, so the session id may also
/// arrive as `?session=<uuid>`.
#[derive(Debug, serde::Deserialize)]
pub struct ReminderStreamQuery {
    session: Option<Uuid>,
}

/// Stream reminder events for this session via SSE.
async fn reminder_stream(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ReminderStreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let id = query.session.unwrap_or_else(|| session_id(&headers));
    let session = state.sessions.get_or_create(id).await;
    let mut rx = session.read().await.subscribe_reminders();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = Event::default().event("reminder").json_data(&event).unwrap();
                    yield Ok(sse);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Reminder stream lagged; dropped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
