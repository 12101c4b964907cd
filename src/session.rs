//! Per-session state: the current task list, the last submitted input,
//! and the focus-reminder scheduler.
//!
//! Each browser session owns one `SessionState`; there are no process-wide
//! globals, so concurrent sessions cannot see each other's tasks. The task
//! list is replaced wholesale on every analysis (a single assignment under
//! the write lock), never edited in place.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::engine::{next_task, Task};

/// Event pushed on a session's reminder stream.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderEvent {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Reminder scheduler states. Transitions are Idle → Running (start) and
/// Running → Idle (stop or clear); nothing else.
#[derive(Debug)]
enum ReminderState {
    Idle,
    Running { handle: JoinHandle<()> },
}

/// State owned by a single session.
pub struct SessionState {
    /// Last analyzed input, kept for re-runs.
    pub last_input: Option<String>,
    tasks: Vec<Task>,
    reminder: ReminderState,
    reminder_tx: broadcast::Sender<ReminderEvent>,
}

impl SessionState {
    fn new() -> Self {
        let (reminder_tx, _) = broadcast::channel(32);
        Self {
            last_input: None,
            tasks: Vec::new(),
            reminder: ReminderState::Idle,
            reminder_tx,
        }
    }

    /// The canonical collection, in analysis order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replace the task list wholesale.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Drop all session state and stop a running reminder.
    pub fn clear(&mut self) {
        self.stop_reminder();
        self.last_input = None;
        self.tasks = Vec::new();
    }

    pub fn reminder_running(&self) -> bool {
        matches!(self.reminder, ReminderState::Running { .. })
    }

    /// Running → Idle. Returns false when already idle.
    pub fn stop_reminder(&mut self) -> bool {
        match std::mem::replace(&mut self.reminder, ReminderState::Idle) {
            ReminderState::Running { handle } => {
                handle.abort();
                true
            }
            ReminderState::Idle => false,
        }
    }

    /// Subscribe to this session's reminder events.
    pub fn subscribe_reminders(&self) -> broadcast::Receiver<ReminderEvent> {
        self.reminder_tx.subscribe()
    }
}

/// Handle to a session, shared between handlers and the reminder loop.
pub type SharedSession = Arc<RwLock<SessionState>>;

/// Idle → Running. Returns false when a reminder is already scheduled.
pub async fn start_reminder(session: &SharedSession, interval: Duration) -> bool {
    let mut guard = session.write().await;
    if guard.reminder_running() {
        return false;
    }

    let handle = tokio::spawn(reminder_loop(Arc::clone(session), interval));
    guard.reminder = ReminderState::Running { handle };
    true
}

/// Emit a focus reminder for the top-ranked task once per interval.
async fn reminder_loop(session: SharedSession, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick of a tokio interval completes immediately; skip it so
    // the first reminder lands one full interval after start.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let guard = session.read().await;
        let Some(top) = next_task(guard.tasks()) else {
            continue;
        };

        let focus_minutes = top.estimated_time_minutes.min(15);
        let event = ReminderEvent {
            message: format!(
                "Reminder: focus on \"{}\" for the next {} minutes.",
                top.task, focus_minutes
            ),
            timestamp: Utc::now(),
        };

        // Nobody listening is fine; the next subscriber picks up new events.
        let _ = guard.reminder_tx.send(event);
    }
}

/// In-memory store of all live sessions, keyed by session id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Mint a fresh session and return its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(RwLock::new(SessionState::new())));
        id
    }

    /// Fetch the session for `id`, creating it on first use.
    pub async fn get_or_create(&self, id: Uuid) -> SharedSession {
        if let Some(session) = self.sessions.read().await.get(&id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(id)
                .or_insert_with(|| Arc::new(RwLock::new(SessionState::new()))),
        )
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
