//! Task normalization and prioritization engine.
//!
//! Pure and synchronous: raw provider records go in, well-formed tasks
//! come out, and a ranked view can be derived from them on demand. The
//! engine never performs I/O and never errors; malformed input resolves
//! to safe defaults and degenerate records are silently dropped.
//!
//! Pipeline: `RawCandidate` batch → [`sanitize_tasks`] (coerce fields,
//! drop empty-text records, attach the priority bucket) → `Vec<Task>` →
//! [`rank_tasks`] / [`next_task`] / [`top_tasks`] for recommendations.

mod normalize;
mod rank;
mod task;

pub use normalize::{
    normalize_minutes, normalize_scale, sanitize_tasks, RawCandidate, DEFAULT_MINUTES,
    MAX_MINUTES, MIN_MINUTES,
};
pub use rank::{next_task, rank_tasks, top_tasks};
pub use task::{classify, PriorityBucket, Scale, Task};
