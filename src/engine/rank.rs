//! Derived ordering over tasks: answers "what should I do next".
//!
//! Ranking is a view, not a mutation. The stored collection keeps its
//! analysis order for the table and matrix; recommendations re-rank a
//! copy on every query.

use super::task::Task;

/// Return a ranked copy of `tasks`; the input slice is left untouched.
///
/// Sort keys, ties broken by the next key: priority bucket, urgency,
/// importance, then shorter estimated duration first. The underlying
/// sort is stable, so equal tasks keep their analysis order.
pub fn rank_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut ranked = tasks.to_vec();
    ranked.sort_by_key(|t| {
        (
            t.priority_bucket.rank(),
            t.urgency.rank(),
            t.importance.rank(),
            t.estimated_time_minutes,
        )
    });
    ranked
}

/// The single highest-ranked task, if any.
pub fn next_task(tasks: &[Task]) -> Option<Task> {
    rank_tasks(tasks).into_iter().next()
}

/// The top `n` ranked tasks. Used by the reduce-overwhelm view.
pub fn top_tasks(tasks: &[Task], n: usize) -> Vec<Task> {
    let mut ranked = rank_tasks(tasks);
    ranked.truncate(n);
    ranked
}
