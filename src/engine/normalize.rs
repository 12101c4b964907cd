//! Coercion of untrusted provider output into well-formed tasks.
//!
//! The classification provider is asked for strict JSON but treated as
//! best-effort: fields may be missing, mistyped, or out of range. Every
//! field coerces to a safe default, so coercion is total; the only way a
//! record is rejected is an empty task text after trimming.

use serde::Deserialize;
use serde_json::Value;

use super::task::{classify, Scale, Task};

/// Lower bound for a task duration, in minutes.
pub const MIN_MINUTES: u32 = 5;
/// Upper bound for a task duration, in minutes.
pub const MAX_MINUTES: u32 = 240;
/// Fallback duration when the provider gives nothing usable.
pub const DEFAULT_MINUTES: u32 = 30;

/// An untrusted task record as it comes back from the provider.
///
/// Every field is optional and may hold any JSON type. No invariants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub task: Option<Value>,
    #[serde(default)]
    pub urgency: Option<Value>,
    #[serde(default)]
    pub importance: Option<Value>,
    #[serde(default)]
    pub estimated_time_minutes: Option<Value>,
}

/// Render a loose JSON value as text. Containers and nulls become empty.
fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coerce a scale field; unrecognized or missing values become `Medium`.
pub fn normalize_scale(value: Option<&Value>) -> Scale {
    Scale::parse_lenient(&text_of(value))
}

/// Coerce a duration field into `[MIN_MINUTES, MAX_MINUTES]`.
///
/// Numbers and numeric strings are rounded to the nearest integer and
/// clamped; anything non-finite or unparsable yields `DEFAULT_MINUTES`.
pub fn normalize_minutes(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => {
            n.round().clamp(f64::from(MIN_MINUTES), f64::from(MAX_MINUTES)) as u32
        }
        _ => DEFAULT_MINUTES,
    }
}

/// Turn a batch of raw provider records into well-formed tasks.
///
/// Relative input order is preserved. Records whose task text is empty
/// after trimming are dropped; everything else is kept with its fields
/// coerced and its priority bucket derived from the decision table.
pub fn sanitize_tasks(raw: &[RawCandidate]) -> Vec<Task> {
    raw.iter()
        .filter_map(|candidate| {
            let text = text_of(candidate.task.as_ref()).trim().to_string();
            if text.is_empty() {
                return None;
            }

            let urgency = normalize_scale(candidate.urgency.as_ref());
            let importance = normalize_scale(candidate.importance.as_ref());

            Some(Task {
                task: text,
                urgency,
                importance,
                estimated_time_minutes: normalize_minutes(
                    candidate.estimated_time_minutes.as_ref(),
                ),
                priority_bucket: classify(urgency, importance),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::task::PriorityBucket;
    use serde_json::json;

    fn candidate(value: Value) -> RawCandidate {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn keeps_trimmed_non_empty_task_text() {
        let tasks = sanitize_tasks(&[candidate(json!({ "task": "  Call bank  " }))]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Call bank");
    }

    #[test]
    fn drops_empty_whitespace_and_missing_task_text() {
        let raw = vec![
            candidate(json!({ "task": "" })),
            candidate(json!({ "task": "   " })),
            candidate(json!({ "urgency": "high" })),
            candidate(json!({ "task": null })),
        ];
        assert!(sanitize_tasks(&raw).is_empty());
    }

    #[test]
    fn numeric_task_text_is_stringified_and_kept() {
        let tasks = sanitize_tasks(&[candidate(json!({ "task": 42 }))]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "42");
    }

    #[test]
    fn unrecognized_scales_default_to_medium() {
        for value in [
            json!(null),
            json!(7),
            json!("urgent"),
            json!("HIGHEST"),
            json!(["high"]),
            json!({ "level": "high" }),
        ] {
            assert_eq!(normalize_scale(Some(&value)), Scale::Medium, "{value}");
        }
        assert_eq!(normalize_scale(None), Scale::Medium);
    }

    #[test]
    fn recognized_scales_are_case_folded() {
        assert_eq!(normalize_scale(Some(&json!("HIGH"))), Scale::High);
        assert_eq!(normalize_scale(Some(&json!("Low"))), Scale::Low);
        assert_eq!(normalize_scale(Some(&json!("medium"))), Scale::Medium);
    }

    #[test]
    fn minutes_round_and_clamp_into_bounds() {
        assert_eq!(normalize_minutes(Some(&json!(1))), MIN_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!(9999))), MAX_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!(29.6))), 30);
        assert_eq!(normalize_minutes(Some(&json!("9999"))), MAX_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!("17"))), 17);
        assert_eq!(normalize_minutes(Some(&json!(240))), MAX_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!(5))), MIN_MINUTES);
    }

    #[test]
    fn non_finite_minutes_default_to_thirty() {
        assert_eq!(normalize_minutes(None), DEFAULT_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!(null))), DEFAULT_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!("soon"))), DEFAULT_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!(true))), DEFAULT_MINUTES);
        assert_eq!(normalize_minutes(Some(&json!([30]))), DEFAULT_MINUTES);
    }

    #[test]
    fn preserves_input_order_and_output_is_never_longer() {
        let raw = vec![
            candidate(json!({ "task": "first" })),
            candidate(json!({ "task": " " })),
            candidate(json!({ "task": "second" })),
            candidate(json!({ "task": "third" })),
        ];
        let tasks = sanitize_tasks(&raw);
        assert!(tasks.len() <= raw.len());
        let names: Vec<_> = tasks.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn end_to_end_scenario_from_provider_shaped_input() {
        let raw = vec![
            candidate(json!({ "task": "  ", "urgency": "high", "importance": "high" })),
            candidate(json!({
                "task": "Call bank",
                "urgency": "HIGH",
                "importance": "low",
                "estimated_time_minutes": "9999"
            })),
        ];

        let tasks = sanitize_tasks(&raw);
        assert_eq!(tasks.len(), 1);

        let task = &tasks[0];
        assert_eq!(task.task, "Call bank");
        assert_eq!(task.urgency, Scale::High);
        assert_eq!(task.importance, Scale::Low);
        assert_eq!(task.estimated_time_minutes, MAX_MINUTES);
        assert_eq!(task.priority_bucket, PriorityBucket::QuickTask);
    }
}
