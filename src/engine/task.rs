//! Core task types and the Eisenhower decision table.

use serde::{Deserialize, Serialize};

/// Three-level ordinal scale used for both urgency and importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Low,
    Medium,
    High,
}

impl Scale {
    /// Parse a free-form value into a scale.
    ///
    /// Matching is case-insensitive but otherwise exact; anything
    /// unrecognized (including surrounding whitespace) maps to `Medium`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "high" => Scale::High,
            "medium" => Scale::Medium,
            "low" => Scale::Low,
            _ => Scale::Medium,
        }
    }

    /// Sort rank: high sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Scale::High => 0,
            Scale::Medium => 1,
            Scale::Low => 2,
        }
    }

}

/// The four Eisenhower quadrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityBucket {
    #[serde(rename = "Do Now")]
    DoNow,
    Schedule,
    #[serde(rename = "Quick Task")]
    QuickTask,
    Drop,
}

impl PriorityBucket {
    /// Sort rank: Do Now first, Drop last.
    pub fn rank(self) -> u8 {
        match self {
            PriorityBucket::DoNow => 0,
            PriorityBucket::Schedule => 1,
            PriorityBucket::QuickTask => 2,
            PriorityBucket::Drop => 3,
        }
    }

    /// Display form as shown in the UI (`"Do Now"`, etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityBucket::DoNow => "Do Now",
            PriorityBucket::Schedule => "Schedule",
            PriorityBucket::QuickTask => "Quick Task",
            PriorityBucket::Drop => "Drop",
        }
    }
}

/// Map (urgency, importance) onto a priority bucket.
///
/// This is the fixed decision table; arms are listed in rule order and
/// the first matching arm wins. Keep the shape if rules are ever added.
pub fn classify(urgency: Scale, importance: Scale) -> PriorityBucket {
    match (urgency, importance) {
        (Scale::High, Scale::High) => PriorityBucket::DoNow,
        (Scale::Medium | Scale::Low, Scale::High) => PriorityBucket::Schedule,
        (Scale::High, Scale::Medium | Scale::Low) => PriorityBucket::QuickTask,
        (Scale::Medium | Scale::Low, Scale::Medium | Scale::Low) => PriorityBucket::Drop,
    }
}

/// A well-formed task.
///
/// Invariants: `task` is non-empty and trimmed, `estimated_time_minutes`
/// is within [5, 240], and `priority_bucket` is always derived from
/// (urgency, importance) via [`classify`]. Construction goes through the
/// normalizer; tasks are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task: String,
    pub urgency: Scale,
    pub importance: Scale,
    pub estimated_time_minutes: u32,
    pub priority_bucket: PriorityBucket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_parses_exact_case_insensitive_values() {
        assert_eq!(Scale::parse_lenient("high"), Scale::High);
        assert_eq!(Scale::parse_lenient("HIGH"), Scale::High);
        assert_eq!(Scale::parse_lenient("Medium"), Scale::Medium);
        assert_eq!(Scale::parse_lenient("low"), Scale::Low);
    }

    #[test]
    fn scale_defaults_to_medium_on_anything_else() {
        assert_eq!(Scale::parse_lenient(""), Scale::Medium);
        assert_eq!(Scale::parse_lenient("urgent"), Scale::Medium);
        assert_eq!(Scale::parse_lenient("2"), Scale::Medium);
        // Exact match only: stray whitespace is not recognized
        assert_eq!(Scale::parse_lenient(" high"), Scale::Medium);
    }

    #[test]
    fn decision_table_covers_all_nine_pairs() {
        use PriorityBucket::*;
        use Scale::*;

        let table = [
            ((High, High), DoNow),
            ((Medium, High), Schedule),
            ((Low, High), Schedule),
            ((High, Medium), QuickTask),
            ((High, Low), QuickTask),
            ((Medium, Medium), Drop),
            ((Medium, Low), Drop),
            ((Low, Medium), Drop),
            ((Low, Low), Drop),
        ];

        for ((urgency, importance), expected) in table {
            assert_eq!(
                classify(urgency, importance),
                expected,
                "({:?}, {:?})",
                urgency,
                importance
            );
        }
    }

    #[test]
    fn bucket_serializes_with_display_names() {
        assert_eq!(
            serde_json::to_string(&PriorityBucket::DoNow).unwrap(),
            "\"Do Now\""
        );
        assert_eq!(
            serde_json::to_string(&PriorityBucket::QuickTask).unwrap(),
            "\"Quick Task\""
        );
        assert_eq!(
            serde_json::to_string(&PriorityBucket::Schedule).unwrap(),
            "\"Schedule\""
        );
    }

    #[test]
    fn scale_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Scale::High).unwrap(), "\"high\"");
        let parsed: Scale = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Scale::Low);
    }
}
