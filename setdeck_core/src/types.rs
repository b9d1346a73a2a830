//! Core domain types for SetDeck.
//!
//! This module defines the records that get persisted:
//! - Exercises and their logged history
//! - Individual set entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Set Entries
// ============================================================================

/// One logged set of an exercise
///
/// Entries are append-only: nothing edits or removes them once they are part
/// of an exercise's history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetEntry {
    /// Stable row key (older data without an id gets a fresh one on read)
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SetEntry {
    /// Create a new entry stamped at `date`
    pub fn new(
        date: DateTime<Utc>,
        weight: Option<f64>,
        reps: Option<u32>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            weight,
            reps,
            notes,
        }
    }

    /// Short human-readable summary, e.g. `100 kg x 5 (felt heavy)`
    pub fn summary(&self, weight_unit: &str) -> String {
        let mut parts = Vec::new();
        if let Some(weight) = self.weight {
            parts.push(format!("{} {}", format_number(weight), weight_unit));
        }
        if let Some(reps) = self.reps {
            parts.push(format!("{} reps", reps));
        }

        let mut out = if parts.is_empty() {
            "no details".to_string()
        } else {
            parts.join(" x ")
        };

        if let Some(ref notes) = self.notes {
            out.push_str(&format!(" ({})", notes));
        }
        out
    }
}

/// Print whole numbers without a trailing `.0`
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// Exercises
// ============================================================================

/// An exercise the user tracks, with its full history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle: Option<String>,
    #[serde(default)]
    pub history: Vec<SetEntry>,
}

impl ExerciseRecord {
    /// Most recently logged set, if any
    pub fn last_entry(&self) -> Option<&SetEntry> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_formats_present_fields() {
        let entry = SetEntry::new(Utc::now(), Some(100.0), Some(5), None);
        assert_eq!(entry.summary("kg"), "100 kg x 5 reps");

        let entry = SetEntry::new(Utc::now(), Some(62.5), None, Some("paused".into()));
        assert_eq!(entry.summary("lb"), "62.5 lb (paused)");

        let entry = SetEntry::new(Utc::now(), None, None, None);
        assert_eq!(entry.summary("kg"), "no details");
    }

    #[test]
    fn test_absent_fields_are_omitted_when_serialized() {
        let entry = SetEntry::new(Utc::now(), None, Some(8), None);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"reps\":8"));
        assert!(!json.contains("weight"));
        assert!(!json.contains("notes"));
    }

    #[test]
    fn test_entry_without_id_gets_one_on_read() {
        let json = r#"{"date":"2024-05-01T10:00:00Z","weight":80}"#;
        let entry: SetEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.weight, Some(80.0));
        assert_eq!(entry.reps, None);
        assert!(!entry.id.is_nil());
    }

    #[test]
    fn test_record_without_history_reads_as_empty() {
        let json = r#"{"id":"deadlift","name":"Deadlift"}"#;
        let record: ExerciseRecord = serde_json::from_str(json).unwrap();

        assert!(record.history.is_empty());
        assert!(record.muscle.is_none());
        assert!(record.last_entry().is_none());
    }
}
