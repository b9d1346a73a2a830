//! Exercise catalog and id derivation.
//!
//! The catalog is an ordered list of exercises. Ids are slugs derived from
//! the display name and are unique within a catalog.

use crate::{ExerciseRecord, SetEntry};
use serde::{Deserialize, Serialize};

/// Derive a stable id from a display name
///
/// Lowercases the name, collapses every run of non-alphanumeric characters
/// into a single `-`, and strips leading/trailing separators.
/// `"  Back Squat (High-bar) "` becomes `"back-squat-high-bar"`.
pub fn derive_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !id.is_empty() {
                id.push('-');
            }
            pending_separator = false;
            id.push(c);
        } else {
            pending_separator = true;
        }
    }

    id
}

/// The ordered collection of all known exercises
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    exercises: Vec<ExerciseRecord>,
}

impl Catalog {
    pub fn new(exercises: Vec<ExerciseRecord>) -> Self {
        Self { exercises }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseRecord> {
        self.exercises.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Create an exercise from a name and optional muscle label
    ///
    /// Returns `None` (and leaves the catalog untouched) when the derived id
    /// is empty or already taken.
    pub fn create(&mut self, name: &str, muscle: Option<&str>) -> Option<&ExerciseRecord> {
        let id = derive_id(name);
        if id.is_empty() {
            tracing::debug!("Ignoring exercise {:?}: name has no usable characters", name);
            return None;
        }
        if self.contains(&id) {
            tracing::debug!("Ignoring exercise {:?}: id {} already exists", name, id);
            return None;
        }

        let muscle = muscle
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from);

        self.exercises.push(ExerciseRecord {
            id,
            name: name.trim().to_string(),
            muscle,
            history: Vec::new(),
        });

        self.exercises.last()
    }

    /// Remove an exercise, returning it if it existed
    pub fn delete(&mut self, id: &str) -> Option<ExerciseRecord> {
        let index = self.exercises.iter().position(|e| e.id == id)?;
        Some(self.exercises.remove(index))
    }

    /// Append a set to an exercise's history
    ///
    /// Returns false if no exercise has that id.
    pub fn append_entry(&mut self, id: &str, entry: SetEntry) -> bool {
        match self.exercises.iter_mut().find(|e| e.id == id) {
            Some(exercise) => {
                exercise.history.push(entry);
                true
            }
            None => false,
        }
    }

    /// Ids in catalog order
    pub fn ids(&self) -> Vec<String> {
        self.exercises.iter().map(|e| e.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_derive_id_collapses_separators() {
        assert_eq!(derive_id("Back Squat"), "back-squat");
        assert_eq!(derive_id("  Back Squat (High-bar) "), "back-squat-high-bar");
        assert_eq!(derive_id("Pull---Up!!"), "pull-up");
        assert_eq!(derive_id("3/4 Sit-ups"), "3-4-sit-ups");
    }

    #[test]
    fn test_derive_id_empty_for_symbols_only() {
        assert_eq!(derive_id(""), "");
        assert_eq!(derive_id("  --  "), "");
        assert_eq!(derive_id("!!!"), "");
    }

    #[test]
    fn test_derive_id_is_idempotent() {
        for name in ["Deadlift", "Romanian  Deadlift", "-DB Row-", "Überzug", "a_b.c"] {
            let once = derive_id(name);
            assert_eq!(derive_id(&once), once, "not idempotent for {:?}", name);
            assert!(!once.starts_with('-') && !once.ends_with('-'));
            assert!(!once.contains("--"));
            assert!(once
                .chars()
                .all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_create_trims_name_and_drops_blank_muscle() {
        let mut catalog = Catalog::default();
        let created = catalog.create("  Overhead Press ", Some("   ")).unwrap();

        assert_eq!(created.id, "overhead-press");
        assert_eq!(created.name, "Overhead Press");
        assert!(created.muscle.is_none());
        assert!(created.history.is_empty());
    }

    #[test]
    fn test_create_duplicate_is_noop() {
        let mut catalog = Catalog::default();
        catalog.create("Deadlift", Some("Posterior chain")).unwrap();
        let before = catalog.clone();

        assert!(catalog.create("deadlift", None).is_none());
        assert!(catalog.create("DEADLIFT!", Some("Back")).is_none());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_create_empty_id_is_noop() {
        let mut catalog = Catalog::default();
        assert!(catalog.create("???", None).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_delete_and_append() {
        let mut catalog = Catalog::default();
        catalog.create("Deadlift", None);
        catalog.create("Bench Press", None);

        assert!(catalog.append_entry(
            "bench-press",
            SetEntry::new(Utc::now(), Some(60.0), Some(8), None)
        ));
        assert!(!catalog.append_entry("missing", SetEntry::new(Utc::now(), None, None, None)));
        assert_eq!(catalog.get("bench-press").unwrap().history.len(), 1);

        let removed = catalog.delete("deadlift").unwrap();
        assert_eq!(removed.name, "Deadlift");
        assert!(catalog.delete("deadlift").is_none());
        assert_eq!(catalog.ids(), vec!["bench-press".to_string()]);
    }
}
