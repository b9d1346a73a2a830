//! CSV export of logged sets.
//!
//! Flattens every exercise's history into one row per set, ordered by the
//! time each set was logged.

use crate::{Catalog, ExerciseRecord, Result, SetEntry};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    exercise_id: String,
    exercise_name: String,
    date: String,
    weight: Option<f64>,
    reps: Option<u32>,
    notes: Option<String>,
}

impl CsvRow {
    fn new(exercise: &ExerciseRecord, entry: &SetEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            date: entry.date.to_rfc3339(),
            weight: entry.weight,
            reps: entry.reps,
            notes: entry.notes.clone(),
        }
    }
}

/// Write every logged set as CSV, returning the number of rows
pub fn write_history<W: Write>(catalog: &Catalog, writer: W) -> Result<usize> {
    let mut rows: Vec<(&ExerciseRecord, &SetEntry)> = catalog
        .iter()
        .flat_map(|exercise| exercise.history.iter().map(move |entry| (exercise, entry)))
        .collect();

    // Stable sort keeps catalog order for sets logged at the same instant
    rows.sort_by_key(|(_, entry)| entry.date);

    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for (exercise, entry) in &rows {
        writer.serialize(CsvRow::new(exercise, entry))?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Export the full history to a CSV file, replacing any previous export
pub fn export_history_csv(catalog: &Catalog, csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(csv_path)?;
    let count = write_history(catalog, &file)?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", count, csv_path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn catalog_with_history() -> Catalog {
        let now = Utc::now();
        let mut catalog = Catalog::default();
        catalog.create("Deadlift", None);
        catalog.create("Bench Press", Some("Chest"));

        catalog.append_entry(
            "deadlift",
            SetEntry::new(now, Some(140.0), Some(3), Some("belt, chalk".into())),
        );
        catalog.append_entry(
            "bench-press",
            SetEntry::new(now - Duration::hours(1), Some(80.0), Some(5), None),
        );
        catalog
    }

    #[test]
    fn test_export_creates_file_with_rows_in_date_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("history.csv");

        let count = export_history_csv(&catalog_with_history(), &csv_path).unwrap();
        assert_eq!(count, 2);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[1], "exercise_id");

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "bench-press");
        assert_eq!(&records[1][1], "deadlift");
        assert_eq!(&records[1][6], "belt, chalk");
        assert_eq!(&records[0][6], "");
    }

    #[test]
    fn test_export_replaces_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        export_history_csv(&catalog_with_history(), &csv_path).unwrap();
        export_history_csv(&catalog_with_history(), &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 2);
    }

    #[test]
    fn test_empty_catalog_writes_nothing() {
        let mut out = Vec::new();
        let count = write_history(&Catalog::default(), &mut out).unwrap();
        assert_eq!(count, 0);
    }
}
