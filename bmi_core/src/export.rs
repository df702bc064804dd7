//! CSV export of stored history.
//!
//! Export files are rewritten from scratch each time; the JSON history
//! store remains the source of truth.

use crate::{BmiRecord, HistoryStore, Result, WorkoutSession};
use std::fs::File;
use std::path::Path;

/// A row in the BMI history export
#[derive(Debug, serde::Serialize)]
struct BmiRow {
    date: String,
    name: String,
    gender: String,
    bmi: f64,
    category: String,
}

impl From<&BmiRecord> for BmiRow {
    fn from(record: &BmiRecord) -> Self {
        BmiRow {
            date: record.computed_at().to_rfc3339(),
            name: record.subject_name().to_string(),
            gender: format!("{:?}", record.subject_gender()).to_lowercase(),
            bmi: record.value(),
            category: record.category().to_string(),
        }
    }
}

/// A row in the workout session export
#[derive(Debug, serde::Serialize)]
struct SessionRow {
    id: String,
    date: String,
    name: String,
    bmi: f64,
    category: String,
    exercises: usize,
    exercises_done: usize,
    completed: bool,
}

impl From<&WorkoutSession> for SessionRow {
    fn from(session: &WorkoutSession) -> Self {
        SessionRow {
            id: session.id.clone(),
            date: session.created_at.to_rfc3339(),
            name: session.bmi_snapshot.subject_name().to_string(),
            bmi: session.bmi_snapshot.value(),
            category: session.bmi_snapshot.category().to_string(),
            exercises: session.exercises.len(),
            exercises_done: session.completed_count(),
            completed: session.completed,
        }
    }
}

/// Write every stored BMI record to a CSV file
///
/// Returns the number of rows written.
pub fn export_bmi_history<S: HistoryStore>(store: &S, csv_path: &Path) -> Result<usize> {
    let records = store.list_bmi()?;
    write_rows(csv_path, records.iter().map(BmiRow::from))
}

/// Write every stored workout session to a CSV file
///
/// Returns the number of rows written.
pub fn export_sessions<S: HistoryStore>(store: &S, csv_path: &Path) -> Result<usize> {
    let sessions = store.list_sessions()?;
    write_rows(csv_path, sessions.iter().map(SessionRow::from))
}

fn write_rows<R, I>(csv_path: &Path, rows: I) -> Result<usize>
where
    R: serde::Serialize,
    I: IntoIterator<Item = R>,
{
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} rows to {:?}", count, csv_path);
    Ok(count)
}
