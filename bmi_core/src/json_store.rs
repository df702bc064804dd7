//! JSON file history store with file locking.
//!
//! BMI records and workout sessions live in two JSON array files inside
//! the data directory. Every write replaces the whole file atomically.

use crate::{BmiRecord, Error, HistoryStore, Result, WorkoutSession};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const BMI_HISTORY_FILE: &str = "bmi_history.json";
pub const WORKOUT_HISTORY_FILE: &str = "workout_history.json";

/// History store backed by JSON files in a directory
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn bmi_path(&self) -> PathBuf {
        self.dir.join(BMI_HISTORY_FILE)
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.dir.join(WORKOUT_HISTORY_FILE)
    }
}

impl HistoryStore for JsonFileStore {
    fn append_bmi(&mut self, record: &BmiRecord) -> Result<()> {
        let path = self.bmi_path();
        let mut records: Vec<BmiRecord> = load_for_update(&path)?;
        records.push(record.clone());
        save_list(&path, &records)?;
        tracing::debug!("Appended BMI record ({} total)", records.len());
        Ok(())
    }

    fn list_bmi(&self) -> Result<Vec<BmiRecord>> {
        load_list(&self.bmi_path())
    }

    fn append_session(&mut self, session: &WorkoutSession) -> Result<()> {
        let path = self.sessions_path();
        let mut sessions: Vec<WorkoutSession> = load_for_update(&path)?;
        sessions.push(session.clone());
        save_list(&path, &sessions)?;
        tracing::debug!("Appended workout session {}", session.id);
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<WorkoutSession>> {
        load_list(&self.sessions_path())
    }

    fn replace_session(&mut self, id: &str, session: &WorkoutSession) -> Result<()> {
        let path = self.sessions_path();
        let mut sessions: Vec<WorkoutSession> = load_for_update(&path)?;
        let slot = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("workout session {}", id)))?;
        *slot = session.clone();
        save_list(&path, &sessions)?;
        tracing::debug!("Replaced workout session {}", id);
        Ok(())
    }
}

/// Read the raw contents of a file under a shared lock
///
/// Returns `None` if the file does not exist.
fn read_locked(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read = reader.read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(Some(contents))
}

/// Load a JSON list for display
///
/// Missing files are empty. A corrupted file is logged and treated as empty.
fn load_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let Some(contents) = read_locked(path)? else {
        return Ok(Vec::new());
    };
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&contents) {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!("Failed to parse history file {:?}: {}. Treating as empty.", path, e);
            Ok(Vec::new())
        }
    }
}

/// Load a JSON list that is about to be rewritten
///
/// A corrupted file is moved aside first so the following write cannot
/// destroy it. See `corrupt_aside_path` for the naming.
fn load_for_update<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let Some(contents) = read_locked(path)? else {
        return Ok(Vec::new());
    };
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&contents) {
        Ok(items) => Ok(items),
        Err(e) => {
            let aside = corrupt_aside_path(path);
            std::fs::rename(path, &aside)?;
            tracing::warn!(
                "History file {:?} was corrupted ({}); moved to {:?}",
                path,
                e,
                aside
            );
            Ok(Vec::new())
        }
    }
}

/// First free name of the form `<name>.corrupt`, `<name>.corrupt.1`, ...
///
/// Earlier copies are never overwritten.
fn corrupt_aside_path(path: &Path) -> PathBuf {
    let mut base = path.as_os_str().to_owned();
    base.push(".corrupt");
    let base = PathBuf::from(base);
    if !base.exists() {
        return base;
    }

    let mut n = 1u32;
    loop {
        let mut candidate = base.as_os_str().to_owned();
        candidate.push(format!(".{}", n));
        let candidate = PathBuf::from(candidate);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Write a JSON list atomically with exclusive locking
///
/// 1. Write to a temp file in the same directory
/// 2. Sync to disk
/// 3. Rename over the original
fn save_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Persistence(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(items)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path)
        .map_err(|e| Error::Persistence(format!("failed to replace {:?}: {}", path, e.error)))?;

    Ok(())
}
