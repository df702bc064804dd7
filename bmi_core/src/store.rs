//! History store interface.
//!
//! The core never talks to a storage medium directly; it goes through
//! `HistoryStore`, which behaves as a keyed append/replace log.

use crate::{BmiRecord, Error, Result, WorkoutSession};

/// Persistence capability for BMI results and workout sessions
pub trait HistoryStore {
    fn append_bmi(&mut self, record: &BmiRecord) -> Result<()>;

    /// All BMI records, oldest first
    fn list_bmi(&self) -> Result<Vec<BmiRecord>>;

    fn append_session(&mut self, session: &WorkoutSession) -> Result<()>;

    /// All sessions, in creation order
    fn list_sessions(&self) -> Result<Vec<WorkoutSession>>;

    /// Look up a session by id; `Error::NotFound` if absent
    fn find_session(&self, id: &str) -> Result<WorkoutSession> {
        self.list_sessions()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("workout session {}", id)))
    }

    /// Overwrite the whole stored session with the given id
    fn replace_session(&mut self, id: &str, session: &WorkoutSession) -> Result<()>;
}

impl<S: HistoryStore + ?Sized> HistoryStore for &mut S {
    fn append_bmi(&mut self, record: &BmiRecord) -> Result<()> {
        (**self).append_bmi(record)
    }

    fn list_bmi(&self) -> Result<Vec<BmiRecord>> {
        (**self).list_bmi()
    }

    fn append_session(&mut self, session: &WorkoutSession) -> Result<()> {
        (**self).append_session(session)
    }

    fn list_sessions(&self) -> Result<Vec<WorkoutSession>> {
        (**self).list_sessions()
    }

    fn find_session(&self, id: &str) -> Result<WorkoutSession> {
        (**self).find_session(id)
    }

    fn replace_session(&mut self, id: &str, session: &WorkoutSession) -> Result<()> {
        (**self).replace_session(id, session)
    }
}

/// In-memory store, for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    bmi: Vec<BmiRecord>,
    sessions: Vec<WorkoutSession>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful mutating calls made against this store
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl HistoryStore for MemoryStore {
    fn append_bmi(&mut self, record: &BmiRecord) -> Result<()> {
        self.bmi.push(record.clone());
        self.writes += 1;
        Ok(())
    }

    fn list_bmi(&self) -> Result<Vec<BmiRecord>> {
        Ok(self.bmi.clone())
    }

    fn append_session(&mut self, session: &WorkoutSession) -> Result<()> {
        self.sessions.push(session.clone());
        self.writes += 1;
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<WorkoutSession>> {
        Ok(self.sessions.clone())
    }

    fn replace_session(&mut self, id: &str, session: &WorkoutSession) -> Result<()> {
        let slot = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("workout session {}", id)))?;
        *slot = session.clone();
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{bmi, Category, Gender, Measurements};
    use chrono::Utc;

    pub(crate) fn sample_record() -> BmiRecord {
        let m = Measurements {
            height_m: 1.7,
            weight_kg: 65.0,
        };
        bmi::compute(m, "Sam", Gender::Other).unwrap()
    }

    pub(crate) fn sample_session(id: &str) -> WorkoutSession {
        WorkoutSession {
            id: id.into(),
            created_at: Utc::now(),
            bmi_snapshot: sample_record(),
            exercises: crate::catalog::plan_for(Category::Normal),
            completed: false,
        }
    }

    /// Store whose writes always fail, for exercising error paths
    #[derive(Default)]
    pub(crate) struct FailingStore {
        pub(crate) inner: MemoryStore,
        pub(crate) fail_writes: bool,
    }

    impl HistoryStore for FailingStore {
        fn append_bmi(&mut self, record: &BmiRecord) -> Result<()> {
            self.inner.append_bmi(record)
        }

        fn list_bmi(&self) -> Result<Vec<BmiRecord>> {
            self.inner.list_bmi()
        }

        fn append_session(&mut self, session: &WorkoutSession) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Persistence("disk full".into()));
            }
            self.inner.append_session(session)
        }

        fn list_sessions(&self) -> Result<Vec<WorkoutSession>> {
            self.inner.list_sessions()
        }

        fn replace_session(&mut self, id: &str, session: &WorkoutSession) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Persistence("disk full".into()));
            }
            self.inner.replace_session(id, session)
        }
    }

    #[test]
    fn test_find_session_by_id() {
        let mut store = MemoryStore::new();
        store.append_session(&sample_session("a")).unwrap();
        store.append_session(&sample_session("b")).unwrap();

        assert_eq!(store.find_session("b").unwrap().id, "b");
        assert!(store.find_session("zzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_replace_overwrites_in_place() {
        let mut store = MemoryStore::new();
        store.append_session(&sample_session("a")).unwrap();
        store.append_session(&sample_session("b")).unwrap();

        let updated = store.find_session("a").unwrap().with_exercise_completed(0);
        store.replace_session("a", &updated).unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "a");
        assert!(sessions[0].exercises[0].completed);
        assert_eq!(store.write_count(), 3);
    }

    #[test]
    fn test_replace_missing_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store
            .replace_session("ghost", &sample_session("ghost"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_bmi_history_appends() {
        let mut store = MemoryStore::new();
        store.append_bmi(&sample_record()).unwrap();
        store.append_bmi(&sample_record()).unwrap();
        assert_eq!(store.list_bmi().unwrap().len(), 2);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn append_via<S: HistoryStore>(mut store: S) {
            store.append_session(&sample_session("x")).unwrap();
        }

        let mut store = MemoryStore::new();
        append_via(&mut store);
        assert_eq!(store.list_sessions().unwrap().len(), 1);
    }
}
