//! Workout session state machine.
//!
//! A `Workout` walks the user through a session's exercises in order:
//!
//! ```text
//! NotStarted --start--> ExerciseActive(0, Idle)
//! ExerciseActive(i, Idle) --start_timer--> ExerciseActive(i, Running)   (time exercises)
//! ExerciseActive(i, Running) --tick x N--> ExerciseActive(i, Elapsed)
//! ExerciseActive(i, _) --complete_exercise--> ExerciseActive(i+1, Idle) | Completed
//! ```
//!
//! Every completed exercise is persisted through the injected
//! `HistoryStore` as a whole-session overwrite. If that write fails the
//! error is returned but the in-memory transition stands.

use crate::{catalog, BmiRecord, Error, ExerciseKind, HistoryStore, Result, WorkoutSession};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Countdown state of the current exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { remaining: u32 },
    Elapsed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkoutState {
    NotStarted,
    ExerciseActive { index: usize, timer: TimerState },
    Completed,
}

/// Result of a single timer tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No timer is running; the tick had no effect
    Ignored,
    /// The timer is still counting down
    Running { remaining: u32 },
    /// The timer just reached zero and stopped
    Elapsed,
}

/// Result of completing the current exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the exercise at `index`
    Next { index: usize },
    /// That was the last exercise
    Finished,
}

/// A workout session bound to its store
pub struct Workout<S: HistoryStore> {
    store: S,
    session: WorkoutSession,
    state: WorkoutState,
}

impl<S: HistoryStore> Workout<S> {
    /// Build a new session for a BMI result without persisting it yet
    pub fn plan(store: S, bmi: BmiRecord) -> Self {
        Self::plan_at(store, bmi, Utc::now())
    }

    pub fn plan_at(store: S, bmi: BmiRecord, now: DateTime<Utc>) -> Self {
        let exercises = catalog::plan_for(bmi.category());
        let session = WorkoutSession {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            bmi_snapshot: bmi,
            exercises,
            completed: false,
        };

        Self {
            store,
            session,
            state: WorkoutState::NotStarted,
        }
    }

    /// Load a persisted session and pick up where it was left
    ///
    /// The active exercise is the first one not yet completed. A stored
    /// `completed` flag that disagrees with the exercises is recomputed.
    pub fn resume(store: S, id: &str) -> Result<Self> {
        let mut session = store.find_session(id)?;
        let all_done = session.exercises.iter().all(|e| e.completed);
        if session.completed != all_done {
            tracing::warn!(
                "Workout {} stored completed={} but {}/{} exercises are done; recomputing",
                session.id,
                session.completed,
                session.completed_count(),
                session.exercises.len()
            );
            session.completed = all_done;
        }

        let state = match session.first_incomplete() {
            Some(index) => WorkoutState::ExerciseActive {
                index,
                timer: TimerState::Idle,
            },
            None => WorkoutState::Completed,
        };

        tracing::info!(
            "Resumed workout {} at {:?} ({}/{} done)",
            session.id,
            state,
            session.completed_count(),
            session.exercises.len()
        );

        Ok(Self {
            store,
            session,
            state,
        })
    }

    /// Persist the new session and activate its first exercise
    pub fn start(&mut self) -> Result<()> {
        if self.state != WorkoutState::NotStarted {
            return Err(Error::State(format!(
                "workout {} has already been started",
                self.session.id
            )));
        }

        if self.session.exercises.is_empty() {
            self.session.completed = true;
        }

        self.store.append_session(&self.session)?;

        self.state = if self.session.completed {
            WorkoutState::Completed
        } else {
            WorkoutState::ExerciseActive {
                index: 0,
                timer: TimerState::Idle,
            }
        };

        tracing::info!(
            "Started workout {} with {} exercises",
            self.session.id,
            self.session.exercises.len()
        );
        Ok(())
    }

    /// Start the countdown for the current time-based exercise
    ///
    /// Returns false, changing nothing, when the current exercise is
    /// reps-based or its timer is not idle.
    pub fn start_timer(&mut self) -> bool {
        let WorkoutState::ExerciseActive {
            index,
            timer: TimerState::Idle,
        } = self.state
        else {
            return false;
        };

        let Some(duration) = self.session.exercises[index].kind.duration_seconds() else {
            return false;
        };

        let timer = if duration == 0 {
            TimerState::Elapsed
        } else {
            TimerState::Running {
                remaining: duration,
            }
        };
        self.state = WorkoutState::ExerciseActive { index, timer };

        tracing::debug!("Timer started for exercise {} ({}s)", index, duration);
        true
    }

    /// Advance the running timer by one second
    pub fn tick(&mut self) -> TickOutcome {
        let WorkoutState::ExerciseActive {
            index,
            timer: TimerState::Running { remaining },
        } = self.state
        else {
            return TickOutcome::Ignored;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.state = WorkoutState::ExerciseActive {
                index,
                timer: TimerState::Elapsed,
            };
            tracing::debug!("Timer elapsed for exercise {}", index);
            TickOutcome::Elapsed
        } else {
            self.state = WorkoutState::ExerciseActive {
                index,
                timer: TimerState::Running { remaining },
            };
            TickOutcome::Running { remaining }
        }
    }

    /// Whether `complete_exercise` would currently be accepted
    pub fn can_complete(&self) -> bool {
        match self.state {
            WorkoutState::ExerciseActive { index, timer } => {
                match self.session.exercises[index].kind {
                    ExerciseKind::Reps { .. } => true,
                    ExerciseKind::Time { .. } => timer == TimerState::Elapsed,
                }
            }
            WorkoutState::NotStarted | WorkoutState::Completed => false,
        }
    }

    /// Mark the current exercise done and move on
    ///
    /// Time-based exercises are only accepted once their timer has elapsed.
    /// A rejected call changes nothing and writes nothing.
    pub fn complete_exercise(&mut self) -> Result<Advance> {
        let index = match self.state {
            WorkoutState::ExerciseActive { index, .. } if self.can_complete() => index,
            WorkoutState::ExerciseActive { index, timer } => {
                return Err(Error::State(format!(
                    "exercise {} is time-based and its timer is {:?}",
                    index, timer
                )))
            }
            WorkoutState::NotStarted => {
                return Err(Error::State("workout has not been started".into()))
            }
            WorkoutState::Completed => {
                return Err(Error::State("workout is already completed".into()))
            }
        };

        self.session = self.session.with_exercise_completed(index);

        let advance = match self.session.first_incomplete() {
            None => {
                self.state = WorkoutState::Completed;
                Advance::Finished
            }
            Some(next) => {
                self.state = WorkoutState::ExerciseActive {
                    index: next,
                    timer: TimerState::Idle,
                };
                Advance::Next { index: next }
            }
        };

        self.store.replace_session(&self.session.id, &self.session)?;

        match advance {
            Advance::Finished => tracing::info!("Workout {} completed", self.session.id),
            Advance::Next { index } => {
                tracing::debug!("Workout {} advanced to exercise {}", self.session.id, index)
            }
        }
        Ok(advance)
    }

    pub fn state(&self) -> WorkoutState {
        self.state
    }

    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn is_completed(&self) -> bool {
        self.state == WorkoutState::Completed
    }

    /// Index of the active exercise, if any
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            WorkoutState::ExerciseActive { index, .. } => Some(index),
            WorkoutState::NotStarted if !self.session.exercises.is_empty() => Some(0),
            _ => None,
        }
    }

    pub fn current_exercise(&self) -> Option<&crate::Exercise> {
        self.current_index().map(|i| &self.session.exercises[i])
    }

    /// Seconds left on the running timer
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            WorkoutState::ExerciseActive {
                timer: TimerState::Running { remaining },
                ..
            } => Some(remaining),
            _ => None,
        }
    }

    /// "Exercise N of M", one-based
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_index()
            .map(|i| (i + 1, self.session.exercises.len()))
    }

    /// Share of exercises behind the active one, as a percentage
    pub fn progress_percent(&self) -> f64 {
        match self.state {
            WorkoutState::Completed => 100.0,
            _ => match self.current_index() {
                Some(i) => i as f64 / self.session.exercises.len() as f64 * 100.0,
                None => 0.0,
            },
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
