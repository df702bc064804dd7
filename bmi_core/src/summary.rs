//! Read-only views over stored workouts.

use crate::{Category, ExerciseKind, WorkoutSession};
use chrono::{DateTime, Utc};
use std::fmt;

/// Format seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Short description of an exercise's target, e.g. "3 sets × 10 reps"
pub fn describe_target(kind: &ExerciseKind) -> String {
    match kind {
        ExerciseKind::Reps { sets, reps } => format!("{} sets × {} reps", sets, reps),
        ExerciseKind::Time { duration_seconds } if duration_seconds % 60 == 0 => {
            format!("{} min", duration_seconds / 60)
        }
        ExerciseKind::Time { duration_seconds } => format!("{} sec", duration_seconds),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryLine {
    pub name: String,
    pub target: String,
    pub completed: bool,
}

/// What a user sees after (or while) doing a workout
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutSummary {
    pub session_id: String,
    pub subject_name: String,
    pub bmi: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub completed: bool,
    pub lines: Vec<SummaryLine>,
}

impl WorkoutSummary {
    pub fn from_session(session: &WorkoutSession) -> Self {
        let bmi = &session.bmi_snapshot;
        Self {
            session_id: session.id.clone(),
            subject_name: bmi.subject_name().to_string(),
            bmi: bmi.value(),
            category: bmi.category(),
            date: session.created_at,
            completed: session.completed,
            lines: session
                .exercises
                .iter()
                .map(|ex| SummaryLine {
                    name: ex.name.clone(),
                    target: describe_target(&ex.kind),
                    completed: ex.completed,
                })
                .collect(),
        }
    }

    pub fn done_count(&self) -> usize {
        self.lines.iter().filter(|l| l.completed).count()
    }
}

impl fmt::Display for WorkoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.completed {
            writeln!(f, "Workout Complete!")?;
            writeln!(
                f,
                "Great job, {}! You've completed all exercises.",
                self.subject_name
            )?;
        } else {
            writeln!(
                f,
                "Workout in progress ({}/{} exercises done)",
                self.done_count(),
                self.lines.len()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "  BMI:      {:.2}", self.bmi)?;
        writeln!(f, "  Category: {}", self.category.label())?;
        writeln!(f, "  Date:     {}", self.date.format("%Y-%m-%d"))?;
        writeln!(f)?;
        for line in &self.lines {
            let mark = if line.completed { "✓" } else { "·" };
            writeln!(f, "  {} {:<24} {}", mark, line.name, line.target)?;
        }
        Ok(())
    }
}
