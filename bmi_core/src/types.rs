//! Core domain types for bmifit.
//!
//! This module defines the records shared by every component:
//! - Unit selectors used by the converter
//! - BMI categories and the immutable BMI record
//! - Exercises (reps- or time-based) and workout sessions

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Units
// ============================================================================

/// Measurement system the user entered values in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// The weight unit implied by this system
    pub fn weight_unit(self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kilograms,
            UnitSystem::Imperial => WeightUnit::Pounds,
        }
    }

    /// The height unit a form would preselect for this system
    pub fn default_height_unit(self) -> HeightUnit {
        match self {
            UnitSystem::Metric => HeightUnit::Centimeters,
            UnitSystem::Imperial => HeightUnit::Inches,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(Error::Validation(format!("Unknown unit system: {}", other))),
        }
    }
}

/// Unit a height value was entered in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HeightUnit {
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "in")]
    Inches,
}

impl FromStr for HeightUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cm" => Ok(HeightUnit::Centimeters),
            "m" => Ok(HeightUnit::Meters),
            "in" | "inches" => Ok(HeightUnit::Inches),
            other => Err(Error::Validation(format!("Unknown height unit: {}", other))),
        }
    }
}

/// Unit a weight value was entered in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeightUnit {
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lbs")]
    Pounds,
}

// ============================================================================
// BMI Types
// ============================================================================

/// One of the five BMI classification bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "underweight")]
    Underweight,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "overweight")]
    Overweight,
    #[serde(rename = "obese-1")]
    Obese1,
    #[serde(rename = "obese-2")]
    Obese2,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Underweight,
        Category::Normal,
        Category::Overweight,
        Category::Obese1,
        Category::Obese2,
    ];

    /// Stable identifier, as stored in history files
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Underweight => "underweight",
            Category::Normal => "normal",
            Category::Overweight => "overweight",
            Category::Obese1 => "obese-1",
            Category::Obese2 => "obese-2",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obese1 => "Obese Class I",
            Category::Obese2 => "Obese Class II",
        }
    }

    /// Fixed advisory message shown alongside the result
    pub fn message(self) -> &'static str {
        match self {
            Category::Underweight => {
                "You may need to gain some weight. Consider consulting with a nutritionist for a healthy weight gain plan."
            }
            Category::Normal => {
                "Your BMI is within the healthy range. Maintain a balanced diet and regular physical activity."
            }
            Category::Overweight => {
                "Consider adopting a healthier lifestyle with moderate exercise and a balanced diet."
            }
            Category::Obese1 => {
                "It's recommended to consult with a healthcare provider about weight management strategies."
            }
            Category::Obese2 => {
                "Please consult with a healthcare provider for a comprehensive weight management plan."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| Error::Validation(format!("Unknown category: {}", s)))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(Error::Validation(format!("Unknown gender: {}", other))),
        }
    }
}

/// A computed BMI result
///
/// Immutable once created: fields are private and only the BMI engine
/// constructs new records.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiRecord {
    pub(crate) value: f64,
    pub(crate) category: Category,
    pub(crate) message: String,
    #[serde(rename = "name")]
    pub(crate) subject_name: String,
    #[serde(rename = "gender")]
    pub(crate) subject_gender: Gender,
    #[serde(rename = "date")]
    pub(crate) computed_at: DateTime<Utc>,
}

impl BmiRecord {
    /// BMI rounded to two decimals
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    pub fn subject_gender(&self) -> Gender {
        self.subject_gender
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }
}

// ============================================================================
// Exercise and Session Types
// ============================================================================

/// How an exercise is measured
///
/// Sets/reps exist only for reps-based exercises and a duration only for
/// time-based ones.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExerciseKind {
    Reps { sets: u32, reps: u32 },
    Time { duration_seconds: u32 },
}

impl ExerciseKind {
    pub fn is_time(&self) -> bool {
        matches!(self, ExerciseKind::Time { .. })
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        match self {
            ExerciseKind::Time { duration_seconds } => Some(*duration_seconds),
            ExerciseKind::Reps { .. } => None,
        }
    }
}

/// A static, category-keyed exercise definition
#[derive(Clone, Debug)]
pub struct ExerciseTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ExerciseKind,
    pub description: &'static str,
    pub media_ref: &'static str,
}

/// One exercise instance inside a workout session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ExerciseKind,
    pub description: String,
    pub media_ref: String,
    pub completed: bool,
}

impl Exercise {
    /// Copy of this exercise with `completed` set
    pub fn marked_completed(&self) -> Exercise {
        Exercise {
            completed: true,
            ..self.clone()
        }
    }
}

/// A generated exercise plan plus its progression state
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "bmi_data")]
    pub bmi_snapshot: BmiRecord,
    pub exercises: Vec<Exercise>,
    pub completed: bool,
}

impl WorkoutSession {
    /// Copy of this session with the exercise at `index` marked completed
    ///
    /// `completed` on the session is recomputed so it holds exactly when
    /// every exercise is done.
    pub fn with_exercise_completed(&self, index: usize) -> WorkoutSession {
        let exercises: Vec<Exercise> = self
            .exercises
            .iter()
            .enumerate()
            .map(|(i, ex)| if i == index { ex.marked_completed() } else { ex.clone() })
            .collect();
        let completed = exercises.iter().all(|ex| ex.completed);

        WorkoutSession {
            exercises,
            completed,
            ..self.clone()
        }
    }

    /// Index of the first exercise not yet completed
    pub fn first_incomplete(&self) -> Option<usize> {
        self.exercises.iter().position(|ex| !ex.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.exercises.iter().filter(|ex| ex.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: &str, kind: ExerciseKind) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.into(),
            kind,
            description: String::new(),
            media_ref: String::new(),
            completed: false,
        }
    }

    fn record() -> BmiRecord {
        BmiRecord {
            value: 22.49,
            category: Category::Normal,
            message: Category::Normal.message().into(),
            subject_name: "Sam".into(),
            subject_gender: Gender::Other,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_serializes_with_hyphenated_names() {
        let json = serde_json::to_string(&Category::Obese1).unwrap();
        assert_eq!(json, "\"obese-1\"");
        let parsed: Category = serde_json::from_str("\"obese-2\"").unwrap();
        assert_eq!(parsed, Category::Obese2);
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        assert_eq!("normal".parse::<Category>().unwrap(), Category::Normal);
        assert!("chunky".parse::<Category>().unwrap_err().is_validation());
    }

    #[test]
    fn test_exercise_kind_is_flattened() {
        let ex = exercise("push-ups-1", ExerciseKind::Reps { sets: 3, reps: 10 });
        let value = serde_json::to_value(&ex).unwrap();
        assert_eq!(value["kind"], "reps");
        assert_eq!(value["sets"], 3);
        assert!(value.get("duration_seconds").is_none());

        let timed = exercise("walk-1", ExerciseKind::Time { duration_seconds: 300 });
        let value = serde_json::to_value(&timed).unwrap();
        assert_eq!(value["kind"], "time");
        assert_eq!(value["duration_seconds"], 300);
        assert!(value.get("reps").is_none());

        let back: Exercise = serde_json::from_value(value).unwrap();
        assert_eq!(back, timed);
    }

    #[test]
    fn test_with_exercise_completed_leaves_original_untouched() {
        let session = WorkoutSession {
            id: "s1".into(),
            created_at: Utc::now(),
            bmi_snapshot: record(),
            exercises: vec![
                exercise("a", ExerciseKind::Reps { sets: 1, reps: 1 }),
                exercise("b", ExerciseKind::Time { duration_seconds: 5 }),
            ],
            completed: false,
        };

        let first = session.with_exercise_completed(0);
        assert!(!session.exercises[0].completed);
        assert!(first.exercises[0].completed);
        assert!(!first.completed);
        assert_eq!(first.first_incomplete(), Some(1));

        let both = first.with_exercise_completed(1);
        assert!(both.completed);
        assert_eq!(both.first_incomplete(), None);
        assert_eq!(both.completed_count(), 2);
    }

    #[test]
    fn test_unit_system_defaults() {
        assert_eq!(UnitSystem::Imperial.weight_unit(), WeightUnit::Pounds);
        assert_eq!(UnitSystem::Metric.default_height_unit(), HeightUnit::Centimeters);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
    }
}
