//! Built-in exercise templates keyed by BMI category.
//!
//! Templates are static; `plan_for` stamps out fresh exercise instances
//! with unique ids every time it is called.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Cached template table - built once and reused across all plans
static TEMPLATES: Lazy<HashMap<Category, Vec<ExerciseTemplate>>> =
    Lazy::new(build_default_templates);

/// Templates for a category, in plan order
pub fn templates_for(category: Category) -> &'static [ExerciseTemplate] {
    TEMPLATES
        .get(&category)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Build a fresh exercise plan for a category
///
/// Every exercise id is the template id plus a random suffix, so two plans
/// for the same category never share an id.
pub fn plan_for(category: Category) -> Vec<Exercise> {
    let plan: Vec<Exercise> = templates_for(category)
        .iter()
        .map(instantiate)
        .collect();

    tracing::debug!("Generated {} exercises for {}", plan.len(), category);
    plan
}

fn instantiate(template: &ExerciseTemplate) -> Exercise {
    Exercise {
        id: format!("{}-{}", template.id, Uuid::new_v4().simple()),
        name: template.name.to_string(),
        kind: template.kind,
        description: template.description.to_string(),
        media_ref: template.media_ref.to_string(),
        completed: false,
    }
}

fn build_default_templates() -> HashMap<Category, Vec<ExerciseTemplate>> {
    let mut templates = HashMap::new();

    templates.insert(
        Category::Underweight,
        vec![
            ExerciseTemplate {
                id: "push-ups",
                name: "Push-ups",
                kind: ExerciseKind::Reps { sets: 3, reps: 10 },
                description: "Start in a plank position, lower your body until your chest nearly touches the ground, then push back up.",
                media_ref: "https://media.giphy.com/media/7YCC7PTNX2TOhJQ6aW/giphy.gif",
            },
            ExerciseTemplate {
                id: "squats",
                name: "Bodyweight Squats",
                kind: ExerciseKind::Reps { sets: 3, reps: 15 },
                description: "Stand with feet shoulder-width apart, lower your body as if sitting back into a chair, then return to standing.",
                media_ref: "https://media.giphy.com/media/1qfKN8Dt0CRdCRxz9q/giphy.gif",
            },
        ],
    );

    templates.insert(
        Category::Normal,
        vec![
            ExerciseTemplate {
                id: "jumping-jacks",
                name: "Jumping Jacks",
                kind: ExerciseKind::Time { duration_seconds: 60 },
                description: "Jump while spreading your legs and arms out to the side, then return to starting position.",
                media_ref: "https://media.giphy.com/media/2tKBrBqfzWsqA/giphy.gif",
            },
            ExerciseTemplate {
                id: "mountain-climbers",
                name: "Mountain Climbers",
                kind: ExerciseKind::Time { duration_seconds: 45 },
                description: "Start in a plank position and alternate bringing each knee towards your chest.",
                media_ref: "https://media.giphy.com/media/1qfKN8Dt0CRdCRxz9q/giphy.gif",
            },
        ],
    );

    templates.insert(
        Category::Overweight,
        vec![
            ExerciseTemplate {
                id: "walking",
                name: "Brisk Walking",
                kind: ExerciseKind::Time { duration_seconds: 300 },
                description: "Walk at a pace that elevates your heart rate but still allows you to hold a conversation.",
                media_ref: "https://media.giphy.com/media/3o7ZetM6YUwkGfZgTS/giphy.gif",
            },
            ExerciseTemplate {
                id: "wall-push-ups",
                name: "Wall Push-ups",
                kind: ExerciseKind::Reps { sets: 3, reps: 12 },
                description: "Stand facing a wall, place hands on wall at shoulder height, perform push-ups against the wall.",
                media_ref: "https://media.giphy.com/media/7YCC7PTNX2TOhJQ6aW/giphy.gif",
            },
        ],
    );

    templates.insert(
        Category::Obese1,
        vec![
            ExerciseTemplate {
                id: "seated-exercises",
                name: "Seated Arm Circles",
                kind: ExerciseKind::Time { duration_seconds: 60 },
                description: "Sitting in a chair, extend arms to sides and make small circles.",
                media_ref: "https://media.giphy.com/media/3o7ZetM6YUwkGfZgTS/giphy.gif",
            },
            ExerciseTemplate {
                id: "leg-raises",
                name: "Seated Leg Raises",
                kind: ExerciseKind::Reps { sets: 2, reps: 10 },
                description: "Sitting in a chair, extend one leg straight out, hold, then lower. Alternate legs.",
                media_ref: "https://media.giphy.com/media/1qfKN8Dt0CRdCRxz9q/giphy.gif",
            },
        ],
    );

    templates.insert(
        Category::Obese2,
        vec![
            ExerciseTemplate {
                id: "water-walking",
                name: "Water Walking",
                kind: ExerciseKind::Time { duration_seconds: 180 },
                description: "Walk in a pool at waist depth, focusing on good posture and controlled movements.",
                media_ref: "https://media.giphy.com/media/3o7ZetM6YUwkGfZgTS/giphy.gif",
            },
            ExerciseTemplate {
                id: "seated-punches",
                name: "Seated Punches",
                kind: ExerciseKind::Time { duration_seconds: 60 },
                description: "Sitting in a chair, alternate punching arms forward with controlled movements.",
                media_ref: "https://media.giphy.com/media/1qfKN8Dt0CRdCRxz9q/giphy.gif",
            },
        ],
    );

    templates
}

/// Validate the template table for consistency and completeness
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate() -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();

    for category in Category::ALL {
        let templates = templates_for(category);
        if templates.is_empty() {
            errors.push(format!("Category '{}' has no exercises", category));
        }

        for template in templates {
            if template.id.is_empty() {
                errors.push(format!("Category '{}' has a template with empty ID", category));
            }
            if !seen_ids.insert(template.id) {
                errors.push(format!("Duplicate template ID '{}'", template.id));
            }
            if template.name.is_empty() {
                errors.push(format!("Template '{}' has empty name", template.id));
            }

            match template.kind {
                ExerciseKind::Reps { sets, reps } => {
                    if sets == 0 || reps == 0 {
                        errors.push(format!(
                            "Template '{}': {} sets of {} reps is not a workout",
                            template.id, sets, reps
                        ));
                    }
                }
                ExerciseKind::Time { duration_seconds } => {
                    if duration_seconds == 0 {
                        errors.push(format!("Template '{}' has zero duration", template.id));
                    }
                }
            }
        }
    }

    errors
}
