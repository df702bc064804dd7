//! BMI computation and classification.
//!
//! Classification bands are half-open:
//! - `< 18.5` underweight
//! - `18.5 ..< 23` normal
//! - `23 ..< 25` overweight
//! - `25 ..< 30` obese class I
//! - `>= 30` obese class II

use crate::{BmiRecord, Category, Error, Gender, Measurements, Result};
use chrono::{DateTime, Utc};

/// Upper sanity bound on a computed BMI; anything above is garbage input
pub const MAX_PLAUSIBLE_BMI: f64 = 100.0;

const SCALE_MIN: f64 = 10.0;
const SCALE_MAX: f64 = 40.0;

/// Compute a BMI record timestamped now
pub fn compute(
    measurements: Measurements,
    subject_name: &str,
    subject_gender: Gender,
) -> Result<BmiRecord> {
    compute_at(measurements, subject_name, subject_gender, Utc::now())
}

/// Compute a BMI record with an explicit timestamp
///
/// The category is classified from the unrounded BMI; only the stored
/// value is rounded to two decimals.
pub fn compute_at(
    measurements: Measurements,
    subject_name: &str,
    subject_gender: Gender,
    now: DateTime<Utc>,
) -> Result<BmiRecord> {
    let name = subject_name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Please enter your name".into()));
    }

    let Measurements {
        height_m,
        weight_kg,
    } = measurements;
    let raw = weight_kg / (height_m * height_m);

    if !raw.is_finite() || !(0.0..=MAX_PLAUSIBLE_BMI).contains(&raw) {
        return Err(Error::Validation(
            "Calculated BMI is outside reasonable range. Please check your inputs.".into(),
        ));
    }

    let category = classify(raw);
    let value = round2(raw);

    tracing::info!("Computed BMI {:.2} ({}) for {}", value, category, name);

    Ok(BmiRecord {
        value,
        category,
        message: category.message().to_string(),
        subject_name: name.to_string(),
        subject_gender,
        computed_at: now,
    })
}

/// Map a BMI value onto its category
pub fn classify(bmi: f64) -> Category {
    if bmi < 18.5 {
        Category::Underweight
    } else if bmi < 23.0 {
        Category::Normal
    } else if bmi < 25.0 {
        Category::Overweight
    } else if bmi < 30.0 {
        Category::Obese1
    } else {
        Category::Obese2
    }
}

/// Position of a BMI value on a 0-100 gauge spanning BMI 10 to 40
pub fn scale_position(bmi: f64) -> f64 {
    let percentage = (bmi - SCALE_MIN) / (SCALE_MAX - SCALE_MIN) * 100.0;
    percentage.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize, HeightUnit, UnitSystem, WeightUnit};

    fn metric(height_cm: &str, weight_kg: &str) -> Measurements {
        normalize(
            height_cm,
            HeightUnit::Centimeters,
            weight_kg,
            WeightUnit::Kilograms,
            UnitSystem::Metric,
        )
        .unwrap()
    }

    #[test]
    fn test_metric_round_trip_is_normal() {
        let record = compute(metric("170", "65"), "Alex", Gender::Male).unwrap();
        assert_eq!(record.value(), 22.49);
        assert_eq!(record.category(), Category::Normal);
        assert_eq!(record.message(), Category::Normal.message());
        assert_eq!(record.subject_name(), "Alex");
    }

    #[test]
    fn test_imperial_round_trip_is_normal() {
        let m = normalize(
            "70",
            HeightUnit::Inches,
            "154",
            WeightUnit::Pounds,
            UnitSystem::Imperial,
        )
        .unwrap();
        let record = compute(m, "Jo", Gender::Female).unwrap();
        assert_eq!(record.value(), 22.10);
        assert_eq!(record.category(), Category::Normal);
    }

    #[test]
    fn test_boundaries_are_inclusive_below() {
        assert_eq!(classify(18.49), Category::Underweight);
        assert_eq!(classify(18.5), Category::Normal);
        assert_eq!(classify(22.99), Category::Normal);
        assert_eq!(classify(23.0), Category::Overweight);
        assert_eq!(classify(24.99), Category::Overweight);
        assert_eq!(classify(25.0), Category::Obese1);
        assert_eq!(classify(29.99), Category::Obese1);
        assert_eq!(classify(30.0), Category::Obese2);
    }

    #[test]
    fn test_classification_is_total_and_monotonic() {
        let mut previous = Category::Underweight;
        let order = |c: Category| Category::ALL.iter().position(|x| *x == c).unwrap();
        for hundredths in 0..10_000 {
            let bmi = hundredths as f64 / 100.0;
            let category = classify(bmi);
            assert!(order(category) >= order(previous), "bands regress at {}", bmi);
            previous = category;
        }
    }

    #[test]
    fn test_category_uses_unrounded_bmi() {
        // 18.497 is stored as 18.50 but is still underweight
        let m = Measurements {
            height_m: 1.0,
            weight_kg: 18.497,
        };
        let record = compute(m, "Pat", Gender::Other).unwrap();
        assert_eq!(record.value(), 18.5);
        assert_eq!(record.category(), Category::Underweight);
        assert_eq!(record.message(), Category::Underweight.message());
    }

    #[test]
    fn test_upper_bound_is_inclusive() {
        let at_limit = Measurements {
            height_m: 1.0,
            weight_kg: 100.0,
        };
        let record = compute(at_limit, "Pat", Gender::Other).unwrap();
        assert_eq!(record.value(), 100.0);
        assert_eq!(record.category(), Category::Obese2);

        let over = Measurements {
            height_m: 1.0,
            weight_kg: 100.01,
        };
        assert!(compute(over, "Pat", Gender::Other)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = compute(metric("170", "65"), "   ", Gender::Other).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_absurd_bmi_rejected() {
        // 50 cm and 300 kg gives 1200
        let err = compute(metric("50", "300"), "Sam", Gender::Other).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_scale_position_is_clamped() {
        assert_eq!(scale_position(5.0), 0.0);
        assert_eq!(scale_position(25.0), 50.0);
        assert_eq!(scale_position(55.0), 100.0);
    }
}
