//! Unit conversion from user-entered values to meters and kilograms.

use crate::{Error, HeightUnit, Result, UnitSystem, WeightUnit};

const METERS_PER_INCH: f64 = 0.0254;
const KG_PER_POUND: f64 = 0.453592;

/// Height and weight in canonical SI units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurements {
    pub height_m: f64,
    pub weight_kg: f64,
}

/// Normalize raw form input to meters and kilograms
///
/// Metric accepts height in centimeters or meters and weight in kilograms.
/// Imperial accepts height in inches and weight in pounds. Any other
/// combination, a non-numeric value, or a value that is not strictly
/// positive is a validation error.
pub fn normalize(
    height: &str,
    height_unit: HeightUnit,
    weight: &str,
    weight_unit: WeightUnit,
    system: UnitSystem,
) -> Result<Measurements> {
    let height_value = parse_positive(height)?;
    let weight_value = parse_positive(weight)?;

    let height_m = match (system, height_unit) {
        (UnitSystem::Metric, HeightUnit::Centimeters) => height_value / 100.0,
        (UnitSystem::Metric, HeightUnit::Meters) => height_value,
        (UnitSystem::Imperial, HeightUnit::Inches) => height_value * METERS_PER_INCH,
        (system, unit) => {
            return Err(Error::Validation(format!(
                "Height unit {:?} is not available in the {:?} system",
                unit, system
            )))
        }
    };

    let weight_kg = match (system, weight_unit) {
        (UnitSystem::Metric, WeightUnit::Kilograms) => weight_value,
        (UnitSystem::Imperial, WeightUnit::Pounds) => weight_value * KG_PER_POUND,
        (system, unit) => {
            return Err(Error::Validation(format!(
                "Weight unit {:?} is not available in the {:?} system",
                unit, system
            )))
        }
    };

    tracing::debug!(
        "Normalized {} {:?} / {} {:?} to {:.4} m / {:.4} kg",
        height,
        height_unit,
        weight,
        weight_unit,
        height_m,
        weight_kg
    );

    Ok(Measurements {
        height_m,
        weight_kg,
    })
}

/// Parse a form field as a finite, strictly positive number
fn parse_positive(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(
            "Please enter both height and weight".into(),
        ));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| Error::Validation("Please enter valid numbers".into()))?;

    if !value.is_finite() {
        return Err(Error::Validation("Please enter valid numbers".into()));
    }
    if value <= 0.0 {
        return Err(Error::Validation(
            "Height and weight must be positive values".into(),
        ));
    }

    Ok(value)
}
