use super::dto::{BmiResult, BodyFatResult, IdealWeightResult, WaterResult};
use crate::error::ServiceError;
use crate::nutrition::categories::Gender;

const FIVE_FEET_CM: f64 = 152.4;
const CM_PER_INCH: f64 = 2.54;
const ML_PER_CUP: f64 = 236.0;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn require_positive(name: &str, value: f64) -> Result<(), ServiceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!("{name} must be a positive number")))
    }
}

pub fn bmi(height_cm: f64, weight_kg: f64) -> Result<BmiResult, ServiceError> {
    require_positive("height_cm", height_cm)?;
    require_positive("weight_kg", weight_kg)?;

    let height_m = height_cm / 100.0;
    // categorise the displayed (rounded) value
    let bmi = round_to(weight_kg / (height_m * height_m), 1);
    let category = if bmi < 18.5 {
        "Underweight"
    } else if bmi < 24.9 {
        "Normal Weight"
    } else if bmi < 29.9 {
        "Overweight"
    } else {
        "Obese"
    };

    Ok(BmiResult {
        bmi,
        category,
        message: "A healthy BMI range is 18.5 to 24.9.",
    })
}

/// US Navy circumference method, metric units.
pub fn body_fat(
    gender: Gender,
    height_cm: f64,
    neck_cm: f64,
    waist_cm: f64,
    hip_cm: Option<f64>,
) -> Result<BodyFatResult, ServiceError> {
    require_positive("height_cm", height_cm)?;

    let raw = match gender {
        Gender::Male => {
            let girth = waist_cm - neck_cm;
            require_positive("waist_cm - neck_cm", girth)?;
            495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()) - 450.0
        }
        Gender::Female => {
            let hip = hip_cm.ok_or_else(|| ServiceError::Validation("hip_cm is required for women".into()))?;
            let girth = waist_cm + hip - neck_cm;
            require_positive("waist_cm + hip_cm - neck_cm", girth)?;
            495.0 / (1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10()) - 450.0
        }
    };
    if !raw.is_finite() {
        return Err(ServiceError::Validation("measurements are out of range".into()));
    }

    let pct = round_to(raw, 1);
    let bands: [(f64, &str); 4] = match gender {
        Gender::Male => [(6.0, "Essential Fat"), (14.0, "Athlete"), (18.0, "Fitness"), (25.0, "Average")],
        Gender::Female => [(14.0, "Essential Fat"), (21.0, "Athlete"), (25.0, "Fitness"), (32.0, "Average")],
    };
    let category = bands
        .iter()
        .find(|(limit, _)| pct < *limit)
        .map(|(_, name)| *name)
        .unwrap_or("Obese");

    Ok(BodyFatResult {
        body_fat_percent: pct,
        category,
    })
}

/// Robinson, Miller, Devine and Hamwi estimates. Heights under five feet extrapolate
/// downwards instead of being clamped.
pub fn ideal_weight(gender: Gender, height_cm: f64) -> Result<IdealWeightResult, ServiceError> {
    require_positive("height_cm", height_cm)?;

    let inches = (height_cm - FIVE_FEET_CM) / CM_PER_INCH;
    let [robinson, miller, devine, hamwi] = match gender {
        Gender::Male => [(52.0, 1.9), (56.2, 1.41), (50.0, 2.3), (48.0, 2.7)],
        Gender::Female => [(49.0, 1.7), (53.1, 1.36), (45.5, 2.3), (45.5, 2.2)],
    }
    .map(|(base, per_inch)| round_to(base + per_inch * inches, 1));

    Ok(IdealWeightResult {
        robinson_kg: robinson,
        miller_kg: miller,
        devine_kg: devine,
        hamwi_kg: hamwi,
    })
}

pub fn water_intake(weight_kg: f64, exercise_minutes: f64) -> Result<WaterResult, ServiceError> {
    require_positive("weight_kg", weight_kg)?;
    if !exercise_minutes.is_finite() || exercise_minutes < 0.0 {
        return Err(ServiceError::Validation("exercise_minutes must not be negative".into()));
    }

    let ml = weight_kg * 35.0 + exercise_minutes * 10.0;
    Ok(WaterResult {
        liters: round_to(ml / 1000.0, 2),
        cups: round_to(ml / ML_PER_CUP, 1),
    })
}
