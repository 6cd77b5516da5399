use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BmiQuery {
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct BodyFatQuery {
    pub gender: String,
    pub height_cm: f64,
    pub neck_cm: f64,
    pub waist_cm: f64,
    pub hip_cm: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct BodyFatResult {
    pub body_fat_percent: f64,
    pub category: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct IdealWeightQuery {
    pub gender: String,
    pub height_cm: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct IdealWeightResult {
    pub robinson_kg: f64,
    pub miller_kg: f64,
    pub devine_kg: f64,
    pub hamwi_kg: f64,
}

#[derive(Debug, Deserialize)]
pub struct WaterQuery {
    pub weight_kg: f64,
    #[serde(default)]
    pub exercise_minutes: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct WaterResult {
    pub liters: f64,
    pub cups: f64,
}
