use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::meals::repo_types::MealPlan;

pub const ENGINE_VERSION: &str = "v1.2-safe-plus";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub age: u32,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: String,
    pub dietary_preference: String,
    pub health_goal: String,
    #[serde(default)]
    pub tracker_data: Option<Vec<WeightEntry>>,
}

impl UserProfile {
    /// Range checks the engine relies on; run at the HTTP boundary.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !(20.0..=300.0).contains(&self.weight_kg) {
            return Err(ServiceError::Validation(
                "weight_kg must be between 20 and 300".into(),
            ));
        }
        if !(10..=100).contains(&self.age) {
            return Err(ServiceError::Validation("age must be between 10 and 100".into()));
        }
        if !(100.0..=250.0).contains(&self.height_cm) {
            return Err(ServiceError::Validation(
                "height_cm must be between 100 and 250".into(),
            ));
        }
        Ok(())
    }

    pub fn history(&self) -> &[WeightEntry] {
        self.tracker_data.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Macros {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Matched,
    Fallback,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub engine: &'static str,
    pub profile_received: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub daily_calories: i64,
    pub macros: Macros,
    pub meal_plan: Option<MealPlan>,
    pub meal_plan_match: Option<MatchKind>,
    pub recalibration_msg: Option<String>,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub model: &'static str,
    pub safety_checks: &'static str,
}
