use serde::{Deserialize, Serialize};

use crate::meals::repo_types::FoodItem;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementRequest {
    pub target_calories: i64,
    pub diet_type: String,
    pub meal_type: String, // "Breakfast", "Lunch", ...
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub meal_type: String,
    pub items: Vec<FoodItem>,
    pub calories: f64,
}

#[derive(Debug, Serialize)]
pub struct ReplacementResponse {
    pub alternatives: Vec<Alternative>,
}
