use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One food line inside a meal. Catalog files carry `name`, `food`, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FoodItem {
    pub fn label(&self) -> &str {
        match (&self.name, &self.food) {
            (name, Some(food)) if name.is_empty() => food,
            (name, _) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_type: String, // "Breakfast", "Lunch", ...
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

impl Meal {
    pub fn total_calories(&self) -> f64 {
        self.items.iter().map(|i| i.calories).sum()
    }
}

/// Catalog entry. Unknown keys from the catalog file are kept and echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default, deserialize_with = "truncated_kcal")]
    pub target_calories: i64,
    #[serde(default)]
    pub diet_type: String,
    #[serde(default)]
    pub age_group: String,
    #[serde(default)]
    pub weight_category: String,
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Some exports write targets as floats ("2000.0").
fn truncated_kcal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let kcal = f64::deserialize(deserializer)?;
    if !kcal.is_finite() {
        return Err(de::Error::custom("target_calories must be finite"));
    }
    Ok(kcal as i64)
}

/// Read-only set of meal plans, loaded once and shared by every request.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plans: Vec<MealPlan>,
}

impl Catalog {
    pub fn new(plans: Vec<MealPlan>) -> Self {
        Self { plans }
    }

    pub fn entries(&self) -> &[MealPlan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
