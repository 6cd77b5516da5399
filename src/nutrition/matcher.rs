use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use super::categories::{DietPreference, Region};
use super::dto::UserProfile;
use crate::meals::repo_types::{Catalog, MealPlan};

pub const REGION_BONUS: i64 = 1500;
pub const AGE_GROUP_BONUS: i64 = 500;
pub const WEIGHT_CATEGORY_BONUS: i64 = 1000;

/// How the regional bonus combines with the age-group and weight-category bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusComposition {
    /// All three bonuses subtract from the same score.
    Additive,
    /// Historical scoring: the regional bonus is computed but never reaches the score.
    Legacy,
}

impl FromStr for BonusComposition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "additive" => Ok(BonusComposition::Additive),
            "legacy" => Ok(BonusComposition::Legacy),
            other => anyhow::bail!("unknown bonus composition {other:?} (expected additive|legacy)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'a> {
    /// Best diet-compatible plan.
    Matched(&'a MealPlan),
    /// Nothing was diet-compatible; closest plan by raw calorie distance.
    Fallback(&'a MealPlan),
    None,
}

impl<'a> MatchOutcome<'a> {
    pub fn plan(&self) -> Option<&'a MealPlan> {
        match self {
            MatchOutcome::Matched(p) | MatchOutcome::Fallback(p) => Some(p),
            MatchOutcome::None => None,
        }
    }
}

fn age_group_matches(age_group: &str, age: u32) -> bool {
    let tag = age_group.to_lowercase();
    (tag.contains("child") && age <= 12)
        || (tag.contains("adult") && age >= 18)
        || (tag.contains("teen") && (13..=17).contains(&age))
}

/// Ordered bracket check. The 70-90kg bracket deliberately reaches 95 kg, so it
/// shadows ">90kg" for weights in (90, 95] when a tag names both.
fn weight_category_matches(weight_category: &str, weight_kg: f64) -> bool {
    (weight_category.contains("<50kg") && weight_kg < 50.0)
        || (weight_category.contains("50-70kg") && (50.0..=70.0).contains(&weight_kg))
        || (weight_category.contains("70-90kg") && weight_kg > 70.0 && weight_kg <= 95.0)
        || (weight_category.contains(">90kg") && weight_kg > 90.0)
}

/// Calorie distance of a diet-compatible plan after preference bonuses.
/// Lower is better and may go negative.
pub fn effective_difference(
    plan: &MealPlan,
    target: i64,
    profile: &UserProfile,
    diet: &DietPreference,
    composition: BonusComposition,
) -> i64 {
    let mut score = (plan.target_calories - target).abs();

    let regional = diet.region == Some(Region::Indian)
        && plan.diet_type.to_lowercase().contains("indian");
    if regional && composition == BonusComposition::Additive {
        score -= REGION_BONUS;
    }
    if age_group_matches(&plan.age_group, profile.age) {
        score -= AGE_GROUP_BONUS;
    }
    if weight_category_matches(&plan.weight_category, profile.weight_kg) {
        score -= WEIGHT_CATEGORY_BONUS;
    }
    score
}

/// Choose the catalog plan that best fits the profile at the given calorie target.
pub fn match_meal_plan<'a>(
    catalog: &'a Catalog,
    target: i64,
    profile: &UserProfile,
    composition: BonusComposition,
) -> MatchOutcome<'a> {
    let diet = DietPreference::parse(&profile.dietary_preference);

    let mut best: Option<(i64, &MealPlan)> = None;
    let mut fallback: Option<(i64, &MealPlan)> = None;

    for plan in catalog.entries() {
        if diet.is_compatible(&plan.diet_type) {
            let score = effective_difference(plan, target, profile, &diet, composition);
            if best.map_or(true, |(s, _)| score < s) {
                best = Some((score, plan));
            }
        } else {
            let diff = (plan.target_calories - target).abs();
            if fallback.map_or(true, |(d, _)| diff < d) {
                fallback = Some((diff, plan));
            }
        }
    }

    match (best, fallback) {
        (Some((score, plan)), _) => {
            debug!(score, plan_calories = plan.target_calories, "diet-compatible plan selected");
            MatchOutcome::Matched(plan)
        }
        (None, Some((diff, plan))) => {
            debug!(diff, plan_calories = plan.target_calories, "no compatible plan; using fallback");
            MatchOutcome::Fallback(plan)
        }
        (None, None) => MatchOutcome::None,
    }
}
