use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::ServiceError;
use crate::meals::dto::{Alternative, ReplacementRequest};
use crate::meals::repo_types::Catalog;
use crate::nutrition::categories::DietClass;

pub const MAX_ALTERNATIVES: usize = 3;

/// Pick up to three alternative meals of the requested type from diet-compatible plans.
///
/// Candidates are shuffled with `rng` and then collapsed by their sorted item names, so
/// the same dish coming from two different plans shows up once. `target_calories` is
/// accepted but does not influence the pick yet.
pub fn suggest_replacements<R: Rng + ?Sized>(
    catalog: &Catalog,
    req: &ReplacementRequest,
    rng: &mut R,
) -> Result<Vec<Alternative>, ServiceError> {
    if catalog.is_empty() {
        return Err(ServiceError::NotFound("Meal database not available".into()));
    }

    let user_diet = req.diet_type.to_lowercase();
    let class = DietClass::from_base_name(&user_diet);

    let mut candidates: Vec<Alternative> = catalog
        .entries()
        .iter()
        .filter(|plan| class.accepts(&user_diet, &plan.diet_type.to_lowercase()))
        .flat_map(|plan| plan.meals.iter())
        .filter(|meal| meal.meal_type == req.meal_type)
        .map(|meal| Alternative {
            meal_type: meal.meal_type.clone(),
            items: meal.items.clone(),
            calories: meal.total_calories(),
        })
        .collect();

    candidates.shuffle(rng);

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(MAX_ALTERNATIVES);
    for alt in candidates {
        if seen.insert(item_set_key(&alt)) {
            unique.push(alt);
        }
        if unique.len() >= MAX_ALTERNATIVES {
            break;
        }
    }

    debug!(
        diet = %req.diet_type,
        meal_type = %req.meal_type,
        found = unique.len(),
        "replacement alternatives selected"
    );
    Ok(unique)
}

fn item_set_key(alt: &Alternative) -> String {
    let mut names: Vec<&str> = alt.items.iter().map(|i| i.label()).collect();
    names.sort_unstable();
    names.join(", ")
}
