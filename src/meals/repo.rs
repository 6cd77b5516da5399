use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::meals::repo_types::{Catalog, MealPlan};

/// Load the meal catalog from a JSON array on disk.
///
/// Neither a missing nor an unreadable file is fatal: the service still answers
/// `/predict` with a null meal plan, so we log and hand back an empty catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> Catalog {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "meal database not found; continuing with empty catalog");
        return Catalog::default();
    }

    match read_catalog(path) {
        Ok(catalog) => {
            info!(plans = catalog.len(), "meal database loaded");
            catalog
        }
        Err(e) => {
            let reason = format!("{e:#}");
            warn!(error = %reason, "meal database unusable; continuing with empty catalog");
            Catalog::default()
        }
    }
}

fn read_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read meal database {}", path.display()))?;
    let catalog = parse_catalog(&raw)
        .with_context(|| format!("parse meal database {}", path.display()))?;
    Ok(catalog)
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Catalog> {
    let plans: Vec<MealPlan> = serde_json::from_str(raw)?;
    Ok(Catalog::new(plans))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_catalog() {
        let catalog = load_catalog("/definitely/not/here/meal_database.json");
        assert!(catalog.is_empty());
    }

    #[test]
    fn loads_plans_from_disk() {
        let path = std::env::temp_dir().join(format!("fitcalc-catalog-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"target_calories": 1800, "diet_type": "Vegetarian", "meals": []},
                {"target_calories": 2200, "diet_type": "Non-Vegetarian"}]"#,
        )
        .unwrap();

        let catalog = load_catalog(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[1].diet_type, "Non-Vegetarian");
    }

    #[test]
    fn bundled_example_catalog_parses() {
        let catalog =
            load_catalog(concat!(env!("CARGO_MANIFEST_DIR"), "/data/meal_database.example.json"));
        assert_eq!(catalog.len(), 3);
        assert!(catalog.entries().iter().all(|p| !p.meals.is_empty()));
    }

    #[test]
    fn unparsable_file_yields_empty_catalog() {
        let path = std::env::temp_dir().join(format!("fitcalc-bad-catalog-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"target_calories": "lots", "diet_type": "Vegan"}]"#).unwrap();

        let catalog = load_catalog(&path);
        std::fs::remove_file(&path).ok();

        assert!(catalog.is_empty());
    }

    #[test]
    fn item_with_name_and_food_keys_loads() {
        let catalog = parse_catalog(
            r#"[{"target_calories": 2000.0, "diet_type": "Vegetarian", "meals": [
                {"meal_type": "Breakfast", "items": [{"name": "Poha", "food": "Poha", "calories": 250}]}
            ]}]"#,
        )
        .unwrap();
        assert_eq!(catalog.entries()[0].target_calories, 2000);
        assert_eq!(catalog.entries()[0].meals[0].items[0].label(), "Poha");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_catalog("{not json").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
