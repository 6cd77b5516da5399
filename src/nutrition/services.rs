use std::sync::Arc;

use tracing::{debug, error};

use super::categories::DietPreference;
use super::dto::{Macros, MatchKind, UserProfile};
use super::guardrails::apply_guardrails;
use super::macro_split::allocate_macros;
use super::matcher::{match_meal_plan, MatchOutcome};
use crate::config::MatcherConfig;
use crate::error::ServiceError;
use crate::meals::repo_types::{Catalog, MealPlan};
use crate::model::{CalorieOracle, CategoryEncoder, CategoryField, FeatureVector};

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub daily_calories: i64,
    pub macros: Macros,
    pub meal_plan: Option<MealPlan>,
    pub match_kind: Option<MatchKind>,
    pub recalibration_msg: Option<String>,
}

/// Runs a profile through encoding, the estimator, guardrails, plan matching and
/// macro allocation. Holds only shared read-only collaborators.
#[derive(Clone)]
pub struct Recommender {
    encoder: Arc<dyn CategoryEncoder>,
    oracle: Arc<dyn CalorieOracle>,
    catalog: Arc<Catalog>,
    matcher: MatcherConfig,
}

impl Recommender {
    pub fn new(
        encoder: Arc<dyn CategoryEncoder>,
        oracle: Arc<dyn CalorieOracle>,
        catalog: Arc<Catalog>,
        matcher: MatcherConfig,
    ) -> Self {
        Self {
            encoder,
            oracle,
            catalog,
            matcher,
        }
    }

    pub fn features(&self, profile: &UserProfile) -> Result<FeatureVector, ServiceError> {
        let diet_label = DietPreference::encoder_label(&profile.dietary_preference);
        Ok(FeatureVector {
            weight_kg: profile.weight_kg,
            age: f64::from(profile.age),
            height_cm: profile.height_cm,
            gender: self.encoder.encode(CategoryField::Gender, &profile.gender)?,
            activity_level: self
                .encoder
                .encode(CategoryField::ActivityLevel, &profile.activity_level)?,
            diet: self.encoder.encode(CategoryField::Diet, diet_label)?,
            goal: self.encoder.encode(CategoryField::Goal, &profile.health_goal)?,
        })
    }

    pub fn raw_estimate(&self, profile: &UserProfile) -> Result<f64, ServiceError> {
        let features = self.features(profile)?;
        let raw = self.oracle.predict(&features).map_err(|e| {
            error!(error = %e, "calorie oracle failed");
            ServiceError::from(e)
        })?;
        if !raw.is_finite() {
            error!(raw, "calorie oracle returned a non-finite estimate");
            return Err(ServiceError::Internal(format!(
                "calorie estimate is not a finite number: {raw}"
            )));
        }
        debug!(raw, "raw calorie estimate");
        Ok(raw)
    }

    pub fn recommend(&self, profile: &UserProfile) -> Result<Recommendation, ServiceError> {
        let raw = self.raw_estimate(profile)?;
        Ok(self.recommend_with_estimate(profile, raw))
    }

    /// Everything after the estimator: no I/O and no failure modes.
    pub fn recommend_with_estimate(&self, profile: &UserProfile, raw_estimate: f64) -> Recommendation {
        let guarded = apply_guardrails(profile, raw_estimate);
        let target = guarded.daily_calories;

        let outcome = match_meal_plan(
            &self.catalog,
            target,
            profile,
            self.matcher.bonus_composition,
        );
        let match_kind = match outcome {
            MatchOutcome::Matched(_) => Some(MatchKind::Matched),
            MatchOutcome::Fallback(_) => Some(MatchKind::Fallback),
            MatchOutcome::None => None,
        };

        Recommendation {
            daily_calories: target,
            macros: allocate_macros(target),
            meal_plan: outcome.plan().cloned(),
            match_kind,
            recalibration_msg: guarded.message,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo_types::fixtures::plan;
    use crate::nutrition::dto::fixtures::{entries, profile};

    struct FailingOracle;

    impl CalorieOracle for FailingOracle {
        fn predict(&self, _features: &FeatureVector) -> anyhow::Result<f64> {
            anyhow::bail!("estimator offline")
        }
    }

    struct FixedOracle(f64);

    impl CalorieOracle for FixedOracle {
        fn predict(&self, _features: &FeatureVector) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    fn with_oracle(oracle: impl CalorieOracle + 'static) -> Recommender {
        let artifacts = Arc::new(
            crate::model::ModelArtifacts::from_json(crate::model::artifacts::fixtures::ARTIFACTS_JSON)
                .unwrap(),
        );
        Recommender::new(artifacts, Arc::new(oracle), Arc::new(catalog()), MatcherConfig::default())
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            plan(2100, "Indian-Vegetarian", "Adult (18-40)", "70-90kg"),
            plan(2150, "Non-Vegetarian", "Adult (18-40)", "70-90kg"),
        ])
    }

    #[test]
    fn reference_profile_end_to_end() {
        let rec = fixtures::recommender(catalog());
        let out = rec.recommend_with_estimate(&profile(), 1800.0);
        assert_eq!(out.daily_calories, 2127);
        assert_eq!(
            out.macros,
            Macros {
                protein_g: 132,
                carbs_g: 239,
                fat_g: 70
            }
        );
        assert_eq!(out.match_kind, Some(MatchKind::Matched));
        assert_eq!(out.meal_plan.unwrap().diet_type, "Indian-Vegetarian");
        assert_eq!(out.recalibration_msg, None);
    }

    #[test]
    fn stagnant_history_reduces_target() {
        let rec = fixtures::recommender(catalog());
        let mut p = profile();
        p.tracker_data = Some(entries(&[
            ("2024-05-01", 85.0),
            ("2024-05-04", 85.0),
            ("2024-05-07", 85.0),
        ]));
        let out = rec.recommend_with_estimate(&p, 1800.0);
        assert_eq!(out.daily_calories, 2021);
        assert!(out.recalibration_msg.unwrap().contains("Weight stagnant"));
        assert_eq!(out.macros, allocate_macros(2021));
    }

    #[test]
    fn empty_catalog_gives_no_plan() {
        let rec = fixtures::recommender(Catalog::default());
        let out = rec.recommend_with_estimate(&profile(), 1800.0);
        assert_eq!(out.meal_plan, None);
        assert_eq!(out.match_kind, None);
    }

    #[test]
    fn region_qualified_diet_is_encoded_as_base_class() {
        let rec = fixtures::recommender(catalog());
        let features = rec.features(&profile()).unwrap();
        assert_eq!(features.diet, 3); // "Vegetarian"
        assert_eq!(features.gender, 1);
        assert_eq!(features.goal, 3);
    }

    #[test]
    fn recommend_uses_oracle_estimate() {
        let rec = fixtures::recommender(catalog());
        // oracle: 1000 + 10 * 85 = 1850 -> +150 = 2000, lifted to 2127
        let out = rec.recommend(&profile()).unwrap();
        assert_eq!(out.daily_calories, 2127);
    }

    #[test]
    fn unknown_category_is_validation_error() {
        let rec = fixtures::recommender(catalog());
        let mut p = profile();
        p.health_goal = "Get Shredded".into();
        assert!(matches!(rec.recommend(&p), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn oracle_failure_is_internal() {
        let artifacts = Arc::new(
            crate::model::ModelArtifacts::from_json(crate::model::artifacts::fixtures::ARTIFACTS_JSON)
                .unwrap(),
        );
        let rec = Recommender::new(
            artifacts,
            Arc::new(FailingOracle),
            Arc::new(catalog()),
            MatcherConfig::default(),
        );
        let err = rec.recommend(&profile()).unwrap_err();
        assert!(matches!(err, ServiceError::Internal(ref m) if m.contains("estimator offline")));
    }

    #[test]
    fn non_finite_estimates_are_internal_errors() {
        for raw in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = with_oracle(FixedOracle(raw)).recommend(&profile()).unwrap_err();
            assert!(matches!(err, ServiceError::Internal(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn huge_estimate_is_capped() {
        let out = with_oracle(FixedOracle(1e20)).recommend(&profile()).unwrap();
        assert_eq!(out.daily_calories, 5000);

        let rec = fixtures::recommender(catalog());
        assert_eq!(rec.recommend_with_estimate(&profile(), 1e20).daily_calories, 5000);
        assert_eq!(rec.recommend_with_estimate(&profile(), f64::MAX).daily_calories, 5000);
    }
}
