//! Safety guardrails around the raw calorie estimate.
//!
//! The estimator's number is only a starting point. It gets a sustainability buffer,
//! is held above 75% of the Mifflin-St Jeor TDEE, is raised to a demographic floor,
//! capped at 5000 kcal, and finally nudged by the user's recent weight trend.

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use super::categories::{activity_multiplier, Gender, GoalDirection};
use super::dto::{UserProfile, WeightEntry};

pub const SUSTAINABILITY_BUFFER_KCAL: i64 = 150;
pub const MIN_TDEE_RATIO: f64 = 0.75;
pub const MAX_SAFE_CALORIES: i64 = 5000;

pub const MIN_TREND_ENTRIES: usize = 3;
pub const STAGNATION_TOLERANCE_KG: f64 = 0.1;
pub const TREND_ADJUSTMENT_RATIO: f64 = 0.05;

const DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(Debug, Error, PartialEq)]
pub enum TrendError {
    #[error("unparseable tracker date: {0:?}")]
    MalformedDate(String),

    #[error("non-finite weight recorded on {0}")]
    NonFiniteWeight(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailOutcome {
    pub daily_calories: i64,
    pub safety_floor: i64,
    pub floor_hit: bool,
    pub message: Option<String>,
}

/// Mifflin-St Jeor basal metabolic rate (kcal/day).
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn tdee(profile: &UserProfile) -> f64 {
    let gender = Gender::from_text(&profile.gender);
    basal_metabolic_rate(profile.weight_kg, profile.height_cm, profile.age, gender)
        * activity_multiplier(&profile.activity_level)
}

/// Absolute minimum intake by gender and age band.
pub fn safety_floor(gender: Gender, age: u32) -> i64 {
    match (gender, age) {
        (Gender::Male, a) if a < 18 => 1800,
        (Gender::Female, a) if a < 18 => 1400,
        (Gender::Male, a) if a > 60 => 1400,
        (Gender::Female, a) if a > 60 => 1200,
        (Gender::Male, _) => 1500,
        (Gender::Female, _) => 1200,
    }
}

pub fn floor_message(floor: i64) -> String {
    format!("Note: Your calorie target was capped at {floor} kcal for safety based on USDA guidelines.")
}

/// Turn a raw estimate into the final daily calorie target and advisory message.
pub fn apply_guardrails(profile: &UserProfile, raw_estimate: f64) -> GuardrailOutcome {
    let gender = Gender::from_text(&profile.gender);

    // estimator output is truncated, not rounded; `as` saturates on huge values
    let mut calories = (raw_estimate as i64).saturating_add(SUSTAINABILITY_BUFFER_KCAL);

    let min_realistic = (tdee(profile) * MIN_TDEE_RATIO) as i64;
    calories = calories.max(min_realistic);

    let floor = safety_floor(gender, profile.age);
    let floor_hit = calories < floor;
    if floor_hit {
        calories = floor;
    }
    calories = calories.min(MAX_SAFE_CALORIES);

    let mut message = None;
    if floor_hit {
        info!(floor, age = profile.age, "calorie target raised to safety floor");
        message = Some(floor_message(floor));
    }

    match recalibrate(profile, calories, floor) {
        Ok(Some((adjusted, alert))) => {
            info!(from = calories, to = adjusted, "trend recalibration applied");
            calories = adjusted;
            message = Some(alert);
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "recalibration skipped"),
    }

    GuardrailOutcome {
        daily_calories: calories,
        safety_floor: floor,
        floor_hit,
        message,
    }
}

/// Weight change from the earliest to the latest tracker entry, ordered by date.
pub fn weight_trend(entries: &[WeightEntry]) -> Result<f64, TrendError> {
    let mut dated = entries
        .iter()
        .map(|e| {
            if !e.weight.is_finite() {
                return Err(TrendError::NonFiniteWeight(e.date.clone()));
            }
            Ok((parse_entry_date(&e.date)?, e.weight))
        })
        .collect::<Result<Vec<_>, _>>()?;
    dated.sort_by_key(|(date, _)| *date);

    match (dated.first(), dated.last()) {
        (Some((_, first)), Some((_, last))) => Ok(last - first),
        _ => Ok(0.0),
    }
}

fn parse_entry_date(raw: &str) -> Result<OffsetDateTime, TrendError> {
    if let Ok(date) = Date::parse(raw, DATE_FORMAT) {
        return Ok(date.midnight().assume_utc());
    }
    OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| TrendError::MalformedDate(raw.to_string()))
}

fn recalibrate(
    profile: &UserProfile,
    calories: i64,
    floor: i64,
) -> Result<Option<(i64, String)>, TrendError> {
    let history = profile.history();
    if history.len() < MIN_TREND_ENTRIES {
        return Ok(None);
    }

    let diff = weight_trend(history)?;
    let step = (calories as f64 * TREND_ADJUSTMENT_RATIO) as i64;

    let (adjusted, stagnant) = match GoalDirection::from_text(&profile.health_goal) {
        GoalDirection::Loss if diff >= -STAGNATION_TOLERANCE_KG => (calories - step, true),
        GoalDirection::Gain if diff <= STAGNATION_TOLERANCE_KG => (calories + step, false),
        _ => return Ok(None),
    };

    let bounded = adjusted.clamp(floor, MAX_SAFE_CALORIES);
    if bounded != adjusted {
        debug!(adjusted, bounded, "trend adjustment limited by safety bounds");
    }
    if bounded == calories {
        return Ok(None);
    }

    // the alert reports the change actually applied after clamping
    let pct = (bounded - calories) as f64 / calories as f64 * 100.0;
    let alert = if stagnant {
        format!(
            "Trend Alert: Weight stagnant (Diff: {diff:+.1}kg). AI adjusted calories by {pct:+.0}% to break plateau."
        )
    } else {
        format!(
            "Trend Alert: Slow progress (Diff: {diff:+.1}kg). AI adjusted calories by {pct:+.0}% to boost growth."
        )
    };
    Ok(Some((bounded, alert)))
}
