//! Closed enumerations for the free-text profile categories.
//!
//! Profiles arrive with free text ("Moderately Active", "Indian-Vegetarian", "Weight Loss").
//! The engine resolves that text once into these types and branches on them instead of
//! re-matching substrings at every rule.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    /// Anything other than "male" takes the female formula and floors.
    Female,
}

impl Gender {
    pub fn from_text(text: &str) -> Self {
        if text.to_lowercase() == "male" {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
    Athlete,
}

/// Ordered lookup table; the first key contained in the activity text wins.
const ACTIVITY_TABLE: [(&str, ActivityLevel); 6] = [
    ("sedentary", ActivityLevel::Sedentary),
    ("lightly active", ActivityLevel::LightlyActive),
    ("moderately active", ActivityLevel::ModeratelyActive),
    ("very active", ActivityLevel::VeryActive),
    ("extra active", ActivityLevel::ExtraActive),
    ("athlete", ActivityLevel::Athlete),
];

pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.375;

impl ActivityLevel {
    pub fn from_text(text: &str) -> Option<Self> {
        let key = text.trim().to_lowercase();
        ACTIVITY_TABLE
            .iter()
            .find(|(needle, _)| key.contains(needle))
            .map(|(_, level)| *level)
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive | ActivityLevel::Athlete => 1.9,
        }
    }
}

/// Multiplier for free-text activity, falling back to lightly active.
pub fn activity_multiplier(text: &str) -> f64 {
    ActivityLevel::from_text(text)
        .map(ActivityLevel::multiplier)
        .unwrap_or(DEFAULT_ACTIVITY_MULTIPLIER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DietClass {
    Vegetarian,
    NonVegetarian,
    /// Any other diet; compatibility falls back to tag containment.
    Other,
}

impl DietClass {
    /// Classify an unqualified diet name ("vegetarian", "standard", ...). Input is lower-case.
    pub fn from_base_name(text: &str) -> Self {
        match text {
            "vegetarian" => DietClass::Vegetarian,
            "non-vegetarian" | "standard" => DietClass::NonVegetarian,
            _ => DietClass::Other,
        }
    }

    /// Whether a plan tag is acceptable. Both strings must already be lower-case.
    pub fn accepts(self, user_text: &str, plan_tag: &str) -> bool {
        match self {
            DietClass::Vegetarian => plan_tag.contains("vegetarian") && !plan_tag.contains("non"),
            DietClass::NonVegetarian => plan_tag.contains("non-vegetarian"),
            DietClass::Other => plan_tag.contains(user_text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    Indian,
}

/// Two-tier diet preference: a base class plus an optional regional qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietPreference {
    text: String,
    pub class: DietClass,
    pub region: Option<Region>,
}

impl DietPreference {
    pub fn parse(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let class = match text.as_str() {
            "indian-vegetarian" => DietClass::Vegetarian,
            "indian-non-vegetarian" => DietClass::NonVegetarian,
            other => DietClass::from_base_name(other),
        };
        let region = text.contains("indian").then_some(Region::Indian);
        Self {
            text,
            class,
            region,
        }
    }

    pub fn is_compatible(&self, plan_tag: &str) -> bool {
        self.class.accepts(&self.text, &plan_tag.to_lowercase())
    }

    /// Diet label understood by the encoder. Region-qualified preferences collapse to the
    /// base class the estimator was trained on.
    pub fn encoder_label(raw: &str) -> &str {
        if raw.contains("Indian-Vegetarian") {
            "Vegetarian"
        } else if raw.contains("Indian-Non-Vegetarian") {
            "Standard"
        } else {
            raw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalDirection {
    Loss,
    Gain,
    Other,
}

impl GoalDirection {
    /// "loss" is checked before "gain".
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("loss") {
            GoalDirection::Loss
        } else if text.contains("gain") {
            GoalDirection::Gain
        } else {
            GoalDirection::Other
        }
    }
}
