//! Seams to the trained estimator and its category encoders.
//!
//! The engine never looks inside the model; it only needs a code for each category and
//! a raw calorie number for a feature vector.

pub mod artifacts;

pub use artifacts::ModelArtifacts;

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Gender,
    ActivityLevel,
    Diet,
    Goal,
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CategoryField::Gender => "gender",
            CategoryField::ActivityLevel => "activity_level",
            CategoryField::Diet => "diet",
            CategoryField::Goal => "goal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("unknown {field} category: {value:?}")]
    UnknownCategory { field: CategoryField, value: String },
}

pub trait CategoryEncoder: Send + Sync {
    fn encode(&self, field: CategoryField, value: &str) -> Result<u32, EncodeError>;
}

/// Model input, in training column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub weight_kg: f64,
    pub age: f64,
    pub height_cm: f64,
    pub gender: u32,
    pub activity_level: u32,
    pub diet: u32,
    pub goal: u32,
}

pub const FEATURE_COUNT: usize = 7;

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.weight_kg,
            self.age,
            self.height_cm,
            f64::from(self.gender),
            f64::from(self.activity_level),
            f64::from(self.diet),
            f64::from(self.goal),
        ]
    }
}

pub trait CalorieOracle: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64>;
}
