use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use super::{CalorieOracle, CategoryEncoder, CategoryField, EncodeError, FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, Deserialize)]
struct EncoderClasses {
    gender: Vec<String>,
    activity_level: Vec<String>,
    diet: Vec<String>,
    goal: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LinearModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

/// Exported label encoders, feature scaler and linear calorie model.
///
/// A category's code is its index in the class list, matching how the encoders were
/// fitted. Features are standardised before the linear model is applied.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifacts {
    encoders: EncoderClasses,
    scaler: Scaler,
    model: LinearModel,
}

impl ModelArtifacts {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read model artifacts {}", path.display()))?;
        let artifacts = Self::from_json(&raw)
            .with_context(|| format!("parse model artifacts {}", path.display()))?;
        info!(path = %path.display(), "model artifacts loaded");
        Ok(artifacts)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let artifacts: ModelArtifacts = serde_json::from_str(raw)?;
        artifacts.validate()?;
        Ok(artifacts)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (field, classes) in [
            (CategoryField::Gender, &self.encoders.gender),
            (CategoryField::ActivityLevel, &self.encoders.activity_level),
            (CategoryField::Diet, &self.encoders.diet),
            (CategoryField::Goal, &self.encoders.goal),
        ] {
            anyhow::ensure!(!classes.is_empty(), "encoder for {field} has no classes");
        }
        anyhow::ensure!(
            self.scaler.mean.len() == FEATURE_COUNT && self.scaler.scale.len() == FEATURE_COUNT,
            "scaler must have {FEATURE_COUNT} mean and scale values"
        );
        anyhow::ensure!(
            self.scaler.scale.iter().all(|s| *s != 0.0 && s.is_finite()),
            "scaler contains a zero or non-finite scale"
        );
        anyhow::ensure!(
            self.model.coefficients.len() == FEATURE_COUNT,
            "model must have {FEATURE_COUNT} coefficients, got {}",
            self.model.coefficients.len()
        );
        Ok(())
    }

    fn classes(&self, field: CategoryField) -> &[String] {
        match field {
            CategoryField::Gender => &self.encoders.gender,
            CategoryField::ActivityLevel => &self.encoders.activity_level,
            CategoryField::Diet => &self.encoders.diet,
            CategoryField::Goal => &self.encoders.goal,
        }
    }
}

impl CategoryEncoder for ModelArtifacts {
    fn encode(&self, field: CategoryField, value: &str) -> Result<u32, EncodeError> {
        self.classes(field)
            .iter()
            .position(|c| c == value)
            .map(|i| i as u32)
            .ok_or_else(|| EncodeError::UnknownCategory {
                field,
                value: value.to_string(),
            })
    }
}

impl CalorieOracle for ModelArtifacts {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
        let prediction = features
            .to_array()
            .iter()
            .zip(&self.scaler.mean)
            .zip(&self.scaler.scale)
            .zip(&self.model.coefficients)
            .map(|(((x, mean), scale), coef)| (x - mean) / scale * coef)
            .sum::<f64>()
            + self.model.intercept;

        anyhow::ensure!(prediction.is_finite(), "model produced a non-finite prediction");
        Ok(prediction)
    }
}
