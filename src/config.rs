use serde::Deserialize;

use crate::nutrition::matcher::BonusComposition;

#[derive(Debug, Clone, Deserialize)]
pub struct MatcherConfig {
    pub bonus_composition: BonusComposition,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            bonus_composition: BonusComposition::Additive,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: String,
    pub meal_db_path: String,
    pub matcher: MatcherConfig,
    pub replacement_seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bonus_composition = match std::env::var("MATCHER_REGION_BONUS") {
            Ok(v) => v.parse::<BonusComposition>()?,
            Err(_) => BonusComposition::Additive,
        };
        let replacement_seed = match std::env::var("REPLACEMENT_SEED") {
            Ok(v) => Some(
                v.parse::<u64>()
                    .map_err(|e| anyhow::anyhow!("REPLACEMENT_SEED must be an integer: {e}"))?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8000),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "model_artifacts.json".into()),
            meal_db_path: std::env::var("MEAL_DB_PATH")
                .unwrap_or_else(|_| "meal_database.json".into()),
            matcher: MatcherConfig { bonus_composition },
            replacement_seed,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            model_path: "unused".into(),
            meal_db_path: "unused".into(),
            matcher: MatcherConfig::default(),
            replacement_seed: Some(7),
        }
    }
}
