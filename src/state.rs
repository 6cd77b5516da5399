use std::sync::{Arc, Mutex};

use rand::{rngs::StdRng, SeedableRng};

use crate::config::AppConfig;
use crate::meals::repo::load_catalog;
use crate::meals::repo_types::Catalog;
use crate::model::ModelArtifacts;
use crate::nutrition::services::Recommender;

/// Everything here is built once at start-up and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub recommender: Arc<Recommender>,
    /// Shared by every `/replace_meal` call; with a fixed seed the sequence of
    /// suggestions across requests is reproducible from start-up.
    pub replacement_rng: Arc<Mutex<StdRng>>,
}

fn replacement_rng(seed: Option<u64>) -> Arc<Mutex<StdRng>> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Arc::new(Mutex::new(rng))
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let artifacts = Arc::new(ModelArtifacts::load(&config.model_path)?);
        let catalog = Arc::new(load_catalog(&config.meal_db_path));

        let recommender = Arc::new(Recommender::new(
            artifacts.clone(),
            artifacts,
            catalog.clone(),
            config.matcher.clone(),
        ));

        let replacement_rng = replacement_rng(config.replacement_seed);

        Ok(Self {
            config,
            catalog,
            recommender,
            replacement_rng,
        })
    }

    #[cfg(test)]
    pub fn fake(catalog: Catalog) -> Self {
        use crate::model::artifacts::fixtures::ARTIFACTS_JSON;

        let config = Arc::new(AppConfig::for_tests());
        let artifacts = Arc::new(ModelArtifacts::from_json(ARTIFACTS_JSON).expect("fixture artifacts"));
        let catalog = Arc::new(catalog);
        let recommender = Arc::new(Recommender::new(
            artifacts.clone(),
            artifacts,
            catalog.clone(),
            config.matcher.clone(),
        ));
        let replacement_rng = replacement_rng(config.replacement_seed);
        Self {
            config,
            catalog,
            recommender,
            replacement_rng,
        }
    }
}
