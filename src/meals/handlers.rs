use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, instrument, warn};

use super::dto::{ReplacementRequest, ReplacementResponse};
use super::services::suggest_replacements;
use crate::error::ServiceError;
use crate::state::AppState;

pub fn replacement_routes() -> Router<AppState> {
    Router::new().route("/replace_meal", post(replace_meal))
}

/// POST /replace_meal { target_calories, diet_type, meal_type }
#[instrument(skip(state))]
pub async fn replace_meal(
    State(state): State<AppState>,
    Json(req): Json<ReplacementRequest>,
) -> Result<Json<ReplacementResponse>, (StatusCode, String)> {
    let alternatives = {
        let mut rng = state.replacement_rng.lock().map_err(|_| {
            error!("replacement rng lock poisoned");
            ServiceError::Internal("replacement rng unavailable".into()).into_rejection()
        })?;
        suggest_replacements(&state.catalog, &req, &mut *rng).map_err(|e| {
            warn!(error = %e, "replace_meal failed");
            e.into_rejection()
        })?
    };

    Ok(Json(ReplacementResponse { alternatives }))
}
