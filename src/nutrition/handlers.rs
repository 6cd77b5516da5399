use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::dto::{Meta, RecommendationResponse, StatusResponse, UserProfile, ENGINE_VERSION};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(|| async { "ok" }))
}

pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}

pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ML Service Running",
        model: "Linear calorie estimator",
        safety_checks: "Enabled",
    })
}

#[instrument(skip(state, profile), fields(age = profile.age, goal = %profile.health_goal))]
pub async fn predict(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<RecommendationResponse>, (StatusCode, String)> {
    if let Err(e) = profile.validate() {
        warn!(error = %e, "profile rejected");
        return Err(e.into_rejection());
    }

    let rec = match state.recommender.recommend(&profile) {
        Ok(r) => r,
        Err(e @ ServiceError::Validation(_)) => {
            warn!(error = %e, "profile category not recognised");
            return Err(e.into_rejection());
        }
        Err(e) => {
            error!(error = %e, "prediction failed");
            return Err(e.into_rejection());
        }
    };

    info!(
        daily_calories = rec.daily_calories,
        matched = ?rec.match_kind,
        "recommendation computed"
    );
    Ok(Json(RecommendationResponse {
        daily_calories: rec.daily_calories,
        macros: rec.macros,
        meal_plan: rec.meal_plan,
        meal_plan_match: rec.match_kind,
        recalibration_msg: rec.recalibration_msg,
        meta: Meta {
            engine: ENGINE_VERSION,
            profile_received: profile,
        },
    }))
}
