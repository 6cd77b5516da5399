use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use super::dto::{
    BmiQuery, BmiResult, BodyFatQuery, BodyFatResult, IdealWeightQuery, IdealWeightResult,
    WaterQuery, WaterResult,
};
use super::services;
use crate::nutrition::categories::Gender;
use crate::state::AppState;

pub fn calculator_routes() -> Router<AppState> {
    Router::new()
        .route("/calculators/bmi", get(bmi))
        .route("/calculators/body-fat", get(body_fat))
        .route("/calculators/ideal-weight", get(ideal_weight))
        .route("/calculators/water", get(water))
}

#[instrument]
pub async fn bmi(Query(q): Query<BmiQuery>) -> Result<Json<BmiResult>, (StatusCode, String)> {
    services::bmi(q.height_cm, q.weight_kg)
        .map(Json)
        .map_err(|e| e.into_rejection())
}

#[instrument]
pub async fn body_fat(
    Query(q): Query<BodyFatQuery>,
) -> Result<Json<BodyFatResult>, (StatusCode, String)> {
    services::body_fat(
        Gender::from_text(&q.gender),
        q.height_cm,
        q.neck_cm,
        q.waist_cm,
        q.hip_cm,
    )
    .map(Json)
    .map_err(|e| e.into_rejection())
}

#[instrument]
pub async fn ideal_weight(
    Query(q): Query<IdealWeightQuery>,
) -> Result<Json<IdealWeightResult>, (StatusCode, String)> {
    services::ideal_weight(Gender::from_text(&q.gender), q.height_cm)
        .map(Json)
        .map_err(|e| e.into_rejection())
}

#[instrument]
pub async fn water(Query(q): Query<WaterQuery>) -> Result<Json<WaterResult>, (StatusCode, String)> {
    services::water_intake(q.weight_kg, q.exercise_minutes)
        .map(Json)
        .map_err(|e| e.into_rejection())
}
