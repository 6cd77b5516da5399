pub mod categories;
pub mod dto;
pub mod guardrails;
pub mod handlers;
pub mod macro_split;
pub mod matcher;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::status_routes())
        .merge(handlers::predict_routes())
}
