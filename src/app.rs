use std::net::SocketAddr;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{calculators, meals, nutrition};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(nutrition::router())
        .merge(meals::router())
        .merge(calculators::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo_types::fixtures::{meal, plan_with_meals};
    use crate::meals::repo_types::Catalog;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn catalog() -> Catalog {
        let mut veg = plan_with_meals(
            2100,
            "Indian-Vegetarian",
            vec![
                meal("Breakfast", &[("Poha", 250.0), ("Chai", 80.0)]),
                meal("Lunch", &[("Dal", 400.0), ("Roti", 200.0)]),
            ],
        );
        veg.age_group = "Adult (18-40)".into();
        veg.weight_category = "70-90kg".into();
        let nonveg = plan_with_meals(
            2150,
            "Non-Vegetarian",
            vec![meal("Breakfast", &[("Eggs", 300.0)])],
        );
        Catalog::new(vec![veg, nonveg])
    }

    fn profile_json() -> Value {
        json!({
            "weight_kg": 85,
            "age": 30,
            "height_cm": 180,
            "gender": "Male",
            "activity_level": "Moderately Active",
            "dietary_preference": "Indian-Vegetarian",
            "health_goal": "Weight Loss"
        })
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn home_reports_status() {
        let app = build_app(AppState::fake(catalog()));
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["safety_checks"], "Enabled");
    }

    #[tokio::test]
    async fn predict_returns_full_recommendation() {
        let app = build_app(AppState::fake(catalog()));
        let (status, body) = send(app, post_json("/predict", &profile_json())).await;
        assert_eq!(status, StatusCode::OK);

        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["daily_calories"], 2127);
        assert_eq!(v["macros"], json!({"protein_g": 132, "carbs_g": 239, "fat_g": 70}));
        assert_eq!(v["meal_plan"]["diet_type"], "Indian-Vegetarian");
        assert_eq!(v["meal_plan_match"], "matched");
        assert!(v["recalibration_msg"].is_null());
        assert_eq!(v["meta"]["engine"], "v1.2-safe-plus");
        assert_eq!(v["meta"]["profile_received"]["age"], 30);
    }

    #[tokio::test]
    async fn predict_with_empty_catalog_has_null_plan() {
        let app = build_app(AppState::fake(Catalog::default()));
        let (status, body) = send(app, post_json("/predict", &profile_json())).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert!(v["meal_plan"].is_null());
        assert!(v["meal_plan_match"].is_null());
    }

    #[tokio::test]
    async fn predict_rejects_out_of_range_profile() {
        let app = build_app(AppState::fake(catalog()));
        let mut p = profile_json();
        p["age"] = json!(5);
        let (status, body) = send(app, post_json("/predict", &p)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("age"));
    }

    #[tokio::test]
    async fn predict_rejects_unknown_category() {
        let app = build_app(AppState::fake(catalog()));
        let mut p = profile_json();
        p["gender"] = json!("Robot");
        let (status, _) = send(app, post_json("/predict", &p)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn replace_meal_returns_alternatives() {
        let app = build_app(AppState::fake(catalog()));
        let req = json!({"target_calories": 2000, "diet_type": "Non-Vegetarian", "meal_type": "Breakfast"});
        let (status, body) = send(app, post_json("/replace_meal", &req)).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).unwrap();
        let alts = v["alternatives"].as_array().unwrap();
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0]["calories"], 300.0);
    }

    #[tokio::test]
    async fn replace_meal_without_matches_is_empty() {
        let app = build_app(AppState::fake(catalog()));
        let req = json!({"target_calories": 2000, "diet_type": "Vegetarian", "meal_type": "Dinner"});
        let (status, body) = send(app, post_json("/replace_meal", &req)).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["alternatives"], json!([]));
    }

    #[tokio::test]
    async fn replace_meal_without_catalog_is_404() {
        let app = build_app(AppState::fake(Catalog::default()));
        let req = json!({"target_calories": 2000, "diet_type": "Vegetarian", "meal_type": "Breakfast"});
        let (status, body) = send(app, post_json("/replace_meal", &req)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8(body).unwrap(), "Meal database not available");
    }

    #[tokio::test]
    async fn seeded_replacements_advance_across_requests() {
        let breakfasts = ["Poha", "Upma", "Idli", "Dosa", "Paratha", "Oats"]
            .iter()
            .map(|name| meal("Breakfast", &[(*name, 300.0)]))
            .collect();
        let catalog = Catalog::new(vec![plan_with_meals(2000, "Vegetarian", breakfasts)]);
        let req = json!({"target_calories": 2000, "diet_type": "Vegetarian", "meal_type": "Breakfast"});

        let app = build_app(AppState::fake(catalog.clone()));
        let mut bodies = Vec::new();
        for _ in 0..5 {
            let (status, body) = send(app.clone(), post_json("/replace_meal", &req)).await;
            assert_eq!(status, StatusCode::OK);
            bodies.push(body);
        }
        assert!(bodies.iter().any(|b| b != &bodies[0]));

        // same seed, fresh state: the sequence starts over
        let restarted = build_app(AppState::fake(catalog));
        let (_, first) = send(restarted, post_json("/replace_meal", &req)).await;
        assert_eq!(first, bodies[0]);
    }

    #[tokio::test]
    async fn bmi_endpoint() {
        let app = build_app(AppState::fake(catalog()));
        let req = Request::builder()
            .uri("/calculators/bmi?height_cm=180&weight_kg=70")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["bmi"], 21.6);
        assert_eq!(v["category"], "Normal Weight");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake(catalog()));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}
