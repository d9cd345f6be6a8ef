use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use event_planner::envelope::IdentityProvider;
use event_planner::planning::{planning_router, PlanningService};
use event_planner::store::ArtifactRepository;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_planning_routes<R, P>(service: Arc<PlanningService<R, P>>) -> axum::Router
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    planning_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryArtifactRepository;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use event_planner::envelope::SequentialIdentityProvider;
    use event_planner::planning::PlannerSettings;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
        let service = Arc::new(
            PlanningService::new(
                Arc::new(InMemoryArtifactRepository::default()),
                Arc::new(SequentialIdentityProvider::new("art", instant)),
                PlannerSettings::default(),
            )
            .expect("default settings"),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        state.readiness.store(ready, Ordering::Release);

        with_planning_routes(service).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");
    }

    #[tokio::test]
    async fn vendor_evaluation_round_trips_through_the_store() {
        let app = app(true);
        let payload = json!({
            "vendors": [
                {
                    "vendor_id": "av-co",
                    "vendor_name": "AV Co",
                    "quote_amount": 9000.0,
                    "experience_years": 11.0,
                    "insurance_coverage": true,
                    "offered_services": ["projection", "sound"]
                },
                {
                    "vendor_id": "sound-inc",
                    "vendor_name": "Sound Inc",
                    "quote_amount": 8000.0,
                    "offered_services": ["sound"]
                }
            ],
            "requirements": { "must_have": ["projection", "sound"] },
            "evaluation_weights": { "price": 10, "service_fit": 40 }
        });

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/events/expo/vendors/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["body"]["recommended_vendor"], "av-co");
        assert_eq!(created["body"]["rankings"][0]["service_fit_score"], 80.0);
        assert_eq!(
            created["body"]["requirements_analysis"]["best_price_vendor"],
            "sound-inc"
        );

        let response = app
            .oneshot(
                Request::get("/api/v1/events/expo/artifacts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");
        let listed = body_json(response).await;
        assert_eq!(listed["artifacts"][0]["artifact_id"], "art-000001");
        assert_eq!(listed["artifacts"][0]["kind"], "vendor_evaluation");
    }
}
