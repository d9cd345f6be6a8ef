use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::goals::Goal;
use super::kpis::Kpi;
use super::service::{PlanningService, PlanningServiceError};
use super::stakeholders::Stakeholder;
use super::vendors::{CriteriaWeights, ServiceRequirements, VendorCandidate};
use crate::envelope::IdentityProvider;
use crate::store::{ArtifactRepository, RepositoryError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsRequest {
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholdersRequest {
    pub stakeholders: Vec<Stakeholder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpisRequest {
    pub kpis: Vec<Kpi>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorsRequest {
    pub vendors: Vec<VendorCandidate>,
    #[serde(default)]
    pub requirements: ServiceRequirements,
    #[serde(default)]
    pub evaluation_weights: Option<CriteriaWeights>,
}

type SharedService<R, P> = Arc<PlanningService<R, P>>;

/// Router builder exposing the planning endpoints.
pub fn planning_router<R, P>(service: SharedService<R, P>) -> Router
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/events/:event_id/goals/prioritize",
            post(goals_handler::<R, P>),
        )
        .route(
            "/api/v1/events/:event_id/stakeholders/prioritize",
            post(stakeholders_handler::<R, P>),
        )
        .route(
            "/api/v1/events/:event_id/kpis/monitor",
            post(kpis_handler::<R, P>),
        )
        .route(
            "/api/v1/events/:event_id/vendors/evaluate",
            post(vendors_handler::<R, P>),
        )
        .route(
            "/api/v1/events/:event_id/artifacts",
            get(list_handler::<R, P>),
        )
        .route(
            "/api/v1/artifacts/:artifact_id",
            get(artifact_handler::<R, P>),
        )
        .with_state(service)
}

pub(crate) async fn goals_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(event_id): Path<String>,
    axum::Json(request): axum::Json<GoalsRequest>,
) -> Response
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    created(service.prioritize_goals(&event_id, &request.goals))
}

pub(crate) async fn stakeholders_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(event_id): Path<String>,
    axum::Json(request): axum::Json<StakeholdersRequest>,
) -> Response
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    created(service.prioritize_stakeholders(&event_id, &request.stakeholders))
}

pub(crate) async fn kpis_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(event_id): Path<String>,
    axum::Json(request): axum::Json<KpisRequest>,
) -> Response
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    created(service.monitor_kpis(&event_id, &request.kpis))
}

pub(crate) async fn vendors_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(event_id): Path<String>,
    axum::Json(request): axum::Json<VendorsRequest>,
) -> Response
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    created(service.evaluate_vendors(
        &event_id,
        &request.vendors,
        &request.requirements,
        request.evaluation_weights.as_ref(),
    ))
}

pub(crate) async fn artifact_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(artifact_id): Path<String>,
) -> Response
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    match service.get(&artifact_id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(PlanningServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("artifact {artifact_id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => failure(other),
    }
}

pub(crate) async fn list_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(event_id): Path<String>,
) -> Response
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    match service.list(&event_id) {
        Ok(artifacts) => {
            let payload = json!({
                "event_id": event_id,
                "artifacts": artifacts,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => failure(other),
    }
}

fn created<T: Serialize>(result: Result<T, PlanningServiceError>) -> Response {
    match result {
        Ok(artifact) => (StatusCode::CREATED, axum::Json(artifact)).into_response(),
        Err(error) => failure(error),
    }
}

fn failure(error: PlanningServiceError) -> Response {
    let status = match &error {
        PlanningServiceError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlanningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PlanningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PlanningServiceError::Repository(RepositoryError::Unavailable(_))
        | PlanningServiceError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
