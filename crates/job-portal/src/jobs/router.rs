use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{JobDraft, JobId, JobUpdate, ValidationError};
use super::identity::CurrentUser;
use super::query::{JobPage, JobQueryParams};
use super::service::{JobService, JobServiceError};
use super::stats::JobStats;
use super::store::JobStore;
use crate::error::AppError;

/// Mount point of the job endpoints.
pub const JOB_ROUTES_PREFIX: &str = "/api/v1/job";

/// Router builder exposing the job endpoints under [`JOB_ROUTES_PREFIX`].
///
/// Handlers expect a [`CurrentUser`]; wrap the router with
/// [`super::identity::with_identity`] so the caller id is attached.
pub fn job_router<S>(service: Arc<JobService<S>>) -> Router
where
    S: JobStore + 'static,
{
    let routes = Router::new()
        .route("/create-job", post(create_handler::<S>))
        .route("/get-job", get(list_handler::<S>))
        .route("/update-job/:id", patch(update_handler::<S>))
        .route("/delete-job/:id", delete(delete_handler::<S>))
        .route("/job-stats", get(stats_handler::<S>))
        .with_state(service);

    Router::new().nest(JOB_ROUTES_PREFIX, routes)
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<JobDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError>
where
    S: JobStore + 'static,
{
    let Json(draft) = payload.map_err(|rejection| malformed(rejection.body_text()))?;
    let job = service.create(&user, draft)?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<JobQueryParams>, QueryRejection>,
) -> Result<Json<JobPage>, AppError>
where
    S: JobStore + 'static,
{
    let Query(params) = params.map_err(|rejection| malformed(rejection.body_text()))?;
    Ok(Json(service.list(&user, &params)?))
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError>
where
    S: JobStore + 'static,
{
    let Json(update) = payload.map_err(|rejection| malformed(rejection.body_text()))?;
    let job = service.update(&user, &JobId(id), update)?;
    Ok(Json(json!({ "updateJob": job })))
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError>
where
    S: JobStore + 'static,
{
    service.delete(&user, &JobId(id))?;
    Ok(Json(json!({ "message": "Success, job deleted!" })))
}

pub(crate) async fn stats_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<JobStats>, AppError>
where
    S: JobStore + 'static,
{
    Ok(Json(service.stats(&user)?))
}

/// Undecodable bodies and query strings answer like any other validation failure.
fn malformed(detail: String) -> AppError {
    JobServiceError::Validation(ValidationError::MalformedRequest(detail)).into()
}
