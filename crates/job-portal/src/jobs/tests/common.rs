use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::IdentityConfig;
use crate::jobs::domain::{Job, JobId, JobStatus, NewJob, UserId, WorkType};
use crate::jobs::query::{JobFilter, JobQuery};
use crate::jobs::stats::{MonthGroup, StatusGroup};
use crate::jobs::store::{JobStore, StoreError};
use crate::jobs::{job_router, with_identity, JobService, MemoryJobStore};

pub(super) const IDENTITY_HEADER: &str = "x-user-id";

pub(super) fn alice() -> UserId {
    UserId("user-alice".to_string())
}

pub(super) fn bob() -> UserId {
    UserId("user-bob".to_string())
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (JobService<MemoryJobStore>, Arc<MemoryJobStore>) {
    let store = Arc::new(MemoryJobStore::new());
    (JobService::new(store.clone()), store)
}

pub(super) struct Seed {
    pub(super) company: &'static str,
    pub(super) position: &'static str,
    pub(super) status: JobStatus,
    pub(super) work_type: WorkType,
    pub(super) created_at: DateTime<Utc>,
}

impl Seed {
    pub(super) fn new(position: &'static str, created_at: DateTime<Utc>) -> Self {
        Self {
            company: "Acme",
            position,
            status: JobStatus::Pending,
            work_type: WorkType::FullTime,
            created_at,
        }
    }

    pub(super) fn status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    pub(super) fn work_type(mut self, work_type: WorkType) -> Self {
        self.work_type = work_type;
        self
    }

    pub(super) fn company(mut self, company: &'static str) -> Self {
        self.company = company;
        self
    }
}

pub(super) fn seed(store: &MemoryJobStore, owner: &UserId, seed: Seed) -> Job {
    store
        .insert(NewJob {
            company: seed.company.to_string(),
            position: seed.position.to_string(),
            status: seed.status,
            work_type: seed.work_type,
            created_by: owner.clone(),
            created_at: seed.created_at,
        })
        .expect("seed insert succeeds")
}

/// Alice owns five jobs spread across statuses, work types, and months; Bob owns two.
pub(super) fn seeded_service() -> (JobService<MemoryJobStore>, Arc<MemoryJobStore>) {
    let (service, store) = build_service();
    let alice = alice();
    let bob = bob();

    seed(&store, &alice, Seed::new("Backend Engineer", at(2024, 1, 15)));
    seed(
        &store,
        &alice,
        Seed::new("Data Analyst", at(2024, 2, 3))
            .status(JobStatus::Interview)
            .work_type(WorkType::Contract)
            .company("Globex"),
    );
    seed(
        &store,
        &alice,
        Seed::new("Frontend Engineer", at(2024, 2, 20))
            .status(JobStatus::Declined)
            .work_type(WorkType::PartTime)
            .company("Initech"),
    );
    seed(
        &store,
        &alice,
        Seed::new("Engineering Intern", at(2023, 12, 1)).work_type(WorkType::Internship),
    );
    seed(
        &store,
        &alice,
        Seed::new("Platform engineer", at(2024, 3, 9)).status(JobStatus::Interview),
    );
    seed(&store, &bob, Seed::new("Backend Engineer", at(2024, 1, 20)));
    seed(
        &store,
        &bob,
        Seed::new("Designer", at(2024, 2, 1)).status(JobStatus::Interview),
    );

    (service, store)
}

pub(super) struct UnavailableStore;

impl JobStore for UnavailableStore {
    fn insert(&self, _job: NewJob) -> Result<Job, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<Job>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _job: Job) -> Result<Job, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &JobId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _query: &JobQuery) -> Result<Vec<Job>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn count(&self, _filter: &JobFilter) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn group_by_status(&self, _owner: &UserId) -> Result<Vec<StatusGroup>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn group_by_month(&self, _owner: &UserId) -> Result<Vec<MonthGroup>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service<S>(service: JobService<S>) -> axum::Router
where
    S: JobStore + 'static,
{
    with_identity(job_router(Arc::new(service)), IdentityConfig::default())
}

pub(super) fn request(
    method: Method,
    uri: &str,
    user: Option<&UserId>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user.0.as_str());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("json body")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
