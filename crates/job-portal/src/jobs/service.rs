use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Job, JobDraft, JobId, JobUpdate, UserId, ValidationError};
use super::query::{JobPage, JobQuery, JobQueryParams};
use super::stats::JobStats;
use super::store::{JobStore, StoreError};

/// Service composing validation, ownership checks, the query builder, and the stats
/// aggregator over an injected store handle.
pub struct JobService<S> {
    store: Arc<S>,
}

impl<S> JobService<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create a job owned by `owner`.
    pub fn create(&self, owner: &UserId, draft: JobDraft) -> Result<Job, JobServiceError> {
        draft.validate()?;
        let job = self
            .store
            .insert(draft.into_new_job(owner.clone(), Utc::now()))?;
        info!(job_id = %job.id, owner = %owner, "job created");
        Ok(job)
    }

    /// Filtered, sorted, paginated listing of the owner's jobs.
    pub fn list(
        &self,
        owner: &UserId,
        params: &JobQueryParams,
    ) -> Result<JobPage, JobServiceError> {
        let query = JobQuery::build(owner.clone(), params)?;
        let total_jobs = self.store.count(&query.filter)?;
        let jobs = self.store.find(&query)?;

        Ok(JobPage {
            total_jobs,
            jobs,
            num_of_page: query.pagination.page_count(total_jobs),
        })
    }

    /// Merge `update` into an owned job and persist it.
    pub fn update(
        &self,
        owner: &UserId,
        id: &JobId,
        update: JobUpdate,
    ) -> Result<Job, JobServiceError> {
        update.validate()?;
        let mut job = self.owned(owner, id)?;
        job.apply(update, Utc::now());
        job.validate()?;

        let updated = self.store.update(job).map_err(|err| match err {
            StoreError::NotFound => JobServiceError::NotFound(id.clone()),
            other => other.into(),
        })?;
        info!(job_id = %id, owner = %owner, "job updated");
        Ok(updated)
    }

    /// Permanently remove an owned job.
    pub fn delete(&self, owner: &UserId, id: &JobId) -> Result<(), JobServiceError> {
        self.owned(owner, id)?;
        self.store.delete(id).map_err(|err| match err {
            StoreError::NotFound => JobServiceError::NotFound(id.clone()),
            other => other.into(),
        })?;
        info!(job_id = %id, owner = %owner, "job deleted");
        Ok(())
    }

    /// Status buckets and monthly series for the owner.
    pub fn stats(&self, owner: &UserId) -> Result<JobStats, JobServiceError> {
        let statuses = self.store.group_by_status(owner)?;
        let months = self.store.group_by_month(owner)?;
        Ok(JobStats::from_groups(&statuses, &months))
    }

    fn owned(&self, owner: &UserId, id: &JobId) -> Result<Job, JobServiceError> {
        let job = self
            .store
            .fetch(id)?
            .ok_or_else(|| JobServiceError::NotFound(id.clone()))?;

        if !job.is_owned_by(owner) {
            warn!(job_id = %id, caller = %owner, "job access denied to non-owner");
            return Err(JobServiceError::Forbidden(id.clone()));
        }
        Ok(job)
    }
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no job found with id {0}")]
    NotFound(JobId),
    #[error("you are not authorized to modify job {0}")]
    Forbidden(JobId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
