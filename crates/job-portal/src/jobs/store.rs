use super::domain::{Job, JobId, NewJob, UserId};
use super::query::{JobFilter, JobQuery};
use super::stats::{MonthGroup, StatusGroup};

/// Document store abstraction so the service can be exercised in isolation.
///
/// Each call is a single-document or single-aggregation operation; implementations provide
/// their own per-call atomicity.
pub trait JobStore: Send + Sync {
    fn insert(&self, job: NewJob) -> Result<Job, StoreError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    /// Replaces an existing document, failing with [`StoreError::NotFound`] if it is gone.
    fn update(&self, job: Job) -> Result<Job, StoreError>;
    fn delete(&self, id: &JobId) -> Result<(), StoreError>;
    /// Executes the plan: filter, sort, then skip/limit.
    fn find(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError>;
    /// Counts documents matching the filter, ignoring any pagination.
    fn count(&self, filter: &JobFilter) -> Result<u64, StoreError>;
    /// Status groups for one owner, in the store's natural group order.
    fn group_by_status(&self, owner: &UserId) -> Result<Vec<StatusGroup>, StoreError>;
    /// (year, month) groups of `created_at` for one owner, in natural group order.
    fn group_by_month(&self, owner: &UserId) -> Result<Vec<MonthGroup>, StoreError>;

    fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("store has been closed")]
    Closed,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid job data: {0}")]
    Snapshot(#[from] serde_json::Error),
}
