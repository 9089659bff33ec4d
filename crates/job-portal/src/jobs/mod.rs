//! Job records owned by authenticated users: CRUD, the listing query builder, and the
//! per-user statistics aggregator, all layered over an abstract document store.

pub mod domain;
pub mod identity;
pub mod memory;
pub mod query;
pub mod router;
pub mod service;
pub mod stats;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Job, JobDraft, JobId, JobStatus, JobUpdate, NewJob, UserId, ValidationError, WorkType,
};
pub use identity::{with_identity, CurrentUser};
pub use memory::MemoryJobStore;
pub use query::{JobFilter, JobPage, JobQuery, JobQueryParams, Pagination, SortOrder};
pub use router::{job_router, JOB_ROUTES_PREFIX};
pub use service::{JobService, JobServiceError};
pub use stats::{DefaultStats, JobStats, MonthGroup, MonthlyApplication, StatusGroup};
pub use store::{JobStore, StoreError};
