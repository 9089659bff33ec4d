//! Translates listing parameters into a store query plan.
//!
//! The plan is a conjunctive [`JobFilter`] scoped to the caller, a [`SortOrder`], and a
//! [`Pagination`] window. Stores execute the plan; counting uses the filter alone so the
//! total never depends on the requested page.

use serde::{Deserialize, Serialize};

use super::domain::{Job, JobStatus, UserId, ValidationError, WorkType};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Filter value meaning "no restriction".
const ALL_SENTINEL: &str = "all";

/// Raw query-string parameters. Everything stays textual so malformed numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQueryParams {
    pub status: Option<String>,
    pub work_type: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// One optional restriction on top of the ownership scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPredicate {
    Status(JobStatus),
    WorkType(WorkType),
    /// Lowercased needle matched against the lowercased position.
    PositionContains(String),
}

impl FieldPredicate {
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            FieldPredicate::Status(status) => job.status == *status,
            FieldPredicate::WorkType(work_type) => job.work_type == *work_type,
            FieldPredicate::PositionContains(needle) => {
                job.position.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Ownership scope plus conjunctive predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFilter {
    owner: UserId,
    predicates: Vec<FieldPredicate>,
}

impl JobFilter {
    pub fn for_owner(owner: UserId) -> Self {
        Self {
            owner,
            predicates: Vec::new(),
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn predicates(&self) -> &[FieldPredicate] {
        &self.predicates
    }

    pub fn with(mut self, predicate: Option<FieldPredicate>) -> Self {
        if let Some(predicate) = predicate {
            self.predicates.push(predicate);
        }
        self
    }

    pub fn with_status(self, raw: Option<&str>) -> Result<Self, ValidationError> {
        let predicate = match active_value(raw) {
            Some(value) => Some(FieldPredicate::Status(JobStatus::parse(value).ok_or_else(
                || ValidationError::InvalidFilter {
                    field: "status",
                    value: value.to_string(),
                },
            )?)),
            None => None,
        };
        Ok(self.with(predicate))
    }

    pub fn with_work_type(self, raw: Option<&str>) -> Result<Self, ValidationError> {
        let predicate = match active_value(raw) {
            Some(value) => Some(FieldPredicate::WorkType(WorkType::parse(value).ok_or_else(
                || ValidationError::InvalidFilter {
                    field: "workType",
                    value: value.to_string(),
                },
            )?)),
            None => None,
        };
        Ok(self.with(predicate))
    }

    pub fn with_search(self, raw: Option<&str>) -> Self {
        let predicate = raw
            .filter(|value| !value.is_empty())
            .map(|value| FieldPredicate::PositionContains(value.to_lowercase()));
        self.with(predicate)
    }

    pub fn matches(&self, job: &Job) -> bool {
        job.is_owned_by(&self.owner) && self.predicates.iter().all(|p| p.matches(job))
    }
}

/// Present, non-empty, and not the "all" sentinel.
fn active_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL_SENTINEL))
}

/// Ordering applied before pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Whatever order the store returns documents in.
    #[default]
    Natural,
    Latest,
    Oldest,
    PositionAscending,
    PositionDescending,
}

impl SortOrder {
    /// Unrecognized values fall back to natural order.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("latest") => Self::Latest,
            Some("oldest") => Self::Oldest,
            Some("a-z") => Self::PositionAscending,
            Some("z-a") => Self::PositionDescending,
            _ => Self::Natural,
        }
    }

    pub fn sort(&self, jobs: &mut [Job]) {
        match self {
            SortOrder::Natural => {}
            SortOrder::Latest => jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::PositionAscending => jobs.sort_by(|a, b| a.position.cmp(&b.position)),
            SortOrder::PositionDescending => jobs.sort_by(|a, b| b.position.cmp(&a.position)),
        }
    }
}

/// Page window; both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: coerce_positive(page, DEFAULT_PAGE),
            limit: coerce_positive(limit, DEFAULT_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Missing, non-numeric, or zero input takes the default; negatives clamp to 1.
fn coerce_positive(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::trim).and_then(|value| value.parse::<i64>().ok()) {
        None | Some(0) => default,
        Some(value) if value < 0 => 1,
        Some(value) => value.unsigned_abs(),
    }
}

/// Complete plan executed by a [`super::JobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub filter: JobFilter,
    pub sort: SortOrder,
    pub pagination: Pagination,
}

impl JobQuery {
    pub fn build(owner: UserId, params: &JobQueryParams) -> Result<Self, ValidationError> {
        let filter = JobFilter::for_owner(owner)
            .with_status(params.status.as_deref())?
            .with_work_type(params.work_type.as_deref())?
            .with_search(params.search.as_deref());

        Ok(Self {
            filter,
            sort: SortOrder::from_param(params.sort.as_deref()),
            pagination: Pagination::from_params(params.page.as_deref(), params.limit.as_deref()),
        })
    }

    /// Applies sort and page window to an already filtered set.
    pub fn window(&self, mut matching: Vec<Job>) -> Vec<Job> {
        self.sort.sort(&mut matching);
        let skip = usize::try_from(self.pagination.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.pagination.limit).unwrap_or(usize::MAX);
        matching.into_iter().skip(skip).take(limit).collect()
    }
}

/// Listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub total_jobs: u64,
    pub jobs: Vec<Job>,
    pub num_of_page: u64,
}
