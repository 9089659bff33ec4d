use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the document store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the authenticated caller, as forwarded by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an application currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [Self::Pending, Self::Interview, Self::Declined];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Interview => "interview",
            Self::Declined => "declined",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }
}

/// Employment arrangement of the advertised position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkType {
    #[default]
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl WorkType {
    pub const ALL: [WorkType; 4] = [
        Self::FullTime,
        Self::PartTime,
        Self::Internship,
        Self::Contract,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Internship => "internship",
            Self::Contract => "contract",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|work_type| work_type.label().eq_ignore_ascii_case(raw))
    }
}

/// A tracked job application owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub work_type: WorkType,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.created_by == user
    }

    /// Re-checks the required fields after a merge.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields(&self.company, &self.position)
    }

    pub(crate) fn apply(&mut self, update: JobUpdate, now: DateTime<Utc>) {
        self.company = update.company.trim().to_string();
        self.position = update.position.trim().to_string();
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(work_type) = update.work_type {
            self.work_type = work_type;
        }
        self.updated_at = now;
    }
}

/// Create payload. Missing text fields deserialize as empty so validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub work_type: Option<WorkType>,
}

impl JobDraft {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields(&self.company, &self.position)
    }

    pub(crate) fn into_new_job(self, owner: UserId, now: DateTime<Utc>) -> NewJob {
        NewJob {
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            status: self.status.unwrap_or_default(),
            work_type: self.work_type.unwrap_or_default(),
            created_by: owner,
            created_at: now,
        }
    }
}

/// Update payload; company and position are required again, the rest merge when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub work_type: Option<WorkType>,
}

impl JobUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields(&self.company, &self.position)
    }
}

/// Document handed to the store; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub work_type: WorkType,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl NewJob {
    pub fn into_job(self, id: JobId) -> Job {
        Job {
            id,
            company: self.company,
            position: self.position,
            status: self.status,
            work_type: self.work_type,
            created_by: self.created_by,
            updated_at: self.created_at,
            created_at: self.created_at,
        }
    }
}

/// Input rejected before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please provide all fields (company and position are required)")]
    MissingFields,
    #[error("invalid {field} filter '{value}'")]
    InvalidFilter { field: &'static str, value: String },
    #[error("invalid request: {0}")]
    MalformedRequest(String),
}

fn require_fields(company: &str, position: &str) -> Result<(), ValidationError> {
    if company.trim().is_empty() || position.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}
