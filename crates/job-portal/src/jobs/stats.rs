use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::JobStatus;

/// Count of a user's jobs sharing one status, as grouped by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGroup {
    pub status: JobStatus,
    pub count: u64,
}

/// Count of a user's jobs created in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

impl MonthGroup {
    /// `Mar 2024` style label.
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b %Y").to_string(),
            None => format!("{:02}/{}", self.month, self.year),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefaultStats {
    pub pending: u64,
    pub declined: u64,
    pub interview: u64,
}

impl DefaultStats {
    pub fn total(&self) -> u64 {
        self.pending + self.declined + self.interview
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyApplication {
    pub date: String,
    pub count: u64,
}

/// Stats response for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    /// Number of distinct status groups, not number of jobs.
    pub total_job: u64,
    pub default_stats: DefaultStats,
    pub monthly_application: Vec<MonthlyApplication>,
}

impl JobStats {
    /// Reshapes raw store groups. The monthly series is the store's group order reversed,
    /// not a chronological sort.
    pub fn from_groups(statuses: &[StatusGroup], months: &[MonthGroup]) -> Self {
        let mut default_stats = DefaultStats::default();
        for group in statuses {
            let bucket = match group.status {
                JobStatus::Pending => &mut default_stats.pending,
                JobStatus::Declined => &mut default_stats.declined,
                JobStatus::Interview => &mut default_stats.interview,
            };
            *bucket += group.count;
        }

        let monthly_application = months
            .iter()
            .rev()
            .map(|group| MonthlyApplication {
                date: group.label(),
                count: group.count,
            })
            .collect();

        Self {
            total_job: statuses.len() as u64,
            default_stats,
            monthly_application,
        }
    }
}
