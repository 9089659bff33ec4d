use clap::Args;
use job_portal::config::{AppConfig, StoreConfig};
use job_portal::error::AppError;
use job_portal::jobs::{JobService, JobStats, MemoryJobStore, StoreError, UserId};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// User id whose jobs are summarized
    #[arg(long)]
    pub(crate) user: String,
    /// Snapshot file to read (defaults to APP_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

pub(crate) fn run_stats_report(args: StatsArgs) -> Result<(), AppError> {
    let StatsArgs { user, store } = args;

    let snapshot_path = match store {
        Some(path) => path,
        None => AppConfig::load()?.store.snapshot_path.ok_or_else(|| {
            StoreError::Unavailable(
                "no snapshot to read: pass --store or set APP_STORE_PATH".to_string(),
            )
        })?,
    };

    if !snapshot_path.is_file() {
        return Err(StoreError::Unavailable(format!(
            "snapshot {} does not exist",
            snapshot_path.display()
        ))
        .into());
    }

    let store = Arc::new(MemoryJobStore::open(&StoreConfig {
        snapshot_path: Some(snapshot_path),
    })?);
    let service = JobService::new(store);
    let user = UserId(user);
    let stats = service.stats(&user)?;

    print!("{}", render_stats(&user, &stats));
    Ok(())
}

fn render_stats(user: &UserId, stats: &JobStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Application statistics for {user}");
    let _ = writeln!(out, "Status groups: {}", stats.total_job);

    let buckets = &stats.default_stats;
    let _ = writeln!(out, "\nBy status");
    let _ = writeln!(out, "- pending: {}", buckets.pending);
    let _ = writeln!(out, "- interview: {}", buckets.interview);
    let _ = writeln!(out, "- declined: {}", buckets.declined);

    if stats.monthly_application.is_empty() {
        let _ = writeln!(out, "\nMonthly applications: none");
    } else {
        let _ = writeln!(out, "\nMonthly applications");
        for entry in &stats.monthly_application {
            let _ = writeln!(out, "- {}: {}", entry.date, entry.count);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_portal::jobs::{JobStatus, JobStore, MonthGroup, StatusGroup};

    #[test]
    fn renders_buckets_and_monthly_series() {
        let stats = JobStats::from_groups(
            &[StatusGroup {
                status: JobStatus::Interview,
                count: 2,
            }],
            &[MonthGroup {
                year: 2024,
                month: 5,
                count: 2,
            }],
        );

        let text = render_stats(&UserId("u-1".to_string()), &stats);

        assert!(text.contains("Application statistics for u-1"));
        assert!(text.contains("- interview: 2"));
        assert!(text.contains("- pending: 0"));
        assert!(text.contains("- May 2024: 2"));
    }

    #[test]
    fn renders_empty_series() {
        let text = render_stats(&UserId("u-1".to_string()), &JobStats::default());
        assert!(text.contains("Monthly applications: none"));
    }

    #[test]
    fn report_reads_the_given_snapshot() {
        let path = std::env::temp_dir().join(format!(
            "job-portal-report-{}.json",
            std::process::id()
        ));
        let store = MemoryJobStore::open(&StoreConfig {
            snapshot_path: Some(path.clone()),
        })
        .expect("store opens");
        store.close().expect("empty snapshot written");

        let result = run_stats_report(StatsArgs {
            user: "u-1".to_string(),
            store: Some(path.clone()),
        });

        assert!(result.is_ok());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn report_fails_for_missing_snapshot() {
        let path = std::env::temp_dir().join(format!(
            "job-portal-report-missing-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let err = run_stats_report(StatsArgs {
            user: "u-1".to_string(),
            store: Some(path),
        })
        .expect_err("missing snapshot is an error");

        assert!(err.to_string().contains("does not exist"));
    }
}
