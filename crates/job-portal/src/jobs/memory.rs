use std::collections::HashMap;
use std::fs;
use std::hash::Hash;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Datelike;
use tracing::{debug, info};

use super::domain::{Job, JobId, NewJob, UserId};
use super::query::{JobFilter, JobQuery};
use super::stats::{MonthGroup, StatusGroup};
use super::store::{JobStore, StoreError};
use crate::config::StoreConfig;

const ID_PREFIX: &str = "job-";

/// Insertion-ordered document store kept in memory, optionally backed by a JSON snapshot
/// that is read on open and written on close.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    documents: Mutex<Vec<Job>>,
    sequence: AtomicU64,
    closed: AtomicBool,
    snapshot_path: Option<PathBuf>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the store, loading the snapshot when one is configured and present.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let documents = match &config.snapshot_path {
            Some(path) => load_snapshot(path)?,
            None => Vec::new(),
        };

        let last_id = documents
            .iter()
            .filter_map(|job| job.id.0.strip_prefix(ID_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        info!(
            documents = documents.len(),
            snapshot = ?config.snapshot_path,
            "job store opened"
        );

        Ok(Self {
            documents: Mutex::new(documents),
            sequence: AtomicU64::new(last_id),
            closed: AtomicBool::new(false),
            snapshot_path: config.snapshot_path.clone(),
        })
    }

    /// Snapshot of every stored document in natural order.
    pub fn documents(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn next_id(&self) -> JobId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        JobId(format!("{ID_PREFIX}{id:06}"))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Job>>, StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        self.documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document mutex poisoned".to_string()))
    }

    fn owned_by<'a>(documents: &'a [Job], owner: &'a UserId) -> impl Iterator<Item = &'a Job> {
        documents.iter().filter(move |job| job.is_owned_by(owner))
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&self, job: NewJob) -> Result<Job, StoreError> {
        let mut documents = self.lock()?;
        let job = job.into_job(self.next_id());
        documents.push(job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let documents = self.lock()?;
        Ok(documents.iter().find(|job| &job.id == id).cloned())
    }

    fn update(&self, job: Job) -> Result<Job, StoreError> {
        let mut documents = self.lock()?;
        let slot = documents
            .iter_mut()
            .find(|existing| existing.id == job.id)
            .ok_or(StoreError::NotFound)?;
        *slot = job.clone();
        Ok(job)
    }

    fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        let mut documents = self.lock()?;
        let position = documents
            .iter()
            .position(|job| &job.id == id)
            .ok_or(StoreError::NotFound)?;
        documents.remove(position);
        Ok(())
    }

    fn find(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError> {
        let documents = self.lock()?;
        let matching = documents
            .iter()
            .filter(|job| query.filter.matches(job))
            .cloned()
            .collect();
        Ok(query.window(matching))
    }

    fn count(&self, filter: &JobFilter) -> Result<u64, StoreError> {
        let documents = self.lock()?;
        Ok(documents.iter().filter(|job| filter.matches(job)).count() as u64)
    }

    fn group_by_status(&self, owner: &UserId) -> Result<Vec<StatusGroup>, StoreError> {
        let documents = self.lock()?;
        let groups = group_in_order(Self::owned_by(&documents, owner).map(|job| job.status));
        Ok(groups
            .into_iter()
            .map(|(status, count)| StatusGroup { status, count })
            .collect())
    }

    fn group_by_month(&self, owner: &UserId) -> Result<Vec<MonthGroup>, StoreError> {
        let documents = self.lock()?;
        let groups = group_in_order(
            Self::owned_by(&documents, owner)
                .map(|job| (job.created_at.year(), job.created_at.month())),
        );
        Ok(groups
            .into_iter()
            .map(|((year, month), count)| MonthGroup { year, month, count })
            .collect())
    }

    fn close(&self) -> Result<(), StoreError> {
        let documents = self.lock()?;
        if let Some(path) = &self.snapshot_path {
            write_snapshot(path, &documents)?;
        }
        self.closed.store(true, Ordering::Release);
        info!(documents = documents.len(), "job store closed");
        Ok(())
    }
}

/// Counts keys, keeping the order in which each key was first seen.
fn group_in_order<K, I>(keys: I) -> Vec<(K, u64)>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, u64)> = Vec::new();
    for key in keys {
        match slots.get(&key) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                slots.insert(key, groups.len());
                groups.push((key, 1));
            }
        }
    }
    groups
}

fn load_snapshot(path: &Path) -> Result<Vec<Job>, StoreError> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot yet, starting empty");
            Ok(Vec::new())
        }
        Err(err) => Err(err.into()),
    }
}

/// Writes through a sibling temp file so a crash never leaves a truncated snapshot.
fn write_snapshot(path: &Path, documents: &[Job]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, serde_json::to_vec_pretty(documents)?)?;
    fs::rename(&staging, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::domain::{JobStatus, WorkType};
    use chrono::{TimeZone, Utc};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn new_job(owner: &str, position: &str, month: u32) -> NewJob {
        NewJob {
            company: "Acme".to_string(),
            position: position.to_string(),
            status: JobStatus::Pending,
            work_type: WorkType::FullTime,
            created_by: UserId(owner.to_string()),
            created_at: Utc.with_ymd_and_hms(2024, month, 10, 12, 0, 0).unwrap(),
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("job-portal-{name}-{nanos}.json"))
    }

    #[test]
    fn assigns_sequential_ids() {
        let store = MemoryJobStore::new();
        let first = store.insert(new_job("u-1", "Engineer", 1)).unwrap();
        let second = store.insert(new_job("u-1", "Designer", 1)).unwrap();
        assert_eq!(first.id, JobId("job-000001".to_string()));
        assert_eq!(second.id, JobId("job-000002".to_string()));
    }

    #[test]
    fn update_and_delete_report_missing_documents() {
        let store = MemoryJobStore::new();
        let job = store.insert(new_job("u-1", "Engineer", 1)).unwrap();
        store.delete(&job.id).unwrap();
        assert!(matches!(store.delete(&job.id), Err(StoreError::NotFound)));
        assert!(matches!(store.update(job), Err(StoreError::NotFound)));
    }

    #[test]
    fn groups_keep_first_seen_order_per_owner() {
        let store = MemoryJobStore::new();
        store.insert(new_job("u-1", "A", 2)).unwrap();
        store.insert(new_job("u-2", "B", 5)).unwrap();
        store.insert(new_job("u-1", "C", 1)).unwrap();
        store.insert(new_job("u-1", "D", 2)).unwrap();

        let months = store.group_by_month(&UserId("u-1".to_string())).unwrap();
        assert_eq!(
            months,
            vec![
                MonthGroup {
                    year: 2024,
                    month: 2,
                    count: 2
                },
                MonthGroup {
                    year: 2024,
                    month: 1,
                    count: 1
                },
            ]
        );
        let statuses = store.group_by_status(&UserId("u-1".to_string())).unwrap();
        assert_eq!(
            statuses,
            vec![StatusGroup {
                status: JobStatus::Pending,
                count: 3
            }]
        );
    }

    #[test]
    fn closed_store_rejects_operations() {
        let store = MemoryJobStore::new();
        store.close().unwrap();
        assert!(matches!(
            store.insert(new_job("u-1", "Engineer", 1)),
            Err(StoreError::Closed)
        ));
    }

    #[test]
    fn snapshot_survives_close_and_reopen() {
        let path = scratch_path("roundtrip");
        let config = StoreConfig {
            snapshot_path: Some(path.clone()),
        };

        let store = MemoryJobStore::open(&config).expect("opens without snapshot");
        store.insert(new_job("u-1", "Engineer", 3)).unwrap();
        store.insert(new_job("u-1", "Designer", 4)).unwrap();
        store.close().expect("close writes snapshot");

        let reopened = MemoryJobStore::open(&config).expect("opens from snapshot");
        let documents = reopened.documents().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].position, "Designer");
        let next = reopened.insert(new_job("u-1", "Analyst", 5)).unwrap();
        assert_eq!(next.id, JobId("job-000003".to_string()));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let path = scratch_path("corrupt");
        fs::write(&path, b"{not json").unwrap();
        let config = StoreConfig {
            snapshot_path: Some(path.clone()),
        };
        assert!(matches!(
            MemoryJobStore::open(&config),
            Err(StoreError::Snapshot(_))
        ));
        let _ = fs::remove_file(path);
    }
}
