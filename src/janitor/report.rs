use std::{io, path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PurgeOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct PurgedFile {
    pub path: PathBuf,
    pub size: u64,
    // 分类时的文件年龄
    #[serde(rename = "age_secs", serialize_with = "as_secs")]
    pub age: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedDeletion {
    pub path: PathBuf,
    #[serde(serialize_with = "kind_name")]
    pub kind: io::ErrorKind,
    pub error: String,
}

impl FailedDeletion {
    pub fn new(path: PathBuf, error: &io::Error) -> Self {
        FailedDeletion {
            path,
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

/// Everything one cycle did. Built fresh per cycle and dropped after reporting.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub scanned_count: usize,
    pub eligible_count: usize,
    pub deleted_count: usize,
    pub deleted_bytes: u64,
    pub would_delete_count: usize,
    pub would_delete_bytes: u64,
    pub purged_files: Vec<PurgedFile>,
    pub failed_deletions: Vec<FailedDeletion>,
    pub removed_empty_dirs: usize,
    pub removed_dirs: Vec<PathBuf>,
    pub cycle_error: Option<String>,
}

impl PurgeReport {
    pub fn new(dry_run: bool) -> Self {
        PurgeReport {
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            scanned_count: 0,
            eligible_count: 0,
            deleted_count: 0,
            deleted_bytes: 0,
            would_delete_count: 0,
            would_delete_bytes: 0,
            purged_files: vec![],
            failed_deletions: vec![],
            removed_empty_dirs: 0,
            removed_dirs: vec![],
            cycle_error: None,
        }
    }

    pub fn absorb(&mut self, outcome: PurgeOutcome) {
        self.deleted_count += outcome.deleted_count;
        self.deleted_bytes += outcome.deleted_bytes;
        self.would_delete_count += outcome.would_delete_count;
        self.would_delete_bytes += outcome.would_delete_bytes;
        self.purged_files.extend(outcome.purged);
        self.failed_deletions.extend(outcome.failures);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn record_removed_dirs(&mut self, dirs: Vec<PathBuf>) {
        self.removed_empty_dirs = dirs.len();
        self.removed_dirs = dirs;
    }

    pub fn is_failed(&self) -> bool {
        self.cycle_error.is_some()
    }

    /// Whether the cycle did anything worth telling someone about.
    pub fn has_activity(&self) -> bool {
        self.deleted_count > 0
            || self.would_delete_count > 0
            || !self.failed_deletions.is_empty()
            || self.removed_empty_dirs > 0
            || self.cycle_error.is_some()
    }
}

fn as_secs<S: serde::Serializer>(age: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(age.as_secs())
}

fn kind_name<S: serde::Serializer>(
    kind: &io::ErrorKind,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(kind)
}
