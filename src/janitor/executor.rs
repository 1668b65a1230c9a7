use log::{error, info};

use super::{AgeClassifier, FailedDeletion, FileRecord, FsRemover, PurgedFile, Remover};

/// What one pass of the executor did.
#[derive(Debug, Default)]
pub struct PurgeOutcome {
    pub deleted_count: usize,
    pub deleted_bytes: u64,
    pub would_delete_count: usize,
    pub would_delete_bytes: u64,
    pub purged: Vec<PurgedFile>,
    pub failures: Vec<FailedDeletion>,
}

pub struct PurgeExecutor<'a, R: Remover + ?Sized = FsRemover> {
    remover: &'a R,
    dry_run: bool,
}

impl<'a, R: Remover + ?Sized> PurgeExecutor<'a, R> {
    pub fn new(remover: &'a R, dry_run: bool) -> Self {
        PurgeExecutor { remover, dry_run }
    }

    /// Deletes (or pretends to delete) every record. One failing file never stops the rest.
    pub fn purge(&self, records: &[FileRecord], classifier: &AgeClassifier) -> PurgeOutcome {
        let mut outcome = PurgeOutcome::default();

        for record in records {
            let purged = PurgedFile {
                path: record.path.clone(),
                size: record.size,
                age: classifier.age_of(record.modified),
            };

            if self.dry_run {
                info!("[DRY RUN] Would delete file: {}", record.path.display());
                outcome.would_delete_count += 1;
                outcome.would_delete_bytes += record.size;
                outcome.purged.push(purged);
                continue;
            }

            match self.remover.remove_file(&record.path) {
                Ok(()) => {
                    info!("Deleted file: {}", record.path.display());
                    // 使用扫描时记录的大小，文件删除后无法再获取
                    outcome.deleted_count += 1;
                    outcome.deleted_bytes += record.size;
                    outcome.purged.push(purged);
                }
                Err(e) => {
                    error!("Failed to delete file {}: {e}", record.path.display());
                    outcome.failures.push(FailedDeletion::new(record.path.clone(), &e));
                }
            }
        }

        outcome
    }
}
