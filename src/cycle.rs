use std::{fs, sync::Arc, time::SystemTime};

use chrono::Local;
use log::{debug, error, info, warn};
use tracing::info_span;

use crate::{
    config::Config,
    err,
    errors::Result,
    janitor::{self, AgeClassifier, FsRemover, PurgeExecutor, PurgeReport, Remover},
    notifier::{Notifier, messages},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CycleStage {
    Scanning,
    Classifying,
    Deleting,
    CleaningDirs,
    Reporting,
    Done,
    Failed,
}

/// Runs one purge pass over the target directory and reports it.
pub struct CycleRunner {
    notifier: Arc<dyn Notifier>,
    remover: Arc<dyn Remover>,
}

impl CycleRunner {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        CycleRunner {
            notifier,
            remover: Arc::new(FsRemover),
        }
    }

    #[cfg(test)]
    pub fn with_remover(mut self, remover: Arc<dyn Remover>) -> Self {
        self.remover = remover;
        self
    }

    /// Never fails: an error aborts the cycle and ends up in `PurgeReport::cycle_error`.
    pub fn run(&self, config: &Config) -> PurgeReport {
        let span = info_span!("purge_cycle", dry_run = config.dry_run);
        let _guard = span.enter();

        info!(
            "Starting purge cycle in {} (max age: {} days, dry run: {})",
            config.target_dir.display(),
            config.max_age_days,
            config.dry_run
        );

        let mut report = PurgeReport::new(config.dry_run);
        let mut stage = CycleStage::Scanning;
        match self.execute(config, &mut report, &mut stage) {
            Ok(()) => stage = CycleStage::Reporting,
            Err(e) => {
                error!("Purge cycle failed while {stage}: {e}");
                report.cycle_error = Some(format!("{stage}: {e}"));
                stage = CycleStage::Failed;
            }
        }
        report.finish();

        info!(
            "Purge cycle finished: scanned {}, deleted {}, would delete {}, failed {}, removed {} empty dir(s)",
            report.scanned_count,
            report.deleted_count,
            report.would_delete_count,
            report.failed_deletions.len(),
            report.removed_empty_dirs
        );

        self.report(config, &report);
        if stage == CycleStage::Reporting {
            stage = CycleStage::Done;
        }
        debug!("Purge cycle ended in stage: {stage}");

        report
    }

    fn execute(
        &self,
        config: &Config,
        report: &mut PurgeReport,
        stage: &mut CycleStage,
    ) -> Result<()> {
        let root = &config.target_dir;
        if !fs::metadata(root)?.is_dir() {
            return err!("target is no longer a directory: {}", root.display());
        }

        // 每轮只取一次当前时间，所有文件都以同一时刻为准
        let classifier = AgeClassifier::new(SystemTime::now(), config.max_age);

        // 边扫描边分类，只保留符合条件的记录
        let mut records = janitor::scan(root);
        let mut eligible = vec![];
        for record in records.by_ref() {
            report.scanned_count += 1;
            if classifier.is_eligible(record.modified) {
                debug!("Found old file: {}", record.path.display());
                eligible.push(record);
            }
        }
        // 根目录无法遍历时不能当作空目录处理
        records.finish()?;

        *stage = CycleStage::Classifying;
        report.eligible_count = eligible.len();

        *stage = CycleStage::Deleting;
        let outcome = PurgeExecutor::new(self.remover.as_ref(), config.dry_run)
            .purge(&eligible, &classifier);
        report.absorb(outcome);

        if !config.dry_run {
            *stage = CycleStage::CleaningDirs;
            report.record_removed_dirs(janitor::clean_empty_dirs(root, self.remover.as_ref()));
        }

        Ok(())
    }

    fn report(&self, config: &Config, report: &PurgeReport) {
        if report.has_activity() {
            self.notifier
                .notify(&messages::report(report, &config.target_dir));
        } else if config.notify_idle {
            let next_check = match chrono::Duration::from_std(config.check_interval) {
                Ok(interval) => Local::now() + interval,
                Err(e) => {
                    warn!("Failed to compute next check time: {e}");
                    Local::now()
                }
            };
            self.notifier.notify(&messages::idle(config, next_check));
        } else {
            debug!("Nothing purged, skipping notification");
        }
    }
}
