use std::{future::Future, sync::Arc};

use log::{error, info};

use crate::{
    config::Config,
    cycle::CycleRunner,
    errors::{Error, Result},
    janitor::PurgeReport,
    notifier::{self, Notifier, messages},
};

/// Repeats the purge cycle at the configured interval until `shutdown` resolves.
pub struct Scheduler {
    config: Arc<Config>,
    runner: Arc<CycleRunner>,
    notifier: Arc<dyn Notifier>,
}

impl Scheduler {
    pub fn new(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Scheduler {
            config: Arc::new(config),
            runner: Arc::new(CycleRunner::new(notifier.clone())),
            notifier,
        }
    }

    #[cfg(test)]
    pub fn with_runner(mut self, runner: CycleRunner) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let interval = self.config.check_interval;
        info!(
            "Starting continuous purge mode (interval: {}s)",
            interval.as_secs()
        );
        notifier::notify_async(self.notifier.clone(), messages::startup(&self.config)).await;

        tokio::pin!(shutdown);
        loop {
            self.run_cycle().await;

            info!("Waiting {} seconds until next check...", interval.as_secs());
            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("Purge scheduler stopped by signal");
        notifier::notify_async(self.notifier.clone(), messages::shutdown()).await;

        Ok(())
    }

    /// Runs one cycle on the blocking pool. A panic inside the cycle is reported like any
    /// other cycle error.
    pub async fn run_cycle(&self) -> PurgeReport {
        let config = Arc::clone(&self.config);
        let runner = Arc::clone(&self.runner);

        match tokio::task::spawn_blocking(move || runner.run(&config))
            .await
            .map_err(Error::from)
        {
            Ok(report) => report,
            Err(e) => {
                error!("Purge cycle task failed: {e}");
                let mut report = PurgeReport::new(self.config.dry_run);
                report.cycle_error = Some(e.to_string());
                report.finish();
                notifier::notify_async(
                    self.notifier.clone(),
                    messages::report(&report, &self.config.target_dir),
                )
                .await;
                report
            }
        }
    }
}
