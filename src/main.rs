use crate::{
    cli::Args,
    config::{Config, ConfigSource, EnvSource},
    errors::Result,
    notifier::{Notifier, messages},
    scheduler::Scheduler,
    vars::{DISCORD_WEBHOOK_URL, PURGE_NOTIFY_TIMEOUT},
};
use clap::Parser;
use log::{error, info};
use std::{future::Future, sync::Arc, time::Duration};

mod cli;
mod config;
mod cycle;
mod errors;
mod janitor;
mod logger;
mod notifier;
mod scheduler;
mod vars;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    // Load environment variables from .env file if it exists
    let env_loaded = dotenvy::dotenv().is_ok();
    // Initialize the logger
    logger::init();
    if env_loaded {
        info!("loaded .env file");
    }

    let source = EnvSource;
    let config = match load_config(&source, &args) {
        Ok(config) => config,
        Err(e) => return fatal(fatal_notifier(&source), e).await,
    };
    let notifier = notifier::from_endpoint(config.notifier_endpoint.clone(), config.notify_timeout);

    if args.once {
        let report = cli::once::run(&config, notifier, args.json, &mut std::io::stdout())?;
        if report.is_failed() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let shutdown = match shutdown_signal() {
        Ok(shutdown) => shutdown,
        Err(e) => return fatal(fatal_notifier(&source), e).await,
    };

    Scheduler::new(config, notifier).run(shutdown).await
}

fn load_config(source: &EnvSource, args: &Args) -> Result<Config> {
    let mut config = Config::load(source)?;
    if args.dry_run {
        config.dry_run = true;
    }
    info!(
        "Loaded configuration: target={}, max_age={} days, interval={}s, dry_run={}, notifications={}",
        config.target_dir.display(),
        config.max_age_days,
        config.check_interval.as_secs(),
        config.dry_run,
        if config.notifier_endpoint.is_some() { "enabled" } else { "disabled" }
    );

    Ok(config)
}

/// Builds a notifier from the raw environment, so a startup failure is still reported
/// when some other variable is invalid.
fn fatal_notifier(source: &impl ConfigSource) -> Arc<dyn Notifier> {
    let timeout = source
        .lookup(PURGE_NOTIFY_TIMEOUT)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(5));

    notifier::from_endpoint(source.lookup(DISCORD_WEBHOOK_URL), timeout)
}

/// Reports a startup error, then hands it back so the process exits non-zero.
async fn fatal(notifier: Arc<dyn Notifier>, e: errors::Error) -> Result<()> {
    error!("Failed to start purge daemon: {e}");
    notifier::notify_async(notifier, messages::fatal(&e)).await;

    Err(e)
}

/// Registers the signal handlers up front so a signal arriving mid-cycle isn't lost.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {},
            _ = terminate.recv() => {},
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{Severity, testing::RecordingNotifier};

    #[tokio::test]
    async fn test_fatal_notifies_once_and_fails() {
        let notifier = Arc::new(RecordingNotifier::default());

        let result = fatal(notifier.clone(), errors::Error::MissingVar("PURGE_TARGET_DIR")).await;

        assert!(matches!(result, Err(errors::Error::MissingVar("PURGE_TARGET_DIR"))));
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
        assert!(messages[0].body.contains("PURGE_TARGET_DIR"));
    }
}
