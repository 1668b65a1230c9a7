use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    errors::{Error, Result},
    vars::{
        DISCORD_WEBHOOK_URL, EnvKey, PURGE_CHECK_INTERVAL, PURGE_DRY_RUN, PURGE_MAX_AGE_DAYS,
        PURGE_NOTIFY_IDLE, PURGE_NOTIFY_TIMEOUT, PURGE_TARGET_DIR,
    },
};

const SECS_PER_DAY: f64 = 86_400.0;

/// Key/value lookup the configuration is read from.
pub trait ConfigSource {
    fn var(&self, key: &str) -> Option<String>;

    /// Looks up `key`, treating blank values as unset and falling back to its default.
    fn lookup(&self, key: EnvKey) -> Option<String> {
        self.var(key.name)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| key.default.map(String::from))
    }
}

/// Reads from the process environment.
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target_dir: PathBuf,
    pub max_age_days: f64,
    pub max_age: Duration,
    pub check_interval: Duration,
    pub dry_run: bool,
    pub notify_idle: bool,
    pub notifier_endpoint: Option<String>,
    pub notify_timeout: Duration,
}

impl Config {
    pub fn load(source: &impl ConfigSource) -> Result<Config> {
        let target_dir = source
            .lookup(PURGE_TARGET_DIR)
            .map(PathBuf::from)
            .ok_or(Error::MissingVar(PURGE_TARGET_DIR.name))?;
        check_target_dir(&target_dir)?;

        let max_age_days = parse_max_age_days(source)?;
        let max_age = Duration::try_from_secs_f64(max_age_days * SECS_PER_DAY).map_err(|_| {
            Error::InvalidVar {
                key: PURGE_MAX_AGE_DAYS.name,
                value: max_age_days.to_string(),
                reason: "out of range",
            }
        })?;

        let notifier_endpoint = source.lookup(DISCORD_WEBHOOK_URL);
        if let Some(endpoint) = &notifier_endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(Error::InvalidVar {
                key: DISCORD_WEBHOOK_URL.name,
                value: endpoint.clone(),
                reason: "expected an http:// or https:// URL",
            });
        }

        Ok(Config {
            target_dir,
            max_age_days,
            max_age,
            check_interval: Duration::from_secs(parse_secs(source, PURGE_CHECK_INTERVAL)?),
            dry_run: parse_bool(source, PURGE_DRY_RUN)?,
            notify_idle: parse_bool(source, PURGE_NOTIFY_IDLE)?,
            notifier_endpoint,
            notify_timeout: Duration::from_secs(parse_secs(source, PURGE_NOTIFY_TIMEOUT)?),
        })
    }
}

fn check_target_dir(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::TargetNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_dir() {
        return Err(Error::TargetNotDirectory(path.to_path_buf()));
    }
    // 确认目录可读
    fs::read_dir(path)?;

    Ok(())
}

fn parse_max_age_days(source: &impl ConfigSource) -> Result<f64> {
    let raw = source.lookup(PURGE_MAX_AGE_DAYS).unwrap_or_default();
    let invalid = |reason| Error::InvalidVar {
        key: PURGE_MAX_AGE_DAYS.name,
        value: raw.clone(),
        reason,
    };

    let days = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid("not a number"))?;
    if !days.is_finite() || days <= 0.0 {
        return Err(invalid("must be a positive number"));
    }

    Ok(days)
}

fn parse_secs(source: &impl ConfigSource, key: EnvKey) -> Result<u64> {
    let raw = source.lookup(key).unwrap_or_default();
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        Ok(_) => Err(Error::InvalidVar {
            key: key.name,
            value: raw,
            reason: "must be greater than zero",
        }),
        Err(_) => Err(Error::InvalidVar {
            key: key.name,
            value: raw,
            reason: "not a positive integer",
        }),
    }
}

fn parse_bool(source: &impl ConfigSource, key: EnvKey) -> Result<bool> {
    let raw = source.lookup(key).unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidVar {
            key: key.name,
            value: raw,
            reason: "expected a boolean",
        }),
    }
}
