//! Human-readable notification bodies.

use std::{fmt::Write, path::Path, time::Duration};

use chrono::{DateTime, Local};

use super::{Message, Severity};
use crate::{config::Config, janitor::PurgeReport};

pub const COLOR_GREEN: u32 = 0x00ff00;
pub const COLOR_ORANGE: u32 = 0xffa500;
pub const COLOR_BLUE: u32 = 0x0099ff;
pub const COLOR_RED: u32 = 0xff0000;
pub const COLOR_GRAY: u32 = 0x808080;

const MAX_FILES_SHOWN: usize = 15;
const MAX_DIRS_SHOWN: usize = 10;
const MAX_FAILURES_SHOWN: usize = 5;

pub fn startup(config: &Config) -> Message {
    Message::new(
        Severity::Info,
        "File purge started",
        format!(
            "**Target:** `{}`\n**Interval:** {}s\n**Max age:** {} days\n**Dry run:** {}",
            config.target_dir.display(),
            config.check_interval.as_secs(),
            config.max_age_days,
            yes_no(config.dry_run),
        ),
    )
}

pub fn shutdown() -> Message {
    Message::new(
        Severity::Info,
        "File purge stopped",
        "Received termination signal, shutting down",
    )
    .with_color(COLOR_RED)
}

pub fn fatal(error: &dyn std::fmt::Display) -> Message {
    Message::new(
        Severity::Error,
        "File purge error",
        format!("Could not start: {error}"),
    )
}

pub fn idle(config: &Config, next_check: DateTime<Local>) -> Message {
    Message::new(
        Severity::Report,
        "File purge: nothing to do",
        format!(
            "No files to delete, everything is newer than {} days\n**Next check:** {}",
            config.max_age_days,
            next_check.format("%Y-%m-%d %H:%M:%S"),
        ),
    )
    .with_color(COLOR_GRAY)
}

pub fn report(report: &PurgeReport, root: &Path) -> Message {
    if let Some(cycle_error) = &report.cycle_error {
        return Message::new(
            Severity::Error,
            "File purge cycle failed",
            format!("Cycle aborted: {cycle_error}"),
        );
    }

    let mut body = String::new();
    if report.dry_run {
        body.push_str("**[DRY RUN - no files were actually deleted]**\n\n");
    }

    let (count, bytes) = if report.dry_run {
        (report.would_delete_count, report.would_delete_bytes)
    } else {
        (report.deleted_count, report.deleted_bytes)
    };
    let verb = if report.dry_run { "Would delete" } else { "Deleted" };
    let _ = writeln!(body, "**Scanned:** {}", report.scanned_count);
    let _ = writeln!(body, "**{verb}:** {count} ({})", format_size(bytes));
    if report.removed_empty_dirs > 0 {
        let _ = writeln!(
            body,
            "**Empty directories removed:** {}",
            report.removed_empty_dirs
        );
    }
    if !report.failed_deletions.is_empty() {
        let _ = writeln!(body, "**Failures:** {}", report.failed_deletions.len());
    }

    if !report.purged_files.is_empty() {
        let _ = writeln!(body, "\n**Files:**");
        for file in report.purged_files.iter().take(MAX_FILES_SHOWN) {
            let _ = writeln!(
                body,
                "• `{}` ({}, {} days old)",
                relative(&file.path, root),
                format_size(file.size),
                age_days(file.age),
            );
        }
        push_remaining(&mut body, report.purged_files.len(), MAX_FILES_SHOWN, "file(s)");
    }

    if !report.removed_dirs.is_empty() {
        let _ = writeln!(body, "\n**Removed directories:**");
        for dir in report.removed_dirs.iter().take(MAX_DIRS_SHOWN) {
            let _ = writeln!(body, "• `{}/`", relative(dir, root));
        }
        push_remaining(&mut body, report.removed_dirs.len(), MAX_DIRS_SHOWN, "directories");
    }

    if !report.failed_deletions.is_empty() {
        let _ = writeln!(body, "\n**Failed to delete:**");
        for failure in report.failed_deletions.iter().take(MAX_FAILURES_SHOWN) {
            let _ = writeln!(
                body,
                "• `{}`: {}",
                relative(&failure.path, root),
                failure.error
            );
        }
        push_remaining(
            &mut body,
            report.failed_deletions.len(),
            MAX_FAILURES_SHOWN,
            "failure(s)",
        );
    }

    let title = if report.dry_run {
        "File Purge Report (DRY RUN)"
    } else {
        "File Purge Report"
    };
    let color = if report.failed_deletions.is_empty() {
        COLOR_GREEN
    } else {
        COLOR_ORANGE
    };

    Message::new(Severity::Report, title, body.trim_end()).with_color(color)
}

/// Formats a byte count with binary units and one decimal, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }

    format!("{size:.1} TB")
}

fn push_remaining(body: &mut String, total: usize, shown: usize, noun: &str) {
    if total > shown {
        let _ = writeln!(body, "... and {} more {noun}", total - shown);
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn age_days(age: Duration) -> u64 {
    (age.as_secs_f64() / 86_400.0).round() as u64
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::janitor::{FailedDeletion, PurgedFile};
    use std::{io, path::PathBuf};

    fn config() -> Config {
        Config {
            target_dir: PathBuf::from("/data"),
            max_age_days: 30.0,
            max_age: Duration::from_secs(30 * 86_400),
            check_interval: Duration::from_secs(3600),
            dry_run: false,
            notify_idle: false,
            notifier_endpoint: None,
            notify_timeout: Duration::from_secs(5),
        }
    }

    fn purged(name: &str, size: u64, days: u64) -> PurgedFile {
        PurgedFile {
            path: PathBuf::from("/data").join(name),
            size,
            age: Duration::from_secs(days * 86_400),
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(512), "512.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 * 1024), "3.0 TB");
    }

    #[test]
    fn test_startup() {
        let message = startup(&config());
        assert_eq!(message.severity, Severity::Info);
        assert!(message.body.contains("**Interval:** 3600s"));
        assert!(message.body.contains("**Max age:** 30 days"));
        assert!(message.body.contains("**Dry run:** no"));
    }

    #[test]
    fn test_report_body() {
        let mut report = PurgeReport::new(false);
        report.scanned_count = 3;
        report.deleted_count = 1;
        report.deleted_bytes = 2048;
        report.purged_files.push(purged("sub/a.txt", 2048, 40));
        report.record_removed_dirs(vec![PathBuf::from("/data/old")]);

        let message = super::report(&report, Path::new("/data"));
        assert_eq!(message.severity, Severity::Report);
        assert_eq!(message.title, "File Purge Report");
        assert_eq!(message.color(), COLOR_GREEN);
        assert!(message.body.contains("**Scanned:** 3"));
        assert!(message.body.contains("**Deleted:** 1 (2.0 KB)"));
        assert!(message.body.contains("**Empty directories removed:** 1"));
        assert!(message.body.contains("• `sub/a.txt` (2.0 KB, 40 days old)"));
        assert!(message.body.contains("• `old/`"));
        assert!(!message.body.contains("DRY RUN"));
    }

    #[test]
    fn test_report_dry_run_and_failures() {
        let mut report = PurgeReport::new(true);
        report.would_delete_count = 20;
        report.would_delete_bytes = 20;
        for i in 0..20 {
            report.purged_files.push(purged(&format!("f{i}"), 1, 31));
        }
        report.failed_deletions.push(FailedDeletion::new(
            PathBuf::from("/data/locked"),
            &io::Error::from(io::ErrorKind::PermissionDenied),
        ));

        let message = super::report(&report, Path::new("/data"));
        assert_eq!(message.title, "File Purge Report (DRY RUN)");
        assert_eq!(message.color(), COLOR_ORANGE);
        assert!(message.body.starts_with("**[DRY RUN"));
        assert!(message.body.contains("**Would delete:** 20 (20.0 B)"));
        assert!(message.body.contains("... and 5 more file(s)"));
        assert!(message.body.contains("**Failures:** 1"));
        assert!(message.body.contains("• `locked`:"));
    }

    #[test]
    fn test_report_cycle_error() {
        let mut report = PurgeReport::new(false);
        report.cycle_error = Some("scanning: target vanished".to_string());

        let message = super::report(&report, Path::new("/data"));
        assert_eq!(message.severity, Severity::Error);
        assert!(message.body.contains("target vanished"));
    }

    #[test]
    fn test_idle() {
        let next = Local::now();
        let message = idle(&config(), next);
        assert_eq!(message.color(), COLOR_GRAY);
        assert!(message.body.contains("newer than 30 days"));
        assert!(message.body.contains(&next.format("%Y-%m-%d").to_string()));
    }
}
