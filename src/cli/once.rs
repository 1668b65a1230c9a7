use std::{io::Write, sync::Arc};

use log::info;

use crate::{
    config::Config, cycle::CycleRunner, errors::Result, janitor::PurgeReport,
    notifier::Notifier,
};

/// Runs a single cycle in the foreground and writes the result to `out`. Returns the
/// report so the caller can pick an exit status.
///
/// With `json` set, `out` receives nothing but the serialized report.
pub fn run(
    config: &Config,
    notifier: Arc<dyn Notifier>,
    json: bool,
    out: &mut impl Write,
) -> Result<PurgeReport> {
    info!("Running purge cycle on {}...", config.target_dir.display());
    let report = CycleRunner::new(notifier).run(config);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else if let Some(e) = &report.cycle_error {
        eprintln!("Purge cycle failed: {e}");
    } else if report.dry_run {
        writeln!(
            out,
            "Dry run completed. Scanned: {}, would delete: {}",
            report.scanned_count, report.would_delete_count
        )?;
    } else {
        writeln!(
            out,
            "Purge completed. Scanned: {}, deleted: {}, failed: {}, empty directories removed: {}",
            report.scanned_count,
            report.deleted_count,
            report.failed_deletions.len(),
            report.removed_empty_dirs
        )?;
    }

    Ok(report)
}
