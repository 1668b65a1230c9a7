pub mod once;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Deletes files older than a configured age, on a schedule")]
pub struct Args {
    /// Run a single purge cycle and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub once: bool,
    /// Only log what would be deleted, regardless of PURGE_DRY_RUN
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub dry_run: bool,
    /// Print the cycle report as JSON (with --once)
    #[arg(long, action = clap::ArgAction::SetTrue, requires = "once")]
    pub json: bool,
}
