mod age;
mod executor;
mod report;
mod scanner;
mod sweeper;

pub use age::AgeClassifier;
pub use executor::{PurgeExecutor, PurgeOutcome};
pub use report::{FailedDeletion, PurgeReport, PurgedFile};
pub use scanner::scan;
pub use sweeper::clean_empty_dirs;

use std::{fs, io, path::Path, path::PathBuf, time::SystemTime};

/// A regular file found during a scan. Only lives for the cycle that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Every filesystem mutation of a cycle goes through this.
pub trait Remover: Send + Sync {
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}
