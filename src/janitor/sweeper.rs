use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use walkdir::WalkDir;

use super::Remover;

/// Removes directories below `root` that are left without any entries, deepest first.
///
/// `root` itself is never removed. A directory is checked only after all of its
/// children were visited, so a chain of directories that only held expired files
/// collapses in a single pass.
pub fn clean_empty_dirs<R: Remover + ?Sized>(root: &Path, remover: &R) -> Vec<PathBuf> {
    let mut removed = vec![];

    let dirs = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry during directory cleanup: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir());

    for dir in dirs {
        let path = dir.path();
        match is_empty(path) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", path.display());
                continue;
            }
        }

        match remover.remove_dir(path) {
            Ok(()) => {
                info!("Deleted empty directory: {}", path.display());
                removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Directory already gone: {}", path.display());
            }
            Err(e) => warn!("Failed to delete directory {}: {e}", path.display()),
        }
    }

    removed
}

fn is_empty(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}
