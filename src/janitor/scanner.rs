use std::{fs, io, path::Path};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::FileRecord;

/// Lazily yields every regular file below `root`.
///
/// Symlinks to files are reported with their target's size and mtime. Symlinks to
/// directories are not followed. Entries that can't be read (permissions, or
/// removed by someone else mid-scan) are logged and skipped. If the root itself
/// can't be walked the scan ends early and [`Scan::finish`] returns the error.
pub fn scan(root: &Path) -> Scan {
    Scan {
        walker: WalkDir::new(root).follow_links(false).min_depth(1).into_iter(),
        root_error: None,
    }
}

pub struct Scan {
    walker: walkdir::IntoIter,
    root_error: Option<walkdir::Error>,
}

impl Scan {
    /// Tells an empty tree apart from one that couldn't be read at all.
    pub fn finish(self) -> io::Result<()> {
        match self.root_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Iterator for Scan {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        if self.root_error.is_some() {
            return None;
        }

        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    if let Some(record) = to_record(&entry) {
                        return Some(record);
                    }
                }
                Err(e) if e.depth() == 0 => {
                    self.root_error = Some(e);
                    return None;
                }
                Err(e) => warn!("Skipping unreadable entry during scan: {e}"),
            }
        }
    }
}

fn to_record(entry: &DirEntry) -> Option<FileRecord> {
    let file_type = entry.file_type();
    let metadata = if file_type.is_file() {
        entry.metadata().map_err(|e| e.to_string())
    } else if file_type.is_symlink() {
        fs::metadata(entry.path()).map_err(|e| e.to_string())
    } else {
        return None;
    };

    let metadata = match metadata {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return None,
        Err(e) => {
            // 悬空的符号链接或者已经被外部删除的文件
            debug!("Skipping {}: {e}", entry.path().display());
            return None;
        }
    };

    match metadata.modified() {
        Ok(modified) => Some(FileRecord {
            path: entry.path().to_path_buf(),
            size: metadata.len(),
            modified,
        }),
        Err(e) => {
            warn!(
                "Failed to read modification time of {}: {e}",
                entry.path().display()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::janitor::testing::{DAY, touch};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn scanned_paths(root: &Path) -> Vec<PathBuf> {
        let mut paths = scan(root)
            .map(|r| r.path.strip_prefix(root).unwrap().to_path_buf())
            .collect::<Vec<_>>();
        paths.sort();
        paths
    }

    #[test]
    fn test_scan_nested() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("a.txt"), "a", DAY);
        touch(&root.path().join("sub/b.txt"), "bb", DAY);
        touch(&root.path().join("sub/deeper/c.txt"), "ccc", DAY);
        fs::create_dir_all(root.path().join("empty")).unwrap();

        assert_eq!(
            scanned_paths(root.path()),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("sub/b.txt"),
                PathBuf::from("sub/deeper/c.txt"),
            ]
        );
    }

    #[test]
    fn test_records_size_and_mtime() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("a.txt"), "hello", DAY * 3);

        let records = scan(root.path()).collect::<Vec<_>>();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size, 5);
        let age = std::time::SystemTime::now()
            .duration_since(records[0].modified)
            .unwrap();
        assert!(age >= DAY * 3);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let root = TempDir::new().unwrap();

        let mut records = scan(&root.path().join("gone"));
        assert_eq!(records.by_ref().count(), 0);
        assert_eq!(records.finish().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_empty_root_is_not_an_error() {
        let root = TempDir::new().unwrap();

        let mut records = scan(root.path());
        assert_eq!(records.by_ref().count(), 0);
        assert!(records.finish().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(&outside.path().join("target.txt"), "target", DAY);
        touch(&outside.path().join("dir/inner.txt"), "inner", DAY);

        symlink(
            outside.path().join("target.txt"),
            root.path().join("file-link"),
        )
        .unwrap();
        symlink(outside.path().join("dir"), root.path().join("dir-link")).unwrap();
        symlink(outside.path().join("nope"), root.path().join("dangling")).unwrap();

        let records = scan(root.path()).collect::<Vec<_>>();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, root.path().join("file-link"));
        assert_eq!(records[0].size, 6);
    }
}
