use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Whether a file name looks like a runner report: it must contain the
/// marker and carry an `.xml` extension.
pub fn is_report_file(file_name: &str, marker: &str) -> bool {
    file_name.ends_with(".xml") && file_name.contains(marker)
}

/// Recursively collect report files under `root`.
///
/// Entries are visited sorted by file name at every directory level, so the
/// result is stable for a given tree. Symlinks are followed, so linked
/// reports and linked directories are found too; link loops and other
/// unreadable entries are logged and skipped. A missing root yields nothing.
pub fn discover_reports(root: &Path, marker: &str) -> Vec<PathBuf> {
    if !root.exists() {
        tracing::warn!(root = %root.display(), "report directory does not exist");
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| is_report_file(name, marker));
        if matches {
            found.push(entry.into_path());
        }
    }

    found
}
