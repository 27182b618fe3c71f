//! Dump directory enumeration.
//!
//! [`list_dump_files`] expands a directory the way the shell expands
//! `<dir>/*`: direct children only, names starting with `.` excluded, sorted
//! by name. Entries that resolve to directories or other non-regular files
//! (including through symlinks) are skipped with a notice. Symlinks to files
//! are kept; they are opened through the link.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::displaylevel;

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

/// List the files directly inside `dir`, in name order.
///
/// # Errors
/// Returns an `io::Error` if `dir` does not exist, is not a directory, or
/// cannot be read.
pub fn list_dump_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            e.io_error()
                .map(|io| io::Error::new(io.kind(), io.to_string()))
                .unwrap_or_else(|| io::Error::other(e.to_string()))
        })?;
        if is_hidden(entry.file_name()) {
            continue;
        }
        // `entry.file_type()` describes the link itself; follow it here.
        // A dangling link is kept so the caller's stat reports it.
        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_dir() => {
                displaylevel!(2, "Ignoring {} directory... \n", entry.path().display());
                continue;
            }
            Ok(meta) if !meta.is_file() => {
                displaylevel!(2, "Ignoring {} : not a regular file \n", entry.path().display());
                continue;
            }
            _ => {}
        }
        files.push(entry.into_path());
    }
    Ok(files)
}
