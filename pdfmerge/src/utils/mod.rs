//! Utilities for path collection and human-readable output.

use crate::{MergeError, Result};
use std::path::PathBuf;

/// Expand input arguments into filesystem paths, preserving argument order.
///
/// Arguments containing glob metacharacters are expanded (matches sorted
/// alphabetically, as `glob` yields them). Plain paths are passed through
/// untouched so that a missing file is reported when it is read.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - A pattern that matches nothing is an error.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let pattern = pattern.as_ref();
        if is_glob(pattern) {
            let paths = collect_paths_for_pattern(pattern)?;
            if paths.is_empty() {
                return Err(MergeError::other(format!(
                    "No files match pattern: {pattern}"
                )));
            }
            resolved_paths.extend(paths);
        } else {
            resolved_paths.push(PathBuf::from(pattern));
        }
    }

    Ok(resolved_paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern into filesystem paths.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| MergeError::Other {
        message: err.to_string(),
    })?;

    paths
        .map(|entry| {
            entry.map_err(|err| MergeError::Other {
                message: err.to_string(),
            })
        })
        .collect()
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
