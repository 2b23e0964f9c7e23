//! Utility functions for descgen

use anyhow::{anyhow, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Glob options used for include and exclude patterns
///
/// `*` stops at path separators; `**` crosses them.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::full(&path_str)
        .map_err(|e| anyhow!("Failed to expand path {:?}: {}", path, e))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| anyhow!("Invalid pattern {:?}: {}", p, e)))
        .collect()
}

/// Find files under `root` whose relative path matches an include pattern
/// and no exclude pattern
///
/// A `root` that is itself a file is returned as-is. Results are sorted.
pub fn find_source_files(
    root: &Path,
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(anyhow!("Source path does not exist: {:?}", root));
    }

    let include = compile_patterns(include_patterns)?;
    let exclude = compile_patterns(exclude_patterns)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        let included = include
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS));
        let excluded = exclude
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS));

        if included && !excluded {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Path of an input file relative to its source root
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    }
}

/// Format duration as human readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs > 0 {
        format!("{secs}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}
