//! File pattern resolution using glob

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};

/// Resolve file patterns to actual file paths
///
/// A pattern naming an existing directory expands to `dir_pattern` inside
/// that directory.
pub fn resolve_patterns(patterns: &[String], dir_pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let expanded = if Path::new(pattern).is_dir() {
            Path::new(pattern).join(dir_pattern).to_string_lossy().into_owned()
        } else {
            pattern.clone()
        };

        let paths = glob(&expanded)
            .map_err(|e| CliError::InvalidPattern(format!("{expanded} ({e})")))?;

        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", expanded))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    Ok(files)
}
