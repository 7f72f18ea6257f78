use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::CompatConfig;

/// Expand glob patterns into the list of documents to process.
///
/// Patterns without glob characters (*, ?, [) are literal paths and must
/// exist. Matches of the configuration's `exclude` patterns are dropped,
/// as are duplicates; the first occurrence keeps its position.
pub fn expand_globs(patterns: &[String], config: &CompatConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let paths = glob::glob(pattern)
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?;

            let mut match_count = 0;
            for path in paths {
                let path =
                    path.with_context(|| format!("Failed to read glob match for: {}", pattern))?;
                if path.is_file() {
                    files.push(path);
                    match_count += 1;
                }
            }

            if match_count == 0 {
                tracing::warn!(pattern = %pattern, "No files matched pattern");
            }
        } else {
            let path = PathBuf::from(pattern);
            if !path.exists() {
                anyhow::bail!("File not found: {}", pattern);
            }
            files.push(path);
        }
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|p| seen.insert(p.clone()));
    files.retain(|p| {
        let excluded = config.is_excluded(p);
        if excluded {
            tracing::debug!(path = %p.display(), "Excluded by configuration");
        }
        !excluded
    });

    Ok(files)
}
