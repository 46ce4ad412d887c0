//! Operation: collect recommended product dependencies from extracted blobs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use slsdist_core::product::ProductDependency;
use slsdist_core::recommended::RecommendedProductDependencies;
use slsdist_resolver::merge::check_mergeable;
use slsdist_util::errors::DistError;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Find blob files matching `patterns` (relative to `project_dir`) plus any
/// `extra` files, and decode them in path order.
///
/// A blob that cannot be read or decoded, or that carries a record which
/// cannot take part in a merge, is logged and skipped.
pub fn discover(
    project_dir: &Path,
    patterns: &[String],
    extra: &[PathBuf],
) -> miette::Result<Vec<ProductDependency>> {
    let mut files = find_blob_files(project_dir, patterns)?;
    files.extend(extra.iter().map(|p| project_dir.join(p)));

    let mut discovered = Vec::new();
    for file in &files {
        let contents = match std::fs::read_to_string(file) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping unreadable blob {}: {e}", file.display());
                continue;
            }
        };
        match RecommendedProductDependencies::from_json(&contents) {
            Ok(blob) => {
                if let Some(e) = blob
                    .recommended_product_dependencies
                    .iter()
                    .find_map(|dep| check_mergeable(dep).err())
                {
                    tracing::warn!("Skipping blob {}: {e}", file.display());
                    continue;
                }
                for dep in blob.recommended_product_dependencies {
                    tracing::info!("Product dependency recommendation made by {}: {dep}", file.display());
                    discovered.push(dep);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping blob {}: {e}", file.display());
            }
        }
    }
    Ok(discovered)
}

/// Expand `patterns` against the tree under `project_dir`.
pub fn find_blob_files(project_dir: &Path, patterns: &[String]) -> miette::Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();
    for pattern in patterns {
        let set = compile_pattern(pattern)?;
        let base = project_dir.join(literal_prefix(pattern));
        if base.is_file() {
            if set.is_match(relative(&base, project_dir)) {
                found.insert(base);
            }
            continue;
        }
        let mut candidates = Vec::new();
        walk(&base, &mut candidates);
        for path in candidates {
            if set.is_match(relative(&path, project_dir)) {
                found.insert(path);
            }
        }
    }
    tracing::debug!("{} blob file(s) matched {:?}", found.len(), patterns);
    Ok(found)
}

fn compile_pattern(pattern: &str) -> miette::Result<GlobSet> {
    let invalid = |e: globset::Error| DistError::Config {
        message: format!("invalid discovered pattern '{pattern}': {e}"),
    };
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(invalid)?;
    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    Ok(builder.build().map_err(invalid)?)
}

/// The leading path components of `pattern` that contain no glob syntax.
fn literal_prefix(pattern: &str) -> PathBuf {
    pattern
        .split('/')
        .take_while(|part| !part.contains(GLOB_META))
        .collect()
}

fn relative<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Not scanning {}: {e}", dir.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_prefix_stops_at_glob() {
        assert_eq!(
            literal_prefix("build/product-dependencies/*.json"),
            PathBuf::from("build/product-dependencies")
        );
        assert_eq!(literal_prefix("**/*.json"), PathBuf::new());
        assert_eq!(literal_prefix("a/b/c.json"), PathBuf::from("a/b/c.json"));
    }
}
