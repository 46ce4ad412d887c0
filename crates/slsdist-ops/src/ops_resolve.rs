//! Operation: resolve a project's product dependencies.

use std::path::{Path, PathBuf};

use slsdist_core::project::Project;
use slsdist_resolver::resolver::{self, Resolution, ResolutionRequest};
use slsdist_util::fs::display_relative;
use slsdist_util::progress::{status, status_warn};

use crate::ops_discover;

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Blob files to read in addition to the configured patterns.
    pub extra_blobs: Vec<PathBuf>,
}

/// Resolve `project` against its declared and discovered dependencies.
///
/// Advisories are logged here; nothing is written.
pub fn resolve_project(project: &Project, extra_blobs: &[PathBuf]) -> miette::Result<Resolution> {
    let product = project.product()?;
    let product_id = product.id();
    let config = &project.config;

    let discovered = ops_discover::discover(
        &project.root_dir,
        &config.resolution.discovered,
        extra_blobs,
    )?;

    let resolution = resolver::resolve(&ResolutionRequest {
        product: &product_id,
        declared: &config.product_dependencies,
        discovered: &discovered,
        ignored: &config.resolution.ignored,
        optional: &config.resolution.optional,
        optional_policy: config.resolution.optional_policy,
    })?;

    for advisory in resolution.advisories.iter() {
        tracing::warn!("{advisory}");
        status_warn("Advisory", &advisory.to_string());
    }
    tracing::debug!(
        "resolved {} product dependencies for {product_id}",
        resolution.report.len()
    );
    Ok(resolution)
}

/// Resolve the project in `project_dir` and write the resolved report.
pub fn resolve(project_dir: &Path, opts: &ResolveOptions) -> miette::Result<Resolution> {
    let project = Project::load(project_dir)?;
    let resolution = resolve_project(&project, &opts.extra_blobs)?;

    let path = project.resolved_path();
    resolution.report.write_to(&path)?;
    status(
        "Resolved",
        &format!(
            "{} product dependencies into {}",
            resolution.report.len(),
            display_relative(&path, project_dir)
        ),
    );
    Ok(resolution)
}
