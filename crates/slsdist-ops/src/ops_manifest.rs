//! Operation: check or rewrite the lockfile, then write the deployment manifest.

use std::path::{Path, PathBuf};

use slsdist_core::lockfile::{LockMode, LockOutcome, LockfileCodec};
use slsdist_core::manifest::SlsManifest;
use slsdist_core::project::Project;
use slsdist_core::version;
use slsdist_core::workspace::products_published_in_repo;
use slsdist_util::errors::DistError;
use slsdist_util::fs::display_relative;
use slsdist_util::progress::status;

use crate::ops_resolve::resolve_project;

#[derive(Debug, Clone, Default)]
pub struct ManifestOptions {
    pub mode: LockMode,
    /// Blob files to read in addition to the configured patterns.
    pub extra_blobs: Vec<PathBuf>,
}

/// What [`create_manifest`] produced.
#[derive(Debug, Clone)]
pub struct ManifestOutcome {
    pub manifest_path: PathBuf,
    pub lockfile: LockOutcome,
    pub dependencies: usize,
}

/// Resolve the project in `project_dir`, enforce its lockfile and write its
/// manifest.
///
/// Nothing is written unless resolution, manifest assembly and (in check
/// mode) the lockfile check all succeed.
pub fn create_manifest(project_dir: &Path, opts: &ManifestOptions) -> miette::Result<ManifestOutcome> {
    let project = Project::load(project_dir)?;
    let product = project.product()?;
    let product_id = product.id();

    if !version::is_valid(&product.version) {
        return Err(DistError::InvalidVersionFormat {
            field: "product version".to_string(),
            version: product.version.clone(),
            context: product_id.to_string(),
        }
        .into());
    }
    if !version::is_orderable(&product.version) {
        tracing::warn!(
            "Version string in project {product_id} is not orderable: {}",
            product.version
        );
    }

    let resolution = resolve_project(&project, &opts.extra_blobs)?;
    let manifest = SlsManifest::build(
        product,
        &project.config.manifest_extensions,
        &resolution.report,
    )?;

    let published = products_published_in_repo(&project)?;
    let codec = LockfileCodec::new(&published, &product.version);
    let lockfile_path = project.lockfile_path();
    let label = display_relative(&lockfile_path, project_dir);
    let outcome = codec.enforce(&lockfile_path, &label, &resolution.report, opts.mode)?;
    match outcome {
        LockOutcome::Created => status("Created", &label),
        LockOutcome::Updated => status("Updated", &label),
        LockOutcome::Deleted => status("Deleted", &label),
        LockOutcome::UpToDate | LockOutcome::Absent => {}
    }

    let manifest_path = project.manifest_path();
    manifest.write_to(&manifest_path)?;
    status(
        "Wrote",
        &format!(
            "{} {} with {} product dependencies",
            product_id,
            display_relative(&manifest_path, project_dir),
            resolution.report.len()
        ),
    );

    Ok(ManifestOutcome {
        manifest_path,
        lockfile: outcome,
        dependencies: resolution.report.len(),
    })
}
