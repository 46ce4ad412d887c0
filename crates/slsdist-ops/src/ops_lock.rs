//! Operation: rewrite the product-dependencies lockfile.

use std::path::{Path, PathBuf};

use slsdist_core::lockfile::LockMode;

use crate::ops_manifest::{create_manifest, ManifestOptions, ManifestOutcome};

/// Same as `slsdist manifest --write-locks`.
pub fn lock(project_dir: &Path, extra_blobs: &[PathBuf]) -> miette::Result<ManifestOutcome> {
    create_manifest(
        project_dir,
        &ManifestOptions {
            mode: LockMode::Write,
            extra_blobs: extra_blobs.to_vec(),
        },
    )
}
