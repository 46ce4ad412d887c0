use std::path::{Path, PathBuf};

use miette::Result;
use slsdist_core::lockfile::LockMode;
use slsdist_ops::ops_manifest::{create_manifest, ManifestOptions};

pub fn exec(project_dir: &Path, write_locks: bool, discovered: Vec<PathBuf>) -> Result<()> {
    let mode = if write_locks {
        LockMode::Write
    } else {
        LockMode::Check
    };
    create_manifest(
        project_dir,
        &ManifestOptions {
            mode,
            extra_blobs: discovered,
        },
    )?;
    Ok(())
}
