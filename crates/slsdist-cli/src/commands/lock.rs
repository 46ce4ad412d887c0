use std::path::{Path, PathBuf};

use miette::Result;
use slsdist_core::lockfile::LockOutcome;
use slsdist_ops::ops_lock;
use slsdist_util::progress::status_info;

pub fn exec(project_dir: &Path, discovered: &[PathBuf]) -> Result<()> {
    let outcome = ops_lock::lock(project_dir, discovered)?;
    if outcome.lockfile == LockOutcome::UpToDate {
        status_info("Fresh", "lockfile already up to date");
    }
    Ok(())
}
