use std::path::{Path, PathBuf};

use miette::Result;
use slsdist_ops::ops_resolve::{self, ResolveOptions};

pub fn exec(project_dir: &Path, discovered: Vec<PathBuf>, verbose: bool) -> Result<()> {
    let resolution = ops_resolve::resolve(
        project_dir,
        &ResolveOptions {
            extra_blobs: discovered,
        },
    )?;
    if verbose {
        for dep in &resolution.report {
            println!("{dep}");
        }
    }
    Ok(())
}
