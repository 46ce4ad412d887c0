//! Command dispatch and handler modules.

mod classify;
mod lock;
mod manifest;
mod resolve;

use std::path::{Path, PathBuf};

use miette::Result;
use slsdist_core::config::CONFIG_FILE;
use slsdist_util::errors::DistError;
use slsdist_util::fs::find_ancestor_with;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Classify { version } => classify::exec(&version),
        Command::Resolve { discovered } => {
            let root = project_root(cli.project_dir.as_deref())?;
            resolve::exec(&root, discovered, cli.verbose)
        }
        Command::Manifest {
            write_locks,
            discovered,
        } => {
            let root = project_root(cli.project_dir.as_deref())?;
            manifest::exec(&root, write_locks, discovered)
        }
        Command::Lock { discovered } => {
            let root = project_root(cli.project_dir.as_deref())?;
            lock::exec(&root, &discovered)
        }
    }
}

/// The explicit `--project-dir` made absolute, or the nearest ancestor of the
/// working directory holding a `slsdist.toml`.
fn project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        let root = dir.canonicalize().map_err(|e| DistError::Config {
            message: format!("Invalid project directory {}: {e}", dir.display()),
        })?;
        return Ok(root);
    }
    let cwd = std::env::current_dir().map_err(DistError::Io)?;
    let root = find_ancestor_with(&cwd, CONFIG_FILE).ok_or_else(|| DistError::Config {
        message: format!("Could not find {CONFIG_FILE} in current or parent directories"),
    })?;
    Ok(root)
}
