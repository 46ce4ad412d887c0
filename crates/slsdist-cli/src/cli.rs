//! CLI argument definitions for slsdist.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "slsdist",
    version,
    about = "Resolve product dependencies and write SLS deployment manifests",
    long_about = "slsdist merges declared product dependencies with the recommendations \
                  published by upstream products, checks the result against a committed \
                  lockfile and writes the deployment manifest."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the nearest ancestor with slsdist.toml)
    #[arg(long, global = true, env = "SLSDIST_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve product dependencies and write the resolved report
    Resolve {
        /// Extra recommendation blob files to read
        #[arg(long = "discovered", value_name = "FILE")]
        discovered: Vec<PathBuf>,
    },

    /// Check the lockfile and write the deployment manifest
    Manifest {
        /// Rewrite the lockfile instead of failing when it is out of date
        #[arg(long)]
        write_locks: bool,
        /// Extra recommendation blob files to read
        #[arg(long = "discovered", value_name = "FILE")]
        discovered: Vec<PathBuf>,
    },

    /// Rewrite the product-dependencies lockfile
    Lock {
        /// Extra recommendation blob files to read
        #[arg(long = "discovered", value_name = "FILE")]
        discovered: Vec<PathBuf>,
    },

    /// Classify a version string
    Classify {
        /// The version string to classify
        version: String,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
