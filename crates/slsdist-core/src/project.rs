use std::path::{Path, PathBuf};

use slsdist_util::errors::DistResult;

use crate::config::{ProductConfig, ProjectConfig, CONFIG_FILE};

/// A loaded project: one `slsdist.toml` plus the directory it lives in.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
    pub config_path: PathBuf,
    pub root_dir: PathBuf,
}

impl Project {
    /// Load the project whose `slsdist.toml` sits directly in `root_dir`.
    pub fn load(root_dir: &Path) -> DistResult<Self> {
        let config_path = root_dir.join(CONFIG_FILE);
        let config = ProjectConfig::from_path(&config_path)?;
        Ok(Self {
            config,
            config_path,
            root_dir: root_dir.to_path_buf(),
        })
    }

    pub fn product(&self) -> DistResult<&ProductConfig> {
        self.config.product()
    }

    /// Returns the path to the product-dependencies lockfile.
    pub fn lockfile_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.output.lockfile)
    }

    /// Returns the path the deployment manifest is written to.
    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.output.manifest)
    }

    /// Returns the path the resolved dependency report is written to.
    pub fn resolved_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.output.resolved)
    }
}
