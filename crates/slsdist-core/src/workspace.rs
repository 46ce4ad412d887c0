use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use slsdist_util::errors::{DistError, DistResult};
use slsdist_util::fs::find_ancestor_with;

use crate::config::{ProductConfig, CONFIG_FILE};
use crate::product::ProductId;
use crate::project::Project;

/// A workspace: a root `slsdist.toml` with a `[workspace]` section and the
/// projects it lists as members.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root_dir: PathBuf,
    pub members: Vec<Project>,
}

impl Workspace {
    /// Load the workspace rooted at `root_dir`.
    ///
    /// The root project is a member too when it declares a `[product]`.
    pub fn load(root_dir: &Path) -> DistResult<Self> {
        let root = Project::load(root_dir)?;
        let member_dirs = root
            .config
            .workspace
            .as_ref()
            .map(|ws| ws.members.clone())
            .unwrap_or_default();

        let mut members = Vec::new();
        for member in &member_dirs {
            let dir = root_dir.join(member);
            if !dir.join(CONFIG_FILE).is_file() {
                return Err(DistError::Config {
                    message: format!(
                        "workspace member '{member}' has no {CONFIG_FILE} (in {})",
                        root_dir.display()
                    ),
                });
            }
            members.push(Project::load(&dir)?);
        }
        if root.config.product.is_some() {
            members.insert(0, root);
        }

        Ok(Self {
            root_dir: root_dir.to_path_buf(),
            members,
        })
    }

    /// Find the workspace containing `project_dir`, if any.
    ///
    /// Walks up from the canonical form of `project_dir` to the nearest
    /// `slsdist.toml` with a `[workspace]` section, so relative paths such as
    /// `.` still reach their ancestors.
    pub fn discover(project_dir: &Path) -> DistResult<Option<Self>> {
        let mut start = std::fs::canonicalize(project_dir)?;
        while let Some(found) = find_ancestor_with(&start, CONFIG_FILE) {
            let project = Project::load(&found)?;
            if project.config.workspace.is_some() {
                tracing::debug!("found workspace root at {}", found.display());
                return Self::load(&found).map(Some);
            }
            match found.parent() {
                Some(parent) => start = parent.to_path_buf(),
                None => break,
            }
        }
        Ok(None)
    }

    /// Ids of every product published by a member of this workspace.
    pub fn published_products(&self) -> BTreeSet<ProductId> {
        self.members
            .iter()
            .filter_map(|m| m.config.product.as_ref().map(ProductConfig::id))
            .collect()
    }
}

/// Ids of products published alongside `project`: every workspace member's
/// product, or just the project's own when it is not in a workspace.
pub fn products_published_in_repo(project: &Project) -> DistResult<BTreeSet<ProductId>> {
    match Workspace::discover(&project.root_dir)? {
        Some(ws) => Ok(ws.published_products()),
        None => Ok(BTreeSet::from([project.product()?.id()])),
    }
}
