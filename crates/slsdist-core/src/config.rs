use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use slsdist_util::errors::{DistError, DistResult};

use crate::product::{ProductDependency, ProductId, ProductType};

/// File name of the per-project configuration.
pub const CONFIG_FILE: &str = "slsdist.toml";

/// The parsed representation of a `slsdist.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Absent for a workspace root that only lists members.
    #[serde(default)]
    pub product: Option<ProductConfig>,

    #[serde(default)]
    pub product_dependencies: Vec<ProductDependency>,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub manifest_extensions: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub workspace: Option<WorkspaceConfig>,
}

/// Product identity from the `[product]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default, rename = "type")]
    pub product_type: ProductType,
}

impl ProductConfig {
    pub fn id(&self) -> ProductId {
        ProductId::new(&self.group, &self.name)
    }
}

/// How an optional-set entry interacts with a declared non-optional record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionalPolicy {
    /// Reject the configuration as contradictory.
    #[default]
    Reject,
    /// Let the optional set win and mark the dependency optional.
    Override,
}

/// Resolution inputs from the `[resolution]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolutionConfig {
    #[serde(default)]
    pub ignored: BTreeSet<ProductId>,
    #[serde(default)]
    pub optional: BTreeSet<ProductId>,
    #[serde(default)]
    pub optional_policy: OptionalPolicy,
    /// Glob patterns, relative to the project directory, matching extracted
    /// recommendation blobs.
    #[serde(default)]
    pub discovered: Vec<String>,
}

/// Output locations from the `[output]` section, relative to the project directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_manifest_path")]
    pub manifest: PathBuf,
    #[serde(default = "default_lockfile_path")]
    pub lockfile: PathBuf,
    #[serde(default = "default_resolved_path")]
    pub resolved: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest_path(),
            lockfile: default_lockfile_path(),
            resolved: default_resolved_path(),
        }
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("build/deployment/manifest.yml")
}

fn default_lockfile_path() -> PathBuf {
    PathBuf::from(crate::lockfile::LOCKFILE)
}

fn default_resolved_path() -> PathBuf {
    PathBuf::from("build/resolved-product-dependencies.json")
}

/// Workspace configuration from the `[workspace]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub members: Vec<String>,
}

impl ProjectConfig {
    /// Load and parse a `slsdist.toml` file from the given path.
    pub fn from_path(path: &Path) -> DistResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DistError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content).map_err(|e| match e {
            DistError::Config { message } => DistError::Config {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Parse a `slsdist.toml` from a string.
    pub fn parse_toml(content: &str) -> DistResult<Self> {
        toml::from_str(content).map_err(|e| DistError::Config {
            message: format!("Failed to parse {CONFIG_FILE}: {e}"),
        })
    }

    /// The `[product]` section, which every distributable project needs.
    pub fn product(&self) -> DistResult<&ProductConfig> {
        self.product.as_ref().ok_or_else(|| DistError::Config {
            message: "missing [product] section".to_string(),
        })
    }
}
