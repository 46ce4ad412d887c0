use serde::{Deserialize, Serialize};
use std::path::Path;

use slsdist_util::errors::{DistError, DistResult};

use crate::product::{ProductDependency, ProductId};

/// The resolved product dependencies of one product, sorted by [`ProductId`].
///
/// Built once per resolution pass and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedReport {
    product_dependencies: Vec<ProductDependency>,
}

impl ResolvedReport {
    /// Build a report, sorting the dependencies by product id.
    pub fn new(mut dependencies: Vec<ProductDependency>) -> Self {
        dependencies.sort_by_key(ProductDependency::id);
        Self {
            product_dependencies: dependencies,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dependencies(&self) -> &[ProductDependency] {
        &self.product_dependencies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductDependency> {
        self.product_dependencies.iter()
    }

    pub fn get(&self, id: &ProductId) -> Option<&ProductDependency> {
        self.product_dependencies.iter().find(|d| &d.id() == id)
    }

    pub fn len(&self) -> usize {
        self.product_dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_dependencies.is_empty()
    }

    /// Serialize as `{"product-dependencies": [...]}` with a trailing newline.
    pub fn to_json_pretty(&self) -> DistResult<String> {
        serde_json::to_string_pretty(self)
            .map(|json| json + "\n")
            .map_err(|e| DistError::Serialization {
                message: format!("Failed to serialize resolved product dependencies: {e}"),
            })
    }

    /// Load a report previously written with [`ResolvedReport::write_to`].
    pub fn from_path(path: &Path) -> DistResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let report: Self = serde_json::from_str(&content).map_err(|e| DistError::Serialization {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;
        Ok(Self::new(report.product_dependencies))
    }

    pub fn write_to(&self, path: &Path) -> DistResult<()> {
        slsdist_util::fs::write_atomic(path, self.to_json_pretty()?.as_bytes())?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResolvedReport {
    type Item = &'a ProductDependency;
    type IntoIter = std::slice::Iter<'a, ProductDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
