use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use slsdist_util::errors::{DistError, DistResult};

use crate::config::ProductConfig;
use crate::product::ProductType;
use crate::report::ResolvedReport;

/// Version of the manifest document format.
pub const MANIFEST_VERSION: &str = "1.0";

/// Key the resolved dependency list is embedded under.
pub const PRODUCT_DEPENDENCIES_KEY: &str = "product-dependencies";

const HEADER_KEYS: [&str; 5] = [
    "manifest-version",
    "product-type",
    "product-group",
    "product-name",
    "product-version",
];

/// The deployment manifest consumed by rollout tooling.
///
/// Header fields come first, followed by the remaining keys in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlsManifest {
    pub manifest_version: String,
    pub product_type: ProductType,
    pub product_group: String,
    pub product_name: String,
    pub product_version: String,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl SlsManifest {
    /// Assemble the manifest for `product` from caller extensions and the
    /// resolved dependencies.
    ///
    /// Extensions may not redefine a header key or `product-dependencies`.
    /// Null extension values are dropped.
    pub fn build(
        product: &ProductConfig,
        extensions: &BTreeMap<String, Value>,
        report: &ResolvedReport,
    ) -> DistResult<Self> {
        let mut merged = BTreeMap::new();
        for (key, value) in extensions {
            if key == PRODUCT_DEPENDENCIES_KEY || HEADER_KEYS.contains(&key.as_str()) {
                return Err(DistError::ReservedManifestKey { key: key.clone() });
            }
            if !value.is_null() {
                merged.insert(key.clone(), value.clone());
            }
        }

        let deps = serde_json::to_value(report.dependencies()).map_err(|e| {
            DistError::Serialization {
                message: format!("Failed to serialize product dependencies: {e}"),
            }
        })?;
        merged.insert(PRODUCT_DEPENDENCIES_KEY.to_string(), deps);

        Ok(Self {
            manifest_version: MANIFEST_VERSION.to_string(),
            product_type: product.product_type,
            product_group: product.group.clone(),
            product_name: product.name.clone(),
            product_version: product.version.clone(),
            extensions: merged,
        })
    }

    pub fn to_json_pretty(&self) -> DistResult<String> {
        serde_json::to_string_pretty(self)
            .map(|json| json + "\n")
            .map_err(|e| DistError::Serialization {
                message: format!("Failed to serialize manifest: {e}"),
            })
    }

    /// Write the manifest atomically, creating parent directories.
    pub fn write_to(&self, path: &Path) -> DistResult<()> {
        slsdist_util::fs::write_atomic(path, self.to_json_pretty()?.as_bytes())?;
        Ok(())
    }
}
