//! The recommended-product-dependencies blob that producing products embed in
//! their published artifacts.
//!
//! Extracting the blob from an archive is the artifact scanner's job; this
//! module only decodes the already-extracted JSON text.

use serde::{Deserialize, Serialize};

use slsdist_util::errors::{DistError, DistResult};

use crate::product::ProductDependency;

/// Decoded form of `{"recommended-product-dependencies": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecommendedProductDependencies {
    #[serde(default)]
    pub recommended_product_dependencies: Vec<ProductDependency>,
}

impl RecommendedProductDependencies {
    /// Decode and validate a blob. Any invalid record rejects the whole blob.
    pub fn from_json(blob: &str) -> DistResult<Self> {
        let parsed: Self = serde_json::from_str(blob).map_err(|e| DistError::InvalidBlob {
            message: e.to_string(),
        })?;
        for dep in &parsed.recommended_product_dependencies {
            dep.validate().map_err(|e| DistError::InvalidBlob {
                message: e.to_string(),
            })?;
        }
        Ok(parsed)
    }

    pub fn to_json(&self) -> DistResult<String> {
        serde_json::to_string(self).map_err(|e| DistError::Serialization {
            message: e.to_string(),
        })
    }
}
