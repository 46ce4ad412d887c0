use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use slsdist_util::errors::{DistError, DistResult};

use crate::version;

/// The `(group, name)` identity of a product.
///
/// Orders by group, then name. Serializes as `group:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId {
    pub product_group: String,
    pub product_name: String,
}

impl ProductId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            product_group: group.into(),
            product_name: name.into(),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.product_group, self.product_name)
    }
}

impl FromStr for ProductId {
    type Err = DistError;

    /// Parse `"group:name"` into a product id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((group, name))
                if is_valid_identifier(group) && is_valid_identifier(name) =>
            {
                Ok(Self::new(group, name))
            }
            _ => Err(DistError::InvalidProductId {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ProductId {
    type Error = DistError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.to_string()
    }
}

/// Groups and names must be non-empty and free of the characters the
/// lockfile line format uses as delimiters.
fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '(' | ')' | ','))
}

/// A runtime dependency on another product, constrained to a version window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProductDependency {
    pub product_group: String,
    pub product_name: String,
    pub minimum_version: String,
    pub maximum_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_version: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl ProductDependency {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        minimum: impl Into<String>,
        maximum: impl Into<String>,
        recommended: Option<&str>,
    ) -> Self {
        Self {
            product_group: group.into(),
            product_name: name.into(),
            minimum_version: minimum.into(),
            maximum_version: maximum.into(),
            recommended_version: recommended.map(str::to_string),
            optional: false,
        }
    }

    /// Builder-style setter for the `optional` flag.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn id(&self) -> ProductId {
        ProductId::new(&self.product_group, &self.product_name)
    }

    /// Check identity and version formats.
    ///
    /// The minimum and recommended versions must be valid versions and the
    /// maximum must be a matcher.
    pub fn validate(&self) -> DistResult<()> {
        if !is_valid_identifier(&self.product_group) || !is_valid_identifier(&self.product_name)
        {
            return Err(DistError::InvalidProductDependency {
                message: format!(
                    "product group and name must be non-empty and free of whitespace, ':', ',', '(' and ')': {self}"
                ),
            });
        }
        if !version::is_valid(&self.minimum_version) {
            return Err(self.invalid_version("minimum version", &self.minimum_version));
        }
        if !version::is_matcher(&self.maximum_version) {
            return Err(self.invalid_version("maximum version", &self.maximum_version));
        }
        if let Some(recommended) = &self.recommended_version {
            if !version::is_valid(recommended) {
                return Err(self.invalid_version("recommended version", recommended));
            }
        }
        Ok(())
    }

    fn invalid_version(&self, field: &str, value: &str) -> DistError {
        DistError::InvalidVersionFormat {
            field: field.to_string(),
            version: value.to_string(),
            context: self.id().to_string(),
        }
    }
}

impl fmt::Display for ProductDependency {
    /// Renders `group:name (min, max, recommended)` with a trailing
    /// `optional` marker when set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({}, {}",
            self.product_group, self.product_name, self.minimum_version, self.maximum_version
        )?;
        if let Some(recommended) = &self.recommended_version {
            write!(f, ", {recommended}")?;
        }
        f.write_str(")")?;
        if self.optional {
            f.write_str(" optional")?;
        }
        Ok(())
    }
}

/// The kind of product a distribution packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[default]
    #[serde(rename = "service.v1")]
    ServiceV1,
    #[serde(rename = "daemon.v1")]
    DaemonV1,
    #[serde(rename = "asset.v1")]
    AssetV1,
    #[serde(rename = "helm-chart.v1")]
    HelmChartV1,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::ServiceV1 => "service.v1",
            ProductType::DaemonV1 => "daemon.v1",
            ProductType::AssetV1 => "asset.v1",
            ProductType::HelmChartV1 => "helm-chart.v1",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
