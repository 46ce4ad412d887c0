//! Pairwise merging of two dependency records on the same product.
//!
//! The merged window is the intersection of the two windows: the greater
//! minimum and the lesser maximum. The recommendation is the greatest of the
//! two that still falls inside it. Ties between versions that compare equal
//! but are spelled differently go to the lexicographically greater (minimum,
//! recommendation) or lesser (maximum) spelling, so `merge` is commutative.

use std::cmp::Ordering;

use slsdist_core::product::ProductDependency;
use slsdist_core::version::{OrderableVersion, VersionMatcher};
use slsdist_util::errors::{DistError, DistResult};

/// Merge two records for the same product into the tightest record
/// satisfying both.
///
/// The result is optional only if both inputs are.
pub fn merge(a: &ProductDependency, b: &ProductDependency) -> DistResult<ProductDependency> {
    let id = a.id();
    if id != b.id() {
        return Err(DistError::MismatchedProductIds {
            left: a.to_string(),
            right: b.to_string(),
        });
    }
    let context = id.to_string();

    let min_a = OrderableVersion::require(&a.minimum_version, &context)?;
    let min_b = OrderableVersion::require(&b.minimum_version, &context)?;
    let minimum = match min_a.cmp(&min_b).then_with(|| min_a.as_str().cmp(min_b.as_str())) {
        Ordering::Less => min_b,
        _ => min_a,
    };

    let max_a = VersionMatcher::require(&a.maximum_version, "maximum version", &context)?;
    let max_b = VersionMatcher::require(&b.maximum_version, "maximum version", &context)?;
    let (maximum, maximum_matcher) = match max_a
        .cmp(&max_b)
        .then_with(|| a.maximum_version.cmp(&b.maximum_version))
    {
        Ordering::Greater => (&b.maximum_version, max_b),
        _ => (&a.maximum_version, max_a),
    };

    if maximum_matcher.compare_version(&minimum) == Ordering::Less {
        return Err(DistError::VersionRangeConflict {
            product: context,
            minimum: minimum.to_string(),
            maximum: maximum.clone(),
            left: a.to_string(),
            right: b.to_string(),
        });
    }

    let mut recommended: Option<OrderableVersion> = None;
    for candidate in [&a.recommended_version, &b.recommended_version]
        .into_iter()
        .flatten()
    {
        let candidate = OrderableVersion::require(candidate, &context)?;
        if candidate < minimum || !maximum_matcher.admits(&candidate) {
            tracing::trace!("dropping recommended version {candidate} for '{context}': outside merged range");
            continue;
        }
        let better = match &recommended {
            None => true,
            Some(current) => {
                candidate
                    .cmp(current)
                    .then_with(|| candidate.as_str().cmp(current.as_str()))
                    == Ordering::Greater
            }
        };
        if better {
            recommended = Some(candidate);
        }
    }

    Ok(ProductDependency {
        product_group: a.product_group.clone(),
        product_name: a.product_name.clone(),
        minimum_version: minimum.to_string(),
        maximum_version: maximum.clone(),
        recommended_version: recommended.map(|v| v.to_string()),
        optional: a.optional && b.optional,
    })
}

/// Check that a single record's window is non-empty and holds its
/// recommendation.
///
/// Bounds that are not orderable cannot be checked and pass.
pub fn check_window(dep: &ProductDependency) -> DistResult<()> {
    let context = dep.id().to_string();
    let maximum = VersionMatcher::require(&dep.maximum_version, "maximum version", &context)?;
    let minimum = OrderableVersion::parse(&dep.minimum_version);
    if let Some(minimum) = &minimum {
        if maximum.compare_version(minimum) == Ordering::Less {
            return Err(DistError::VersionRangeConflict {
                product: context,
                minimum: dep.minimum_version.clone(),
                maximum: dep.maximum_version.clone(),
                left: dep.to_string(),
                right: dep.to_string(),
            });
        }
    }
    let Some(recommended) = dep.recommended_version.as_deref().and_then(OrderableVersion::parse)
    else {
        return Ok(());
    };
    let below_minimum = minimum.is_some_and(|min| recommended < min);
    if below_minimum || !maximum.admits(&recommended) {
        return Err(DistError::InvalidProductDependency {
            message: format!(
                "recommended version {recommended} is outside the range [{}, {}] of {dep}",
                dep.minimum_version, dep.maximum_version
            ),
        });
    }
    Ok(())
}

/// Check that a record can take part in a merge: its minimum and
/// recommended versions are orderable and its window is consistent.
pub fn check_mergeable(dep: &ProductDependency) -> DistResult<()> {
    let context = dep.id().to_string();
    OrderableVersion::require(&dep.minimum_version, &context)?;
    if let Some(recommended) = &dep.recommended_version {
        OrderableVersion::require(recommended, &context)?;
    }
    check_window(dep)
}
