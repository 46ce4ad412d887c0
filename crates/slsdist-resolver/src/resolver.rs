//! The resolution engine: one synchronous pass from declared and discovered
//! records to a sorted [`ResolvedReport`].
//!
//! 1. Validate the declared records against the consumer, the ignored set
//!    and the optional set.
//! 2. Drop discovered records on the consumer itself, and records that
//!    cannot be merged (non-orderable bounds, empty window).
//! 3. Merge discovered records sharing an id.
//! 4. Fold the discovered records into the declared ones, skipping ignored
//!    ids and collecting advisories.
//! 5. Force the optional flag for every id in the optional set.

use std::collections::{BTreeMap, BTreeSet};

use slsdist_core::config::OptionalPolicy;
use slsdist_core::product::{ProductDependency, ProductId};
use slsdist_core::report::ResolvedReport;
use slsdist_util::errors::{DistError, DistResult};

use crate::advisory::{Advisory, AdvisoryReport};
use crate::merge::{check_mergeable, check_window, merge};

/// Everything the engine reads. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionRequest<'a> {
    /// The consuming product.
    pub product: &'a ProductId,
    pub declared: &'a [ProductDependency],
    pub discovered: &'a [ProductDependency],
    pub ignored: &'a BTreeSet<ProductId>,
    pub optional: &'a BTreeSet<ProductId>,
    pub optional_policy: OptionalPolicy,
}

/// The output of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub report: ResolvedReport,
    pub advisories: AdvisoryReport,
}

/// Resolve the product dependencies of `request.product`.
///
/// Configuration errors in the declared records and merge conflicts are
/// fatal. Redundant declarations are reported as advisories.
pub fn resolve(request: &ResolutionRequest<'_>) -> DistResult<Resolution> {
    let mut optional = request.optional.clone();
    let declared = validate_declared(request, &mut optional)?;

    let discovered = dedup_discovered(request)?;

    let mut resolved = declared.clone();
    let mut advisories = AdvisoryReport::new();
    for (id, found) in discovered {
        if request.ignored.contains(&id) {
            tracing::trace!("Ignored product dependency for '{id}'");
            continue;
        }
        let Some(declared_dep) = declared.get(&id) else {
            resolved.insert(id, found);
            continue;
        };
        let merged = merge(declared_dep, &found)?;
        if merged == found {
            advisories.add(Advisory::RedundantDeclaration {
                declared: declared_dep.clone(),
                discovered: found,
            });
        } else if declared_dep.recommended_version.is_some()
            && declared_dep.recommended_version == found.recommended_version
        {
            advisories.add(Advisory::DuplicatedRecommendation {
                declared: declared_dep.clone(),
                discovered: found,
            });
        }
        resolved.insert(id, merged);
    }

    for id in &optional {
        if let Some(dep) = resolved.get_mut(id) {
            tracing::trace!("Product dependency for '{id}' set as optional");
            dep.optional = true;
        }
    }

    Ok(Resolution {
        report: ResolvedReport::new(resolved.into_values().collect()),
        advisories,
    })
}

fn validate_declared(
    request: &ResolutionRequest<'_>,
    optional: &mut BTreeSet<ProductId>,
) -> DistResult<BTreeMap<ProductId, ProductDependency>> {
    let mut declared: BTreeMap<ProductId, ProductDependency> = BTreeMap::new();
    for dep in request.declared {
        dep.validate()?;
        let id = dep.id();
        if &id == request.product {
            return Err(DistError::SelfDependency {
                product: request.product.to_string(),
                dependency: dep.to_string(),
            });
        }
        if let Some(first) = declared.get(&id) {
            return Err(DistError::DuplicateDeclaration {
                product: id.to_string(),
                first: first.to_string(),
                second: dep.to_string(),
            });
        }
        if request.ignored.contains(&id) {
            return Err(DistError::IgnoredConflict {
                product: id.to_string(),
                dependency: dep.to_string(),
            });
        }
        if request.optional.contains(&id)
            && !dep.optional
            && request.optional_policy == OptionalPolicy::Reject
        {
            return Err(DistError::OptionalConflict {
                product: id.to_string(),
                dependency: dep.to_string(),
            });
        }
        check_window(dep)?;
        if dep.optional {
            tracing::trace!("Product dependency for '{id}' declared as optional");
            optional.insert(id.clone());
        }
        declared.insert(id, dep.clone());
    }
    Ok(declared)
}

/// Merge discovered records per id, so each id yields at most one advisory
/// later. Records on the consumer itself and records that cannot be merged
/// are dropped; one bad upstream recommendation never fails the pass.
fn dedup_discovered(
    request: &ResolutionRequest<'_>,
) -> DistResult<BTreeMap<ProductId, ProductDependency>> {
    let mut discovered: BTreeMap<ProductId, ProductDependency> = BTreeMap::new();
    for dep in request.discovered {
        let id = dep.id();
        if &id == request.product {
            tracing::debug!("Dropping discovered dependency on the product itself: {dep}");
            continue;
        }
        if let Err(e) = check_mergeable(dep) {
            tracing::warn!("Ignoring discovered product dependency {dep}: {e}");
            continue;
        }
        let merged = match discovered.get(&id) {
            Some(existing) => merge(existing, dep)?,
            None => dep.clone(),
        };
        discovered.insert(id, merged);
    }
    Ok(discovered)
}
