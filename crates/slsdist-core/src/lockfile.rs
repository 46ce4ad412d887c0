//! The `product-dependencies.lock` file: a sorted, line-per-dependency
//! snapshot of the resolved product dependencies, checked in CI and
//! regenerated with `--write-locks`.
//!
//! ```text
//! # Run `slsdist manifest --write-locks` to regenerate this file
//! com.example:cache (1.0.0, 1.x.x, 1.1.0) optional
//! com.example:sibling ($projectVersion, 2.x.x)
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use slsdist_util::diff::unified_diff;
use slsdist_util::errors::{DistError, DistResult};
use slsdist_util::fs::{read_if_exists, remove_if_exists, write_atomic};

use crate::product::{ProductDependency, ProductId};
use crate::report::ResolvedReport;

/// Default lockfile name, relative to the project directory.
pub const LOCKFILE: &str = "product-dependencies.lock";

const HEADER: &str = "# Run `slsdist manifest --write-locks` to regenerate this file";
const PROJECT_VERSION: &str = "$projectVersion";
const OPTIONAL_MARKER: &str = "optional";

/// Whether a stale lockfile is an error or gets rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockMode {
    /// Fail if the lockfile does not match the resolved dependencies.
    #[default]
    Check,
    /// Rewrite (or delete) the lockfile to match.
    Write,
}

/// What [`LockfileCodec::enforce`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// The lockfile already matched.
    UpToDate,
    /// No dependencies and no lockfile.
    Absent,
    Created,
    Updated,
    Deleted,
}

/// Renders and parses lockfile text for one consuming product.
///
/// Dependencies on products published from the same repository record the
/// consumer's own version as `$projectVersion`, so a release does not churn
/// the lockfile.
#[derive(Debug, Clone, Copy)]
pub struct LockfileCodec<'a> {
    published_in_repo: &'a BTreeSet<ProductId>,
    project_version: &'a str,
}

impl<'a> LockfileCodec<'a> {
    pub fn new(published_in_repo: &'a BTreeSet<ProductId>, project_version: &'a str) -> Self {
        Self {
            published_in_repo,
            project_version,
        }
    }

    /// Render the lockfile contents, or `None` when the report is empty and no
    /// lockfile should exist.
    pub fn render(&self, report: &ResolvedReport) -> Option<String> {
        if report.is_empty() {
            return None;
        }
        let mut out = String::from(HEADER);
        out.push('\n');
        for dep in report {
            out.push_str(&self.render_line(dep));
            out.push('\n');
        }
        Some(out)
    }

    fn render_line(&self, dep: &ProductDependency) -> String {
        let in_repo = self.published_in_repo.contains(&dep.id());
        let mut line = format!(
            "{}:{} ({}, {}",
            dep.product_group,
            dep.product_name,
            self.pin(in_repo, &dep.minimum_version),
            dep.maximum_version
        );
        if let Some(recommended) = &dep.recommended_version {
            line.push_str(", ");
            line.push_str(self.pin(in_repo, recommended));
        }
        line.push(')');
        if dep.optional {
            line.push(' ');
            line.push_str(OPTIONAL_MARKER);
        }
        line
    }

    fn pin<'v>(&self, in_repo: bool, version: &'v str) -> &'v str {
        if in_repo && version == self.project_version {
            PROJECT_VERSION
        } else {
            version
        }
    }

    /// Parse lockfile contents back into a report.
    pub fn parse(&self, contents: &str) -> DistResult<ResolvedReport> {
        self.parse_named(contents, LOCKFILE)
    }

    /// Parse the lockfile at `path`; a missing file is an empty report.
    pub fn parse_file(&self, path: &Path) -> DistResult<ResolvedReport> {
        match read_if_exists(path)? {
            Some(contents) => self.parse_named(&contents, &path.display().to_string()),
            None => Ok(ResolvedReport::empty()),
        }
    }

    fn parse_named(&self, contents: &str, name: &str) -> DistResult<ResolvedReport> {
        let mut deps = Vec::new();
        for (index, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let dep = self.parse_line(line).map_err(|message| DistError::LockfileParse {
                path: name.to_string(),
                line: index + 1,
                message,
            })?;
            deps.push(dep);
        }
        Ok(ResolvedReport::new(deps))
    }

    fn parse_line(&self, line: &str) -> Result<ProductDependency, String> {
        let (id, rest) = line
            .split_once(' ')
            .ok_or_else(|| format!("expected 'group:name (min, max)', got '{line}'"))?;
        let id: ProductId = id.parse().map_err(|e: DistError| e.to_string())?;

        let rest = rest
            .strip_prefix('(')
            .ok_or_else(|| format!("expected '(' after '{id}'"))?;
        let (versions, trailer) = rest
            .split_once(')')
            .ok_or_else(|| format!("unclosed version list for '{id}'"))?;
        let optional = match trailer.trim() {
            "" => false,
            OPTIONAL_MARKER => true,
            other => return Err(format!("unexpected trailer '{other}' for '{id}'")),
        };

        let unpin = |version: &str| {
            if version == PROJECT_VERSION {
                self.project_version.to_string()
            } else {
                version.to_string()
            }
        };
        let fields: Vec<&str> = versions.split(", ").collect();
        let (minimum, maximum, recommended) = match fields[..] {
            [min, max] => (unpin(min), max.to_string(), None),
            [min, max, rec] => (unpin(min), max.to_string(), Some(unpin(rec))),
            _ => {
                return Err(format!(
                    "expected 2 or 3 versions for '{id}', got {}",
                    fields.len()
                ))
            }
        };

        Ok(ProductDependency {
            product_group: id.product_group,
            product_name: id.product_name,
            minimum_version: minimum,
            maximum_version: maximum,
            recommended_version: recommended,
            optional,
        })
    }

    /// Bring the lockfile at `path` in line with `report`.
    ///
    /// In [`LockMode::Check`] any mismatch is an error carrying a unified diff;
    /// in [`LockMode::Write`] the file is rewritten, or deleted when the report
    /// is empty. `label` names the file in messages.
    pub fn enforce(
        &self,
        path: &Path,
        label: &str,
        report: &ResolvedReport,
        mode: LockMode,
    ) -> DistResult<LockOutcome> {
        let expected = self.render(report);
        let existing = read_if_exists(path)?;

        let outcome = match (expected, existing) {
            (None, None) => LockOutcome::Absent,
            (None, Some(_)) => match mode {
                LockMode::Check => {
                    return Err(DistError::StaleEmptyLockfile {
                        path: label.to_string(),
                    })
                }
                LockMode::Write => {
                    remove_if_exists(path)?;
                    LockOutcome::Deleted
                }
            },
            (Some(expected), None) => match mode {
                LockMode::Check => {
                    return Err(DistError::LockfileMissing {
                        path: label.to_string(),
                        diff: unified_diff("", &expected, "/dev/null", label),
                    })
                }
                LockMode::Write => {
                    write_atomic(path, expected.as_bytes())?;
                    LockOutcome::Created
                }
            },
            (Some(expected), Some(current)) if expected == current => LockOutcome::UpToDate,
            (Some(expected), Some(current)) => match mode {
                LockMode::Check => {
                    return Err(DistError::LockfileStale {
                        path: label.to_string(),
                        diff: unified_diff(&current, &expected, label, label),
                    })
                }
                LockMode::Write => {
                    write_atomic(path, expected.as_bytes())?;
                    LockOutcome::Updated
                }
            },
        };
        tracing::debug!("lockfile {label}: {outcome:?}");
        Ok(outcome)
    }
}
