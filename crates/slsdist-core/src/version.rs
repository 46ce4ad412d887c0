//! Product version classification, ordering, and matching.
//!
//! Product versions follow a three-part numeric grammar with a small set of
//! suffixes:
//! - Orderable: `1.2.3`, `1.2.3-rc4`, `1.2.3-beta4`, `1.2.3-5-gabc123`
//! - Non-orderable: any of the above or `1.2.3-<tag>` / `1.2.3.dirty`, where
//!   `<tag>` is lowercase alphanumerics, hyphens and dots
//! - Matcher: `1.2.3`, `1.2.x`, `1.x.x`, `x.x.x`
//!
//! Orderable versions sort `beta` < `rc` < release < commit-distance build for
//! the same numeric triplet.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use slsdist_util::errors::{DistError, DistResult};

static ORDERABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)(?:-rc(?P<rc>[0-9]+)|-beta(?P<beta>[0-9]+)|-(?P<distance>[0-9]+)-g(?P<hash>[a-f0-9]+))?$",
    )
    .expect("valid orderable version pattern")
});

static NON_ORDERABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+(?:-[a-z0-9.-]+)?(?:\.dirty)?$")
        .expect("valid non-orderable version pattern")
});

static MATCHER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+|x)\.([0-9]+|x)\.([0-9]+|x)$").expect("valid matcher pattern")
});

/// Primary classification of a version string.
///
/// A string can satisfy several grammars at once (`1.2.3` is orderable,
/// non-orderable and a matcher); this reports the most specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionKind {
    Orderable,
    NonOrderable,
    Matcher,
    Invalid,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VersionKind::Orderable => "orderable",
            VersionKind::NonOrderable => "non-orderable",
            VersionKind::Matcher => "matcher",
            VersionKind::Invalid => "invalid",
        })
    }
}

/// Returns true iff `version` is a valid orderable version.
pub fn is_orderable(version: &str) -> bool {
    OrderableVersion::parse(version).is_some()
}

/// Returns true iff `version` is a valid non-orderable version.
///
/// Every orderable version is also non-orderable.
pub fn is_non_orderable(version: &str) -> bool {
    NON_ORDERABLE.is_match(version)
}

/// Returns true iff `version` is a valid version matcher.
pub fn is_matcher(version: &str) -> bool {
    VersionMatcher::parse(version).is_some()
}

/// Returns true iff `version` is orderable or non-orderable.
pub fn is_valid(version: &str) -> bool {
    is_orderable(version) || is_non_orderable(version)
}

pub fn classify(version: &str) -> VersionKind {
    if is_orderable(version) {
        VersionKind::Orderable
    } else if is_non_orderable(version) {
        VersionKind::NonOrderable
    } else if is_matcher(version) {
        VersionKind::Matcher
    } else {
        VersionKind::Invalid
    }
}

/// Compare two orderable version strings.
///
/// Fails with [`DistError::NonOrderableVersion`] if either side is not
/// orderable; callers must classify first.
pub fn compare_orderable(a: &str, b: &str) -> DistResult<Ordering> {
    let a = OrderableVersion::require(a, "version comparison")?;
    let b = OrderableVersion::require(b, "version comparison")?;
    Ok(a.cmp(&b))
}

/// A non-negative integer of any length, ordered numerically.
///
/// Stored as its decimal digits without leading zeros, so components beyond
/// `u64` still compare correctly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

static NO_NUMBER: Number = Number(String::new());

impl Number {
    /// Parse a run of ASCII digits.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        Some(Self(if trimmed.is_empty() { "0" } else { trimmed }.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The suffix of an orderable version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    Beta(Number),
    ReleaseCandidate(Number),
    Release,
    /// `-<distance>-g<hash>`: a build `distance` commits after the release.
    CommitDistance { distance: Number, hash: String },
}

impl Suffix {
    fn rank(&self) -> (u8, &Number) {
        match self {
            Suffix::Beta(n) => (0, n),
            Suffix::ReleaseCandidate(n) => (1, n),
            Suffix::Release => (2, &NO_NUMBER),
            Suffix::CommitDistance { distance, .. } => (3, distance),
        }
    }
}

/// A parsed orderable version.
///
/// Equality follows the ordering: two commit-distance builds at the same
/// distance compare equal regardless of their hashes.
#[derive(Debug, Clone)]
pub struct OrderableVersion {
    pub major: Number,
    pub minor: Number,
    pub patch: Number,
    pub suffix: Suffix,
    text: String,
}

impl OrderableVersion {
    /// Parse an orderable version, returning `None` for anything else.
    pub fn parse(version: &str) -> Option<Self> {
        let caps = ORDERABLE.captures(version)?;
        let number = |name: &str| caps.name(name).and_then(|m| Number::parse(m.as_str()));

        let suffix = if let Some(rc) = number("rc") {
            Suffix::ReleaseCandidate(rc)
        } else if let Some(beta) = number("beta") {
            Suffix::Beta(beta)
        } else if let Some(distance) = number("distance") {
            Suffix::CommitDistance {
                distance,
                hash: caps.name("hash")?.as_str().to_string(),
            }
        } else {
            Suffix::Release
        };

        Some(Self {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            suffix,
            text: version.to_string(),
        })
    }

    /// Parse an orderable version or report it as non-orderable in `context`.
    pub fn require(version: &str, context: &str) -> DistResult<Self> {
        Self::parse(version).ok_or_else(|| DistError::NonOrderableVersion {
            version: version.to_string(),
            context: context.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn triplet(&self) -> [&Number; 3] {
        [&self.major, &self.minor, &self.patch]
    }
}

impl PartialEq for OrderableVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderableVersion {}

impl Ord for OrderableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triplet()
            .cmp(&other.triplet())
            .then_with(|| self.suffix.rank().cmp(&other.suffix.rank()))
    }
}

impl PartialOrd for OrderableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OrderableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for OrderableVersion {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::require(s, "input")
    }
}

/// A version matcher such as `1.2.x`.
///
/// `None` components are wildcards; once a component is a wildcard all
/// following components are too.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionMatcher {
    components: [Option<Number>; 3],
}

impl VersionMatcher {
    /// Parse a matcher, returning `None` for anything else.
    pub fn parse(matcher: &str) -> Option<Self> {
        let caps = MATCHER.captures(matcher)?;
        let mut components: [Option<Number>; 3] = Default::default();
        let mut wildcard_seen = false;
        for (i, slot) in components.iter_mut().enumerate() {
            let part = caps.get(i + 1)?.as_str();
            if part == "x" {
                wildcard_seen = true;
            } else if wildcard_seen {
                return None;
            } else {
                *slot = Some(Number::parse(part)?);
            }
        }
        Some(Self { components })
    }

    /// Parse a matcher or report it as invalid in `context`.
    pub fn require(matcher: &str, field: &str, context: &str) -> DistResult<Self> {
        Self::parse(matcher).ok_or_else(|| DistError::InvalidVersionFormat {
            field: field.to_string(),
            version: matcher.to_string(),
            context: context.to_string(),
        })
    }

    /// Position of this matcher relative to `version`, looking only at the
    /// numeric triplet: `Less` means the version is above every version this
    /// matcher covers, `Equal` means the matcher matches it.
    pub fn compare_version(&self, version: &OrderableVersion) -> Ordering {
        for (component, actual) in self.components.iter().zip(version.triplet()) {
            match component {
                None => return Ordering::Equal,
                Some(n) => match n.cmp(actual) {
                    Ordering::Equal => continue,
                    other => return other,
                },
            }
        }
        Ordering::Equal
    }

    /// Returns true if `version` falls under this matcher.
    pub fn matches(&self, version: &OrderableVersion) -> bool {
        self.compare_version(version) == Ordering::Equal
    }

    /// Returns true if this matcher, read as an inclusive upper bound,
    /// admits `version`.
    pub fn admits(&self, version: &OrderableVersion) -> bool {
        self.compare_version(version) != Ordering::Less
    }
}

impl Ord for VersionMatcher {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.components.iter().zip(other.components.iter()) {
            let ord = match (a, b) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for VersionMatcher {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .components
            .iter()
            .map(|c| c.as_ref().map_or_else(|| "x".to_string(), Number::to_string))
            .collect();
        f.write_str(&parts.join("."))
    }
}

impl FromStr for VersionMatcher {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::require(s, "matcher", "input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> OrderableVersion {
        OrderableVersion::parse(s).unwrap()
    }

    fn m(s: &str) -> VersionMatcher {
        VersionMatcher::parse(s).unwrap()
    }

    #[test]
    fn orderable_forms() {
        for s in ["0.0.0", "1.2.3", "10.20.30", "1.2.3-rc1", "1.2.3-beta12", "1.2.3-4-gabc123"] {
            assert!(is_orderable(s), "{s}");
        }
    }

    #[test]
    fn non_orderable_only_forms() {
        for s in ["1.2.3-foo", "1.2.3.dirty", "1.2.3-rc1.dirty", "1.2.3-4-gabc.dirty", "1.2.3-a.b-c"] {
            assert!(!is_orderable(s), "{s}");
            assert!(is_non_orderable(s), "{s}");
            assert_eq!(classify(s), VersionKind::NonOrderable);
        }
    }

    #[test]
    fn invalid_forms() {
        for s in ["", "1.2", "1.2.3.4", " 1.2.3", "1.2.3 ", "v1.2.3", "1.2.3-RC1", "1.2.3-4-gABC", "1.2.3-"] {
            assert!(!is_valid(s), "{s}");
        }
    }

    #[test]
    fn uppercase_hash_is_not_orderable() {
        assert!(!is_orderable("1.0.0-3-gABCDEF"));
    }

    #[test]
    fn matcher_forms() {
        assert!(is_matcher("x.x.x"));
        assert!(is_matcher("2.0.x"));
        assert!(is_matcher("2.x.x"));
        assert!(is_matcher("1.2.3"));
        assert!(!is_matcher("1.x.3"));
        assert!(!is_matcher("x.2.3"));
        assert!(!is_matcher("x.x.3"));
        assert!(!is_matcher("1.2.3-rc1"));
        assert_eq!(classify("1.x.x"), VersionKind::Matcher);
        assert_eq!(classify("1.x.3"), VersionKind::Invalid);
    }

    #[test]
    fn release_ordering() {
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.0.9") < v("1.1.0"));
        assert!(v("1.9.9") < v("2.0.0"));
        assert!(v("1.10.0") > v("1.9.0"));
    }

    #[test]
    fn suffix_ordering() {
        assert!(v("1.0.0-beta2") < v("1.0.0-rc1"));
        assert!(v("1.0.0-rc1") < v("1.0.0-rc2"));
        assert!(v("1.0.0-rc9") < v("1.0.0"));
        assert!(v("1.0.0") < v("1.0.0-1-gabc"));
        assert!(v("1.0.0-1-gabc") < v("1.0.0-2-gabc"));
        assert!(v("1.0.0-20-gabc") < v("1.0.1-beta1"));
    }

    #[test]
    fn commit_distance_ties_ignore_hash() {
        assert_eq!(v("1.0.0-3-gabc"), v("1.0.0-3-gdef"));
    }

    #[test]
    fn compare_orderable_rejects_non_orderable() {
        assert_eq!(compare_orderable("1.0.0", "1.0.0").unwrap(), Ordering::Equal);
        let err = compare_orderable("1.0.0", "1.0.0-foo").unwrap_err();
        assert!(matches!(err, DistError::NonOrderableVersion { ref version, .. } if version == "1.0.0-foo"));
    }

    #[test]
    fn matcher_matches_triplet() {
        assert!(m("1.x.x").matches(&v("1.99.3")));
        assert!(!m("1.x.x").matches(&v("2.0.0")));
        assert!(m("1.2.3").matches(&v("1.2.3-rc1")));
        assert!(m("x.x.x").matches(&v("7.0.0")));
    }

    #[test]
    fn matcher_as_upper_bound() {
        assert!(m("1.x.x").admits(&v("0.5.0")));
        assert!(m("1.x.x").admits(&v("1.5.0")));
        assert!(!m("1.x.x").admits(&v("2.0.0")));
        assert!(!m("1.2.3").admits(&v("1.2.4")));
    }

    #[test]
    fn matcher_ordering() {
        assert!(m("1.2.x") < m("1.x.x"));
        assert!(m("1.x.x") < m("x.x.x"));
        assert!(m("1.2.3") < m("1.2.x"));
        assert!(m("1.9.x") < m("2.0.0"));
        assert_eq!(m("2.x.x").cmp(&m("2.x.x")), Ordering::Equal);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(v("1.0.0-rc3").to_string(), "1.0.0-rc3");
        assert_eq!(m("2.x.x").to_string(), "2.x.x");
    }

    #[test]
    fn components_beyond_u64_still_order() {
        assert!(is_orderable("99999999999999999999.0.0"));
        assert!(is_matcher("99999999999999999999.x.x"));
        assert!(v("18446744073709551615.0.0") < v("99999999999999999999.0.0"));
        assert!(v("1.0.0-rc99999999999999999999") > v("1.0.0-rc18446744073709551616"));
        assert!(m("99999999999999999999.x.x").admits(&v("99999999999999999999.5.0")));
        assert!(!m("18446744073709551616.x.x").admits(&v("99999999999999999999.0.0")));
    }

    #[test]
    fn leading_zeros_compare_numerically() {
        assert_eq!(v("01.02.003").cmp(&v("1.2.3")), Ordering::Equal);
        assert_eq!(Number::parse("000").unwrap().as_str(), "0");
        assert!(Number::parse("").is_none());
        assert!(Number::from(10) > Number::from(9));
    }
}
