use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use slsdist_core::lockfile::{LockMode, LockOutcome, LockfileCodec};
use slsdist_core::product::{ProductDependency, ProductId};
use slsdist_core::report::ResolvedReport;
use slsdist_util::errors::DistError;
use tempfile::TempDir;

fn sample_report() -> ResolvedReport {
    ResolvedReport::new(vec![
        ProductDependency::new("com.example", "storage", "1.0.0", "1.x.x", None),
        ProductDependency::new("com.example", "cache", "1.0.0", "1.x.x", Some("1.1.0"))
            .with_optional(true),
    ])
}

#[test]
fn render_sorts_and_formats_lines() {
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "3.0.0");
    let text = codec.render(&sample_report()).unwrap();
    assert_eq!(
        text,
        "# Run `slsdist manifest --write-locks` to regenerate this file\n\
         com.example:cache (1.0.0, 1.x.x, 1.1.0) optional\n\
         com.example:storage (1.0.0, 1.x.x)\n"
    );
}

#[test]
fn empty_report_renders_to_nothing() {
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    assert_eq!(codec.render(&ResolvedReport::empty()), None);
    assert_eq!(codec.parse("").unwrap(), ResolvedReport::empty());
}

#[test]
fn parse_reproduces_rendered_report() {
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "3.0.0");
    let report = sample_report();
    let text = codec.render(&report).unwrap();
    assert_eq!(codec.parse(&text).unwrap(), report);
}

#[test]
fn sibling_versions_are_pinned_to_project_version() {
    let siblings = BTreeSet::from([ProductId::new("com.example", "sibling")]);
    let codec = LockfileCodec::new(&siblings, "2.3.0");
    let report = ResolvedReport::new(vec![
        ProductDependency::new("com.example", "sibling", "2.3.0", "2.x.x", Some("2.3.0")),
        ProductDependency::new("com.example", "other", "2.3.0", "2.x.x", None),
    ]);

    let text = codec.render(&report).unwrap();
    assert!(text.contains("com.example:sibling ($projectVersion, 2.x.x, $projectVersion)\n"));
    assert!(text.contains("com.example:other (2.3.0, 2.x.x)\n"));
    assert_eq!(codec.parse(&text).unwrap(), report);
}

#[test]
fn parse_reports_line_numbers() {
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    let err = codec
        .parse("# header\ng:n (1.0.0, 1.x.x)\ng:m (1.0.0)\n")
        .unwrap_err();
    assert!(matches!(err, DistError::LockfileParse { line: 3, .. }));

    let err = codec.parse("g:n (1.0.0, 1.x.x) required\n").unwrap_err();
    assert!(matches!(err, DistError::LockfileParse { line: 1, .. }));
}

#[test]
fn check_mode_accepts_matching_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("product-dependencies.lock");
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    let report = sample_report();
    std::fs::write(&path, codec.render(&report).unwrap()).unwrap();

    let outcome = codec
        .enforce(&path, "product-dependencies.lock", &report, LockMode::Check)
        .unwrap();
    assert_eq!(outcome, LockOutcome::UpToDate);
}

#[test]
fn check_mode_missing_file_is_error_with_diff() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("product-dependencies.lock");
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");

    let err = codec
        .enforce(&path, "product-dependencies.lock", &sample_report(), LockMode::Check)
        .unwrap_err();
    match err {
        DistError::LockfileMissing { diff, .. } => {
            assert!(diff.contains("+com.example:storage (1.0.0, 1.x.x)"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn check_mode_stale_file_is_error_with_diff() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("product-dependencies.lock");
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    let old = ResolvedReport::new(vec![ProductDependency::new(
        "com.example",
        "storage",
        "0.9.0",
        "1.x.x",
        None,
    )]);
    let stale = codec.render(&old).unwrap();
    std::fs::write(&path, &stale).unwrap();

    let err = codec
        .enforce(&path, "product-dependencies.lock", &sample_report(), LockMode::Check)
        .unwrap_err();
    match err {
        DistError::LockfileStale { diff, .. } => {
            assert!(diff.contains("-com.example:storage (0.9.0, 1.x.x)"));
            assert!(diff.contains("+com.example:storage (1.0.0, 1.x.x)"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), stale);
}

#[test]
fn empty_report_with_existing_lockfile() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("product-dependencies.lock");
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    std::fs::write(&path, codec.render(&sample_report()).unwrap()).unwrap();

    let err = codec
        .enforce(
            &path,
            "product-dependencies.lock",
            &ResolvedReport::empty(),
            LockMode::Check,
        )
        .unwrap_err();
    assert!(matches!(err, DistError::StaleEmptyLockfile { .. }));
    assert!(path.exists());

    let outcome = codec
        .enforce(
            &path,
            "product-dependencies.lock",
            &ResolvedReport::empty(),
            LockMode::Write,
        )
        .unwrap();
    assert_eq!(outcome, LockOutcome::Deleted);
    assert!(!path.exists());
}

#[test]
fn empty_report_without_lockfile_is_fine() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("product-dependencies.lock");
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    for mode in [LockMode::Check, LockMode::Write] {
        let outcome = codec
            .enforce(&path, "lock", &ResolvedReport::empty(), mode)
            .unwrap();
        assert_eq!(outcome, LockOutcome::Absent);
    }
}

#[test]
fn write_mode_creates_then_updates() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("product-dependencies.lock");
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    let report = sample_report();

    let outcome = codec.enforce(&path, "lock", &report, LockMode::Write).unwrap();
    assert_eq!(outcome, LockOutcome::Created);
    assert_eq!(codec.parse_file(&path).unwrap(), report);

    let smaller = ResolvedReport::new(vec![report.dependencies()[0].clone()]);
    let outcome = codec.enforce(&path, "lock", &smaller, LockMode::Write).unwrap();
    assert_eq!(outcome, LockOutcome::Updated);
    assert_eq!(codec.parse_file(&path).unwrap(), smaller);

    let outcome = codec.enforce(&path, "lock", &smaller, LockMode::Check).unwrap();
    assert_eq!(outcome, LockOutcome::UpToDate);
}

#[test]
fn parse_file_of_missing_lockfile_is_empty() {
    let tmp = TempDir::new().unwrap();
    let siblings = BTreeSet::new();
    let codec = LockfileCodec::new(&siblings, "1.0.0");
    let report = codec.parse_file(&tmp.path().join("absent.lock")).unwrap();
    assert!(report.is_empty());
}

const NAMES: [&str; 4] = ["api", "cache", "db", "queue"];
const VERSIONS: [&str; 4] = ["1.0.0", "2.0.0", "2.1.0-rc1", "3.0.0-2-gabc"];

fn entry() -> impl Strategy<Value = (usize, usize, usize, Option<usize>, bool)> {
    (
        0..NAMES.len(),
        0..VERSIONS.len(),
        0..3usize,
        proptest::option::of(0..VERSIONS.len()),
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn parse_inverts_render(
        entries in proptest::collection::vec(entry(), 0..6),
        in_repo in proptest::collection::btree_set(0..NAMES.len(), 0..=NAMES.len()),
    ) {
        let maximums = ["1.x.x", "2.x.x", "x.x.x"];
        let mut by_id = BTreeMap::new();
        for (name, min, max, rec, optional) in entries {
            let dep = ProductDependency::new(
                "com.example",
                NAMES[name],
                VERSIONS[min],
                maximums[max],
                rec.map(|r| VERSIONS[r]),
            )
            .with_optional(optional);
            by_id.insert(dep.id(), dep);
        }
        let report = ResolvedReport::new(by_id.into_values().collect());
        let siblings: BTreeSet<ProductId> = in_repo
            .into_iter()
            .map(|i| ProductId::new("com.example", NAMES[i]))
            .collect();
        let codec = LockfileCodec::new(&siblings, "2.0.0");

        let text = codec.render(&report).unwrap_or_default();
        prop_assert_eq!(text.is_empty(), report.is_empty());
        prop_assert_eq!(codec.parse(&text).unwrap(), report);
    }
}
