use std::path::{Path, PathBuf};
use vdom::invariants::check_tree;
use vdom::snapshot::{SnapshotOptions, TreeSnapshot};
use vdom_test_support::diff_lines;
use vdom_test_support::fixtures::{ExpectedMetadata, FixtureBuilder, TreeFixture, load_fixtures};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn all_fixtures() -> Vec<(String, TreeFixture)> {
    let mut out = Vec::new();
    for file in ["metadata.toml", "mixed.json"] {
        let path = fixtures_dir().join(file);
        for case in load_fixtures(&path) {
            out.push((format!("{file}::{}", case.id), case));
        }
    }
    assert!(!out.is_empty(), "fixture corpus is empty");
    out
}

#[test]
fn fixture_metadata_matches_expectations() {
    let builder = FixtureBuilder::default();
    for (label, case) in all_fixtures() {
        let root = builder.build(&case.tree);
        let element = root
            .as_element()
            .unwrap_or_else(|| panic!("{label}: root is not an element"));
        assert_eq!(
            ExpectedMetadata::observed(element),
            case.expect,
            "{label}: metadata mismatch"
        );
    }
}

#[test]
fn fixture_trees_hold_invariants() {
    let builder = FixtureBuilder::default();
    for (label, case) in all_fixtures() {
        let root = builder.build(&case.tree);
        if let Err(err) = check_tree(&root) {
            panic!("{label}: {err}");
        }
    }
}

#[test]
fn fixture_snapshots_match() {
    let builder = FixtureBuilder::default();
    let mut checked = 0usize;
    for (label, case) in all_fixtures() {
        let Some(expected) = case.snapshot else {
            continue;
        };
        let root = builder.build(&case.tree);
        let snapshot = TreeSnapshot::new(&root, SnapshotOptions::default());
        if snapshot.as_lines() != expected.as_slice() {
            panic!(
                "{label}: snapshot mismatch\n{}",
                diff_lines(&expected, snapshot.as_lines())
            );
        }
        checked += 1;
    }
    assert!(checked > 0, "no fixture carried a snapshot");
}

#[test]
fn building_fixtures_does_not_touch_collaborators() {
    let builder = FixtureBuilder::default();
    for (_, case) in all_fixtures() {
        let _ = builder.build(&case.tree);
    }
    let log = builder.log().lock().expect("call log poisoned");
    assert!(log.is_empty(), "construction must not call hooks or widgets: {log:?}");
}

#[test]
fn inert_fixture_is_skippable() {
    let builder = FixtureBuilder::default();
    let (_, case) = all_fixtures()
        .into_iter()
        .find(|(_, case)| case.id == "inert-wide-list")
        .expect("inert-wide-list fixture present");
    let root = builder.build(&case.tree);
    assert!(root.as_element().expect("element root").is_inert());
}
