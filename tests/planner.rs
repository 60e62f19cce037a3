use assert_matches::assert_matches;
use camino::Utf8Path;

use integration_fetcher::domain::{Manifest, ManifestEntry};
use integration_fetcher::error::FetcherError;
use integration_fetcher::planner::{ROOT_TARGET, plan, plan_entry};

fn entry(file_name: &str, path: &[&str]) -> ManifestEntry {
    ManifestEntry {
        node_id: format!("N:package:{file_name}"),
        file_name: file_name.to_string(),
        path: path.iter().map(|segment| segment.to_string()).collect(),
        url: format!("https://x/{file_name}"),
    }
}

#[test]
fn nested_path_joins_segments_in_order() {
    let planned = plan_entry(
        Utf8Path::new("/mnt/efs/input/run1"),
        &entry("df1.csv", &["twolayer", "onelayer"]),
    );
    assert_eq!(planned.target_dir, "/mnt/efs/input/run1/twolayer/onelayer");
    assert_eq!(
        planned.destination,
        "/mnt/efs/input/run1/twolayer/onelayer/df1.csv"
    );
    assert_eq!(planned.record.file_name, "df1.csv");
    assert_eq!(planned.record.source_path, "/mnt/efs/input/run1/df1.csv");
    assert_eq!(planned.record.target_path, "twolayer/onelayer");
}

#[test]
fn empty_path_targets_root() {
    let planned = plan_entry(Utf8Path::new("/out"), &entry("a.csv", &[]));
    assert_eq!(planned.target_dir, "/out");
    assert_eq!(planned.destination, "/out/a.csv");
    assert_eq!(planned.record.target_path, ROOT_TARGET);
}

#[test]
fn no_double_or_trailing_separators() {
    let planned = plan_entry(Utf8Path::new("/out/"), &entry("b.csv", &["sub", "", "deep/"]));
    assert_eq!(planned.target_dir, "/out/sub/deep");
    assert_eq!(planned.record.target_path, "sub/deep");
    assert_eq!(planned.record.source_path, "/out/b.csv");
    assert!(!planned.target_dir.as_str().contains("//"));
    assert!(!planned.target_dir.as_str().ends_with('/'));

    let inner = plan_entry(Utf8Path::new("/out"), &entry("d.csv", &["a//b", "/c/"]));
    assert_eq!(inner.target_dir, "/out/a/b/c");
    assert_eq!(inner.destination, "/out/a/b/c/d.csv");
    assert_eq!(inner.record.target_path, "a/b/c");
    assert!(inner.validate().is_ok());

    let only_empty = plan_entry(Utf8Path::new("/out"), &entry("c.csv", &["", ""]));
    assert_eq!(only_empty.target_dir, "/out");
    assert_eq!(only_empty.record.target_path, ".");
}

#[test]
fn plan_keeps_manifest_order() {
    let manifest = Manifest {
        data: vec![entry("z.csv", &["b"]), entry("a.csv", &[]), entry("m.csv", &["a"])],
    };
    let planned = plan(Utf8Path::new("/out"), &manifest);
    let names = planned
        .iter()
        .map(|item| item.record.file_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["z.csv", "a.csv", "m.csv"]);
}

#[test]
fn file_names_with_separators_are_rejected() {
    let root = Utf8Path::new("/out");
    assert!(plan_entry(root, &entry("ok.csv", &["sub"])).validate().is_ok());
    assert_matches!(
        plan_entry(root, &entry("nested/a.csv", &[])).validate(),
        Err(FetcherError::InvalidFileName(_))
    );
    assert_matches!(
        plan_entry(root, &entry("win\\a.csv", &[])).validate(),
        Err(FetcherError::InvalidFileName(_))
    );
    assert_matches!(
        plan_entry(root, &entry("", &[])).validate(),
        Err(FetcherError::InvalidFileName(_))
    );
    assert_matches!(
        plan_entry(root, &entry("..", &[])).validate(),
        Err(FetcherError::InvalidFileName(_))
    );
}

#[test]
fn parent_segments_are_rejected() {
    let root = Utf8Path::new("/out");
    assert_matches!(
        plan_entry(root, &entry("a.csv", &["..", "etc"])).validate(),
        Err(FetcherError::InvalidPathSegment(segment)) if segment == ".."
    );
    assert_matches!(
        plan_entry(root, &entry("a.csv", &["sub/../../x"])).validate(),
        Err(FetcherError::InvalidPathSegment(_))
    );
}
