use camino::{Utf8Path, Utf8PathBuf};

use integration_fetcher::audit::{AUDIT_FILE_NAME, AuditFormat, render, write_audit};
use integration_fetcher::domain::{Manifest, ManifestEntry};
use integration_fetcher::planner::plan;

fn manifest() -> Manifest {
    Manifest {
        data: vec![
            ManifestEntry {
                node_id: "n1".to_string(),
                file_name: "a.csv".to_string(),
                path: vec![],
                url: "https://x/a".to_string(),
            },
            ManifestEntry {
                node_id: "n2".to_string(),
                file_name: "b.csv".to_string(),
                path: vec!["sub".to_string()],
                url: "https://x/b".to_string(),
            },
        ],
    }
}

#[test]
fn standard_format_has_three_columns() {
    let planned = plan(Utf8Path::new("/out"), &manifest());
    let csv = render(&planned, AuditFormat::Standard);
    assert_eq!(
        csv,
        "filename,source_path,target_path\n\
         a.csv,/out/a.csv,.\n\
         b.csv,/out/b.csv,sub\n"
    );
}

#[test]
fn legacy_format_drops_filename() {
    let planned = plan(Utf8Path::new("/out"), &manifest());
    let csv = render(&planned, AuditFormat::Legacy);
    assert_eq!(
        csv,
        "source_path,target_path\n/out/a.csv,.\n/out/b.csv,sub\n"
    );
}

#[test]
fn write_creates_root_and_replaces_previous_file() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().join("input")).unwrap();

    let planned = plan(&root, &manifest());
    let path = write_audit(&root, &planned, AuditFormat::Standard).unwrap();
    assert_eq!(path, root.join(AUDIT_FILE_NAME));

    let single = plan(
        &root,
        &Manifest {
            data: manifest().data.into_iter().take(1).collect(),
        },
    );
    write_audit(&root, &single, AuditFormat::Standard).unwrap();
    let content = std::fs::read_to_string(path.as_std_path()).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(!root.join("file_paths.csv.tmp").as_std_path().exists());
}

#[test]
fn fields_with_commas_are_quoted() {
    let manifest = Manifest {
        data: vec![ManifestEntry {
            node_id: "n1".to_string(),
            file_name: "a,b.csv".to_string(),
            path: vec!["x".to_string()],
            url: "https://x/ab".to_string(),
        }],
    };
    let planned = plan(Utf8Path::new("/out"), &manifest);
    let csv = render(&planned, AuditFormat::Standard);
    assert!(csv.ends_with("\"a,b.csv\",\"/out/a,b.csv\",x\n"));
}
