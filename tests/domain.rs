use assert_matches::assert_matches;

use integration_fetcher::domain::{IntegrationId, parse_integration, parse_manifest};
use integration_fetcher::error::FetcherError;

#[test]
fn parse_integration_id_valid() {
    let id: IntegrationId = " abc-1 ".parse().unwrap();
    assert_eq!(id.as_str(), "abc-1");

    let id: IntegrationId = "N:integration:7f1c_2.b".parse().unwrap();
    assert_eq!(id.to_string(), "N:integration:7f1c_2.b");
}

#[test]
fn parse_integration_id_invalid() {
    assert_matches!(
        "".parse::<IntegrationId>(),
        Err(FetcherError::InvalidIntegrationId(_))
    );
    assert_matches!(
        "../etc".parse::<IntegrationId>(),
        Err(FetcherError::InvalidIntegrationId(_))
    );
    assert_matches!(
        "abc 1".parse::<IntegrationId>(),
        Err(FetcherError::InvalidIntegrationId(_))
    );
}

#[test]
fn integration_body_maps_fields() {
    let body = br#"{
        "uuid": "abc-1",
        "applicationId": 42,
        "datasetId": "N:dataset:1",
        "packageIds": ["pkg-1", "pkg-2"],
        "params": {"threshold": 0.5}
    }"#;
    let integration = parse_integration(body).unwrap();
    assert_eq!(integration.uuid, "abc-1");
    assert_eq!(integration.application_id, 42);
    assert_eq!(integration.dataset_node_id, "N:dataset:1");
    assert_eq!(integration.package_ids, vec!["pkg-1", "pkg-2"]);
    assert_eq!(integration.params["threshold"], 0.5);

    let packages = integration.package_set();
    assert_eq!(
        serde_json::to_value(&packages).unwrap(),
        serde_json::json!({"nodeIds": ["pkg-1", "pkg-2"]})
    );
}

#[test]
fn integration_missing_fields_default_to_zero_values() {
    let integration = parse_integration(br#"{"uuid": "abc-1"}"#).unwrap();
    assert_eq!(integration.application_id, 0);
    assert!(integration.package_ids.is_empty());
    assert!(integration.params.is_null());
}

#[test]
fn malformed_bodies_are_deserialization_errors() {
    assert_matches!(
        parse_integration(b"<html>502 Bad Gateway</html>"),
        Err(FetcherError::Deserialization { what: "integration", .. })
    );
    assert_matches!(
        parse_manifest(br#"{"data": "nope"}"#),
        Err(FetcherError::Deserialization { what: "manifest", .. })
    );
}

#[test]
fn manifest_preserves_service_order() {
    let body = br#"{"data": [
        {"nodeId": "n2", "fileName": "b.csv", "path": ["sub"], "url": "https://x/b"},
        {"nodeId": "n1", "fileName": "a.csv", "path": [], "url": "https://x/a"}
    ]}"#;
    let manifest = parse_manifest(body).unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.data[0].file_name, "b.csv");
    assert_eq!(manifest.data[0].path, vec!["sub"]);
    assert_eq!(manifest.data[1].node_id, "n1");
    assert!(manifest.data[1].path.is_empty());
}
