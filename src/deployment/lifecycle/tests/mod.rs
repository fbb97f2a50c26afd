//! Unit tests for deployment lifecycle helpers.

use rstest::{fixture, rstest};
use serde_json::json;

use crate::config::ProviderConfig;
use crate::deployment::{DeploymentClient, DeploymentError};

fn client_for(base_url: &str) -> DeploymentClient {
    let config = ProviderConfig {
        base_url: base_url.to_owned(),
        ..ProviderConfig::default()
    };
    DeploymentClient::new(&config).expect("client builds")
}

#[fixture]
fn client() -> DeploymentClient {
    client_for("https://api.example.test/api/v1")
}

#[rstest]
fn endpoint_appends_collection_path(client: DeploymentClient) {
    let url = client.endpoint(&[]).expect("url builds");
    assert_eq!(url.as_str(), "https://api.example.test/api/v1/deployments");
}

#[rstest]
fn endpoint_tolerates_trailing_slash() {
    let url = client_for("https://api.example.test/api/v1/")
        .endpoint(&["abc"])
        .expect("url builds");
    assert_eq!(url.as_str(), "https://api.example.test/api/v1/deployments/abc");
}

#[rstest]
fn shutdown_endpoint_targets_action(client: DeploymentClient) {
    let url = client.shutdown_endpoint("dep-1").expect("url builds");
    assert_eq!(
        url.as_str(),
        "https://api.example.test/api/v1/deployments/dep-1/_shutdown"
    );
}

#[rstest]
fn endpoint_encodes_identifier_segments(client: DeploymentClient) {
    let url = client.endpoint(&["a/../b"]).expect("url builds");
    assert_eq!(
        url.as_str(),
        "https://api.example.test/api/v1/deployments/a%2F..%2Fb"
    );
}

#[test]
fn extract_deployment_id_returns_exact_value() {
    let id = DeploymentClient::extract_deployment_id(r#"{"id":"abc123","name":"x"}"#)
        .expect("id extracted");
    assert_eq!(id.as_str(), "abc123");
}

#[rstest]
#[case(r#"{"name":"x"}"#)]
#[case(r#"{"id":42}"#)]
#[case(r#"{"id":null}"#)]
#[case(r#"{"id":""}"#)]
#[case("[]")]
fn extract_deployment_id_reports_missing_id(#[case] body: &str) {
    let err = DeploymentClient::extract_deployment_id(body).expect_err("id should be missing");
    assert!(
        matches!(err, DeploymentError::MissingDeploymentId { body: ref raw } if raw == body),
        "unexpected error: {err:?}"
    );
}

#[test]
fn extract_deployment_id_reports_non_json_body() {
    let err = DeploymentClient::extract_deployment_id("<html>ok</html>")
        .expect_err("non-json should fail");
    assert!(matches!(
        err,
        DeploymentError::MalformedResponse {
            operation: "create",
            ..
        }
    ));
}

#[test]
fn all_resources_stopped_requires_every_resource() {
    let mixed = json!({
        "resources": {
            "elasticsearch": [{"info": {"status": "stopped"}}],
            "kibana": [{"info": {"status": "stopping"}}]
        }
    });
    assert!(!DeploymentClient::all_resources_stopped(&mixed));

    let stopped = json!({
        "resources": {
            "elasticsearch": [{"info": {"status": "stopped"}}],
            "kibana": [{"info": {"status": "stopped"}}],
            "apm": []
        }
    });
    assert!(DeploymentClient::all_resources_stopped(&stopped));
}

#[rstest]
#[case(json!({}))]
#[case(json!({"resources": {}}))]
#[case(json!({"resources": {"elasticsearch": [{"info": {}}]}}))]
fn all_resources_stopped_is_false_without_statuses(#[case] body: serde_json::Value) {
    assert!(!DeploymentClient::all_resources_stopped(&body));
}
