//! `SonarClient` against a mocked SonarCloud Web API.
//!
//! The client is blocking, so each call runs on a blocking thread while the
//! mock server lives on the test runtime.

use std::time::Duration;

use statuscheck::sonar::{GateStatus, QualityQuery, QualitySource, SonarClient, fetch_snapshot};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_json(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_project(server: &MockServer, gate: &str) {
    mount_json(
        server,
        "/qualitygates/project_status",
        serde_json::json!({ "projectStatus": { "status": gate } }),
    )
    .await;
    mount_json(
        server,
        "/measures/component",
        serde_json::json!({
            "component": {
                "key": "acme_widgets",
                "measures": [
                    { "metric": "coverage", "value": "85.3" },
                    { "metric": "bugs", "value": "0" },
                    { "metric": "vulnerabilities", "value": "2" },
                    { "metric": "code_smells", "value": "14" },
                    { "metric": "security_hotspots", "value": "1" },
                    { "metric": "lines", "value": "1200" }
                ]
            }
        }),
    )
    .await;
    mount_json(
        server,
        "/project_analyses/search",
        serde_json::json!({ "analyses": [ { "date": "2024-01-15T10:30:00+0000" } ] }),
    )
    .await;
    mount_json(
        server,
        "/measures/component_tree",
        serde_json::json!({
            "components": [
                {
                    "path": "src/a.cpp",
                    "measures": [
                        { "metric": "coverage", "value": "90.0" },
                        { "metric": "lines_to_cover", "value": "20" },
                        { "metric": "uncovered_lines", "value": "2" }
                    ]
                },
                { "path": "include/b.h", "measures": [] }
            ]
        }),
    )
    .await;
}

fn query(component: Option<&str>) -> QualityQuery {
    QualityQuery {
        project_key: "acme_widgets".to_owned(),
        organization: Some("acme".to_owned()),
        component: component.map(str::to_owned),
        page_size: 500,
    }
}

#[tokio::test]
async fn test_full_snapshot() {
    let server = MockServer::start().await;
    mount_project(&server, "OK").await;
    let uri = server.uri();

    let snapshot = tokio::task::spawn_blocking(move || {
        let client = SonarClient::new(&uri, Duration::from_secs(5)).unwrap();
        fetch_snapshot(&client, &query(None))
    })
    .await
    .unwrap()
    .expect("snapshot should load");

    assert_eq!(snapshot.gate, GateStatus::Ok);
    assert_eq!(snapshot.measures.coverage, Some(85.3));
    assert_eq!(snapshot.measures.vulnerabilities, 2);
    assert_eq!(snapshot.measures.lines, 1200);
    assert_eq!(snapshot.last_analysis.as_deref(), Some("2024-01-15T10:30:00+0000"));
    assert_eq!(snapshot.files.len(), 2);
}

#[tokio::test]
async fn test_component_filter_applies_to_paths() {
    let server = MockServer::start().await;
    mount_project(&server, "OK").await;
    let uri = server.uri();

    let snapshot = tokio::task::spawn_blocking(move || {
        let client = SonarClient::new(&uri, Duration::from_secs(5)).unwrap();
        fetch_snapshot(&client, &query(Some("src")))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(snapshot.files.len(), 1);
    assert_eq!(snapshot.files[0].path, "src/a.cpp");
}

#[tokio::test]
async fn test_gate_error_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/qualitygates/project_status"))
        .and(query_param("projectKey", "acme_widgets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "projectStatus": { "status": "ERROR" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();

    let gate = tokio::task::spawn_blocking(move || {
        let client = SonarClient::new(&uri, Duration::from_secs(5)).unwrap();
        client.gate_status("acme_widgets")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(gate, GateStatus::Error);
}

#[tokio::test]
async fn test_page_size_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/measures/component_tree"))
        .and(query_param("ps", "50"))
        .and(query_param("qualifiers", "FIL"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "components": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();

    let files = tokio::task::spawn_blocking(move || {
        let client = SonarClient::new(&uri, Duration::from_secs(5)).unwrap();
        client.file_coverage("acme_widgets", 50)
    })
    .await
    .unwrap()
    .unwrap();

    assert!(files.is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let uri = server.uri();

    let err = tokio::task::spawn_blocking(move || {
        let client = SonarClient::new(&uri, Duration::from_secs(5)).unwrap();
        client.gate_status("acme_widgets")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert_eq!(err.code(), "transport_error");
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let uri = server.uri();

    let err = tokio::task::spawn_blocking(move || {
        let client = SonarClient::new(&uri, Duration::from_secs(5)).unwrap();
        client.latest_analysis("acme_widgets")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert_eq!(err.code(), "decode_error");
}
