//! Tests for the `run` pipeline, using wiremock to mock the Kubernetes API server.

use secret_lookup::{LookupError, RequiredField};
use secret_lookup_api::{ClientError, SecretError};
use serde_json::json;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CA_PEM: &str = include_str!("fixtures/ca.pem");

fn query(host: &str, namespace: &str, name: &str, key: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "namespace": namespace,
        "name": name,
        "key": key,
        "host": host,
        "cluster_ca_certificate": CA_PEM,
        "token": "test-token"
    }))
    .unwrap()
}

async fn mount_secret(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/media/secrets/db-creds"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": { "name": "db-creds", "namespace": "media" },
            "type": "Opaque",
            "data": { "password": "aHVudGVyMg==", "user": "YWRtaW4=" }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn returns_rendered_value() {
    let server = MockServer::start().await;
    mount_secret(&server).await;

    let output = secret_lookup::run(&query(&server.uri(), "media", "db-creds", "password"))
        .await
        .unwrap();
    assert_eq!(output, "{\n  \"value\": \"hunter2\"\n}");
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let server = MockServer::start().await;
    mount_secret(&server).await;

    let input = query(&server.uri(), "media", "db-creds", "user");
    let first = secret_lookup::run(&input).await.unwrap();
    let second = secret_lookup::run(&input).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "{\n  \"value\": \"admin\"\n}");
}

#[tokio::test]
async fn context_has_no_effect() {
    let server = MockServer::start().await;
    mount_secret(&server).await;

    let mut value: serde_json::Value =
        serde_json::from_slice(&query(&server.uri(), "media", "db-creds", "password")).unwrap();
    value["context"] = json!("some-other-cluster");

    let output = secret_lookup::run(&serde_json::to_vec(&value).unwrap())
        .await
        .unwrap();
    assert_eq!(output, "{\n  \"value\": \"hunter2\"\n}");
}

#[tokio::test]
async fn missing_key_is_reported() {
    let server = MockServer::start().await;
    mount_secret(&server).await;

    let err = secret_lookup::run(&query(&server.uri(), "media", "db-creds", "api-key"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, LookupError::Secret(SecretError::KeyNotFound { .. })),
        "expected KeyNotFound, got: {err}"
    );
    let msg = err.diagnostic();
    assert!(msg.contains("\"api-key\""), "got: {msg}");
    assert!(msg.contains("\"db-creds\""), "got: {msg}");
    assert!(msg.contains("\"media\""), "got: {msg}");
}

#[tokio::test]
async fn missing_secret_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/media/secrets/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": "secrets \"nope\" not found",
            "reason": "NotFound",
            "code": 404
        })))
        .mount(&server)
        .await;

    let err = secret_lookup::run(&query(&server.uri(), "media", "nope", "password"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, LookupError::Secret(SecretError::Fetch { .. })),
        "expected Fetch, got: {err}"
    );
    let msg = err.diagnostic();
    assert!(msg.contains("\"nope\" secret in \"media\" namespace"), "got: {msg}");
    assert!(!msg.contains('\n'));
}

#[tokio::test]
async fn invalid_json_is_parse_error() {
    let err = secret_lookup::run(b"{not json").await.unwrap_err();
    assert!(matches!(err, LookupError::Parse(_)), "got: {err}");
    assert!(err.diagnostic().starts_with("cannot parse input JSON"));
}

#[tokio::test]
async fn array_input_is_parse_error_without_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let input = serde_json::to_vec(&json!([
        "media",
        "db-creds",
        "password",
        "",
        server.uri(),
        CA_PEM,
        "test-token"
    ]))
    .unwrap();

    let err = secret_lookup::run(&input).await.unwrap_err();
    assert!(matches!(err, LookupError::Parse(_)), "got: {err}");
    assert!(err.diagnostic().starts_with("cannot parse input JSON"));
}

#[tokio::test]
async fn validation_runs_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut value: serde_json::Value =
        serde_json::from_slice(&query(&server.uri(), "media", "db-creds", "password")).unwrap();
    value["token"] = json!("");

    let err = secret_lookup::run(&serde_json::to_vec(&value).unwrap())
        .await
        .unwrap_err();
    assert!(
        matches!(err, LookupError::MissingField(RequiredField::Token)),
        "got: {err}"
    );
    assert_eq!(err.diagnostic(), "missing or empty token parameter");
}

#[tokio::test]
async fn bad_ca_is_config_error_without_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut value: serde_json::Value =
        serde_json::from_slice(&query(&server.uri(), "media", "db-creds", "password")).unwrap();
    value["cluster_ca_certificate"] = json!("definitely not PEM");

    let err = secret_lookup::run(&serde_json::to_vec(&value).unwrap())
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            LookupError::Config(ClientError::InvalidCertificate | ClientError::InvalidKubeconfig(_))
        ),
        "expected a configuration error, got: {err}"
    );
}

#[tokio::test]
async fn bad_host_is_config_error() {
    let err = secret_lookup::run(&query("not a url", "media", "db-creds", "password"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, LookupError::Config(ClientError::InvalidKubeconfig(_))),
        "got: {err}"
    );
    assert!(err.diagnostic().starts_with("cannot load Kubernetes configuration"));
}
