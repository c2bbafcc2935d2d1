//! Integration tests for the import endpoints.
//!
//! The router is driven in-process with `oneshot`; Loki is simulated with wiremock.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use logdrop_client::LokiClient;
use logdrop_server::Config;
use logdrop_server::api::{AppState, create_router};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "logdrop-test-boundary";

/// (field name, filename, content)
type Part<'a> = (&'a str, Option<&'a str>, &'a str);

fn app(loki: &MockServer) -> Router {
    app_with_limit(loki, None)
}

fn app_with_limit(loki: &MockServer, max_upload_bytes: Option<usize>) -> Router {
    let mut config = Config::new(loki.uri());
    config.max_upload_bytes = max_upload_bytes;
    config.static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");

    let state = AppState::new(Arc::new(LokiClient::new(loki.uri())));
    create_router(state, &config)
}

async fn mount_push(loki: &MockServer, status: u16, body: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/loki/api/v1/push"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(expected_calls)
        .mount(loki)
        .await;
}

fn multipart_body(parts: &[Part<'_>]) -> String {
    let mut body = String::new();
    for (field, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                field, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                field
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn form_request(log_text: &str) -> Request<Body> {
    let body = format!("logText={}", urlencode(log_text));
    Request::builder()
        .method("POST")
        .uri("/api/import-text")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

// =============================================================================
// Text import
// =============================================================================

#[tokio::test]
async fn import_text_form_encoded() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 1).await;

    let (status, body) = send(
        app(&loki),
        form_request("service_name:  web \n  line one\n\n line two \n"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully imported 2 log lines as service 'web'");

    let requests = loki.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["streams"][0]["stream"]["service_name"], "web");
    assert_eq!(payload["streams"][0]["values"][0][1], "line one");
    assert_eq!(payload["streams"][0]["values"][1][1], "line two");
}

#[tokio::test]
async fn import_text_multipart() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 1).await;

    let request = multipart_request(
        "/api/import-text",
        &[("logText", None, "service_name: api\r\nGET /orders 200\r\n")],
    );
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully imported 1 log lines as service 'api'");
}

#[tokio::test]
async fn import_text_missing_service_name() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let (status, body) = send(app(&loki), form_request("line one\nline two")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "Missing service_name. First line must be 'service_name: your-service-name'"
    );
}

#[tokio::test]
async fn import_text_only_declaration() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let (status, body) = send(app(&loki), form_request("service_name: api\n\n  \n")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No valid log lines found");
}

#[tokio::test]
async fn import_text_empty() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let (status, body) = send(app(&loki), form_request("")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No log text provided");
}

#[tokio::test]
async fn import_text_backend_rejection() {
    let loki = MockServer::start().await;
    mount_push(&loki, 500, "disk full", 1).await;

    let (status, body) = send(app(&loki), form_request("service_name: api\nline")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Failed to send logs to Loki: "), "body: {}", body);
    assert!(body.contains("500"), "body: {}", body);
    assert!(body.contains("disk full"), "body: {}", body);
}

#[tokio::test]
async fn import_text_non_form_body_is_empty() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/import-text")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("service_name: api\nline"))
        .unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No log text provided");
}

#[tokio::test]
async fn import_text_from_query_string() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 1).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!(
            "/api/import-text?logText={}",
            urlencode("service_name: cron\nnightly run done")
        ))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully imported 1 log lines as service 'cron'");
}

#[tokio::test]
async fn import_text_body_takes_precedence_over_query() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 1).await;

    let mut request = form_request("service_name: body\nline");
    *request.uri_mut() = format!(
        "/api/import-text?logText={}",
        urlencode("service_name: query\nline")
    )
    .parse()
    .unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully imported 1 log lines as service 'body'");
}

#[tokio::test]
async fn import_text_requires_post() {
    let loki = MockServer::start().await;

    let request = Request::builder()
        .uri("/api/import-text")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// File upload
// =============================================================================

#[tokio::test]
async fn upload_files_partial_failure() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 2).await;

    let request = multipart_request(
        "/api/upload-files",
        &[
            ("files", Some("first.log"), "service_name: svc-a\nline 1\nline 2\n"),
            ("files", Some("second.log"), "no header here\nline\n"),
            ("files", Some("third.log"), "service_name: svc-c\nline 1\n"),
        ],
    );
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Processed 3 file(s), imported 3 total lines\n\nSUCCESS:\n"));
    assert_eq!(body.matches("✓ ").count(), 2);
    assert!(body.contains("✓ first.log: 2 lines imported (service: svc-a)"));
    assert!(body.contains("✓ third.log: 1 lines imported (service: svc-c)"));

    let errors = body.split("\n\nERRORS:\n").nth(1).unwrap();
    assert_eq!(errors.lines().count(), 1);
    assert!(errors.contains("second.log"));
}

#[tokio::test]
async fn upload_files_all_failed() {
    let loki = MockServer::start().await;
    mount_push(&loki, 500, "disk full", 1).await;

    let request = multipart_request(
        "/api/upload-files",
        &[
            ("files", Some("a.log"), "service_name: svc\nline\n"),
            ("files", Some("b.log"), "service_name: svc\n\n"),
        ],
    );
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "Failed to import a.log: Loki returned status 500: disk full\n\
         ERROR: b.log contains no valid log lines"
    );
}

#[tokio::test]
async fn upload_zero_files() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let request = multipart_request(
        "/api/upload-files",
        &[("files", None, "not a file"), ("other", Some("x.log"), "service_name: a\nb")],
    );
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No files provided");
}

#[tokio::test]
async fn upload_large_files_without_limit() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 2).await;

    // Past axum's built-in 2 MiB default
    let line = "2024-06-24 09:00:00 INFO a reasonably long line of log output\n";
    let big = format!("service_name: big\n{}", line.repeat(3 * 1024 * 1024 / line.len()));

    let request = multipart_request(
        "/api/upload-files",
        &[
            ("files", Some("small.log"), "service_name: small\nline\n"),
            ("files", Some("big.log"), big.as_str()),
        ],
    );
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert!(body.contains("✓ small.log: 1 lines imported (service: small)"));
    assert!(body.contains("✓ big.log: "));
}

#[tokio::test]
async fn upload_past_configured_limit() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let big = format!("service_name: big\n{}", "x".repeat(4096));
    let request = multipart_request(
        "/api/upload-files",
        &[
            ("files", Some("small.log"), "service_name: small\nline\n"),
            ("files", Some("big.log"), big.as_str()),
        ],
    );
    let (status, body) = send(app_with_limit(&loki, Some(1024)), request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, "Request body exceeds 1024 bytes");
}

#[tokio::test]
async fn import_text_past_configured_limit() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let text = format!("service_name: big\n{}", "x".repeat(4096));
    let (status, body) = send(app_with_limit(&loki, Some(1024)), form_request(&text)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, "Request body exceeds 1024 bytes");
}

#[tokio::test]
async fn upload_requires_multipart() {
    let loki = MockServer::start().await;
    mount_push(&loki, 204, "", 0).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload-files")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("service_name: a\nline"))
        .unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Failed to parse form: "), "body: {}", body);
}

// =============================================================================
// Health and UI
// =============================================================================

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let loki = MockServer::start().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn root_serves_index_page() {
    let loki = MockServer::start().await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("service_name: your-service-name"));
}

#[tokio::test]
async fn static_assets_are_served() {
    let loki = MockServer::start().await;

    let request = Request::builder()
        .uri("/static/script.js")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&loki), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api/upload-files"));
}
