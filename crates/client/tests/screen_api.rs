//! Integration tests for `ScreenApi` against a one-shot local HTTP responder.

use assert_matches::assert_matches;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use signage_client::api::ScreenApi;
use signage_client::config::ClientConfig;
use signage_core::intake::payload::IntakePayload;
use signage_onboarding::persistence::{IntakePersistence, PersistenceError};

/// The request as received by the responder.
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Accept one connection, capture the request and answer with `status` and
/// a JSON `body`. Returns the base URL to configure the client with.
async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        let chunked = head.contains("transfer-encoding: chunked");

        loop {
            let complete = match content_length {
                Some(len) => buf.len() >= header_end + len,
                None if chunked => buf.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                break;
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        Captured {
            head,
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        }
    });

    (format!("http://{addr}/api"), handle)
}

fn api(base_url: String, token: Option<&str>) -> ScreenApi {
    let config = ClientConfig {
        api_url: base_url,
        api_token: token.map(str::to_string),
        request_timeout_secs: 5,
    };
    ScreenApi::new(&config).unwrap()
}

fn draft_payload() -> IntakePayload {
    let mut payload = IntakePayload::default();
    payload
        .fields
        .insert("screen_name".to_string(), json!("Nexus Mall Foyer"));
    payload
        .fields
        .insert("supported_formats".to_string(), json!(["MP4", "JPG"]));
    payload.fields.insert("status".to_string(), json!("DRAFT"));
    payload.cleared.push("road_type".to_string());
    payload
}

// ---------------------------------------------------------------------------
// Test: create posts a multipart form and returns the new id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_posts_multipart_form() {
    let (url, server) = respond_once("201 Created", r#"{"id": 42, "status": "DRAFT"}"#).await;
    let api = api(url, Some("t0ken"));

    let id = api.create(&draft_payload()).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(id, 42);
    assert!(captured.request_line().starts_with("post /api/screens/ "));
    assert!(captured.head.contains("authorization: bearer t0ken"));
    assert!(captured.head.contains("content-type: multipart/form-data"));
    assert!(captured.body.contains("name=\"screen_name\""));
    assert!(captured.body.contains("Nexus Mall Foyer"));
    assert!(captured.body.contains(r#"["MP4","JPG"]"#));
    assert!(captured.body.contains("name=\"road_type\""));
}

// ---------------------------------------------------------------------------
// Test: a missing record maps to NotFound
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_record_is_not_found() {
    let (url, server) = respond_once("404 Not Found", r#"{"detail": "Not found."}"#).await;
    let api = api(url, None);

    let err = api.get_by_id(5).await.unwrap_err();
    let captured = server.await.unwrap();

    assert_eq!(err, PersistenceError::NotFound(5));
    assert!(captured.request_line().starts_with("get /api/screens/5/ "));
    assert!(!captured.head.contains("authorization:"));
}

// ---------------------------------------------------------------------------
// Test: field errors from a rejected update are kept
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_update_keeps_field_errors() {
    let (url, server) = respond_once(
        "400 Bad Request",
        r#"{"screen_name": ["screen with this screen name already exists."]}"#,
    )
    .await;
    let api = api(url, None);

    let err = api.partial_update(8, &draft_payload()).await.unwrap_err();
    let captured = server.await.unwrap();

    assert!(captured.request_line().starts_with("patch /api/screens/8/ "));
    assert_matches!(err, PersistenceError::Rejected { field_errors, .. } => {
        assert!(field_errors.contains_key("screen_name"));
    });
}

// ---------------------------------------------------------------------------
// Test: full updates use PUT
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_update_uses_put() {
    let (url, server) = respond_once("200 OK", r#"{"id": 8, "status": "SUBMITTED"}"#).await;
    let api = api(url, None);

    let record = api.full_update(8, &draft_payload()).await.unwrap();
    let captured = server.await.unwrap();

    assert!(captured.request_line().starts_with("put /api/screens/8/ "));
    assert_eq!(record["status"], json!("SUBMITTED"));
}

// ---------------------------------------------------------------------------
// Test: name check sends the name and the excluded id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn name_check_sends_query() {
    let (url, server) = respond_once("200 OK", r#"{"exists": true}"#).await;
    let api = api(url, None);

    let exists = api.name_exists("Forum Mall", Some(9)).await.unwrap();
    let captured = server.await.unwrap();

    assert!(exists);
    assert!(captured
        .request_line()
        .starts_with("get /api/screens/check-name/?name=forum+mall&exclude_id=9 "));
}

// ---------------------------------------------------------------------------
// Test: an unreachable backend is a transport error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = api(format!("http://{addr}/api"), None);

    let err = api.get_by_id(1).await.unwrap_err();

    assert_matches!(err, PersistenceError::Transport(_));
}
