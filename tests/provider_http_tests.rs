//! Provider adapters against local stub servers.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use serde_json::{json, Value};

use codeaudit::{AnthropicClient, AuditClient, ChatAuditClient, ChatClient, GeminiClient, Severity};

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

impl Stub {
    fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<(String, Option<String>, Value)> {
        self.seen.lock().unwrap().clone()
    }
}

fn record(stub: &Stub, route: String, key: Option<String>, body: Value) -> Response {
    stub.seen.lock().unwrap().push((route, key, body));
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body.clone(),
    )
        .into_response()
}

async fn gemini_generate(
    State(stub): State<Stub>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    record(&stub, call, key, body)
}

async fn anthropic_messages(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    record(&stub, "messages".to_string(), key, body)
}

async fn serve(stub: Stub) -> String {
    let app = axum::Router::new()
        .route("/v1beta/models/{call}", post(gemini_generate))
        .route("/v1/messages", post(anthropic_messages))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gemini_envelope(text: &str) -> String {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

const REENTRANCY: &str = r#"{"vulnerability":"Reentrancy","severity":"CRITICAL","remediation":"Update balances before the external call","explanation":"The callee can re-enter transfer before balances[to] is credited."}"#;

#[tokio::test]
async fn gemini_success_sends_schema_and_decodes_result() {
    let stub = Stub::new(StatusCode::OK, gemini_envelope(REENTRANCY));
    let base = serve(stub.clone()).await;
    let client = GeminiClient::new(Some("test-key".into()), "gemini-test", base);

    let result = client.request_audit("to.call{value: amount}(\"\")").await.unwrap();
    assert_eq!(result.severity(), Severity::Critical);
    assert_eq!(result.vulnerability(), "Reentrancy");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let (call, key, body) = &requests[0];
    assert_eq!(call, "gemini-test:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(
        body["generationConfig"]["responseSchema"]["properties"]["severity"]["enum"],
        json!(["CRITICAL", "HIGH", "MEDIUM", "LOW"])
    );
    assert!(body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("to.call{value: amount}"));
}

#[tokio::test]
async fn gemini_unauthorized_is_authentication_error() {
    let stub = Stub::new(StatusCode::UNAUTHORIZED, r#"{"error":{"code":401}}"#);
    let base = serve(stub).await;
    let client = GeminiClient::new(Some("bad".into()), "gemini-test", base);

    let err = client.request_audit("x").await.unwrap_err();
    assert!(err.is_authentication());
}

#[tokio::test]
async fn gemini_quota_error_is_transport_error() {
    let stub = Stub::new(StatusCode::TOO_MANY_REQUESTS, r#"{"error":{"code":429}}"#);
    let base = serve(stub).await;
    let client = GeminiClient::new(Some("key".into()), "gemini-test", base);

    let err = client.request_audit("x").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn gemini_non_json_payload_is_decode_error() {
    let stub = Stub::new(StatusCode::OK, gemini_envelope("Sorry, I can't do that."));
    let base = serve(stub).await;
    let client = GeminiClient::new(Some("key".into()), "gemini-test", base);

    let err = client.request_audit("x").await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn gemini_empty_candidates_is_decode_error() {
    let stub = Stub::new(StatusCode::OK, r#"{"candidates":[]}"#);
    let base = serve(stub).await;
    let client = GeminiClient::new(Some("key".into()), "gemini-test", base);

    let err = client.request_audit("x").await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn gemini_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::new(Some("key".into()), "gemini-test", format!("http://{addr}"));
    let err = client.request_audit("x").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn anthropic_chat_audit_decodes_fenced_reply() {
    let reply = format!("```json\n{REENTRANCY}\n```");
    let stub = Stub::new(
        StatusCode::OK,
        json!({ "content": [{ "type": "text", "text": reply }] }).to_string(),
    );
    let base = serve(stub.clone()).await;
    let chat = AnthropicClient::new("sk-test", "claude-test", base);
    let client = ChatAuditClient::new(Arc::new(chat), "anthropic");

    let result = client.request_audit("fn f() {}").await.unwrap();
    assert_eq!(result.severity(), Severity::Critical);

    let requests = stub.requests();
    let (_, key, body) = &requests[0];
    assert_eq!(key.as_deref(), Some("sk-test"));
    assert_eq!(body["model"], "claude-test");
    assert!(body["system"].as_str().unwrap().contains("\"severity\""));
    assert_eq!(body["messages"][0]["role"], "user");
}

#[tokio::test]
async fn anthropic_rejected_key_is_authentication_error() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
        let stub = Stub::new(status, r#"{"type":"error","error":{"type":"authentication_error"}}"#);
        let base = serve(stub.clone()).await;
        let client = AnthropicClient::new("sk-wrong", "claude-test", base);

        let err = client.complete("system", "user").await.unwrap_err();
        assert!(err.is_authentication(), "{status}: {err}");
        assert_eq!(stub.requests().len(), 1);
    }
}

#[tokio::test]
async fn anthropic_overloaded_is_transport_error() {
    let stub = Stub::new(StatusCode::SERVICE_UNAVAILABLE, r#"{"type":"error"}"#);
    let base = serve(stub).await;
    let client = AnthropicClient::new("sk-test", "claude-test", base);

    let err = client.complete("system", "user").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn anthropic_unreachable_server_fails_reachability_check() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AnthropicClient::new("sk-test", "claude-test", format!("http://{addr}"));
    let started = std::time::Instant::now();
    let err = client.complete("system", "user").await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("not reachable"));
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}
