//! Integration tests for the VoguePay HTTP client.
//!
//! A local Axum server on an ephemeral port stands in for the command API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::post;
use axum::Router;
use secrecy::SecretString;

use voguepay_gateway::adapters::{VoguePayClient, VoguePayConfig};
use voguepay_gateway::domain::foundation::TransactionId;
use voguepay_gateway::domain::gateway::{
    decode_reply, response_hash, verify_response, GatewayError, MerchantCredentials,
    NonceReference, OutboundRequest, QueryReply,
};
use voguepay_gateway::ports::PaymentProcessor;

// =============================================================================
// Test Infrastructure
// =============================================================================

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

fn credentials() -> MerchantCredentials {
    MerchantCredentials::new(
        "5501-0001",
        "shop@example.com",
        SecretString::new("command-token".to_string()),
        false,
    )
}

async fn api(
    State(received): State<Received>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let request: serde_json::Value = form
        .get("json")
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default();
    received.lock().unwrap().push(request.clone());

    let reply = serde_json::json!({
        "transaction_id": request["transaction_id"],
        "merchant_id": "5501-0001",
        "merchant_ref": "1001##77",
        "status": "Approved",
        "total_amount": "10.00",
        "salt": "s1",
        "hash": response_hash(&credentials(), "s1"),
    });
    format!("\u{feff}{}", reply)
}

async fn spawn_api() -> (SocketAddr, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/api/", post(api))
        .route("/moved", post(|| async { Redirect::temporary("/api/") }))
        .route("/loop-a", post(|| async { Redirect::temporary("/loop-b") }))
        .route("/loop-b", post(|| async { Redirect::temporary("/loop-a") }))
        .route(
            "/broken",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
        )
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, received)
}

fn client(addr: SocketAddr, path: &str) -> VoguePayClient {
    VoguePayClient::new(VoguePayConfig::new(
        format!("http://{}{}", addr, path),
        Duration::from_secs(5),
    ))
    .unwrap()
}

fn query_request() -> OutboundRequest {
    OutboundRequest::query(
        &credentials(),
        &NonceReference::generate(),
        &TransactionId::new("tx-501").unwrap(),
    )
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn posts_json_field_and_returns_raw_body() {
    let (addr, received) = spawn_api().await;

    let body = client(addr, "/api/").submit(&query_request()).await.unwrap();

    let requests = received.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["task"], "query");
    assert_eq!(requests[0]["merchant"], "5501-0001");
    assert_eq!(requests[0]["transaction_id"], "tx-501");
    assert_eq!(requests[0]["demo"], false);

    // U+FEFF is three bytes in UTF-8.
    let reply: QueryReply = decode_reply(&body).unwrap();
    assert!(verify_response(&credentials(), &reply.salt, &reply.hash).is_ok());
    assert_eq!(reply.transaction.transaction_id.as_str(), "tx-501");
}

#[tokio::test]
async fn follows_a_single_redirect() {
    let (addr, received) = spawn_api().await;

    let result = client(addr, "/moved").submit(&query_request()).await;

    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn gives_up_after_redirect_limit() {
    let (addr, _) = spawn_api().await;

    let result = client(addr, "/loop-a").submit(&query_request()).await;

    assert!(matches!(result, Err(GatewayError::Transport(_))));
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let (addr, _) = spawn_api().await;

    let result = client(addr, "/broken").submit(&query_request()).await;

    assert!(matches!(result, Err(GatewayError::HttpStatus(500))));
}
