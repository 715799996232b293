//! Integration tests for `GroqClient` against an in-process axum server that
//! emulates the OpenAI-compatible chat completions endpoint.
//!
//! The fake endpoint picks its behaviour from the `model` field of the
//! request, so one server covers every scenario.

use std::sync::Arc;
use std::time::Duration;

use archcouncil_core::{Credential, Stage};
use archcouncil_llm::{AgentCall, AgentSettings, GenerationRequest, GroqClient, TextGenerator};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const GOOD_KEY: &str = "gsk_test_key";

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != format!("Bearer {GOOD_KEY}") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}})),
        )
            .into_response();
    }

    match body["model"].as_str().unwrap_or_default() {
        "echo" => {
            let system = body["messages"][0]["content"].as_str().unwrap_or_default();
            let user = body["messages"][1]["content"].as_str().unwrap_or_default();
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": format!("{system}: {user}")}}]
            }))
            .into_response()
        }
        "no-choices" => Json(json!({"choices": []})).into_response(),
        "blank" => Json(json!({"choices": [{"message": {"content": ""}}]})).into_response(),
        "garbage" => (StatusCode::OK, "definitely not json").into_response(),
        "rate-limited" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"message": "Rate limit reached"}})),
        )
            .into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({"choices": [{"message": {"content": "too late"}}]})).into_response()
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn spawn_fake_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/openai/v1/chat/completions", post(chat_completions));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/openai/v1")
}

fn request<'a>(model: &'a str, prompt: &'a str) -> GenerationRequest<'a> {
    GenerationRequest {
        role: "cloud_architect",
        prompt,
        model,
        temperature: 0.0,
    }
}

fn good_key() -> Credential {
    Credential::parse(Some(GOOD_KEY)).unwrap()
}

#[tokio::test]
async fn returns_generated_text() {
    let base = spawn_fake_endpoint().await;
    let client = GroqClient::new(&base, Duration::from_secs(5)).unwrap();
    let out = client
        .generate(&request("echo", "design a queue"), &good_key())
        .await
        .unwrap();
    assert_eq!(out, "cloud_architect: design a queue");
}

#[tokio::test]
async fn rejected_key_is_authentication_error() {
    let base = spawn_fake_endpoint().await;
    let client = GroqClient::new(&base, Duration::from_secs(5)).unwrap();
    let wrong = Credential::parse(Some("gsk_wrong")).unwrap();
    let err = client.generate(&request("echo", "p"), &wrong).await.unwrap_err();
    assert_eq!(err.kind(), "AuthenticationError");
    assert!(err.to_string().contains("Invalid API Key"));
}

#[tokio::test]
async fn non_success_status_is_request_error() {
    let base = spawn_fake_endpoint().await;
    let client = GroqClient::new(&base, Duration::from_secs(5)).unwrap();
    for model in ["rate-limited", "explode"] {
        let err = client
            .generate(&request(model, "p"), &good_key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "RequestError", "model {model}");
    }
    let err = client
        .generate(&request("rate-limited", "p"), &good_key())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Rate limit reached"));
}

#[tokio::test]
async fn empty_or_malformed_body_is_response_error() {
    let base = spawn_fake_endpoint().await;
    let client = GroqClient::new(&base, Duration::from_secs(5)).unwrap();
    for model in ["no-choices", "blank", "garbage"] {
        let err = client
            .generate(&request(model, "p"), &good_key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ResponseError", "model {model}");
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = GroqClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let err = client
        .generate(&request("echo", "p"), &good_key())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "RequestError");
}

#[tokio::test]
async fn slow_endpoint_fails_within_timeout_bound() {
    let base = spawn_fake_endpoint().await;
    let timeout = Duration::from_millis(300);
    let client = Arc::new(GroqClient::new(&base, timeout).unwrap());
    let agent = AgentCall::new(
        client,
        AgentSettings {
            model: "slow".into(),
            temperature: 0.0,
            timeout,
        },
    );
    let started = std::time::Instant::now();
    let err = agent
        .call(Stage::Cloud, "prompt", Some(GOOD_KEY))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "RequestError");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn agent_call_with_blank_key_makes_no_request() {
    // Port 9 is discard; a request would fail with RequestError, not auth.
    let client = Arc::new(GroqClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap());
    let agent = AgentCall::new(
        client,
        AgentSettings {
            model: "echo".into(),
            temperature: 0.0,
            timeout: Duration::from_secs(1),
        },
    );
    let err = agent.call(Stage::Oss, "prompt", Some("")).await.unwrap_err();
    assert_eq!(err.kind(), "AuthenticationError");
}
