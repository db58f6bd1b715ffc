use kitsune_backend::config::AllowedOrigins;
use kitsune_backend::error::AppError;
use kitsune_backend::message::ChatMessage;
use kitsune_backend::routes::create_router;
use kitsune_backend::services::chat_engine::ChatEngine;
use kitsune_backend::state::AppState;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Answers every message with a fixed reply, or fails when `error` is set.
struct StubEngine {
    reply: &'static str,
    error: Option<&'static str>,
}

#[async_trait]
impl ChatEngine for StubEngine {
    async fn chat_function_call(&self, user_msg: &str) -> Result<Vec<ChatMessage>, AppError> {
        if let Some(err) = self.error {
            return Err(AppError::Collaborator(err.to_string()));
        }
        Ok(vec![ChatMessage::user(user_msg), ChatMessage::assistant(self.reply)])
    }
}

fn app_with(engine: StubEngine) -> Router {
    let state = Arc::new(AppState::new(engine));
    create_router(&AllowedOrigins::Any).with_state(state)
}

fn app() -> Router {
    app_with(StubEngine { reply: "hello", error: None })
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_index() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"Welcome": "to the future!"}));
}

#[tokio::test]
async fn test_hello_uppercases_name() {
    for (name, expected) in [("elon", "ELON"), ("Sam", "SAM"), ("jos%C3%A9", "JOSÉ")] {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/hello/{}", name))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"message": format!("Welcome to the course, {}!", expected)})
        );
    }
}

#[tokio::test]
async fn test_chat_endpoint() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "hi", "chat_id": 1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["timestamp"].is_i64());
    assert_eq!(body["chat_id"], "1");
    assert_eq!(body["content"], "hello");
    assert_eq!(body["role"], "assistant");
    assert_eq!(body["source_documents"], json!([]));
    assert_eq!(body["audio_file_url"], Value::Null);
    assert_eq!(body.as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn test_chat_id_is_stringified() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "hi", "chat_id": "abc-123"}"#))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["chat_id"], "abc-123");
}

#[tokio::test]
async fn test_numeric_chat_id_is_echoed_exactly() {
    for (raw, expected) in [
        ("18446744073709551615", "18446744073709551615"),
        ("-9223372036854775808", "-9223372036854775808"),
        ("1.0", "1.0"),
        ("2.5", "2.5"),
    ] {
        let response = app()
            .oneshot(chat_request(&format!(r#"{{"message": "hi", "chat_id": {}}}"#, raw)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["chat_id"], expected, "chat_id {}", raw);
    }
}

#[tokio::test]
async fn test_missing_chat_id_is_500() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("chat_id"));
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_wrongly_typed_message_is_500() {
    let response = app()
        .oneshot(chat_request(r#"{"message": 5, "chat_id": 1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body.get("error").is_some());
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_missing_message_is_500() {
    let response = app()
        .oneshot(chat_request(r#"{"chat_id": 1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("message"));
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_malformed_json_is_500() {
    let response = app().oneshot(chat_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body.get("error").is_some());
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_null_chat_id_is_rejected() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "hi", "chat_id": null}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_collaborator_failure_is_500() {
    let app = app_with(StubEngine { reply: "", error: Some("model unavailable") });
    let response = app
        .oneshot(chat_request(r#"{"message": "hi", "chat_id": 7}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "model unavailable");
    assert_eq!(body["kind"], "collaborator");
}

fn preflight(uri: &str, method: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header("origin", "https://example.com")
        .header("access-control-request-method", method)
        .header("access-control-request-headers", "content-type,x-special-header,authorization")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_preflight() {
    for (uri, method) in [("/", "GET"), ("/chat", "POST")] {
        let response = app().oneshot(preflight(uri, method)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "preflight for {}", uri);

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "https://example.com");
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-max-age"], "600");

        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_lowercase();
        for header in ["content-type", "x-special-header", "authorization"] {
            assert!(allowed.contains(header), "{} missing from {}", header, allowed);
        }
    }
}

#[tokio::test]
async fn test_cors_headers_on_simple_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_hello_has_no_cors_policy() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/hello/sam")
                .header("origin", "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_origin_list_restricts_cors() {
    let state = Arc::new(AppState::new(StubEngine { reply: "hello", error: None }));
    let app = create_router(&AllowedOrigins::List(vec!["http://localhost:3000".into()]))
        .with_state(state);

    let response = app.oneshot(preflight("/chat", "POST")).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
