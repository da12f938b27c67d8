//! OpenRouter client tests against a local stub gateway.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use scrivener_config::GeneratorConfig;
use scrivener_core::GenerateRequest;
use scrivener_error::{GenerationErrorKind, ScrivenerError, ScrivenerErrorKind};
use scrivener_interface::TextGenerator;
use scrivener_models::{OpenRouterClient, RetrySettings};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted gateway: answers the n-th call with the n-th response, repeating the last.
#[derive(Clone)]
struct Gateway {
    calls: Arc<AtomicUsize>,
    script: Arc<Vec<(StatusCode, Value)>>,
    last_body: Arc<std::sync::Mutex<Option<Value>>>,
}

async fn completions(
    State(gateway): State<Gateway>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let call = gateway.calls.fetch_add(1, Ordering::SeqCst);
    *gateway.last_body.lock().unwrap() = Some(body);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer test-key");
    if !authorized || headers.get("x-title").is_none() || headers.get("http-referer").is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad headers"})));
    }

    let index = call.min(gateway.script.len() - 1);
    let (status, body) = gateway.script[index].clone();
    (status, Json(body))
}

async fn spawn_gateway(script: Vec<(StatusCode, Value)>) -> anyhow::Result<(String, Gateway)> {
    let gateway = Gateway {
        calls: Arc::new(AtomicUsize::new(0)),
        script: Arc::new(script),
        last_body: Arc::new(std::sync::Mutex::new(None)),
    };
    let app = Router::new()
        .route("/chat/completions", post(completions))
        .with_state(gateway.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}", addr), gateway))
}

fn success(text: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({
            "choices": [{"message": {"content": text}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
        }),
    )
}

fn client(base_url: &str) -> anyhow::Result<OpenRouterClient> {
    let config = GeneratorConfig::default()
        .with_base_url(base_url.to_string())
        .with_retry_backoff_ms(1);
    Ok(OpenRouterClient::with_api_key("test-key", &config)?.with_retry(RetrySettings::new(3, 1)))
}

fn request() -> GenerateRequest {
    GenerateRequest::builder()
        .prompt("Describe the harbor at dawn.")
        .system_message(Some("You are a novelist.".to_string()))
        .max_tokens(500u32)
        .temperature(0.4f32)
        .build()
        .unwrap()
}

fn generation_kind(err: &ScrivenerError) -> GenerationErrorKind {
    match err.kind() {
        ScrivenerErrorKind::Generation(e) => e.kind.clone(),
        other => panic!("expected generation error, got {other}"),
    }
}

#[tokio::test]
async fn test_generate_returns_trimmed_content() -> anyhow::Result<()> {
    let (url, gateway) = spawn_gateway(vec![success("  Gulls wheeled over the nets.  ")]).await?;
    let client = client(&url)?;

    let text = client.generate(&request()).await?;

    assert_eq!(text, "Gulls wheeled over the nets.");
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

    let body = gateway.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "google/gemini-pro");
    assert_eq!(body["messages"][0]["content"], "You are a novelist.");
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["stream"], false);
    Ok(())
}

#[tokio::test]
async fn test_transient_failure_is_retried() -> anyhow::Result<()> {
    let (url, gateway) = spawn_gateway(vec![
        (StatusCode::SERVICE_UNAVAILABLE, json!({"error": "overloaded"})),
        success("Second time lucky."),
    ])
    .await?;

    let text = client(&url)?.generate(&request()).await?;

    assert_eq!(text, "Second time lucky.");
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() -> anyhow::Result<()> {
    let (url, gateway) =
        spawn_gateway(vec![(StatusCode::BAD_REQUEST, json!({"error": "bad model"}))]).await?;

    let err = client(&url)?.generate(&request()).await.unwrap_err();

    assert!(matches!(
        generation_kind(&err),
        GenerationErrorKind::Api { status: 400, .. }
    ));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_retries_are_bounded() -> anyhow::Result<()> {
    let (url, gateway) = spawn_gateway(vec![(
        StatusCode::BAD_GATEWAY,
        json!({"error": "upstream"}),
    )])
    .await?;

    let err = client(&url)?.generate(&request()).await.unwrap_err();

    assert!(matches!(
        generation_kind(&err),
        GenerationErrorKind::Api { status: 502, .. }
    ));
    // One initial attempt plus three retries
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 4);
    Ok(())
}

#[tokio::test]
async fn test_disabled_retry_makes_one_attempt() -> anyhow::Result<()> {
    let (url, gateway) = spawn_gateway(vec![(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": "overloaded"}),
    )])
    .await?;

    let client = client(&url)?.with_retry(RetrySettings::disabled());
    assert!(client.generate(&request()).await.is_err());
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_blank_content_is_empty_response() -> anyhow::Result<()> {
    let (url, _gateway) = spawn_gateway(vec![success("   ")]).await?;

    let err = client(&url)?.generate(&request()).await.unwrap_err();

    assert_eq!(generation_kind(&err), GenerationErrorKind::EmptyResponse);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_gateway_is_http_error() -> anyhow::Result<()> {
    let client = client("http://127.0.0.1:1")?.with_retry(RetrySettings::disabled());

    let err = client.generate(&request()).await.unwrap_err();

    assert!(matches!(generation_kind(&err), GenerationErrorKind::Http(_)));
    Ok(())
}

#[test]
fn test_missing_api_key_names_variables() {
    let config = GeneratorConfig::default()
        .with_api_key_env(vec!["SCRIVENER_TEST_UNSET_KEY_VARIABLE".to_string()]);

    let err = OpenRouterClient::from_config(&config).unwrap_err();

    match generation_kind(&err) {
        GenerationErrorKind::MissingApiKey(names) => {
            assert!(names.contains("SCRIVENER_TEST_UNSET_KEY_VARIABLE"))
        }
        other => panic!("unexpected kind: {other}"),
    }
}
