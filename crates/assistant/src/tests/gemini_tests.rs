use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{ChatMessage, Language};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

struct Captured {
    call: String,
    query: HashMap<String, String>,
    body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    response: Value,
    tx: Arc<Mutex<Option<oneshot::Sender<Captured>>>>,
}

async fn handle_generate(
    State(state): State<MockState>,
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(Captured { call, query, body });
    }
    (state.status, Json(state.response.clone()))
}

async fn spawn_gemini(
    status: StatusCode,
    response: Value,
) -> anyhow::Result<(Url, oneshot::Receiver<Captured>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = MockState {
        status,
        response,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/v1beta/models/:call", post(handle_generate))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}"))?;
    Ok((url, rx))
}

fn backend_for(base_url: Url) -> GeminiBackend {
    GeminiBackend::new(GeminiConfig {
        api_key: "test-key".into(),
        model: DEFAULT_MODEL.into(),
        base_url,
    })
    .expect("backend")
}

#[tokio::test]
async fn posts_history_and_joins_candidate_parts() {
    let (url, captured) = spawn_gemini(
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Bonjour "}, {"text": "Sophie"}]}
            }]
        }),
    )
    .await
    .expect("spawn server");

    let request = CompletionRequest {
        history: vec![
            ChatMessage::new(ChatRole::Model, "Bonjour ! Je suis IWI."),
            ChatMessage::new(ChatRole::User, "Où est la radiologie ?"),
            ChatMessage::new(ChatRole::Model, "Au premier étage."),
        ],
        message: "Merci".into(),
        language: Language::Fr,
    };
    let text = backend_for(url).complete(request).await.expect("complete");
    assert_eq!(text, "Bonjour Sophie");

    let captured = captured.await.expect("captured request");
    assert_eq!(captured.call, "gemini-2.5-flash:generateContent");
    assert_eq!(captured.query.get("key").map(String::as_str), Some("test-key"));

    let contents = captured.body["contents"].as_array().expect("contents");
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0]["role"], "model");
    assert_eq!(contents[1]["role"], "user");
    assert_eq!(contents[3]["role"], "user");
    assert_eq!(contents[3]["parts"][0]["text"], "Merci");

    let instruction = captured.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system instruction");
    assert!(instruction.contains("French (Français)"));
}

#[tokio::test]
async fn missing_candidates_yield_empty_text() {
    let (url, _captured) = spawn_gemini(StatusCode::OK, json!({ "candidates": [] }))
        .await
        .expect("spawn server");
    let text = backend_for(url)
        .complete(CompletionRequest {
            history: Vec::new(),
            message: "hello".into(),
            language: Language::En,
        })
        .await
        .expect("complete");
    assert_eq!(text, "");
}

#[tokio::test]
async fn error_status_is_reported() {
    let (url, _captured) = spawn_gemini(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "message": "quota exceeded" } }),
    )
    .await
    .expect("spawn server");
    let err = backend_for(url)
        .complete(CompletionRequest {
            history: Vec::new(),
            message: "hello".into(),
            language: Language::En,
        })
        .await
        .expect_err("should fail");
    match err {
        CompletionError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("quota exceeded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn assistant_hides_upstream_failure() {
    let (url, _captured) = spawn_gemini(StatusCode::BAD_GATEWAY, json!({}))
        .await
        .expect("spawn server");
    let assistant = crate::Assistant::new(Arc::new(backend_for(url)));
    let reply = assistant.reply(&[], "hello", Language::En).await;
    assert_eq!(reply, crate::prompts::apology(Language::En));
}
