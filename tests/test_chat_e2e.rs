//! End-to-end `/chat` tests against a mock Ollama runtime.
//!
//! The mock counts calls and keeps the last request body so tests can assert
//! on the composed prompt rather than on free-form model output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use petit_prof::comms::axum_channel;
use petit_prof::config::{LlmConfig, OllamaConfig, OpenAiConfig};
use petit_prof::llm::providers;
use petit_prof::relay::Relay;
use petit_prof::tutor::{Guidance, SYSTEM_DIRECTIVE};

const MODEL_REPLY: &str = "Imagine 2 pommes dans ton panier. Tu en ajoutes 3. Comment peux-tu compter toutes les pommes ?";

#[derive(Default)]
struct MockModel {
    calls: AtomicUsize,
    last_body: Mutex<Option<Value>>,
    delay: Duration,
    fail: bool,
}

async fn mock_chat(State(mock): State<Arc<MockModel>>, Json(body): Json<Value>) -> Response {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    *mock.last_body.lock().unwrap() = Some(body);

    if !mock.delay.is_zero() {
        tokio::time::sleep(mock.delay).await;
    }
    if mock.fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "model 'mistral' crashed" })),
        )
            .into_response();
    }

    Json(json!({
        "model": "mistral",
        "message": { "role": "assistant", "content": MODEL_REPLY },
        "done": true
    }))
    .into_response()
}

async fn spawn_mock_model(mock: Arc<MockModel>) -> String {
    let app = Router::new()
        .route("/api/chat", post(mock_chat))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api/chat")
}

fn llm_config(api_url: &str, timeout_seconds: u64) -> LlmConfig {
    LlmConfig {
        provider: "ollama".into(),
        ollama: OllamaConfig {
            api_url: api_url.into(),
            model: "mistral".into(),
            timeout_seconds,
        },
        openai: OpenAiConfig {
            api_base_url: "http://127.0.0.1:1/v1/chat/completions".into(),
            model: "unused".into(),
            temperature: 0.0,
            timeout_seconds,
        },
    }
}

fn build_test_app(api_url: &str, timeout_seconds: u64) -> Router {
    let provider = providers::build(&llm_config(api_url, timeout_seconds), None).unwrap();
    axum_channel::router(Relay::new(provider, Arc::new(Guidance::builtin())))
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn e2e_apples_question_relays_composed_prompt() {
    let mock = Arc::new(MockModel::default());
    let app = build_test_app(&spawn_mock_model(mock.clone()).await, 5);

    let response = app
        .oneshot(chat_request(json!({
            "question": "Combien font 2 pommes plus 3 pommes ?",
            "niveau": "CP",
            "matiere": "maths"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "response": MODEL_REPLY }));
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);

    let sent = mock.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(sent["model"], "mistral");
    assert_eq!(sent["stream"], false);
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], SYSTEM_DIRECTIVE);
    assert_eq!(messages[1]["role"], "user");
    let user = messages[1]["content"].as_str().unwrap();
    assert!(user.contains("Combien font 2 pommes plus 3 pommes ?"));
    assert!(user.contains("Niveau de l'enfant : CP"));
    assert!(user.contains("Matière : maths"));
    assert!(user.contains("NE PAS donner le résultat final"));
    assert!(user.contains("Terminer avec une question."));
}

#[tokio::test]
async fn e2e_unknown_level_never_calls_model() {
    let mock = Arc::new(MockModel::default());
    let app = build_test_app(&spawn_mock_model(mock.clone()).await, 5);

    let response = app
        .oneshot(chat_request(json!({
            "question": "Combien font 2 pommes plus 3 pommes ?",
            "niveau": "CM3",
            "matiere": "maths"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "response": "Niveau 'CM3' non reconnu." })
    );
    assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn e2e_unknown_subject_never_calls_model() {
    let mock = Arc::new(MockModel::default());
    let app = build_test_app(&spawn_mock_model(mock.clone()).await, 5);

    let response = app
        .oneshot(chat_request(json!({
            "question": "Qui a peint la Joconde ?",
            "niveau": "ce2",
            "matiere": "ARTS"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "response": "Matière 'arts' non reconnue." })
    );
    assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn e2e_model_error_is_bad_gateway() {
    let mock = Arc::new(MockModel {
        fail: true,
        ..Default::default()
    });
    let app = build_test_app(&spawn_mock_model(mock.clone()).await, 5);

    let response = app
        .oneshot(chat_request(json!({
            "question": "Pourquoi il pleut ?",
            "niveau": "CE1",
            "matiere": "culture"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    let text = body["response"].as_str().unwrap();
    assert!(!text.is_empty());
    assert!(!text.contains("crashed"), "provider details must stay in the log");
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn e2e_slow_model_is_gateway_timeout() {
    let mock = Arc::new(MockModel {
        delay: Duration::from_secs(3),
        ..Default::default()
    });
    let app = build_test_app(&spawn_mock_model(mock.clone()).await, 1);

    let response = app
        .oneshot(chat_request(json!({
            "question": "Quand a eu lieu la Révolution ?",
            "niveau": "CM1",
            "matiere": "histoire"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn e2e_unreachable_model_is_bad_gateway() {
    let app = build_test_app("http://127.0.0.1:1/api/chat", 2);

    let response = app
        .oneshot(chat_request(json!({
            "question": "2 + 2 ?",
            "niveau": "CP",
            "matiere": "maths"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn e2e_concurrent_requests_are_independent() {
    let mock = Arc::new(MockModel::default());
    let app = build_test_app(&spawn_mock_model(mock.clone()).await, 5);

    let mut handles = Vec::new();
    for (i, niveau) in ["CP", "CE1", "CE2", "CM1", "CM2"].iter().cycle().take(10).enumerate() {
        let app = app.clone();
        let body = json!({
            "question": format!("Question numéro {i} ?"),
            "niveau": niveau,
            "matiere": "maths"
        });
        handles.push(tokio::spawn(async move { app.oneshot(chat_request(body)).await.unwrap() }));
    }

    for h in handles {
        let response = h.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["response"], MODEL_REPLY);
    }
    assert_eq!(mock.calls.load(Ordering::SeqCst), 10);
}
