//! Axum-based HTTP channel, the public surface of the tutor.
//!
//! `run()` drives the axum event loop; the [`CancellationToken`] is wired to
//! axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! GET  /        → {"status":"ok"}
//! POST /chat    → {"response": ...}
//! *             → 404 {"response": "Route inconnue."}
//! ```

mod api;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;
use crate::relay::Relay;

// ── Shared request state ──────────────────────────────────────────────────────

/// Axum router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone; all fields are reference-counted.
#[derive(Clone)]
pub(crate) struct AxumState {
    /// Channel identifier used in log spans.
    pub channel_id: Arc<str>,
    pub relay: Relay,
}

// ── AxumChannel ───────────────────────────────────────────────────────────────

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    relay: Relay,
}

impl AxumChannel {
    pub fn new(channel_id: impl Into<String>, bind_addr: impl Into<String>, relay: Relay) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            relay,
        }
    }

    pub fn id(&self) -> &str {
        &self.channel_id
    }

    /// Bind and serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| AppError::Comms(format!("axum bind failed on {}: {e}", self.bind_addr)))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener (tests bind port 0 themselves).
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<(), AppError> {
        let channel_id = self.channel_id;
        let local_addr = listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.bind_addr.clone());

        let router = build_router(AxumState {
            channel_id: Arc::from(channel_id.as_str()),
            relay: self.relay,
        });

        info!(%channel_id, bind_addr = %local_addr, "axum channel listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

        info!(%channel_id, "axum channel shut down");
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Router for `relay`, with permissive CORS and request tracing.
pub fn router(relay: Relay) -> Router {
    build_router(AxumState {
        channel_id: Arc::from("http"),
        relay,
    })
}

fn build_router(state: AxumState) -> Router {
    Router::new()
        .route("/",     get(api::health))
        .route("/chat", post(api::chat))
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;
    use crate::llm::providers::dummy::DummyProvider;
    use crate::tutor::Guidance;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        router(Relay::new(
            LlmProvider::Dummy(DummyProvider),
            Arc::new(Guidance::builtin()),
        ))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok_status() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn chat_success_is_utf8_json_envelope() {
        let response = test_app()
            .oneshot(chat_request(r#"{"question":"Qui était Napoléon ?","niveau":"cm2","matiere":"histoire"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let body = body_json(response).await;
        let text = body["response"].as_str().unwrap();
        assert!(text.starts_with("[echo] Niveau de l'enfant : CM2"));
        assert!(text.contains("Matière : histoire"));
    }

    #[tokio::test]
    async fn chat_unknown_level_returns_400_envelope() {
        let response = test_app()
            .oneshot(chat_request(r#"{"question":"?","niveau":"cm3","matiere":"maths"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "response": "Niveau 'CM3' non reconnu." })
        );
    }

    #[tokio::test]
    async fn chat_unknown_subject_returns_400_envelope() {
        let response = test_app()
            .oneshot(chat_request(r#"{"question":"?","niveau":"CP","matiere":"Musique"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "response": "Matière 'musique' non reconnue." })
        );
    }

    #[tokio::test]
    async fn chat_missing_field_is_client_error_envelope() {
        let response = test_app()
            .oneshot(chat_request(r#"{"question":"?","niveau":"CP"}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        let body = body_json(response).await;
        assert!(body["response"].as_str().unwrap().starts_with("Requête invalide"));
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let response = test_app()
            .oneshot(Request::builder().uri("/lecon").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight_is_allowed() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/chat")
                    .header("origin", "https://share.streamlit.io")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
