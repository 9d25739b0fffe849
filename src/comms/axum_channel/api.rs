//! Axum handlers.
//!
//! Every `/chat` outcome, including rejected bodies, is answered with the
//! `{ "response": ... }` envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::relay::{ChatRequest, Envelope, RelayError};

use super::AxumState;

const JSON_UTF8: &str = "application/json; charset=utf-8";

fn envelope(status: StatusCode, body: Envelope) -> Response {
    (status, [(header::CONTENT_TYPE, JSON_UTF8)], Json(body)).into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        envelope(self.status(), self.envelope())
    }
}

/// GET /
pub(super) async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// POST /chat
pub(super) async fn chat(
    State(state): State<AxumState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!(channel_id = %state.channel_id, "invalid chat body: {}", rejection.body_text());
            return envelope(
                rejection.status(),
                Envelope {
                    response: format!("Requête invalide : {}", rejection.body_text()),
                },
            );
        }
    };

    match state.relay.chat(&req).await {
        Ok(body) => {
            info!(
                channel_id = %state.channel_id,
                niveau = %req.niveau,
                matiere = %req.matiere,
                reply_len = body.response.len(),
                "chat answered"
            );
            envelope(StatusCode::OK, body)
        }
        Err(e) => e.into_response(),
    }
}

/// Fallback for unknown routes.
pub(super) async fn not_found() -> Response {
    envelope(
        StatusCode::NOT_FOUND,
        Envelope {
            response: "Route inconnue.".to_string(),
        },
    )
}
