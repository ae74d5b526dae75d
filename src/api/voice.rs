//! Voice chat endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::agent::ConversationTurn;

/// Largest accepted audio upload (matches the Whisper API limit)
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route(
            "/voice-chat",
            post(voice_chat).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .route("/session/summary", get(summary))
        .route("/session/history", get(history))
        .with_state(state)
}

/// Optional query parameters for `/voice-chat`
#[derive(Debug, Default, Deserialize)]
pub struct VoiceChatParams {
    /// Sample rate hint for raw audio
    pub sample_rate: Option<u32>,
}

/// Voice chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceChatResponse {
    pub transcript: String,
    pub response_text: String,
    pub audio_base64: String,
    pub sample_rate: u32,
    pub history: Vec<ConversationTurn>,
}

/// Transcribe the uploaded audio, answer it, and return the spoken reply
///
/// The request body is the raw audio file.
async fn voice_chat(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<VoiceChatParams>,
    body: Bytes,
) -> Result<Json<VoiceChatResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty audio data".to_string()));
    }

    let payload = {
        let mut conversation = state.conversation.lock().await;
        conversation
            .handle_audio_bytes(&body, params.sample_rate)
            .await?
    };

    Ok(Json(VoiceChatResponse {
        audio_base64: base64::engine::general_purpose::STANDARD.encode(&payload.audio),
        transcript: payload.transcript,
        response_text: payload.response_text,
        sample_rate: payload.sample_rate,
        history: payload.history,
    }))
}

/// Session summary response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub turns: usize,
}

/// Numbered list of the answers given in this session
async fn summary(State(state): State<Arc<ApiState>>) -> Json<SummaryResponse> {
    let conversation = state.conversation.lock().await;
    Json(SummaryResponse {
        summary: conversation.summarize_session(),
        turns: conversation.responses().len(),
    })
}

/// Full agent history
async fn history(State(state): State<Arc<ApiState>>) -> Json<Vec<ConversationTurn>> {
    let conversation = state.conversation.lock().await;
    Json(conversation.agent().export_history())
}

/// Voice API errors
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else if err.is_unavailable() {
            Self::Unavailable(err.to_string())
        } else {
            tracing::error!(error = %err, "voice chat failed");
            Self::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        (status, Json(ErrorResponse { error: ErrorBody { code, message } })).into_response()
    }
}
