//! HTTP API server for the voice agent
//!
//! The conversation is built once before the server starts and shared with
//! every handler through [`ApiState`]. Requests are serialized by the mutex
//! around it, since the speech backends are not assumed to be reentrant.

pub mod health;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::conversation::VoiceConversation;

/// Shared state for API handlers
pub struct ApiState {
    pub conversation: Mutex<VoiceConversation>,
}

impl ApiState {
    /// Wrap a conversation for sharing across handlers
    #[must_use]
    pub fn new(conversation: VoiceConversation) -> Arc<Self> {
        Arc::new(Self {
            conversation: Mutex::new(conversation),
        })
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server around an existing conversation
    #[must_use]
    pub fn new(conversation: VoiceConversation, port: u16) -> Self {
        Self {
            state: ApiState::new(conversation),
            port,
        }
    }

    /// Full application router
    #[must_use]
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// Build the application router for `state`
pub fn router(state: Arc<ApiState>) -> Router {
    // CORS layer for cross-origin requests from browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .merge(voice::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
