//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tokio::io::AsyncWriteExt;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::engine::{Engine, PreparedRequest, SharedEngine};
use crate::error::{ResolveError, ResolveResult};

use super::types::*;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub engine: SharedEngine,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let engine: SharedEngine = Arc::new(Engine::new(config.clone())?);
    let state = Arc::new(AppState {
        config: config.clone(),
        engine,
    });

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(resolve_question))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for SIGINT/SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// The single resolution endpoint: multipart `question` plus optional
/// `file`, answered with the [`AnswerResponse`] envelope. Every failure kind
/// maps to 500 with the message inside the envelope.
async fn resolve_question(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Json<AnswerResponse>) {
    match handle(&state, multipart).await {
        Ok(answer) => (StatusCode::OK, Json(AnswerResponse { answer })),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnswerResponse {
                    answer: format!("Error: {}", err),
                }),
            )
        }
    }
}

async fn handle(state: &AppState, mut multipart: Multipart) -> ResolveResult<String> {
    let mut request = state.engine.begin()?;
    read_fields(&mut request, &mut multipart).await?;
    state.engine.resolve(request).await
}

/// Pull the `question` text and stream the `file` field into scratch space.
/// Unknown fields are ignored. On error the request is dropped and its scope
/// cleans itself up.
async fn read_fields(
    request: &mut PreparedRequest,
    multipart: &mut Multipart,
) -> ResolveResult<()> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| ResolveError::Request(format!("malformed multipart body: {}", err)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("question") => {
                let text = field.text().await.map_err(|err| {
                    ResolveError::Request(format!("unreadable question field: {}", err))
                })?;
                request.set_question(text);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload.bin".to_string());

                // Stream to scratch instead of buffering the body in memory.
                let path = request.scratch_path(&file_name);
                let mut out = tokio::fs::File::create(&path).await.map_err(|err| {
                    ResolveError::Execution(format!("cannot create scratch file: {}", err))
                })?;
                while let Some(chunk) = field.chunk().await.map_err(|err| {
                    ResolveError::Request(format!("failed reading upload: {}", err))
                })? {
                    out.write_all(&chunk).await.map_err(|err| {
                        ResolveError::Execution(format!("cannot write scratch file: {}", err))
                    })?;
                }
                out.flush().await.map_err(|err| {
                    ResolveError::Execution(format!("cannot write scratch file: {}", err))
                })?;

                request.attach_upload(path, file_name);
            }
            _ => {}
        }
    }
    Ok(())
}
