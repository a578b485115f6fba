use anyhow::{Context, Result};
use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower::ServiceBuilder;
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::TravelPlannerConfig;

/// Routes plus CORS, timeout and body-limit layers, with the frontend as fallback when built
pub fn app(config: &TravelPlannerConfig, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = api::router(state);
    if config.has_static_dir() {
        tracing::info!("Serving frontend from {}", config.server.static_dir);
        app = app.fallback_service(ServeDir::new(&config.server.static_dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(cors)
            .layer(HandleErrorLayer::new(handle_layer_error))
            .layer(TimeoutLayer::new(config.server.request_timeout()))
            .layer(DefaultBodyLimit::max(config.server.max_body_bytes)),
    )
}

/// Render middleware failures with the same `{"error", "kind"}` body as handler errors
async fn handle_layer_error(err: BoxError) -> Response {
    let (status, message, kind) = if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        (StatusCode::REQUEST_TIMEOUT, "Request timed out", "timeout")
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "internal_error",
        )
    };

    (status, Json(json!({ "error": message, "kind": kind }))).into_response()
}

pub async fn run(config: &TravelPlannerConfig, state: AppState) -> Result<()> {
    let app = app(config, state);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server running on port {}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
