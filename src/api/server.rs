use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{alert_webhook, health_check, manual_trigger, ApiError, AppState};
use crate::relay::{AlertRelay, RelayConfig};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub relay: RelayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            relay: RelayConfig::default(),
        }
    }
}

/// Render a handler panic as a JSON 500
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(error = %detail, "Request handler panicked");
    ApiError::Internal(detail).into_response()
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Alert intake, e.g. /webhook/grafana
        .route("/webhook/:source", post(alert_webhook))
        // Manual status update
        .route("/test", post(manual_trigger));

    with_middleware(routes).with_state(state)
}

fn with_middleware(routes: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let relay = AlertRelay::new(&config.relay)?;
    tracing::info!("Status API endpoint: {}", relay.client().endpoint());

    let state = Arc::new(AppState { relay });

    // Build router
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting alert relay on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Alert relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}
