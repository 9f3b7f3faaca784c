use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::relay::{AlertRelay, RelayError, ZCamStatus};

/// Application state shared across handlers
pub struct AppState {
    pub relay: AlertRelay,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ============================================================================
// Alert Webhook
// ============================================================================

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

pub async fn alert_webhook(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    tracing::debug!(
        source = %source,
        payload = %String::from_utf8_lossy(&body),
        "Received alert webhook"
    );

    let notification = AlertRelay::parse_notification(&body).map_err(|e| {
        tracing::error!(source = %source, error = %e, "Rejected alert webhook");
        ApiError::from(e)
    })?;

    state.relay.handle(&notification).await;

    Ok(Json(StatusResponse {
        status: "success",
        message: "Alert processed".to_string(),
    }))
}

// ============================================================================
// Manual Trigger
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub table_id: Option<String>,
    pub status: Option<ZCamStatus>,
}

pub async fn manual_trigger(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let request: TestRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid test request: {}", e)))?;

    let status = request.status.unwrap_or(ZCamStatus::Down);
    let table_id = request
        .table_id
        .unwrap_or_else(|| state.relay.options().default_table_id.clone());

    if state.relay.manual_trigger(Some(&table_id), status).await {
        Ok((
            StatusCode::OK,
            Json(StatusResponse {
                status: "success",
                message: format!("Status update sent for {}", table_id),
            }),
        ))
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse {
                status: "error",
                message: "Failed to send status update".to_string(),
            }),
        ))
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidPayload(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
