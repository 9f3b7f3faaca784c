//! Client for the downstream status API

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;

use super::config::DownstreamConfig;
use super::model::{StatusUpdateRequest, ZCamStatus};

/// Header carrying the shared secret
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Status codes the status API answers with when an update is accepted
pub const SUCCESS_CODES: [StatusCode; 3] =
    [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// Sends table status updates to the status API
#[derive(Debug, Clone)]
pub struct StatusClient {
    http_client: reqwest::Client,
    endpoint: String,
    signature: String,
}

impl StatusClient {
    pub fn new(config: &DownstreamConfig) -> Result<Self, DownstreamError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DownstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            signature: config.signature.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one status update. Failures are logged and reported as `false`.
    pub async fn send_status_update(&self, table_id: &str, status: ZCamStatus) -> bool {
        let request = StatusUpdateRequest::new(table_id, status);

        match self.try_send(&request).await {
            Ok(()) => {
                tracing::info!(table_id = %table_id, z_cam = %status, "Status update sent");
                true
            }
            Err(e) => {
                tracing::error!(
                    table_id = %table_id,
                    z_cam = %status,
                    error = %e,
                    "Status update failed"
                );
                false
            }
        }
    }

    /// Issue the PATCH once, without retrying
    pub async fn try_send(&self, request: &StatusUpdateRequest) -> Result<(), DownstreamError> {
        tracing::info!(endpoint = %self.endpoint, "Sending status update");
        tracing::debug!(payload = ?request, "Status update payload");

        let response = self
            .http_client
            .patch(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(SIGNATURE_HEADER, &self.signature)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DownstreamError::Timeout
                } else {
                    DownstreamError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::info!(status = %status, body = %body, "Status API response");

        if SUCCESS_CODES.contains(&status) {
            Ok(())
        } else {
            Err(DownstreamError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Ways an outbound status update can fail
#[derive(Debug, thiserror::Error)]
pub enum DownstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Status API returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{closed_endpoint, hanging_endpoint, spawn_downstream};
    use std::time::Duration;

    fn client_for(endpoint: String) -> StatusClient {
        client_with_timeout(endpoint, Duration::from_secs(2))
    }

    fn client_with_timeout(endpoint: String, timeout: Duration) -> StatusClient {
        StatusClient::new(&DownstreamConfig {
            endpoint,
            signature: "test-signature".to_string(),
            timeout,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_patch_with_headers_and_body() {
        let downstream = spawn_downstream(200).await;
        let client = client_for(downstream.endpoint());

        assert!(client.send_status_update("ARO-003", ZCamStatus::Down).await);

        let requests = downstream.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.body, serde_json::json!({"tableId": "ARO-003", "zCam": "down"}));
        assert_eq!(request.signature.as_deref(), Some("test-signature"));
        assert_eq!(request.accept.as_deref(), Some("application/json"));
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_success_codes() {
        for code in [200, 201, 204] {
            let downstream = spawn_downstream(code).await;
            let client = client_for(downstream.endpoint());
            assert!(
                client.send_status_update("ARO-001", ZCamStatus::Up).await,
                "status {} should count as success",
                code
            );
        }
    }

    #[tokio::test]
    async fn test_other_codes_fail() {
        for code in [202, 400, 401, 404, 500] {
            let downstream = spawn_downstream(code).await;
            let client = client_for(downstream.endpoint());
            assert!(
                !client.send_status_update("ARO-001", ZCamStatus::Down).await,
                "status {} should count as failure",
                code
            );
            // one attempt, no retry
            assert_eq!(downstream.requests().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_rejected_error_carries_status() {
        let downstream = spawn_downstream(403).await;
        let client = client_for(downstream.endpoint());

        let err = client
            .try_send(&StatusUpdateRequest::new("ARO-001", ZCamStatus::Down))
            .await
            .unwrap_err();
        assert!(matches!(err, DownstreamError::Rejected { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        let client = client_for(closed_endpoint().await);
        assert!(!client.send_status_update("ARO-001", ZCamStatus::Down).await);
    }

    #[tokio::test]
    async fn test_timeout_fails() {
        let client = client_with_timeout(hanging_endpoint().await, Duration::from_millis(300));

        assert!(!client.send_status_update("ARO-001", ZCamStatus::Down).await);

        let err = client
            .try_send(&StatusUpdateRequest::new("ARO-001", ZCamStatus::Down))
            .await
            .unwrap_err();
        assert!(matches!(err, DownstreamError::Timeout), "got {:?}", err);
    }
}
