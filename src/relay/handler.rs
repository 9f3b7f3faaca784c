//! Alert notification handling

use super::client::{DownstreamError, StatusClient};
use super::config::{RelayConfig, RelayOptions};
use super::model::{AlertNotification, AlertRecord, AlertStatus, ZCamStatus};

pub const NO_ALERT_DATA: &str = "No alert data received";

/// Translates alert notifications into status updates
pub struct AlertRelay {
    client: StatusClient,
    options: RelayOptions,
}

/// Summary of one notification pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Alerts in the notification
    pub received: usize,
    /// Alerts that led to a status update attempt
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl RelayOutcome {
    fn record(&mut self, delivered: bool) {
        self.matched += 1;
        if delivered {
            self.delivered += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl AlertRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = StatusClient::new(&config.downstream)?;

        Ok(Self {
            client,
            options: config.options.clone(),
        })
    }

    pub fn options(&self) -> &RelayOptions {
        &self.options
    }

    pub fn client(&self) -> &StatusClient {
        &self.client
    }

    /// Parse a raw request body into a notification.
    ///
    /// An empty body, `null`, `{}` and `[]` all count as missing data.
    pub fn parse_notification(body: &[u8]) -> Result<AlertNotification, RelayError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RelayError::InvalidPayload(NO_ALERT_DATA.to_string()));
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::InvalidPayload(format!("Invalid JSON: {}", e)))?;

        let missing = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if missing {
            return Err(RelayError::InvalidPayload(NO_ALERT_DATA.to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| RelayError::InvalidPayload(format!("Invalid alert payload: {}", e)))
    }

    /// Process every alert of a notification.
    ///
    /// Status updates are attempted one after another; a failed update is
    /// counted in the outcome and never aborts the pass.
    pub async fn handle(&self, notification: &AlertNotification) -> RelayOutcome {
        let mut outcome = RelayOutcome {
            received: notification.alerts.len(),
            ..Default::default()
        };

        tracing::info!(
            status = notification.status.as_str(),
            alerts = notification.alerts.len(),
            "Handling alert notification"
        );

        match notification.status {
            AlertStatus::Firing => {
                for alert in &notification.alerts {
                    if let Some(delivered) = self.handle_firing(alert).await {
                        outcome.record(delivered);
                    }
                }
            }
            AlertStatus::Resolved => {
                for alert in &notification.alerts {
                    if let Some(delivered) = self.handle_resolved(alert).await {
                        outcome.record(delivered);
                    }
                }
            }
            AlertStatus::Unknown => {
                tracing::info!("Ignoring notification with unhandled status");
            }
        }

        tracing::info!(
            received = outcome.received,
            matched = outcome.matched,
            delivered = outcome.delivered,
            failed = outcome.failed,
            "Alert notification processed"
        );

        outcome
    }

    async fn handle_firing(&self, alert: &AlertRecord) -> Option<bool> {
        tracing::info!(alert_name = %alert.alert_name(), "Processing firing alert");

        if !alert.is_watched() {
            return None;
        }

        let table_id = alert.table_id(&self.options.default_table_id);
        tracing::info!(table_id = %table_id, "Watched alert firing, marking camera down");

        Some(self.client.send_status_update(table_id, ZCamStatus::Down).await)
    }

    async fn handle_resolved(&self, alert: &AlertRecord) -> Option<bool> {
        tracing::info!(alert_name = %alert.alert_name(), "Alert resolved");

        if !alert.is_restore_candidate() {
            return None;
        }

        let table_id = alert.table_id(&self.options.default_table_id);
        if !self.options.restore_on_resolve {
            tracing::debug!(table_id = %table_id, "Restore on resolve disabled, not sending up");
            return None;
        }

        tracing::info!(table_id = %table_id, "Watched alert resolved, marking camera up");
        Some(self.client.send_status_update(table_id, ZCamStatus::Up).await)
    }

    /// Send a status update directly, bypassing alert matching
    pub async fn manual_trigger(&self, table_id: Option<&str>, status: ZCamStatus) -> bool {
        let table_id = table_id.unwrap_or(&self.options.default_table_id);
        tracing::info!(table_id = %table_id, z_cam = %status, "Manual status update");
        self.client.send_status_update(table_id, status).await
    }
}

/// Relay errors
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    InvalidPayload(String),

    #[error("Status client error: {0}")]
    Client(#[from] DownstreamError),
}
