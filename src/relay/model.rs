//! Alert notification and status update types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Substring (case-insensitive) that marks an output-bitrate alert
pub const OKBPS_MARKER: &str = "okbps";

/// Service label value of the streaming server
pub const SRS_SERVICE: &str = "srs";

/// Alert raised when the streaming server stops reporting data
pub const SRS_NO_DATA_ALERT: &str = "SRSNoDataAlert";

/// Lifecycle status of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertStatus {
    Firing,
    Resolved,
    /// Anything else, including a missing, null or non-string status
    #[default]
    Unknown,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for AlertStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("firing") => AlertStatus::Firing,
            Some("resolved") => AlertStatus::Resolved,
            _ => AlertStatus::Unknown,
        })
    }
}

/// A batch of alert state changes delivered by the alerting system
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertNotification {
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
}

/// One alert inside a notification.
///
/// Label and annotation values are kept as raw JSON; only string values
/// are ever read, so a null or numeric entry never rejects the batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertRecord {
    #[serde(default, deserialize_with = "lenient_map")]
    pub labels: HashMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub annotations: HashMap<String, serde_json::Value>,
}

/// A JSON object as a map; `null` or any other shape becomes empty
fn lenient_map<'de, D>(deserializer: D) -> Result<HashMap<String, serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    })
}

impl AlertRecord {
    /// String value of a label, `None` when absent or not a string
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn alert_name(&self) -> &str {
        self.label("alertname").unwrap_or("Unknown")
    }

    pub fn rule_name(&self) -> &str {
        self.label("rulename").unwrap_or("")
    }

    pub fn service(&self) -> &str {
        self.label("service").unwrap_or("")
    }

    /// Whether a firing alert should mark its table's camera as down
    pub fn is_watched(&self) -> bool {
        contains_okbps(self.alert_name())
            || contains_okbps(self.rule_name())
            || self.service() == SRS_SERVICE
    }

    /// Whether a resolved alert could bring its table's camera back up
    pub fn is_restore_candidate(&self) -> bool {
        let name = self.alert_name();
        contains_okbps(name) || name == SRS_NO_DATA_ALERT
    }

    /// Table ID from the `table_id` annotation, or `fallback` when absent
    pub fn table_id<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.annotation("table_id").unwrap_or(fallback)
    }
}

fn contains_okbps(value: &str) -> bool {
    value.to_lowercase().contains(OKBPS_MARKER)
}

/// Camera state reported to the status API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZCamStatus {
    Up,
    Down,
}

impl std::fmt::Display for ZCamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZCamStatus::Up => write!(f, "up"),
            ZCamStatus::Down => write!(f, "down"),
        }
    }
}

/// Body of the outbound PATCH
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub table_id: String,
    pub z_cam: ZCamStatus,
}

impl StatusUpdateRequest {
    pub fn new(table_id: impl Into<String>, z_cam: ZCamStatus) -> Self {
        Self {
            table_id: table_id.into(),
            z_cam,
        }
    }
}
