//! Grafana alert to status API relay
//!
//! Receives alert notifications, picks out the alerts that signal a dead
//! camera stream, and reports the affected table's camera as down.

pub mod client;
pub mod config;
pub mod handler;
pub mod model;

pub use client::{DownstreamError, StatusClient};
pub use config::{DownstreamConfig, RelayConfig, RelayOptions};
pub use handler::{AlertRelay, RelayError, RelayOutcome};
pub use model::{AlertNotification, AlertRecord, AlertStatus, StatusUpdateRequest, ZCamStatus};
