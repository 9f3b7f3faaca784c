//! ZCam Relay: Grafana alert to table status relay
//!
//! Receives Grafana alert webhooks and, when an alert signals that a table's
//! camera stream stopped sending data (`okbps` alerts or anything from the
//! `srs` service), marks that table's Z CAM as `down` on the status API.
//!
//! # Endpoints
//!
//! - `POST /webhook/:source`: alert notification intake
//! - `POST /test`: send a status update by hand
//! - `GET /health`: liveness
//!
//! # Example
//!
//! ```no_run
//! use zcam_relay::relay::{AlertRelay, RelayConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let relay = AlertRelay::new(&RelayConfig::default())?;
//!
//! let body = br#"{"status": "firing", "alerts": [{"labels": {"service": "srs"}}]}"#;
//! let notification = AlertRelay::parse_notification(body)?;
//! let outcome = relay.handle(&notification).await;
//! println!("delivered {} of {}", outcome.delivered, outcome.matched);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod relay;

#[cfg(test)]
mod testing;

pub use relay::{AlertNotification, AlertRelay, RelayConfig, RelayError, RelayOutcome};
