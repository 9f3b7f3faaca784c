//! ZCam Relay Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - RELAY_HOST: Bind address (default: 0.0.0.0)
//! - RELAY_PORT: Port number (default: 5000)
//! - RELAY_STATUS_ENDPOINT: Status API URL (default: http://localhost:8085/v1/service/status)
//! - RELAY_SIGNATURE: Value of the x-signature header (default: rgs-local-signature)
//! - RELAY_TIMEOUT_SECS: Timeout of one status update (default: 10)
//! - RELAY_DEFAULT_TABLE_ID: Table used when an alert has no table_id (default: ARO-001)
//! - RELAY_RESTORE_ON_RESOLVE: Send "up" for resolved okbps alerts (default: false)
//! - RUST_LOG: Log level (default: info)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zcam_relay::api::{run_server, ServerConfig};
use zcam_relay::relay::RelayConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zcam_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration from environment
    let host = std::env::var("RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("RELAY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let config = ServerConfig {
        host,
        port,
        relay: RelayConfig::from_env(),
    };

    tracing::info!("ZCam relay configuration:");
    tracing::info!("  Listen: {}:{}", config.host, config.port);
    tracing::info!("  Status endpoint: {}", config.relay.downstream.endpoint);
    tracing::info!(
        "  Status timeout: {} seconds",
        config.relay.downstream.timeout.as_secs()
    );
    tracing::info!(
        "  Default table: {}",
        config.relay.options.default_table_id
    );
    if config.relay.options.restore_on_resolve {
        tracing::info!("  Resolved alerts: restore camera to up");
    } else {
        tracing::info!("  Resolved alerts: log only");
    }

    println!(
        r#"
  ______                     ____       _
 |___  /   ___  __ _  _ __   |  _ \ ___ | |  __ _  _   _
    / /   / __|/ _` || '_ \  | |_) / _ \| | / _` || | | |
   / /__ | (__| (_| || | | | |  _ <  __/| || (_| || |_| |
  /_____| \___|\__,_||_| |_| |_| \_\___||_| \__,_| \__, |
                                                   |___/
 Grafana Alert to Table Status Relay
 Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );

    run_server(config).await
}
