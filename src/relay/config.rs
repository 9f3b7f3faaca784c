//! Relay configuration

use std::time::Duration;

pub const DEFAULT_STATUS_ENDPOINT: &str = "http://localhost:8085/v1/service/status";
pub const DEFAULT_SIGNATURE: &str = "rgs-local-signature";
pub const DEFAULT_TABLE_ID: &str = "ARO-001";

/// Everything the relay needs, built once at start-up
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub downstream: DownstreamConfig,
    pub options: RelayOptions,
}

/// Where and how status updates are sent
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    /// URL receiving the PATCH
    pub endpoint: String,
    /// Value of the `x-signature` header
    pub signature: String,
    /// Upper bound for a single outbound call
    pub timeout: Duration,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STATUS_ENDPOINT.to_string(),
            signature: DEFAULT_SIGNATURE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Behavioural knobs of the relay
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Table used when an alert carries no `table_id` annotation
    pub default_table_id: String,
    /// Send `up` for resolved okbps alerts. Off unless explicitly enabled.
    pub restore_on_resolve: bool,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            default_table_id: DEFAULT_TABLE_ID.to_string(),
            restore_on_resolve: false,
        }
    }
}

impl RelayConfig {
    /// Create a relay config from environment variables
    /// RELAY_STATUS_ENDPOINT=http://localhost:8085/v1/service/status
    /// RELAY_SIGNATURE=rgs-local-signature
    /// RELAY_TIMEOUT_SECS=10
    /// RELAY_DEFAULT_TABLE_ID=ARO-001
    /// RELAY_RESTORE_ON_RESOLVE=false
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let downstream = DownstreamConfig {
            endpoint: lookup("RELAY_STATUS_ENDPOINT").unwrap_or(defaults.downstream.endpoint),
            signature: lookup("RELAY_SIGNATURE").unwrap_or(defaults.downstream.signature),
            timeout: lookup("RELAY_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.downstream.timeout),
        };

        let options = RelayOptions {
            default_table_id: lookup("RELAY_DEFAULT_TABLE_ID")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.options.default_table_id),
            restore_on_resolve: lookup("RELAY_RESTORE_ON_RESOLVE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.options.restore_on_resolve),
        };

        Self {
            downstream,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.downstream.endpoint, DEFAULT_STATUS_ENDPOINT);
        assert_eq!(config.downstream.signature, DEFAULT_SIGNATURE);
        assert_eq!(config.downstream.timeout, Duration::from_secs(10));
        assert_eq!(config.options.default_table_id, "ARO-001");
        assert!(!config.options.restore_on_resolve);
    }

    #[test]
    fn test_overrides() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("RELAY_STATUS_ENDPOINT", "http://status:9000/v1/service/status"),
            ("RELAY_SIGNATURE", "prod-signature"),
            ("RELAY_TIMEOUT_SECS", "3"),
            ("RELAY_DEFAULT_TABLE_ID", "ASB-001"),
            ("RELAY_RESTORE_ON_RESOLVE", "1"),
        ]));
        assert_eq!(config.downstream.endpoint, "http://status:9000/v1/service/status");
        assert_eq!(config.downstream.signature, "prod-signature");
        assert_eq!(config.downstream.timeout, Duration::from_secs(3));
        assert_eq!(config.options.default_table_id, "ASB-001");
        assert!(config.options.restore_on_resolve);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("RELAY_TIMEOUT_SECS", "soon"),
            ("RELAY_DEFAULT_TABLE_ID", "  "),
            ("RELAY_RESTORE_ON_RESOLVE", "yes please"),
        ]));
        assert_eq!(config.downstream.timeout, Duration::from_secs(10));
        assert_eq!(config.options.default_table_id, "ARO-001");
        assert!(!config.options.restore_on_resolve);
    }
}
