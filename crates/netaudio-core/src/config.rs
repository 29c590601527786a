//! Scan configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default service type advertised by networked audio devices.
pub const DEFAULT_SERVICE_TYPE: &str = "_netaudio-arc._tcp.local.";

/// Configuration consumed by the scan engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Interface to bind discovery to; autodetected when unset
    pub interface: Option<String>,
    /// Service type to browse for
    pub service_type: String,
    /// Seconds between scan cycles
    pub cycle_seconds: u64,
    /// Upper bound on one multicast query, in seconds
    pub timeout_seconds: u64,
    /// Whether the scan loop runs at all
    pub enabled: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interface: None,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            cycle_seconds: 60,
            timeout_seconds: 5,
            enabled: true,
        }
    }
}

impl ScanConfig {
    /// Pause between the end of one cycle and the start of the next.
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs(self.cycle_seconds)
    }

    /// Bound on one multicast query.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.service_type, DEFAULT_SERVICE_TYPE);
        assert_eq!(config.cycle_period(), Duration::from_secs(60));
        assert_eq!(config.query_timeout(), Duration::from_secs(5));
        assert!(config.enabled);
        assert!(config.interface.is_none());
    }

    #[test]
    fn test_deserialize_partial_overrides() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"interface": "eth0", "cycleSeconds": 10, "enabled": false}"#)
                .unwrap();
        assert_eq!(config.interface.as_deref(), Some("eth0"));
        assert_eq!(config.cycle_seconds, 10);
        assert!(!config.enabled);
        assert_eq!(config.service_type, DEFAULT_SERVICE_TYPE);
    }
}
