//! Device model for discovered networked audio devices.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents one discovered audio device.
///
/// `name` is the registry identity key. On rediscovery every field is
/// refreshed except `first_seen`, which the scan engine carries forward from
/// the previously stored record before storing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Short device name, derived from the host name (identity key)
    pub name: String,
    /// Full advertised service instance name
    pub full_name: String,
    /// Advertised host name
    pub host_name: String,
    /// IPv4 address, if the advertisement carried one
    pub ipv4: Option<Ipv4Addr>,
    /// Service port
    pub port: u16,
    /// Device identifier string
    pub id: String,
    /// Advertised process name
    pub process: String,
    /// CMCP protocol version
    pub cmcp_version: String,
    /// Minimum supported CMCP protocol version
    pub cmcp_min: String,
    /// Device server software version
    pub server_version: String,
    /// Channel configuration info
    pub channels: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Model name
    pub model: String,
    /// When this device was first discovered
    pub first_seen: DateTime<Utc>,
    /// When this device was last seen advertising
    pub last_seen: DateTime<Utc>,
}

impl DeviceInfo {
    /// Create a record with the given name and empty attributes, stamped now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            full_name: String::new(),
            host_name: String::new(),
            ipv4: None,
            port: 0,
            id: String::new(),
            process: String::new(),
            cmcp_version: String::new(),
            cmcp_min: String::new(),
            server_version: String::new(),
            channels: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            first_seen: now,
            last_seen: now,
        }
    }

    /// Combined protocol details for display purposes.
    pub fn info_summary(&self) -> String {
        format!(
            "Id: {}, Process: {}, CMCP Version: {}, CMCP Min: {}, Server Version: {}, Channels: {}",
            self.id, self.process, self.cmcp_version, self.cmcp_min, self.server_version, self.channels
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_serialization() {
        let mut device = DeviceInfo::new("spk1");
        device.host_name = "spk1.local".to_string();
        device.ipv4 = Some(Ipv4Addr::new(192, 168, 1, 20));
        device.port = 4440;
        device.manufacturer = "Acme".to_string();

        let json = serde_json::to_string(&device).unwrap();
        assert!(json.contains("\"name\":\"spk1\""));
        assert!(json.contains("\"hostName\":\"spk1.local\""));
        assert!(json.contains("\"ipv4\":\"192.168.1.20\""));
        assert!(json.contains("\"firstSeen\":"));

        let deserialized: DeviceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(device.name, deserialized.name);
        assert_eq!(device.ipv4, deserialized.ipv4);
        assert_eq!(device.first_seen, deserialized.first_seen);
    }

    #[test]
    fn test_info_summary() {
        let mut device = DeviceInfo::new("spk1");
        device.id = "42".to_string();
        device.process = "audio".to_string();
        device.cmcp_version = "3.1".to_string();

        let summary = device.info_summary();
        assert!(summary.contains("Id: 42"));
        assert!(summary.contains("Process: audio"));
        assert!(summary.contains("CMCP Version: 3.1"));
    }
}
