//! Advertisement parsing.
//!
//! Maps one raw advertisement into a `DeviceInfo`. This is a standalone
//! function so it can be tested without a running transport.

use chrono::Utc;
use tracing::warn;

use crate::device::DeviceInfo;
use crate::discovery::transport::Advertisement;

/// Convert one advertisement into a device record.
///
/// Attribute parsing is lenient: a malformed token logs a warning and stops
/// attribute parsing for this entry, but the record built from previously
/// parsed attributes is still returned. `first_seen` and `last_seen` are both
/// stamped now; the engine overrides `first_seen` on rediscovery.
pub fn parse_advertisement(advert: Advertisement) -> DeviceInfo {
    let full_name = strip_trailing_dot(&advert.full_name);
    let host_name = strip_trailing_dot(&advert.host_name);
    // Identity key is the host name up to the first dot. Two hosts sharing
    // that prefix collide on the key and the later advertisement wins.
    let name = host_name.split('.').next().unwrap_or_default().to_string();

    let now = Utc::now();
    let mut device = DeviceInfo {
        name,
        full_name,
        host_name,
        ipv4: advert.ipv4,
        port: advert.port,
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
    };

    for token in &advert.txt {
        let parts: Vec<&str> = token.split('=').collect();
        if parts.len() != 2 {
            warn!(
                device = %device.name,
                token = %token,
                "malformed attribute token, skipping remaining attributes"
            );
            break;
        }
        let value = parts[1].to_string();
        match parts[0].to_ascii_lowercase().as_str() {
            "id" => device.id = value,
            "process" => device.process = value,
            "cmcp_vers" => device.cmcp_version = value,
            "cmcp_min" => device.cmcp_min = value,
            "server_vers" => device.server_version = value,
            "channels" => device.channels = value,
            "mf" => device.manufacturer = value,
            "model" => device.model = value,
            _ => {}
        }
    }

    device
}

fn strip_trailing_dot(s: &str) -> String {
    s.strip_suffix('.').unwrap_or(s).to_string()
}
