//! JSON-formatted output for CLI.

use netaudio_core::device::DeviceInfo;
use netaudio_core::netif::SelectedInterface;
use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[DeviceInfo], _details: bool) -> String {
        let output = json!({
            "devices": devices,
            "count": devices.len()
        });
        Self::to_json(&output)
    }

    fn format_interfaces(
        &self,
        interfaces: &[SelectedInterface],
        selected: Option<&str>,
    ) -> String {
        let output = json!({
            "interfaces": interfaces,
            "selected": selected,
        });
        Self::to_json(&output)
    }
}
