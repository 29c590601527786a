//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use netaudio_core::device::DeviceInfo;
use netaudio_core::netif::SelectedInterface;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format a device list; `details` adds the combined protocol info.
    fn format_devices(&self, devices: &[DeviceInfo], details: bool) -> String;

    /// Format the candidate interface list, marking the selected one.
    fn format_interfaces(&self, interfaces: &[SelectedInterface], selected: Option<&str>)
        -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
