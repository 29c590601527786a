//! Table-formatted output for CLI.

use comfy_table::{Cell, ContentArrangement, Table};
use netaudio_core::device::DeviceInfo;
use netaudio_core::netif::SelectedInterface;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn format_ipv4(device: &DeviceInfo) -> String {
        device
            .ipv4
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DeviceInfo], details: bool) -> String {
        if devices.is_empty() {
            return "No devices found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec!["Name", "IPv4", "Port", "Manufacturer", "Model", "Last Seen"];
        if details {
            header.push("Info");
        }
        table.set_header(header);

        for device in devices {
            let mut row = vec![
                Cell::new(&device.name),
                Cell::new(Self::format_ipv4(device)),
                Cell::new(device.port.to_string()),
                Cell::new(&device.manufacturer),
                Cell::new(&device.model),
                Cell::new(Self::format_timestamp(&device.last_seen)),
            ];
            if details {
                row.push(Cell::new(device.info_summary()));
            }
            table.add_row(row);
        }

        format!("{}\n\nFound {} device(s)", table, devices.len())
    }

    fn format_interfaces(
        &self,
        interfaces: &[SelectedInterface],
        selected: Option<&str>,
    ) -> String {
        if interfaces.is_empty() {
            return "No usable network interfaces.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Interface", "IPv4", "Selected"]);

        for iface in interfaces {
            let mark = if selected == Some(iface.name.as_str()) {
                "*"
            } else {
                ""
            };
            table.add_row(vec![
                Cell::new(&iface.name),
                Cell::new(
                    iface
                        .ipv4
                        .map(|ip| ip.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(mark),
            ]);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_device_list() {
        let output = TableOutput::new().format_devices(&[], false);
        assert_eq!(output, "No devices found.");
    }

    #[test]
    fn test_device_rows_and_count() {
        let mut device = DeviceInfo::new("spk1");
        device.manufacturer = "Acme".to_string();
        device.model = "Monitor8".to_string();
        device.port = 4440;

        let output = TableOutput::new().format_devices(&[device], false);
        assert!(output.contains("spk1"));
        assert!(output.contains("Acme"));
        assert!(output.contains("Monitor8"));
        assert!(output.contains("Found 1 device(s)"));
        assert!(!output.contains("Id:"));
    }

    #[test]
    fn test_details_adds_info_column() {
        let mut device = DeviceInfo::new("spk1");
        device.id = "42".to_string();

        let output = TableOutput::new().format_devices(&[device], true);
        assert!(output.contains("Id: 42"));
    }

    #[test]
    fn test_interfaces_marks_selected() {
        let interfaces = vec![
            SelectedInterface {
                name: "eth0".to_string(),
                ipv4: Some(std::net::Ipv4Addr::new(192, 168, 1, 10)),
            },
            SelectedInterface {
                name: "wlan0".to_string(),
                ipv4: None,
            },
        ];

        let output = TableOutput::new().format_interfaces(&interfaces, Some("eth0"));
        assert!(output.contains("eth0"));
        assert!(output.contains("192.168.1.10"));
        assert!(output.contains("wlan0"));
        assert!(output.contains('*'));
    }
}
