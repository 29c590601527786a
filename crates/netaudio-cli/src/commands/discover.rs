//! Discover command implementation.

use std::sync::Arc;

use netaudio_core::discovery::ScanEngine;
use netaudio_core::registry::DeviceRegistry;
use netaudio_core::stats::SharedScanStats;

use crate::cli::{DiscoverArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the discover command: one scan cycle, then print the registry.
pub async fn run_discover(args: DiscoverArgs, globals: &GlobalOpts) -> Result<(), CliError> {
    let formatter = get_formatter(globals.json);

    let registry = Arc::new(DeviceRegistry::new());
    let stats = Arc::new(SharedScanStats::new());
    let engine = ScanEngine::new(
        globals.scan_config(),
        Arc::clone(&registry),
        Arc::clone(&stats),
    )?;

    if !globals.json {
        println!(
            "Scanning for {} second(s) on {}...",
            globals.timeout,
            engine.interface().name
        );
    }

    engine.scan_once().await;

    let mut devices = registry.get_all();
    devices.sort_by(|a, b| a.name.cmp(&b.name));

    println!("{}", formatter.format_devices(&devices, args.details));

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}
