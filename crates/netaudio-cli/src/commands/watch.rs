//! Watch command implementation.
//!
//! Runs the scan engine in the background and re-renders the registry on a
//! short ticker until Ctrl+C. Stopping only takes effect at the next cycle
//! boundary; an in-flight query finishes or times out on its own.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use netaudio_core::discovery::ScanEngine;
use netaudio_core::registry::DeviceRegistry;
use netaudio_core::stats::{ScanStats, SharedScanStats};
use tokio_util::sync::CancellationToken;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output::get_formatter;

/// How often the watch screen refreshes between scan cycles.
const RENDER_PERIOD: Duration = Duration::from_secs(2);

/// Run the watch command: continuous scanning with a live registry view.
pub async fn run_watch(args: WatchArgs, globals: &GlobalOpts) -> Result<(), CliError> {
    if args.cycle == 0 {
        return Err(CliError::InvalidArgument(
            "cycle must be at least 1 second".to_string(),
        ));
    }

    let registry = Arc::new(DeviceRegistry::new());
    let stats = Arc::new(SharedScanStats::new());

    let mut config = globals.scan_config();
    config.cycle_seconds = args.cycle;
    let engine = ScanEngine::new(config, Arc::clone(&registry), Arc::clone(&stats))?;

    println!("Watching for devices (press Ctrl+C to stop)...\n");

    let shutdown = CancellationToken::new();

    let loop_token = shutdown.clone();
    let scan_loop = tokio::spawn(async move { engine.run(loop_token).await });

    let render_registry = Arc::clone(&registry);
    let render_stats = Arc::clone(&stats);
    let render_token = shutdown.clone();
    let json = globals.json;
    let render_loop = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RENDER_PERIOD);
        loop {
            tokio::select! {
                _ = render_token.cancelled() => break,
                _ = ticker.tick() => render_screen(&render_registry, &render_stats, json),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    shutdown.cancel();
    println!("\nStopping (waiting for any in-flight scan)...");

    let _ = render_loop.await;
    let _ = scan_loop.await;

    Ok(())
}

fn render_screen(registry: &DeviceRegistry, stats: &SharedScanStats, json: bool) {
    let mut devices = registry.get_all();
    devices.sort_by(|a, b| a.name.cmp(&b.name));
    let snapshot = stats.snapshot();

    if json {
        let output = serde_json::json!({
            "devices": devices,
            "count": devices.len(),
            "stats": snapshot,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        // Clear screen and print header
        print!("\x1B[2J\x1B[1;1H");
        println!("{}", "NetAudio Device Watch".bold());
        println!("{}", "Press Ctrl+C to stop".dimmed());
        println!();
        println!("{}", format_stats_line(&snapshot));
        println!();

        let formatter = get_formatter(false);
        println!("{}", formatter.format_devices(&devices, false));
    }

    io::stdout().flush().ok();
}

fn format_stats_line(stats: &ScanStats) -> String {
    let last_scan = stats
        .last_scan_started
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let state = if stats.scanning { "scanning" } else { "idle" };

    format!(
        "Run #{} | Last scan: {} | State: {} | Devices: {}",
        stats.runs, last_scan, state, stats.devices_in_registry
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_line_before_first_scan() {
        let line = format_stats_line(&ScanStats::default());
        assert!(line.contains("Run #0"));
        assert!(line.contains("Last scan: never"));
        assert!(line.contains("State: idle"));
    }

    #[test]
    fn test_stats_line_while_scanning() {
        let stats = ScanStats {
            runs: 3,
            last_scan_started: Some(chrono::Utc::now()),
            scanning: true,
            devices_in_registry: 5,
        };
        let line = format_stats_line(&stats);
        assert!(line.contains("Run #3"));
        assert!(line.contains("State: scanning"));
        assert!(line.contains("Devices: 5"));
    }
}
