//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use netaudio_core::config::{ScanConfig, DEFAULT_SERVICE_TYPE};

/// NetAudio CLI - discover and monitor networked audio devices
#[derive(Parser, Debug)]
#[command(name = "netaudio-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Network interface to bind discovery to (autodetected when omitted)
    #[arg(short, long, global = true, env = "NETAUDIO_INTERFACE")]
    pub interface: Option<String>,

    /// Service type to browse for
    #[arg(long, global = true, default_value = DEFAULT_SERVICE_TYPE, env = "NETAUDIO_SERVICE_TYPE")]
    pub service_type: String,

    /// Query timeout in seconds
    #[arg(long, global = true, default_value = "5", env = "NETAUDIO_SCAN_TIMEOUT")]
    pub timeout: u64,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Snapshot of the global options, usable after the subcommand is moved
    /// out.
    pub fn globals(&self) -> GlobalOpts {
        GlobalOpts {
            json: self.json,
            interface: self.interface.clone(),
            service_type: self.service_type.clone(),
            timeout: self.timeout,
        }
    }
}

/// Global options shared by all commands.
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub json: bool,
    pub interface: Option<String>,
    pub service_type: String,
    pub timeout: u64,
}

impl GlobalOpts {
    /// Scan configuration from the global flags; callers override the cycle
    /// period where it matters.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            interface: self.interface.clone(),
            service_type: self.service_type.clone(),
            timeout_seconds: self.timeout,
            ..ScanConfig::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one discovery scan and list the devices found
    Discover(DiscoverArgs),

    /// Continuously scan and render the device registry
    Watch(WatchArgs),

    /// List candidate network interfaces for discovery
    Interfaces,
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Include the combined protocol info column
    #[arg(long)]
    pub details: bool,
}

// ==================== Watch ====================

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between scan cycles
    #[arg(short, long, default_value = "30", env = "NETAUDIO_SCAN_CYCLE")]
    pub cycle: u64,
}
