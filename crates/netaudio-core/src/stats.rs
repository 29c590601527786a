//! Scan run statistics.
//!
//! Written only by the scan engine, snapshot-read by reporting. Guarded by
//! its own lock, separate from the registry's.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

/// Snapshot of the scan loop's state.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    /// Number of scan cycles started since the engine was created
    pub runs: u64,
    /// When the most recent cycle started
    pub last_scan_started: Option<DateTime<Utc>>,
    /// Whether a cycle is currently in flight
    pub scanning: bool,
    /// Devices in the registry as of the end of the last cycle
    pub devices_in_registry: usize,
}

/// Shared, lock-guarded statistics handle.
#[derive(Debug, Default)]
pub struct SharedScanStats {
    inner: RwLock<ScanStats>,
}

impl SharedScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current statistics.
    pub fn snapshot(&self) -> ScanStats {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record the start of a cycle; returns the new run number.
    pub(crate) fn begin_cycle(&self, started: DateTime<Utc>) -> u64 {
        let mut stats = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        stats.runs += 1;
        stats.last_scan_started = Some(started);
        stats.scanning = true;
        stats.runs
    }

    /// Record the end of a cycle and the resulting registry size.
    pub(crate) fn end_cycle(&self, devices_in_registry: usize) {
        let mut stats = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        stats.scanning = false;
        stats.devices_in_registry = devices_in_registry;
    }
}
