//! Periodic scan engine.
//!
//! Owns the discovery loop: one bounded multicast query per cycle, drained
//! through a fixed-capacity queue while the query is still in flight, with
//! results merged into the shared registry.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::discovery::parser::parse_advertisement;
use crate::discovery::transport::{Advertisement, DiscoveryTransport, MdnsTransport};
use crate::error::{CoreError, TransportError};
use crate::netif::{self, SelectedInterface};
use crate::registry::DeviceRegistry;
use crate::stats::SharedScanStats;

/// Capacity of the per-cycle advertisement queue. A full queue blocks the
/// transport producer until the consumer catches up.
const ADVERT_QUEUE_CAPACITY: usize = 32;

/// Periodic scan engine. One instance owns the whole discovery loop; no
/// other task scans.
pub struct ScanEngine {
    config: ScanConfig,
    interface: SelectedInterface,
    transport: Arc<dyn DiscoveryTransport>,
    registry: Arc<DeviceRegistry>,
    stats: Arc<SharedScanStats>,
}

impl ScanEngine {
    /// Create an engine with the production mDNS transport.
    ///
    /// Selects the network interface once; selection failure is fatal here,
    /// the engine is never constructed without a bound interface.
    pub fn new(
        config: ScanConfig,
        registry: Arc<DeviceRegistry>,
        stats: Arc<SharedScanStats>,
    ) -> Result<Self, CoreError> {
        let interface = netif::select_interface(config.interface.as_deref())?;
        let transport = Arc::new(MdnsTransport::new(interface.name.clone()));
        Ok(Self::with_transport(
            config, interface, transport, registry, stats,
        ))
    }

    /// Create an engine with a caller-supplied transport. Tests substitute a
    /// fake here.
    pub fn with_transport(
        config: ScanConfig,
        interface: SelectedInterface,
        transport: Arc<dyn DiscoveryTransport>,
        registry: Arc<DeviceRegistry>,
        stats: Arc<SharedScanStats>,
    ) -> Self {
        Self {
            config,
            interface,
            transport,
            registry,
            stats,
        }
    }

    /// The interface discovery is bound to.
    pub fn interface(&self) -> &SelectedInterface {
        &self.interface
    }

    /// Run scan cycles until `shutdown` is cancelled.
    ///
    /// Cancellation is only observed between cycles; an in-flight query
    /// finishes or times out on its own, so worst-case stop latency is the
    /// remaining query timeout plus drain time.
    pub async fn run(&self, shutdown: CancellationToken) {
        if !self.config.enabled {
            info!("device scanning is disabled");
            return;
        }

        info!(
            interface = %self.interface.name,
            service_type = %self.config.service_type,
            cycle_seconds = self.config.cycle_seconds,
            "starting device scan loop"
        );

        loop {
            self.scan_once().await;

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.config.cycle_period()) => {}
            }
        }

        info!("device scan loop stopped");
    }

    /// Execute one scan cycle. Returns the number of entries merged into the
    /// registry this cycle.
    pub async fn scan_once(&self) -> usize {
        let run = self.stats.begin_cycle(Utc::now());
        let cycle_start = std::time::Instant::now();

        let (tx, mut rx) = mpsc::channel::<Advertisement>(ADVERT_QUEUE_CAPACITY);
        let transport = Arc::clone(&self.transport);
        let service_type = self.config.service_type.clone();
        let timeout = self.config.query_timeout();
        let query = task::spawn_blocking(move || transport.query(&service_type, timeout, tx));

        // Drain entries while the query is still in flight. The queue closes
        // only once the blocking query returns and drops its sender; the
        // remainder is drained after that.
        let mut found = 0usize;
        while let Some(advert) = rx.recv().await {
            let mut device = parse_advertisement(advert);
            if let Some(existing) = self.registry.get_by_name(&device.name) {
                device.first_seen = existing.first_seen;
            }
            match self.registry.store(device) {
                Ok(()) => found += 1,
                Err(e) => warn!(run, error = %e, "discarding unstorable entry"),
            }
        }

        match query.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(run, error = %e, "discovery query failed"),
            Err(e) => {
                let e = TransportError::Aborted(e.to_string());
                warn!(run, error = %e, "discovery query failed");
            }
        }

        let elapsed = cycle_start.elapsed();
        let total = self.registry.size();
        self.stats.end_cycle(total);
        info!(
            run,
            found,
            total,
            elapsed_ms = elapsed.as_millis() as u64,
            "scan cycle finished"
        );

        found
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::time::timeout as tokio_timeout;

    use super::*;

    /// Transport fake replaying one canned batch per query call.
    struct FakeTransport {
        batches: Mutex<VecDeque<Vec<Advertisement>>>,
        fail: bool,
    }

    impl FakeTransport {
        fn with_batches(batches: Vec<Vec<Advertisement>>) -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(batches.into()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(VecDeque::new()),
                fail: true,
            })
        }
    }

    impl DiscoveryTransport for FakeTransport {
        fn query(
            &self,
            _service_type: &str,
            _timeout: Duration,
            results: mpsc::Sender<Advertisement>,
        ) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Aborted("fake transport down".to_string()));
            }
            let batch = self.batches.lock().unwrap().pop_front().unwrap_or_default();
            for advert in batch {
                if results.blocking_send(advert).is_err() {
                    break;
                }
            }
            Ok(())
        }
    }

    fn advert(host: &str, txt: &[&str]) -> Advertisement {
        Advertisement {
            full_name: format!("{} @ _netaudio-arc._tcp.local.", host),
            host_name: format!("{}.local.", host),
            ipv4: Some(std::net::Ipv4Addr::new(192, 168, 1, 20)),
            port: 4440,
            txt: txt.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn engine_with(transport: Arc<dyn DiscoveryTransport>) -> ScanEngine {
        ScanEngine::with_transport(
            ScanConfig {
                cycle_seconds: 60,
                timeout_seconds: 1,
                ..ScanConfig::default()
            },
            SelectedInterface {
                name: "eth0".to_string(),
                ipv4: Some(std::net::Ipv4Addr::new(192, 168, 1, 10)),
            },
            transport,
            Arc::new(DeviceRegistry::new()),
            Arc::new(SharedScanStats::new()),
        )
    }

    #[tokio::test]
    async fn test_scan_once_stores_parsed_devices() {
        let transport = FakeTransport::with_batches(vec![vec![
            advert("spk1", &["id=42", "mf=Acme"]),
            advert("spk2", &["id=43", "mf=Acme"]),
        ]]);
        let engine = engine_with(transport);

        let found = engine.scan_once().await;

        assert_eq!(found, 2);
        assert_eq!(engine.registry.size(), 2);
        let spk1 = engine.registry.get_by_name("spk1").unwrap();
        assert_eq!(spk1.id, "42");
        assert_eq!(spk1.manufacturer, "Acme");

        let stats = engine.stats.snapshot();
        assert_eq!(stats.runs, 1);
        assert!(!stats.scanning);
        assert_eq!(stats.devices_in_registry, 2);
        assert!(stats.last_scan_started.is_some());
    }

    #[tokio::test]
    async fn test_rediscovery_preserves_first_seen() {
        let transport = FakeTransport::with_batches(vec![
            vec![advert("spk1", &["id=42"])],
            vec![advert("spk1", &["id=42", "model=X"])],
        ]);
        let engine = engine_with(transport);

        engine.scan_once().await;
        let first = engine.registry.get_by_name("spk1").unwrap();

        engine.scan_once().await;
        let second = engine.registry.get_by_name("spk1").unwrap();

        assert_eq!(engine.registry.size(), 1);
        assert_eq!(second.model, "X");
        assert_eq!(second.first_seen, first.first_seen);
        assert!(second.last_seen >= first.last_seen);
        assert_eq!(engine.stats.snapshot().runs, 2);
    }

    #[tokio::test]
    async fn test_failed_query_still_counts_the_run() {
        let engine = engine_with(FakeTransport::failing());
        engine
            .registry
            .store(crate::device::DeviceInfo::new("existing"))
            .unwrap();

        let found = engine.scan_once().await;

        // The cycle yields nothing and the registry is untouched, but the
        // run counter still advances.
        assert_eq!(found, 0);
        assert_eq!(engine.registry.size(), 1);
        let stats = engine.stats.snapshot();
        assert_eq!(stats.runs, 1);
        assert_eq!(stats.devices_in_registry, 1);
        assert!(!stats.scanning);
    }

    #[tokio::test]
    async fn test_entry_with_empty_name_is_not_stored() {
        let transport = FakeTransport::with_batches(vec![vec![Advertisement {
            full_name: String::new(),
            host_name: String::new(),
            ipv4: None,
            port: 0,
            txt: vec![],
        }]]);
        let engine = engine_with(transport);

        let found = engine.scan_once().await;

        assert_eq!(found, 0);
        assert_eq!(engine.registry.size(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_at_cycle_boundary_on_cancellation() {
        let transport = FakeTransport::with_batches(vec![vec![advert("spk1", &["id=42"])]]);
        let engine = Arc::new(engine_with(transport));
        let shutdown = CancellationToken::new();

        let loop_engine = Arc::clone(&engine);
        let loop_token = shutdown.clone();
        let handle = tokio::spawn(async move { loop_engine.run(loop_token).await });

        // Wait for the first cycle to finish; the loop is then inside its
        // long inter-cycle sleep.
        let mut attempts = 0;
        loop {
            let stats = engine.stats.snapshot();
            if stats.runs >= 1 && !stats.scanning {
                break;
            }
            attempts += 1;
            assert!(attempts < 400, "first scan cycle never finished");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        shutdown.cancel();

        tokio_timeout(Duration::from_secs(2), handle)
            .await
            .expect("scan loop did not stop after cancellation")
            .unwrap();

        assert_eq!(engine.stats.snapshot().runs, 1);
        assert_eq!(engine.registry.size(), 1);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_disabled() {
        let transport = FakeTransport::with_batches(vec![vec![advert("spk1", &[])]]);
        let mut engine = engine_with(transport);
        engine.config.enabled = false;

        engine.run(CancellationToken::new()).await;

        assert_eq!(engine.stats.snapshot().runs, 0);
        assert_eq!(engine.registry.size(), 0);
    }
}
