//! Discovery transport boundary.
//!
//! The engine talks to the network through `DiscoveryTransport` so tests can
//! substitute a fake; `MdnsTransport` is the production implementation.

use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

use mdns_sd::{IfKind, ServiceDaemon, ServiceEvent};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::TransportError;

/// One resolved service instance as received from the network.
#[derive(Debug, Clone)]
pub struct Advertisement {
    /// Full advertised instance name
    pub full_name: String,
    /// Advertised host name
    pub host_name: String,
    /// First IPv4 address the advertisement resolved to
    pub ipv4: Option<Ipv4Addr>,
    /// Service port
    pub port: u16,
    /// Raw TXT attribute tokens, expected as `key=value`
    pub txt: Vec<String>,
}

/// Capability interface for issuing one bounded multicast query.
///
/// `query` blocks for up to `timeout` and delivers each resolved instance
/// through `results` as it arrives, concurrently with continued reception.
/// When the queue is full the send blocks, so a slow consumer back-pressures
/// reception. Implementations must not hold `results` beyond the call:
/// dropping the sender on return is what closes the cycle's queue.
pub trait DiscoveryTransport: Send + Sync {
    fn query(
        &self,
        service_type: &str,
        timeout: Duration,
        results: mpsc::Sender<Advertisement>,
    ) -> Result<(), TransportError>;
}

/// mDNS transport bound to one network interface.
pub struct MdnsTransport {
    interface: String,
}

impl MdnsTransport {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }
}

impl DiscoveryTransport for MdnsTransport {
    fn query(
        &self,
        service_type: &str,
        timeout: Duration,
        results: mpsc::Sender<Advertisement>,
    ) -> Result<(), TransportError> {
        let daemon = ServiceDaemon::new()?;
        daemon.disable_interface(IfKind::All)?;
        daemon.enable_interface(IfKind::Name(self.interface.clone()))?;

        let receiver = daemon.browse(service_type)?;
        debug!(service_type, interface = %self.interface, "browsing for services");

        let deadline = Instant::now() + timeout;
        while let Ok(event) = receiver.recv_deadline(deadline) {
            if let ServiceEvent::ServiceResolved(info) = event {
                debug!(fullname = info.get_fullname(), "resolved service instance");

                let advert = Advertisement {
                    full_name: info.get_fullname().to_string(),
                    host_name: info.get_hostname().to_string(),
                    ipv4: info
                        .get_addresses()
                        .iter()
                        .filter(|addr| addr.is_ipv4())
                        .map(mdns_sd::ScopedIp::to_ip_addr)
                        .find_map(|addr| match addr {
                            IpAddr::V4(v4) => Some(v4),
                            IpAddr::V6(_) => None,
                        }),
                    port: info.get_port(),
                    txt: info
                        .get_properties()
                        .iter()
                        .map(|prop| {
                            let value = prop.val_str();
                            if value.is_empty() {
                                prop.key().to_string()
                            } else {
                                format!("{}={}", prop.key(), value)
                            }
                        })
                        .collect(),
                };

                if results.blocking_send(advert).is_err() {
                    // Consumer dropped the receiver; the cycle is over.
                    break;
                }
            }
        }

        let _ = daemon.stop_browse(service_type);
        let _ = daemon.shutdown();
        Ok(())
    }
}
