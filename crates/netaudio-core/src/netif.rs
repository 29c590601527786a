//! Network interface selection for discovery queries.
//!
//! Discovery binds to exactly one interface, chosen once at engine
//! construction: a configured name if it resolves, otherwise the interface
//! carrying the system's default outbound route.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::InterfaceError;

/// The interface discovery queries are bound to. Immutable once selected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedInterface {
    /// OS interface name
    pub name: String,
    /// First IPv4 address on the interface, if any
    pub ipv4: Option<Ipv4Addr>,
}

/// Resolve the interface to bind discovery queries to.
///
/// A configured name that does not resolve is logged and falls back to
/// default-route detection; only when both paths fail does selection error.
/// No retries here; callers may add backoff at construction time.
pub fn select_interface(configured: Option<&str>) -> Result<SelectedInterface, InterfaceError> {
    let interfaces = usable_interfaces(datalink::interfaces());

    if let Some(name) = configured {
        match lookup_by_name(&interfaces, name) {
            Ok(selected) => {
                debug!(interface = %selected.name, "using configured interface");
                return Ok(selected);
            }
            Err(InterfaceError::NotFound(_)) => {
                warn!(
                    interface = name,
                    "configured interface not found, falling back to default route detection"
                );
            }
            Err(e) => return Err(e),
        }
    }

    let source = route_probe_source_ip().ok_or(InterfaceError::NoUsableInterface)?;
    let selected =
        interface_for_source_ip(&interfaces, source).ok_or(InterfaceError::NoUsableInterface)?;
    debug!(interface = %selected.name, source = %source, "selected default route interface");
    Ok(selected)
}

/// Candidate interfaces for discovery, for diagnostics and display.
pub fn list_candidates() -> Vec<SelectedInterface> {
    usable_interfaces(datalink::interfaces())
        .iter()
        .map(to_selected)
        .collect()
}

/// Up, non-loopback interfaces with at least one address.
fn usable_interfaces(all: Vec<NetworkInterface>) -> Vec<NetworkInterface> {
    all.into_iter()
        .filter(|i| i.is_up() && !i.is_loopback() && !i.ips.is_empty())
        .collect()
}

fn lookup_by_name(
    interfaces: &[NetworkInterface],
    name: &str,
) -> Result<SelectedInterface, InterfaceError> {
    interfaces
        .iter()
        .find(|i| i.name == name)
        .map(to_selected)
        .ok_or_else(|| InterfaceError::NotFound(name.to_string()))
}

/// Find the interface that owns the given source address.
fn interface_for_source_ip(
    interfaces: &[NetworkInterface],
    source: IpAddr,
) -> Option<SelectedInterface> {
    interfaces
        .iter()
        .find(|i| i.ips.iter().any(|net| net.ip() == source))
        .map(to_selected)
}

/// Ask the OS routing table which source address reaches the public internet.
/// UDP connect only selects a route; no packets are sent.
fn route_probe_source_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(("8.8.8.8", 53)).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

fn to_selected(interface: &NetworkInterface) -> SelectedInterface {
    SelectedInterface {
        name: interface.name.clone(),
        ipv4: first_ipv4(interface),
    }
}

fn first_ipv4(interface: &NetworkInterface) -> Option<Ipv4Addr> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) => Some(v4.ip()),
        IpNetwork::V6(_) => None,
    })
}
