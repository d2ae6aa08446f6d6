//! Turns a target address into the list of hosts to scan.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use lensguard_common::network::interface::{self, ROUTE_PROBE_ADDR};
use lensguard_common::network::range::{self, Ipv4Range, LOCAL_PREFIX};
use lensguard_common::network::target::Target;
use lensguard_common::{info, warn};

/// Stand-in local address when the route lookup fails.
pub const FALLBACK_LOCAL_ADDR: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRangeResolver {
    route_probe: SocketAddr,
    fallback: Ipv4Addr,
}

impl Default for AddressRangeResolver {
    fn default() -> Self {
        Self::new(ROUTE_PROBE_ADDR, FALLBACK_LOCAL_ADDR)
    }
}

impl AddressRangeResolver {
    pub fn new(route_probe: SocketAddr, fallback: Ipv4Addr) -> Self {
        Self {
            route_probe,
            fallback,
        }
    }

    /// Resolves `explicit` into scan addresses. Never fails.
    ///
    /// * a well-formed IPv4 literal yields exactly that address;
    /// * `None` or `auto` yields the usable hosts of the local /24;
    /// * anything else is logged and yields the fallback /24.
    pub fn resolve(&self, explicit: Option<&str>) -> Vec<Ipv4Addr> {
        let Some(raw) = explicit else {
            return self.local_range().to_iter().collect();
        };

        match Target::from_str(raw) {
            Ok(Target::Host { target_addr }) => vec![target_addr],
            Ok(Target::Auto) => self.local_range().to_iter().collect(),
            Err(e) => {
                warn!("{e}, falling back to the default range");
                self.range_around(self.fallback).to_iter().collect()
            }
        }
    }

    /// Address of the interface routing towards the probe endpoint.
    pub fn local_address(&self) -> Ipv4Addr {
        interface::local_ipv4(self.route_probe).unwrap_or_else(|| {
            warn!("Could not determine the local address, using {}", self.fallback);
            self.fallback
        })
    }

    /// Usable hosts of the /24 around [`Self::local_address`].
    pub fn local_range(&self) -> Ipv4Range {
        let range = self.range_around(self.local_address());
        info!(
            "Searching for hosts from {} to {}",
            range.start_addr, range.end_addr
        );
        range
    }

    fn range_around(&self, addr: Ipv4Addr) -> Ipv4Range {
        range::host_range(addr, LOCAL_PREFIX)
            .unwrap_or_else(|_| Ipv4Range::new(self.fallback, self.fallback))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
