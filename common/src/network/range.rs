use std::net::Ipv4Addr;

use pnet::ipnetwork::{IpNetworkError, Ipv4Network};

/// Prefix length used when deriving the local subnet.
pub const LOCAL_PREFIX: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// Walks the range in ascending numeric order, both ends inclusive.
    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            0
        } else {
            (end - start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Network and broadcast address of the block containing `ip`.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> Result<Ipv4Range, IpNetworkError> {
    let network = Ipv4Network::new(ip, prefix)?;
    Ok(Ipv4Range::new(network.network(), network.broadcast()))
}

/// Usable host addresses of the block containing `ip`.
///
/// Network and broadcast addresses are stripped. Blocks too small to have
/// both (`/31`, `/32`) are returned whole.
pub fn host_range(ip: Ipv4Addr, prefix: u8) -> Result<Ipv4Range, IpNetworkError> {
    let full = cidr_range(ip, prefix)?;
    let net_u32: u32 = full.start_addr.into();
    let broadcast_u32: u32 = full.end_addr.into();

    let start_u32 = net_u32.saturating_add(1);
    let end_u32 = broadcast_u32.saturating_sub(1);

    if start_u32 <= end_u32 {
        Ok(Ipv4Range::new(
            Ipv4Addr::from(start_u32),
            Ipv4Addr::from(end_u32),
        ))
    } else {
        Ok(full)
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
