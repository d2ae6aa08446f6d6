//! Single-port TCP connect probe with best-effort banner capture.

use std::io::{self, ErrorKind};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use lensguard_common::config::ScanConfig;
use lensguard_common::network::port::{MAX_BANNER_LEN, PortOutcome};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::scanner::Prober;

/// Probes ports with a full TCP handshake.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    connect_timeout: Duration,
    banner_timeout: Duration,
}

impl TcpProber {
    pub fn new(connect_timeout: Duration, banner_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            banner_timeout,
        }
    }
}

impl From<&ScanConfig> for TcpProber {
    fn from(cfg: &ScanConfig) -> Self {
        Self::new(cfg.connect_timeout, cfg.banner_timeout)
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: Ipv4Addr, port: u16) -> PortOutcome {
        probe_port(addr, port, self.connect_timeout, self.banner_timeout).await
    }
}

/// Connects to `addr:port` once.
///
/// Refusal and timeout are `closed`; any other connect error is a probe
/// error carrying its reason. The banner read never changes the status.
pub async fn probe_port(
    addr: Ipv4Addr,
    port: u16,
    connect_timeout: Duration,
    banner_timeout: Duration,
) -> PortOutcome {
    let socket_addr: SocketAddr = SocketAddr::new(IpAddr::V4(addr), port);

    let failure = match timeout(connect_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(stream)) => {
            let banner = grab_banner(stream, banner_timeout).await;
            trace!("{socket_addr} open");
            return PortOutcome::open(port, banner);
        }
        Ok(Err(e)) => ConnectFailure::Io(e),
        Err(_elapsed) => ConnectFailure::Elapsed,
    };

    let outcome = failed_connect(port, failure);
    if let Some(reason) = &outcome.error {
        debug!("Probe of {socket_addr} failed: {reason}");
    }
    outcome
}

/// Why a connect attempt produced no stream.
#[derive(Debug)]
enum ConnectFailure {
    Elapsed,
    Io(io::Error),
}

fn failed_connect(port: u16, failure: ConnectFailure) -> PortOutcome {
    match failure {
        ConnectFailure::Elapsed => PortOutcome::closed(port),
        ConnectFailure::Io(e) if is_closed(e.kind()) => PortOutcome::closed(port),
        ConnectFailure::Io(e) => PortOutcome::probe_error(port, e.to_string()),
    }
}

fn is_closed(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::ConnectionRefused | ErrorKind::TimedOut)
}

/// Reads whatever the service volunteers right after the handshake.
async fn grab_banner(mut stream: TcpStream, banner_timeout: Duration) -> Option<String> {
    let mut buffer = vec![0u8; MAX_BANNER_LEN];

    match timeout(banner_timeout, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => {
            let text = String::from_utf8_lossy(&buffer[..n]).trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
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
