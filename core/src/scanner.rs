//! The central **abstraction** for port probing.
//!
//! A [`Prober`] checks one (address, port) pair. [`scan_host`] fans a port
//! list out over a prober with a bounded number of probes in flight and
//! hands the outcomes back in ascending port order.
//!
//! **Architectural Note:**
//! The orchestration in [`crate::discovery`] depends only on the trait, so
//! tests swap the real TCP prober for scripted ones.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use lensguard_common::network::port::PortOutcome;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

pub mod resolver;

/// Defines the strategy for probing transport-layer ports.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes a single port. Never fails: every failure is folded into the
    /// returned outcome.
    async fn probe(&self, addr: Ipv4Addr, port: u16) -> PortOutcome;
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("probe task for {addr}:{port} died: {reason}")]
    ProbeTask {
        addr: Ipv4Addr,
        port: u16,
        reason: String,
    },
    #[error("scan task for {addr} died: {reason}")]
    HostTask { addr: Ipv4Addr, reason: String },
}

/// Clamps a concurrency setting into what a [`Semaphore`] accepts.
pub(crate) fn permits(concurrency: usize) -> usize {
    concurrency.clamp(1, Semaphore::MAX_PERMITS)
}

/// Probes every distinct non-zero port of `ports` on `addr`.
///
/// At most `max_concurrency` probes run at once. All probes are awaited even
/// when one of their tasks dies; the first such failure is then returned.
pub async fn scan_host(
    prober: Arc<dyn Prober>,
    addr: Ipv4Addr,
    ports: &[u16],
    max_concurrency: usize,
) -> Result<Vec<PortOutcome>, ScanError> {
    let ports: BTreeSet<u16> = ports.iter().copied().filter(|port| *port != 0).collect();
    let semaphore = Arc::new(Semaphore::new(permits(max_concurrency)));

    let handles: Vec<(u16, JoinHandle<PortOutcome>)> = ports
        .into_iter()
        .map(|port| {
            let prober = Arc::clone(&prober);
            let semaphore = Arc::clone(&semaphore);
            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return PortOutcome::probe_error(port, "probe pool closed");
                };
                prober.probe(addr, port).await
            });
            (port, handle)
        })
        .collect();

    let mut outcomes: Vec<PortOutcome> = Vec::with_capacity(handles.len());
    let mut failure: Option<ScanError> = None;

    for (port, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                failure.get_or_insert(ScanError::ProbeTask {
                    addr,
                    port,
                    reason: e.to_string(),
                });
            }
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }

    // Outcomes leave here strictly ascending by port.
    outcomes.sort_by_key(|outcome| outcome.port);
    outcomes.dedup_by_key(|outcome| outcome.port);
    Ok(outcomes)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use lensguard_common::network::port::PortStatus;

    /// Answers from a fixed table: listed ports are open, unlisted closed.
    pub(crate) struct ScriptedProber {
        pub open: HashMap<Ipv4Addr, HashMap<u16, Option<String>>>,
        pub errors: HashSet<(Ipv4Addr, u16)>,
        pub panics_on: HashSet<Ipv4Addr>,
    }

    impl ScriptedProber {
        pub(crate) fn new() -> Self {
            Self {
                open: HashMap::new(),
                errors: HashSet::new(),
                panics_on: HashSet::new(),
            }
        }

        pub(crate) fn with_open(mut self, addr: Ipv4Addr, ports: &[u16]) -> Self {
            let entry = self.open.entry(addr).or_default();
            for port in ports {
                entry.insert(*port, None);
            }
            self
        }

        pub(crate) fn with_banner(mut self, addr: Ipv4Addr, port: u16, banner: &str) -> Self {
            self.open
                .entry(addr)
                .or_default()
                .insert(port, Some(banner.to_string()));
            self
        }

        pub(crate) fn with_error(mut self, addr: Ipv4Addr, port: u16) -> Self {
            self.errors.insert((addr, port));
            self
        }

        pub(crate) fn panicking_on(mut self, addr: Ipv4Addr) -> Self {
            self.panics_on.insert(addr);
            self
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, addr: Ipv4Addr, port: u16) -> PortOutcome {
            if self.panics_on.contains(&addr) {
                panic!("scripted prober panic for {addr}");
            }
            if self.errors.contains(&(addr, port)) {
                return PortOutcome::probe_error(port, "host unreachable");
            }
            match self.open.get(&addr).and_then(|ports| ports.get(&port)) {
                Some(banner) => PortOutcome::open(port, banner.clone()),
                None => PortOutcome::closed(port),
            }
        }
    }

    /// Tracks the highest number of probes running at the same time.
    struct GaugeProber {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Prober for GaugeProber {
        async fn probe(&self, _addr: Ipv4Addr, port: u16) -> PortOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            PortOutcome::closed(port)
        }
    }

    const HOST: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 10);

    #[tokio::test]
    async fn scan_host_sorts_and_dedups_ports() {
        let prober = Arc::new(ScriptedProber::new().with_open(HOST, &[80]));

        let outcomes = scan_host(prober, HOST, &[8080, 22, 80, 443, 80, 22], 50)
            .await
            .unwrap();

        let ports: Vec<u16> = outcomes.iter().map(|o| o.port).collect();
        assert_eq!(ports, vec![22, 80, 443, 8080]);
        assert_eq!(outcomes[1].status, PortStatus::Open);
        assert_eq!(outcomes[1].service.as_deref(), Some("HTTP"));
        assert!(outcomes.iter().filter(|o| o.port != 80).all(|o| o.status == PortStatus::Closed));
    }

    #[tokio::test]
    async fn scan_host_with_empty_ports_returns_nothing() {
        let prober = Arc::new(ScriptedProber::new());
        let outcomes = scan_host(prober, HOST, &[], 50).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn scan_host_keeps_going_after_probe_error() {
        let prober = Arc::new(
            ScriptedProber::new()
                .with_open(HOST, &[22, 443])
                .with_error(HOST, 80),
        );

        let outcomes = scan_host(prober, HOST, &[22, 80, 443], 50).await.unwrap();

        let statuses: Vec<PortStatus> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![PortStatus::Open, PortStatus::ProbeError, PortStatus::Open]
        );
    }

    #[tokio::test]
    async fn scan_host_concurrency_does_not_change_outcomes() {
        let ports: Vec<u16> = (1..=120).rev().collect();
        let prober: Arc<dyn Prober> = Arc::new(
            ScriptedProber::new()
                .with_open(HOST, &[7, 21, 80, 99])
                .with_banner(HOST, 21, "220 FTP ready")
                .with_error(HOST, 50),
        );

        let serial = scan_host(Arc::clone(&prober), HOST, &ports, 1).await.unwrap();
        let parallel = scan_host(prober, HOST, &ports, 50).await.unwrap();

        assert_eq!(serial, parallel);
        assert_eq!(serial.len(), 120);
    }

    #[tokio::test]
    async fn scan_host_respects_concurrency_cap() {
        let prober = Arc::new(GaugeProber {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let ports: Vec<u16> = (1..=40).collect();

        let outcomes = scan_host(prober.clone(), HOST, &ports, 4).await.unwrap();

        assert_eq!(outcomes.len(), 40);
        assert!(prober.peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn scan_host_accepts_unbounded_concurrency() {
        let prober = Arc::new(ScriptedProber::new().with_open(HOST, &[443]));

        let outcomes = scan_host(prober, HOST, &[22, 443], usize::MAX).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[1].is_open());
    }

    #[test]
    fn permits_stay_within_semaphore_bounds() {
        assert_eq!(permits(0), 1);
        assert_eq!(permits(50), 50);
        assert_eq!(permits(usize::MAX), Semaphore::MAX_PERMITS);
    }

    #[tokio::test]
    async fn scan_host_reports_dead_probe_task() {
        let prober = Arc::new(ScriptedProber::new().panicking_on(HOST));

        let result = scan_host(prober, HOST, &[22, 80], 50).await;

        assert!(matches!(result, Err(ScanError::ProbeTask { port: 22, .. })));
    }
}
