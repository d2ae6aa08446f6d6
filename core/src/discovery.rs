//! # Scan Service
//!
//! Implements the core "Network Scan" use case.
//!
//! Finds the hosts to scan, probes their ports and turns the open ones into
//! a classified, annotated [`HostReport`]. One failing host never aborts the
//! batch: its error is logged and recorded on the [`ScanReport`].

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::Utc;
use lensguard_common::config::ScanConfig;
use lensguard_common::network::host::HostReport;
use lensguard_common::network::target::ScanTarget;
use lensguard_common::report::{HostFailure, ScanReport};
use lensguard_common::{debug, error, info, success};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::classify::DeviceClassifier;
use crate::network::tcp::TcpProber;
use crate::scanner::resolver::AddressRangeResolver;
use crate::scanner::{self, Prober, ScanError};
use crate::vulns::VulnerabilityEngine;

/// Called with `(completed, total)` after every host.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Per-host result: a report, `None` when nothing is open, or the failure.
pub type HostResult = Result<Option<HostReport>, ScanError>;

/// Application Service for network scans.
///
/// Orchestrates the scan by:
/// 1. resolving the target into addresses with the [`AddressRangeResolver`].
/// 2. delegating port probing to the [`Prober`] trait.
/// 3. classifying and annotating every host with open ports.
#[derive(Clone)]
pub struct ScanService {
    prober: Arc<dyn Prober>,
    resolver: AddressRangeResolver,
    classifier: DeviceClassifier,
    engine: VulnerabilityEngine,
}

impl ScanService {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            resolver: AddressRangeResolver::default(),
            classifier: DeviceClassifier::default(),
            engine: VulnerabilityEngine::default(),
        }
    }

    /// A service probing over real TCP connections with `cfg`'s timeouts.
    pub fn tcp(cfg: &ScanConfig) -> Self {
        Self::new(Arc::new(TcpProber::from(cfg)))
    }

    pub fn with_resolver(mut self, resolver: AddressRangeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_classifier(mut self, classifier: DeviceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_engine(mut self, engine: VulnerabilityEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn resolver(&self) -> &AddressRangeResolver {
        &self.resolver
    }

    /// Executes a full scan of `target`.
    ///
    /// The process involves:
    /// 1. **Resolving**: one explicit address, or the local /24.
    /// 2. **Scanning**: every host through [`Self::scan_address`].
    /// 3. **Aggregating**: reports sorted by address, failures kept aside.
    pub async fn run(
        &self,
        target: &ScanTarget,
        cfg: &ScanConfig,
        on_progress: Option<ProgressCallback>,
    ) -> ScanReport {
        let started_at = Utc::now();
        let start_time = Instant::now();

        let addresses: Vec<Ipv4Addr> = self.resolver.resolve(target.explicit_address());
        info!(
            "Starting {} scan on {} address(es) with {} port(s) each",
            target.scan_kind(),
            addresses.len(),
            target.ports().len()
        );

        let mut results = self
            .scan_addresses(addresses, target.ports(), cfg, on_progress)
            .await;
        results.sort_by_key(|(addr, _)| *addr);

        let mut host_reports: Vec<HostReport> = Vec::new();
        let mut failures: Vec<HostFailure> = Vec::new();

        for (address, result) in results {
            match result {
                Ok(Some(report)) => {
                    success!(
                        "Found device: {address} - {} ({} risk)",
                        report.device_type,
                        report.risk_level
                    );
                    host_reports.push(report);
                }
                Ok(None) => debug!("No open ports on {address}"),
                Err(e) => {
                    error!("Error scanning {address}: {e}");
                    failures.push(HostFailure {
                        address,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let duration = start_time.elapsed();
        info!(
            "Scan completed in {:.2} seconds. Found {} device(s).",
            duration.as_secs_f64(),
            host_reports.len()
        );

        ScanReport {
            host_reports,
            scan_kind: target.scan_kind(),
            started_at,
            duration,
            failures,
        }
    }

    /// Probes, classifies and annotates a single address.
    pub async fn scan_address(
        &self,
        addr: Ipv4Addr,
        ports: &[u16],
        cfg: &ScanConfig,
    ) -> HostResult {
        let outcomes =
            scanner::scan_host(Arc::clone(&self.prober), addr, ports, cfg.max_concurrency)
                .await?;

        if !outcomes.iter().any(|outcome| outcome.is_open()) {
            return Ok(None);
        }

        let profile = self.classifier.classify(&outcomes);
        let findings = self.engine.detect(&outcomes);

        Ok(Some(HostReport::new(
            addr,
            profile.device_type,
            profile.risk_level,
            outcomes,
            findings,
        )))
    }

    /// Scans `addresses` with at most `cfg.host_concurrency` hosts at once.
    async fn scan_addresses(
        &self,
        addresses: Vec<Ipv4Addr>,
        ports: &[u16],
        cfg: &ScanConfig,
        on_progress: Option<ProgressCallback>,
    ) -> Vec<(Ipv4Addr, HostResult)> {
        let total = addresses.len();
        let ports: Arc<[u16]> = Arc::from(ports);
        let semaphore = Arc::new(Semaphore::new(scanner::permits(cfg.host_concurrency)));
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<(Ipv4Addr, JoinHandle<HostResult>)> = addresses
            .into_iter()
            .map(|addr| {
                let service = self.clone();
                let ports = Arc::clone(&ports);
                let semaphore = Arc::clone(&semaphore);
                let completed = Arc::clone(&completed);
                let on_progress = on_progress.clone();
                let cfg = *cfg;

                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await;
                    let result = service.scan_address(addr, &ports, &cfg).await;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = on_progress {
                        callback(done, total);
                    }
                    result
                });
                (addr, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(total);
        for (addr, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ScanError::HostTask {
                    addr,
                    reason: e.to_string(),
                }),
            };
            results.push((addr, result));
        }

        results
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
