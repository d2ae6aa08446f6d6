#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use lensguard_common::config::ScanConfig;
use lensguard_common::network::port::PortStatus;
use lensguard_common::network::target::{ScanKind, ScanTarget};
use lensguard_common::security::RiskLevel;
use lensguard_core::discovery::{ProgressCallback, ScanService};
use lensguard_core::scanner::resolver::{AddressRangeResolver, FALLBACK_LOCAL_ADDR};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

fn test_config() -> ScanConfig {
    ScanConfig::default()
        .with_connect_timeout(Duration::from_millis(500))
        .with_banner_timeout(Duration::from_millis(300))
}

/// Accepts connections forever and greets each one with `banner`.
async fn listener_with_banner(banner: &'static [u8]) -> anyhow::Result<(u16, JoinHandle<()>)> {
    let listener = TcpListener::bind((LOCALHOST, 0)).await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            if !banner.is_empty() {
                let _ = socket.write_all(banner).await;
            }
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                drop(socket);
            });
        }
    });
    Ok((port, handle))
}

/// A loopback port nothing listens on.
async fn closed_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind((LOCALHOST, 0)).await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

#[tokio::test]
async fn scan_single_loopback_host() -> anyhow::Result<()> {
    let (open, server) = listener_with_banner(b"SSH-2.0-OpenSSH_9.6\r\n").await?;
    let closed = closed_port().await?;
    let cfg = test_config();
    let target = ScanTarget::new("127.0.0.1", &[closed, open], ScanKind::Single);

    let report = ScanService::tcp(&cfg).run(&target, &cfg, None).await;
    server.abort();

    assert!(report.failures.is_empty(), "failures: {:?}", report.failures);
    assert_eq!(report.host_reports.len(), 1);

    let host = &report.host_reports[0];
    assert_eq!(host.address, LOCALHOST);
    assert_eq!(host.device_type, "Network Device");
    assert_eq!(host.risk_level, RiskLevel::Low);
    assert_eq!(host.device_name, "Network Device (127.0.0.1)");
    assert!(host.findings.is_empty());

    let mut expected_ports = vec![open, closed];
    expected_ports.sort_unstable();
    let ports: Vec<u16> = host.outcomes.iter().map(|o| o.port).collect();
    assert_eq!(ports, expected_ports);

    let open_outcome = host
        .outcomes
        .iter()
        .find(|o| o.port == open)
        .ok_or_else(|| anyhow::anyhow!("port {open} missing from outcomes"))?;
    assert_eq!(open_outcome.status, PortStatus::Open);
    assert_eq!(open_outcome.banner.as_deref(), Some("SSH-2.0-OpenSSH_9.6"));

    let closed_outcome = host
        .outcomes
        .iter()
        .find(|o| o.port == closed)
        .ok_or_else(|| anyhow::anyhow!("port {closed} missing from outcomes"))?;
    assert_eq!(closed_outcome.status, PortStatus::Closed);

    Ok(())
}

#[tokio::test]
async fn scan_host_without_open_ports_is_excluded() -> anyhow::Result<()> {
    let closed = closed_port().await?;
    let cfg = test_config();
    let target = ScanTarget::new("127.0.0.1", &[closed], ScanKind::Single);

    let report = ScanService::tcp(&cfg).run(&target, &cfg, None).await;

    assert!(report.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.summary().total_devices, 0);

    Ok(())
}

#[tokio::test]
async fn scan_outcomes_do_not_depend_on_concurrency() -> anyhow::Result<()> {
    let mut servers = Vec::new();
    let mut ports = Vec::new();
    for banner in [&b"220 FTP ready\r\n"[..], b"", b"+OK POP3\r\n"] {
        let (port, server) = listener_with_banner(banner).await?;
        ports.push(port);
        servers.push(server);
    }
    for _ in 0..5 {
        ports.push(closed_port().await?);
    }
    let target = ScanTarget::new("127.0.0.1", &ports, ScanKind::Single);

    let serial_cfg = test_config().with_max_concurrency(1);
    let parallel_cfg = test_config().with_max_concurrency(50);
    let serial = ScanService::tcp(&serial_cfg).run(&target, &serial_cfg, None).await;
    let parallel = ScanService::tcp(&parallel_cfg).run(&target, &parallel_cfg, None).await;
    servers.iter().for_each(JoinHandle::abort);

    assert_eq!(serial.host_reports.len(), 1);
    assert_eq!(parallel.host_reports.len(), 1);
    assert_eq!(serial.host_reports[0].outcomes, parallel.host_reports[0].outcomes);
    assert_eq!(serial.host_reports[0].risk_level, parallel.host_reports[0].risk_level);
    assert!(serial.host_reports[0]
        .outcomes
        .windows(2)
        .all(|pair| pair[0].port < pair[1].port));

    Ok(())
}

#[tokio::test]
async fn scan_auto_covers_the_loopback_subnet() -> anyhow::Result<()> {
    let (open, server) = listener_with_banner(b"").await?;
    let cfg = test_config().with_host_concurrency(64);
    let resolver = AddressRangeResolver::new(
        SocketAddr::new(IpAddr::V4(LOCALHOST), 53),
        FALLBACK_LOCAL_ADDR,
    );
    let target = ScanTarget::new("auto", &[open], ScanKind::Full);

    let progress = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let on_progress: ProgressCallback = {
        let progress = Arc::clone(&progress);
        Arc::new(move |done, _total| {
            progress.fetch_max(done, std::sync::atomic::Ordering::SeqCst);
        })
    };

    let report = ScanService::tcp(&cfg)
        .with_resolver(resolver)
        .run(&target, &cfg, Some(on_progress))
        .await;
    server.abort();

    let addresses: Vec<Ipv4Addr> = report.host_reports.iter().map(|h| h.address).collect();
    assert_eq!(addresses, vec![LOCALHOST]);
    assert_eq!(progress.load(std::sync::atomic::Ordering::SeqCst), 254);

    Ok(())
}

#[tokio::test]
async fn scan_report_serializes_with_camel_case_keys() -> anyhow::Result<()> {
    let (open, server) = listener_with_banner(b"").await?;
    let closed = closed_port().await?;
    let cfg = test_config();
    let target = ScanTarget::new("127.0.0.1", &[open, closed], ScanKind::Single);

    let report = ScanService::tcp(&cfg).run(&target, &cfg, None).await;
    server.abort();

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["scanKind"], "single");
    assert!(json["startedAt"].is_string());
    assert!(json["duration"].is_f64());
    assert!(json.get("failures").is_none());

    let host = &json["hostReports"][0];
    assert_eq!(host["address"], "127.0.0.1");
    assert_eq!(host["riskLevel"], "Low");
    assert_eq!(host["deviceType"], "Network Device");
    assert!(host["lastSeen"].is_string());

    let statuses: Vec<&str> = host["outcomes"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("outcomes is not an array"))?
        .iter()
        .filter_map(|o| o["status"].as_str())
        .collect();
    assert!(statuses.contains(&"open"));
    assert!(statuses.contains(&"closed"));

    Ok(())
}
