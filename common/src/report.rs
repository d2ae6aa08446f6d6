//! # Scan Report
//!
//! The aggregate handed back to callers once a scan completes.

use std::net::Ipv4Addr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::network::host::HostReport;
use crate::network::target::ScanKind;
use crate::security::RiskLevel;

/// A host whose scan failed and was left out of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostFailure {
    pub address: Ipv4Addr,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Sorted by address.
    pub host_reports: Vec<HostReport>,
    pub scan_kind: ScanKind,
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "as_secs_f64")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<HostFailure>,
}

/// Dashboard counters derived from a [`ScanReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_devices: usize,
    pub vulnerable_devices: usize,
    pub total_findings: usize,
    pub critical_risk_devices: usize,
    pub high_risk_devices: usize,
    pub medium_risk_devices: usize,
    pub low_risk_devices: usize,
}

impl ScanReport {
    pub fn summary(&self) -> ReportSummary {
        self.host_reports
            .iter()
            .fold(ReportSummary::default(), |mut summary, host| {
                summary.total_devices += 1;
                summary.total_findings += host.findings.len();
                if host.is_vulnerable() {
                    summary.vulnerable_devices += 1;
                }
                match host.risk_level {
                    RiskLevel::Critical => summary.critical_risk_devices += 1,
                    RiskLevel::High => summary.high_risk_devices += 1,
                    RiskLevel::Medium => summary.medium_risk_devices += 1,
                    RiskLevel::Low => summary.low_risk_devices += 1,
                }
                summary
            })
    }

    pub fn is_empty(&self) -> bool {
        self.host_reports.is_empty()
    }
}

fn as_secs_f64<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
