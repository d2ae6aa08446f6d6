use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::network::port::PortOutcome;
use crate::security::{RiskLevel, VulnerabilityFinding};

/// Everything learned about one address with at least one open port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostReport {
    pub address: Ipv4Addr,
    pub device_name: String,
    pub device_type: String,
    pub risk_level: RiskLevel,
    pub last_seen: DateTime<Utc>,
    /// Strictly ascending by port.
    pub outcomes: Vec<PortOutcome>,
    pub findings: Vec<VulnerabilityFinding>,
}

impl HostReport {
    pub fn new(
        address: Ipv4Addr,
        device_type: impl Into<String>,
        risk_level: RiskLevel,
        outcomes: Vec<PortOutcome>,
        findings: Vec<VulnerabilityFinding>,
    ) -> Self {
        let device_type = device_type.into();
        Self {
            address,
            device_name: format!("{device_type} ({address})"),
            device_type,
            risk_level,
            last_seen: Utc::now(),
            outcomes,
            findings,
        }
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &PortOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_open())
    }

    pub fn is_vulnerable(&self) -> bool {
        !self.findings.is_empty()
    }
}
