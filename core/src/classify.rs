//! # Device Classification
//!
//! Infers a coarse device type and baseline risk from the set of open ports.
//! Rules are evaluated in order and the first match wins; hosts exposing more
//! than [`ESCALATION_THRESHOLD`] open ports get their risk raised one step.

use std::collections::BTreeSet;

use lensguard_common::network::port::PortOutcome;
use lensguard_common::security::RiskLevel;

/// Open-port count above which the baseline risk escalates.
pub const ESCALATION_THRESHOLD: usize = 5;

pub const FALLBACK_DEVICE_TYPE: &str = "Network Device";

#[derive(Debug, Clone, Copy)]
pub struct DeviceRule {
    pub device_type: &'static str,
    pub risk: RiskLevel,
    pub matches: fn(&BTreeSet<u16>) -> bool,
}

fn has_any(open: &BTreeSet<u16>, ports: &[u16]) -> bool {
    ports.iter().any(|port| open.contains(port))
}

pub const DEFAULT_DEVICE_RULES: &[DeviceRule] = &[
    DeviceRule {
        device_type: "IP Camera (RTSP)",
        risk: RiskLevel::High,
        matches: |open| open.contains(&554),
    },
    DeviceRule {
        device_type: "IP Camera (Web)",
        risk: RiskLevel::High,
        matches: |open| has_any(open, &[80, 443]) && has_any(open, &[8080, 8000]),
    },
    DeviceRule {
        device_type: "Web Server",
        risk: RiskLevel::Medium,
        matches: |open| has_any(open, &[80, 443]),
    },
    DeviceRule {
        device_type: "Network Device (Telnet)",
        risk: RiskLevel::Critical,
        matches: |open| open.contains(&23),
    },
    DeviceRule {
        device_type: "FTP Server",
        risk: RiskLevel::High,
        matches: |open| open.contains(&21),
    },
    DeviceRule {
        device_type: "Linux Server",
        risk: RiskLevel::Medium,
        matches: |open| open.contains(&22),
    },
    DeviceRule {
        device_type: "Windows Server",
        risk: RiskLevel::Medium,
        matches: |open| open.contains(&3389),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub device_type: String,
    pub risk_level: RiskLevel,
}

/// Stateless classifier over an immutable rule table.
#[derive(Debug, Clone, Copy)]
pub struct DeviceClassifier {
    rules: &'static [DeviceRule],
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_RULES)
    }
}

impl DeviceClassifier {
    pub fn new(rules: &'static [DeviceRule]) -> Self {
        Self { rules }
    }

    /// Pure function of the open ports among `outcomes`.
    pub fn classify(&self, outcomes: &[PortOutcome]) -> DeviceProfile {
        let open: BTreeSet<u16> = outcomes
            .iter()
            .filter(|outcome| outcome.is_open())
            .map(|outcome| outcome.port)
            .collect();

        let (device_type, baseline) = self
            .rules
            .iter()
            .find(|rule| (rule.matches)(&open))
            .map(|rule| (rule.device_type, rule.risk))
            .unwrap_or((FALLBACK_DEVICE_TYPE, RiskLevel::Low));

        let risk_level = if open.len() > ESCALATION_THRESHOLD {
            baseline.escalate()
        } else {
            baseline
        };

        DeviceProfile {
            device_type: device_type.to_string(),
            risk_level,
        }
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
