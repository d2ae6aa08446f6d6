//! Signature-based vulnerability hints over open ports.
//!
//! This is a heuristic: a port without a finding is not evidence of safety.

use lensguard_common::network::port::PortOutcome;
use lensguard_common::security::{RiskLevel, VulnerabilityFinding};

#[derive(Debug, Clone, Copy)]
pub struct VulnerabilityRule {
    pub port: u16,
    /// Extra condition on the open port beyond its number.
    pub condition: fn(&PortOutcome) -> bool,
    pub kind: &'static str,
    pub severity: RiskLevel,
    pub description: &'static str,
    pub cve: Option<&'static str>,
    pub remediation: &'static str,
}

impl VulnerabilityRule {
    fn applies_to(&self, outcome: &PortOutcome) -> bool {
        outcome.is_open() && outcome.port == self.port && (self.condition)(outcome)
    }

    fn finding(&self) -> VulnerabilityFinding {
        VulnerabilityFinding {
            kind: self.kind.to_string(),
            severity: self.severity,
            description: self.description.to_string(),
            port: self.port,
            cve: self.cve.map(str::to_string),
            remediation: self.remediation.to_string(),
        }
    }
}

fn always(_: &PortOutcome) -> bool {
    true
}

fn banner_mentions_camera(outcome: &PortOutcome) -> bool {
    outcome
        .banner
        .as_deref()
        .is_some_and(|banner| banner.to_ascii_lowercase().contains("camera"))
}

pub const DEFAULT_VULNERABILITY_RULES: &[VulnerabilityRule] = &[
    VulnerabilityRule {
        port: 23,
        condition: always,
        kind: "Telnet Service",
        severity: RiskLevel::Critical,
        description: "Telnet service detected - unencrypted communication",
        cve: None,
        remediation: "Disable Telnet and use SSH instead",
    },
    VulnerabilityRule {
        port: 21,
        condition: always,
        kind: "FTP Service",
        severity: RiskLevel::High,
        description: "FTP service detected - potentially unencrypted file transfer",
        cve: None,
        remediation: "Use SFTP or FTPS for secure file transfer",
    },
    VulnerabilityRule {
        port: 554,
        condition: always,
        kind: "RTSP Service",
        severity: RiskLevel::Medium,
        description: "RTSP service detected - check for authentication",
        cve: None,
        remediation: "Ensure RTSP service requires authentication",
    },
    VulnerabilityRule {
        port: 80,
        condition: banner_mentions_camera,
        kind: "Unsecured Camera Web Interface",
        severity: RiskLevel::High,
        description: "Camera web interface without HTTPS",
        cve: None,
        remediation: "Enable HTTPS and change default credentials",
    },
];

/// Stateless matcher over an immutable rule table.
#[derive(Debug, Clone, Copy)]
pub struct VulnerabilityEngine {
    rules: &'static [VulnerabilityRule],
}

impl Default for VulnerabilityEngine {
    fn default() -> Self {
        Self::new(DEFAULT_VULNERABILITY_RULES)
    }
}

impl VulnerabilityEngine {
    pub fn new(rules: &'static [VulnerabilityRule]) -> Self {
        Self { rules }
    }

    /// At most one finding per open port (the first matching rule), ordered
    /// by ascending port.
    pub fn detect(&self, outcomes: &[PortOutcome]) -> Vec<VulnerabilityFinding> {
        let mut open: Vec<&PortOutcome> = outcomes.iter().filter(|o| o.is_open()).collect();
        open.sort_by_key(|outcome| outcome.port);
        open.dedup_by_key(|outcome| outcome.port);

        open.into_iter()
            .filter_map(|outcome| {
                self.rules
                    .iter()
                    .find(|rule| rule.applies_to(outcome))
                    .map(VulnerabilityRule::finding)
            })
            .collect()
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
