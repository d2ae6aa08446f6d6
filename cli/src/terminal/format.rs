use crate::terminal::colors;
use colored::*;
use lensguard_common::network::host::HostReport;
use lensguard_common::network::port::{PortOutcome, UNKNOWN_SERVICE};
use lensguard_common::security::{RiskLevel, VulnerabilityFinding};

pub type Detail = (String, ColoredString);

pub fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::Low => colors::RISK_LOW,
        RiskLevel::Medium => colors::RISK_MEDIUM,
        RiskLevel::High => colors::RISK_HIGH,
        RiskLevel::Critical => colors::RISK_CRITICAL,
    }
}

pub fn risk_to_colored(risk: RiskLevel) -> ColoredString {
    let colored: ColoredString = risk.as_str().color(risk_color(risk));
    match risk {
        RiskLevel::High | RiskLevel::Critical => colored.bold(),
        _ => colored,
    }
}

/// `80/HTTP` style label of an open port.
pub fn port_label(outcome: &PortOutcome) -> String {
    let service = outcome.service.as_deref().unwrap_or(UNKNOWN_SERVICE);
    format!("{}/{}", outcome.port, service)
}

pub fn open_ports_to_detail(host: &HostReport) -> Detail {
    let ports: String = host
        .open_ports()
        .map(|outcome| port_label(outcome).color(colors::SERVICE).to_string())
        .collect::<Vec<String>>()
        .join(", ");
    ("Ports".to_string(), ports.normal())
}

pub fn banner_to_detail(outcome: &PortOutcome) -> Option<Detail> {
    let banner = outcome.banner.as_deref()?;
    let first_line = banner.lines().next().unwrap_or(banner);
    Some((
        format!("{}", outcome.port),
        first_line.italic().color(colors::TEXT_DEFAULT),
    ))
}

pub fn finding_to_detail(finding: &VulnerabilityFinding) -> Detail {
    let severity: ColoredString = format!("[{}]", finding.severity).color(risk_color(finding.severity));
    let value: String = format!(
        "{} {} {} {}",
        severity,
        finding.kind.bold(),
        "→".color(colors::SEPARATOR),
        finding.remediation.color(colors::TEXT_DEFAULT)
    );
    ("Vuln".to_string(), value.normal())
}

pub fn host_to_details(host: &HostReport) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        (
            "Address".to_string(),
            host.address.to_string().color(colors::IPV4_ADDR),
        ),
        (
            "Device".to_string(),
            host.device_type.color(colors::TEXT_DEFAULT),
        ),
        ("Risk".to_string(), risk_to_colored(host.risk_level)),
        open_ports_to_detail(host),
    ];

    details.extend(host.open_ports().filter_map(banner_to_detail));
    details.extend(host.findings.iter().map(finding_to_detail));
    details
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
