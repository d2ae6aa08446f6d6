//! # Scan Target Model
//!
//! Defines the inputs of a scan.
//!
//! A target address is either:
//! * A single IPv4 literal (e.g. `192.168.1.5`).
//! * The keyword `auto`, meaning the /24 around the local address.
//!
//! The port list and the [`ScanKind`] travel together with the address in a
//! [`ScanTarget`].

use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::port;

pub const AUTO_KEYWORD: &str = "auto";

/// Ports scanned when neither a kind preset nor an explicit list applies.
pub const DEFAULT_PORTS: &[u16] = &[21, 22, 23, 80, 443, 554, 8000, 8080];
pub const QUICK_PORTS: &[u16] = &[22, 23, 80, 443, 554, 8080];
pub const CAMERA_PORTS: &[u16] = &[21, 22, 23, 80, 443, 554, 8000, 8080, 37777, 37778, 37779];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("invalid target address: {0}")]
    InvalidAddress(String),
    #[error("unknown scan kind: {0}")]
    UnknownKind(String),
    #[error("invalid port: {0}")]
    InvalidPort(String),
}

/// A parsed target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every usable host of the local /24.
    Auto,
    /// One explicit host.
    Host { target_addr: Ipv4Addr },
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.eq_ignore_ascii_case(AUTO_KEYWORD) {
            return Ok(Target::Auto);
        }

        trimmed
            .parse::<Ipv4Addr>()
            .map(|target_addr| Target::Host { target_addr })
            .map_err(|_| TargetError::InvalidAddress(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    #[default]
    Full,
    Quick,
    Camera,
    Single,
}

impl ScanKind {
    /// Port preset used when the caller does not name any ports.
    pub fn default_ports(&self) -> Vec<u16> {
        match self {
            ScanKind::Full => port::known_ports().collect(),
            ScanKind::Quick => QUICK_PORTS.to_vec(),
            ScanKind::Camera => CAMERA_PORTS.to_vec(),
            ScanKind::Single => DEFAULT_PORTS.to_vec(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Full => "full",
            ScanKind::Quick => "quick",
            ScanKind::Camera => "camera",
            ScanKind::Single => "single",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = TargetError;

    /// Accepts both `quick` and the legacy `quick_scan` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_suffix("_scan").unwrap_or(&lower);
        match name {
            "full" => Ok(ScanKind::Full),
            "quick" => Ok(ScanKind::Quick),
            "camera" => Ok(ScanKind::Camera),
            "single" => Ok(ScanKind::Single),
            _ => Err(TargetError::UnknownKind(s.to_string())),
        }
    }
}

/// Immutable description of what to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScanRequest")]
pub struct ScanTarget {
    address: String,
    ports: Vec<u16>,
    scan_kind: ScanKind,
}

/// Wire shape of a scan request; missing ports fall back to [`DEFAULT_PORTS`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanRequest {
    address: String,
    #[serde(default)]
    ports: Option<Vec<u16>>,
    #[serde(default)]
    scan_kind: ScanKind,
}

impl From<ScanRequest> for ScanTarget {
    fn from(request: ScanRequest) -> Self {
        let ports = request.ports.unwrap_or_else(|| DEFAULT_PORTS.to_vec());
        ScanTarget::new(request.address, &ports, request.scan_kind)
    }
}

impl ScanTarget {
    /// Builds a target, normalising `ports` into a sorted list of distinct
    /// non-zero ports. An empty list stays empty.
    pub fn new(address: impl Into<String>, ports: &[u16], scan_kind: ScanKind) -> Self {
        Self {
            address: address.into(),
            ports: normalize_ports(ports),
            scan_kind,
        }
    }

    /// Builds a target scanning the preset ports of `scan_kind`.
    pub fn with_kind_defaults(address: impl Into<String>, scan_kind: ScanKind) -> Self {
        Self::new(address, &scan_kind.default_ports(), scan_kind)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn scan_kind(&self) -> ScanKind {
        self.scan_kind
    }

    /// `None` for the `auto` keyword, otherwise the raw address text.
    pub fn explicit_address(&self) -> Option<&str> {
        match Target::from_str(&self.address) {
            Ok(Target::Auto) => None,
            _ => Some(&self.address),
        }
    }
}

pub fn normalize_ports(ports: &[u16]) -> Vec<u16> {
    ports
        .iter()
        .copied()
        .filter(|port| *port != 0)
        .collect::<BTreeSet<u16>>()
        .into_iter()
        .collect()
}

/// Parses a port list such as `"22,80,8000-8010"`.
pub fn parse_ports(s: &str) -> Result<Vec<u16>, TargetError> {
    let mut ports = Vec::new();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_port(start)?;
                let end = parse_port(end)?;
                if start > end {
                    return Err(TargetError::InvalidPort(part.to_string()));
                }
                ports.extend(start..=end);
            }
            None => ports.push(parse_port(part)?),
        }
    }

    Ok(normalize_ports(&ports))
}

fn parse_port(s: &str) -> Result<u16, TargetError> {
    match s.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(TargetError::InvalidPort(s.to_string())),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_full_parsing() {
        assert_eq!(Target::from_str("auto"), Ok(Target::Auto));
        assert_eq!(Target::from_str(" AUTO "), Ok(Target::Auto));
        assert_eq!(
            Target::from_str("10.0.0.7"),
            Ok(Target::Host {
                target_addr: Ipv4Addr::new(10, 0, 0, 7)
            })
        );

        assert!(Target::from_str("not-an-ip").is_err());
        assert!(Target::from_str("10.0.0.256").is_err());
        assert!(Target::from_str("::1").is_err());
    }

    #[test]
    fn scan_kind_accepts_legacy_names() {
        assert_eq!(ScanKind::from_str("full_scan"), Ok(ScanKind::Full));
        assert_eq!(ScanKind::from_str("Quick"), Ok(ScanKind::Quick));
        assert_eq!(ScanKind::from_str("camera_scan"), Ok(ScanKind::Camera));
        assert_eq!(ScanKind::from_str("single"), Ok(ScanKind::Single));
        assert!(ScanKind::from_str("stealth").is_err());
    }

    #[test]
    fn scan_target_normalizes_ports() {
        let target = ScanTarget::new("127.0.0.1", &[443, 80, 0, 80, 22, 443], ScanKind::Single);
        assert_eq!(target.ports(), &[22, 80, 443]);
    }

    #[test]
    fn scan_target_keeps_empty_port_list() {
        let target = ScanTarget::new("127.0.0.1", &[], ScanKind::Single);
        assert!(target.ports().is_empty());
    }

    #[test]
    fn explicit_address_hides_auto_keyword() {
        assert_eq!(
            ScanTarget::new("auto", &[80], ScanKind::Full).explicit_address(),
            None
        );
        assert_eq!(
            ScanTarget::new("10.1.1.1", &[80], ScanKind::Single).explicit_address(),
            Some("10.1.1.1")
        );
        assert_eq!(
            ScanTarget::new("garbage", &[80], ScanKind::Single).explicit_address(),
            Some("garbage")
        );
    }

    #[test]
    fn kind_presets_are_sorted_and_distinct() {
        for kind in [ScanKind::Full, ScanKind::Quick, ScanKind::Camera, ScanKind::Single] {
            let ports = kind.default_ports();
            assert!(!ports.is_empty(), "{kind} has no ports");
            assert!(ports.windows(2).all(|pair| pair[0] < pair[1]), "{kind} unsorted");
        }
        assert!(ScanKind::Camera.default_ports().contains(&37777));
        assert!(ScanKind::Full.default_ports().contains(&3389));
    }

    #[test]
    fn parse_ports_handles_lists_and_ranges() {
        assert_eq!(parse_ports("80, 22,8000-8002,22"), Ok(vec![22, 80, 8000, 8001, 8002]));
        assert_eq!(parse_ports(""), Ok(vec![]));
        assert!(parse_ports("0").is_err());
        assert!(parse_ports("70000").is_err());
        assert!(parse_ports("90-80").is_err());
        assert!(parse_ports("http").is_err());
    }

    #[test]
    fn scan_target_deserializes_from_camel_case() {
        let json = r#"{"address":"auto","ports":[80,22,80],"scanKind":"camera"}"#;
        let target: ScanTarget = serde_json::from_str(json).unwrap();
        assert_eq!(target.address(), "auto");
        assert_eq!(target.ports(), &[22, 80]);
        assert_eq!(target.scan_kind(), ScanKind::Camera);
    }

    #[test]
    fn scan_target_request_defaults() {
        let target: ScanTarget = serde_json::from_str(r#"{"address":"10.0.0.1"}"#).unwrap();
        assert_eq!(target.ports(), DEFAULT_PORTS);
        assert_eq!(target.scan_kind(), ScanKind::Full);
    }
}
