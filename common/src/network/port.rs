use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest banner kept on a [`PortOutcome`], in bytes.
pub const MAX_BANNER_LEN: usize = 1024;

pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Fixed port to service label table.
const SERVICES: &[(u16, &str)] = &[
    (21, "FTP"),
    (22, "SSH"),
    (23, "Telnet"),
    (25, "SMTP"),
    (53, "DNS"),
    (80, "HTTP"),
    (110, "POP3"),
    (143, "IMAP"),
    (443, "HTTPS"),
    (465, "SMTPS"),
    (554, "RTSP"),
    (587, "SMTP-Sub"),
    (993, "IMAPS"),
    (995, "POP3S"),
    (1433, "MSSQL"),
    (1935, "RTMP"),
    (3306, "MySQL"),
    (3389, "RDP"),
    (5432, "PostgreSQL"),
    (5900, "VNC"),
    (8000, "HTTP-Alt"),
    (8080, "HTTP-Alt"),
    (8443, "HTTPS-Alt"),
    (37777, "Dahua"),
    (37778, "Dahua-Alt"),
    (37779, "Dahua-Alt2"),
];

/// Looks up the service label of `port`, [`UNKNOWN_SERVICE`] when unmapped.
pub fn service_name(port: u16) -> &'static str {
    SERVICES
        .binary_search_by_key(&port, |(p, _)| *p)
        .map(|idx| SERVICES[idx].1)
        .unwrap_or(UNKNOWN_SERVICE)
}

/// Every port with a known service label, ascending.
pub fn known_ports() -> impl Iterator<Item = u16> {
    SERVICES.iter().map(|(port, _)| *port)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
    /// The connect failed for a reason other than refusal or timeout.
    #[serde(rename = "error")]
    ProbeError,
}

impl PortStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortStatus::Open => "open",
            PortStatus::Closed => "closed",
            PortStatus::ProbeError => "error",
        }
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of probing one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortOutcome {
    pub port: u16,
    pub status: PortStatus,
    pub service: Option<String>,
    pub banner: Option<String>,
    /// Transport failure behind a [`PortStatus::ProbeError`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PortOutcome {
    /// An open port, labelled from the service table.
    pub fn open(port: u16, banner: Option<String>) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            service: Some(service_name(port).to_string()),
            banner: banner.map(truncate_banner).filter(|b| !b.is_empty()),
            error: None,
        }
    }

    pub fn closed(port: u16) -> Self {
        Self {
            port,
            status: PortStatus::Closed,
            service: None,
            banner: None,
            error: None,
        }
    }

    pub fn probe_error(port: u16, reason: impl Into<String>) -> Self {
        Self {
            port,
            status: PortStatus::ProbeError,
            service: None,
            banner: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Cuts `banner` to at most [`MAX_BANNER_LEN`] bytes on a char boundary.
pub fn truncate_banner(mut banner: String) -> String {
    if banner.len() > MAX_BANNER_LEN {
        let mut cut = MAX_BANNER_LEN;
        while !banner.is_char_boundary(cut) {
            cut -= 1;
        }
        banner.truncate(cut);
    }
    banner
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
