use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse exposure ordinal, also used as finding severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Raises the level by one step. `High` and `Critical` stay where they are.
    pub fn escalate(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium => RiskLevel::High,
            ceiling => ceiling,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature-based hint tied to one open port. Not a verified exploit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityFinding {
    pub kind: String,
    pub severity: RiskLevel,
    pub description: String,
    pub port: u16,
    pub cve: Option<String>,
    pub remediation: String,
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
    fn escalate_steps_once_and_stops_at_ceiling() {
        assert_eq!(RiskLevel::Low.escalate(), RiskLevel::Medium);
        assert_eq!(RiskLevel::Medium.escalate(), RiskLevel::High);
        assert_eq!(RiskLevel::High.escalate(), RiskLevel::High);
        assert_eq!(RiskLevel::Critical.escalate(), RiskLevel::Critical);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn level_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), r#""Critical""#);
    }
}
