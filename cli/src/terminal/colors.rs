use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::BrightCyan;
pub const IPV4_PREFIX: Color = Color::Cyan;
pub const SERVICE: Color = Color::BrightBlue;

pub const RISK_LOW: Color = Color::Green;
pub const RISK_MEDIUM: Color = Color::Yellow;
pub const RISK_HIGH: Color = Color::BrightRed;
pub const RISK_CRITICAL: Color = Color::Red;
