//! Line-oriented terminal output.
//!
//! Every line goes through [`print`], which emits it as a raw `tracing` event
//! so it interleaves cleanly with log lines and the progress bar.

use std::fmt::Display;

use crate::terminal::colors;
use colored::*;
use lensguard_common::logging::PRINT_TARGET;
use tracing::info;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;
const TREE_KEY_WIDTH: usize = 8;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn blank() {
    print("");
}

fn rule(fill: &str, title: Option<ColoredString>) -> String {
    let Some(title) = title else {
        return fill.repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string();
    };
    let free = TOTAL_WIDTH.saturating_sub(console::measure_text_width(&title));
    let left = fill.repeat(free / 2).color(colors::SEPARATOR);
    let right = fill.repeat(free - free / 2).color(colors::SEPARATOR);
    format!("{left}{title}{right}")
}

pub fn banner(hidden: bool, q_level: u8) {
    if hidden || q_level > 0 {
        return;
    }
    let title = format!("⟦ LENSGUARD v{} ⟧", env!("CARGO_PKG_VERSION"));
    print(&rule("═", Some(title.bright_green().bold())));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let title = format!("⟦ {} ⟧", msg.to_uppercase());
    print(&rule("─", Some(title.color(colors::PRIMARY))));
}

pub fn fat_separator() {
    print(&rule("═", None));
}

/// `key.....: value` with keys padded to `key_width`.
pub fn aligned_line(key: &str, value: impl Display, key_width: usize) {
    let dots = ".".repeat((key_width + 1).saturating_sub(key.width()));
    print(&format!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    ));
}

pub fn notice(msg: &str) {
    print(&format!("{} {}", ">".color(colors::SEPARATOR), msg.yellow().bold()));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn tree(details: &[(String, ColoredString)]) {
    for (i, (key, value)) in details.iter().enumerate() {
        let branch = if i + 1 == details.len() { "└─" } else { "├─" };
        let dots = ".".repeat(TREE_KEY_WIDTH.saturating_sub(key.width()));
        print(&format!(
            " {} {}{}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let pad = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{pad}{msg}"));
}

const NO_DEVICES: &str = r#"
         _   _  ___    ____  _______     _____ ____ _____ ____
        | \ | |/ _ \  |  _ \| ____\ \   / /_ _/ ___| ____/ ___|
        |  \| | | | | | | | |  _|  \ \ / / | | |   |  _| \___ \
        | |\  | |_| | | |_| | |___  \ V /  | | |___| |___ ___) |
        |_| \_|\___/  |____/|_____|  \_/  |___\____|_____|____/
"#;

pub fn no_results() {
    print(&NO_DEVICES.red().bold().to_string());
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
