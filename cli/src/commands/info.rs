use colored::*;
use lensguard_common::config::Config;
use lensguard_common::network::range::{self, LOCAL_PREFIX};
use lensguard_common::network::target::ScanKind;
use lensguard_core::scanner::resolver::AddressRangeResolver;

use crate::terminal::{colors, print};

const KEY_WIDTH: usize = 13;

const PRESETS: [ScanKind; 4] = [
    ScanKind::Full,
    ScanKind::Quick,
    ScanKind::Camera,
    ScanKind::Single,
];

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    let resolver = AddressRangeResolver::default();
    let local_addr = resolver.local_address();
    let hosts = range::host_range(local_addr, LOCAL_PREFIX)?;

    if cfg.json {
        let value = serde_json::json!({
            "localAddress": local_addr,
            "rangeStart": hosts.start_addr,
            "rangeEnd": hosts.end_addr,
            "hostCount": hosts.len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let network = format!(
        "{}/{}",
        local_addr.to_string().color(colors::IPV4_ADDR),
        LOCAL_PREFIX.to_string().color(colors::IPV4_PREFIX)
    );
    let auto_range = format!(
        "{} - {} ({} hosts)",
        hosts.start_addr.to_string().color(colors::IPV4_ADDR),
        hosts.end_addr.to_string().color(colors::IPV4_ADDR),
        hosts.len()
    );

    print::aligned_line("Local address", network, KEY_WIDTH);
    print::aligned_line("Auto range", auto_range, KEY_WIDTH);

    print::header("port presets", cfg.quiet);
    for kind in PRESETS {
        let ports: String = kind
            .default_ports()
            .iter()
            .map(u16::to_string)
            .collect::<Vec<String>>()
            .join(",");
        let value = if ports.len() > 40 {
            format!("{} ports", kind.default_ports().len())
        } else {
            ports
        };
        print::aligned_line(kind.as_str(), value, KEY_WIDTH);
    }

    Ok(())
}
