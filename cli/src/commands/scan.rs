use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use tracing::{Instrument, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::{colors, format, print, spinner};
use lensguard_common::config::{Config, ScanConfig};
use lensguard_common::network::host::HostReport;
use lensguard_common::network::target::{self, ScanTarget, Target};
use lensguard_common::report::ScanReport;
use lensguard_common::{success, warn};
use lensguard_core::discovery::{ProgressCallback, ScanService};

use super::ScanArgs;

const SUMMARY_KEY_WIDTH: usize = 8;

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    let ports: Vec<u16> = match args.ports.as_deref() {
        Some(list) => target::parse_ports(list)?,
        None => args.kind.default_ports(),
    };
    let target = ScanTarget::new(args.target.as_str(), &ports, args.kind);

    let scan_cfg = ScanConfig::default()
        .with_max_concurrency(args.max_concurrency)
        .with_host_concurrency(args.host_concurrency)
        .with_connect_timeout(Duration::from_millis(args.connect_timeout))
        .with_banner_timeout(Duration::from_millis(args.banner_timeout));

    let service = ScanService::tcp(&scan_cfg);

    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&spinner::scan_style());
    span.pb_set_message(&format!(
        "Probing {} port(s) per host",
        target.ports().len()
    ));

    let on_progress: ProgressCallback = {
        let span = span.clone();
        Arc::new(move |_done, total| {
            span.pb_set_length(total as u64);
            span.pb_inc(1);
        })
    };

    let report: ScanReport = service
        .run(&target, &scan_cfg, Some(on_progress))
        .instrument(span.clone())
        .await;
    drop(span);

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    scan_ends(&target, &report, cfg);
    Ok(())
}

fn scan_ends(target: &ScanTarget, report: &ScanReport, cfg: &Config) {
    for failure in &report.failures {
        warn!("Skipped {}: {}", failure.address, failure.reason);
    }

    if report.is_empty() {
        no_devices_found(target, cfg);
        return;
    }

    if cfg.quiet > 0 {
        print::blank();
    }

    print::header("Scan Results", cfg.quiet);
    print_hosts(&report.host_reports, cfg);
    print_summary(report, cfg);
}

fn no_devices_found(target: &ScanTarget, cfg: &Config) {
    if let Ok(Target::Host { target_addr }) = Target::from_str(target.address()) {
        print::notice(&format!("No open ports found on {target_addr}"));
        return;
    }

    print::header("ZERO DEVICES DETECTED", cfg.quiet);
    print::no_results();
}

fn print_hosts(hosts: &[HostReport], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    for (idx, host) in hosts.iter().enumerate() {
        print::tree_head(idx, &host.device_name);
        print::tree(&format::host_to_details(host));
        if idx + 1 != hosts.len() {
            print::blank();
        }
    }
}

fn print_summary(report: &ScanReport, cfg: &Config) {
    let summary = report.summary();
    let devices: ColoredString = format!("{} devices", summary.total_devices).bold().green();
    let vulnerable: ColoredString = format!("{} vulnerable", summary.vulnerable_devices).bold().red();
    let total_time: ColoredString = format!("{:.2}s", report.duration.as_secs_f64()).bold().yellow();
    let output: &ColoredString =
        &format!("Scan Complete: {devices} ({vulnerable}) identified in {total_time}")
            .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
            let counts = [
                ("Critical", summary.critical_risk_devices),
                ("High", summary.high_risk_devices),
                ("Medium", summary.medium_risk_devices),
                ("Low", summary.low_risk_devices),
                ("Findings", summary.total_findings),
            ];
            for (key, count) in counts {
                print::aligned_line(key, count, SUMMARY_KEY_WIDTH);
            }
        }
        _ => {
            print::blank();
            success!("{}", output)
        }
    }
}
