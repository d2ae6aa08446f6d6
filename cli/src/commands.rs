pub mod info;
pub mod scan;

use clap::{Args, Parser, Subcommand};
use lensguard_common::config::{
    DEFAULT_BANNER_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST_CONCURRENCY,
    DEFAULT_MAX_CONCURRENCY,
};
use lensguard_common::network::target::ScanKind;

#[derive(Parser)]
#[command(name = "lensguard")]
#[command(about = "Finds cameras and other exposed devices on a network.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print the raw report as JSON instead of the host tree
    #[arg(long, global = true)]
    pub json: bool,

    /// Reduce output, repeat for less (-qq)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the start-up banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the local address and the range an automatic scan covers
    #[command(alias = "i")]
    Info,
    /// Scan a single address, or the local /24 with `auto`
    #[command(alias = "s")]
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// IPv4 address to scan, or `auto`
    #[arg(default_value = "auto")]
    pub target: String,

    /// Ports to probe, e.g. `22,80,8000-8010` (defaults to the scan kind's preset)
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Port preset: full, quick, camera or single
    #[arg(short, long, default_value_t = ScanKind::Full)]
    pub kind: ScanKind,

    /// Probes in flight per host
    #[arg(short = 'c', long = "concurrency", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Hosts scanned at the same time
    #[arg(long = "hosts", default_value_t = DEFAULT_HOST_CONCURRENCY)]
    pub host_concurrency: usize,

    /// TCP connect timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_millis() as u64)]
    pub connect_timeout: u64,

    /// Banner read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_BANNER_TIMEOUT.as_millis() as u64)]
    pub banner_timeout: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
