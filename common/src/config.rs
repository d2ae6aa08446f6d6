use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_BANNER_TIMEOUT: Duration = Duration::from_millis(2_000);
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;
pub const DEFAULT_HOST_CONCURRENCY: usize = 1;

/// Presentation settings of the command line front end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Skips the banner line printed on start-up.
    pub no_banner: bool,
    /// `0` prints everything, `1` drops headers, `2` only prints the summary.
    pub quiet: u8,
    /// Prints the raw report as JSON on stdout instead of the host tree.
    pub json: bool,
}

/// Tunables for a single scan call.
///
/// Passed explicitly into every scan; nothing here is read from globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Upper bound for a single TCP connect.
    pub connect_timeout: Duration,
    /// Upper bound for the single banner read after a successful connect.
    pub banner_timeout: Duration,
    /// Probes in flight per host.
    pub max_concurrency: usize,
    /// Hosts scanned at the same time. `1` scans sequentially.
    pub host_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            banner_timeout: DEFAULT_BANNER_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            host_concurrency: DEFAULT_HOST_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_host_concurrency(mut self, host_concurrency: usize) -> Self {
        self.host_concurrency = host_concurrency.max(1);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_banner_timeout(mut self, timeout: Duration) -> Self {
        self.banner_timeout = timeout;
        self
    }
}
