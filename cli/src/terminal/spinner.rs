use indicatif::ProgressStyle;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Style of every span-backed spinner.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

/// Spinner with a host counter, used while a scan is running.
pub fn scan_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} {msg} {bar:24.green/bright_black} {pos}/{len} hosts [{elapsed}]",
    )
    .unwrap_or_else(|_| ProgressStyle::default_spinner())
    .tick_strings(TICK_STRINGS)
    .progress_chars("━╸─")
}
