use std::fmt;

use colored::*;
use lensguard_common::logging::{PRINT_TARGET, SUCCESS_TARGET};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::spinner;

const RAW_MSG_FIELD: &str = "raw_msg";

/// Installs the global subscriber: `RUST_LOG` filter, symbol formatter and
/// the progress bar layer every log line is routed through.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let indicatif_layer = IndicatifLayer::new().with_progress_style(spinner::spinner_style());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(LensguardFormatter)
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer)
        .try_init()?;

    Ok(())
}

pub struct LensguardFormatter;

impl<S, N> FormatEvent<S, N> for LensguardFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0);
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
            if meta.target() == SUCCESS_TARGET {
                ("[✓]", |s| s.bright_green().bold())
            } else {
                match *meta.level() {
                    Level::TRACE => ("[ ]", |s| s.dimmed()),
                    Level::DEBUG => ("[?]", |s| s.blue()),
                    Level::INFO => ("[+]", |s| s.green().bold()),
                    Level::WARN => ("[*]", |s| s.yellow().bold()),
                    Level::ERROR => ("[-]", |s| s.red().bold()),
                }
            };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Pulls the pre-rendered line out of a print event.
#[derive(Default)]
struct RawMessage(String);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == RAW_MSG_FIELD {
            self.0 = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == RAW_MSG_FIELD {
            self.0 = format!("{value:?}");
        }
    }
}
