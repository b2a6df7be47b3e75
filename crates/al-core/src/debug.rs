//! Logging setup. Four severity levels reach the platform-logger contract
//! in the top-level spec's §6 (error/warn/info/debug), backed by `tracing`.

use core::fmt;
use std::fs::OpenOptions;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as tracingfmt, EnvFilter};

struct AlignedFormatter;

impl<S, N> FormatEvent<S, N> for AlignedFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let (color_level, color_reset) = match *metadata.level() {
            tracing::Level::ERROR => ("\x1b[31m", "\x1b[0m"),
            tracing::Level::WARN => ("\x1b[33m", "\x1b[0m"),
            tracing::Level::INFO => ("\x1b[32m", "\x1b[0m"),
            tracing::Level::DEBUG => ("\x1b[34m", "\x1b[0m"),
            tracing::Level::TRACE => ("\x1b[35m", "\x1b[0m"),
        };

        // "crates/al-entities/src/handlers/topology.rs" -> "[entities/handlers] topology.rs"
        let file_path = metadata.file().unwrap_or("unknown");
        let formatted_path = if let Some(src_idx) = file_path.find("/src/") {
            let before_src = &file_path[..src_idx];
            let after_src = &file_path[src_idx + 5..];
            let crate_name = if let Some(al_idx) = before_src.rfind("al-") {
                &before_src[al_idx + 3..]
            } else {
                before_src.rsplit('/').next().unwrap_or("unknown")
            };
            if let Some(last_slash) = after_src.rfind('/') {
                let module_path = &after_src[..last_slash];
                let filename = &after_src[last_slash + 1..];
                let first_module = module_path.split('/').next().unwrap_or("");
                format!("[{crate_name}/{first_module}] {filename}")
            } else {
                format!("[{crate_name}] {after_src}")
            }
        } else {
            file_path.to_string()
        };

        let location = format!(
            "{}{:<5}{} {}:{}:",
            color_level,
            metadata.level(),
            color_reset,
            formatted_path,
            metadata.line().unwrap_or(0)
        );

        write!(writer, "{location:<60} ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

static INIT_LOG: Once = Once::new();

pub fn get_default_stdout_filter() -> EnvFilter {
    EnvFilter::new("info")
        // The byte cursor and dispatcher loop are chatty at debug.
        .add_directive("al_core::bytecursor=warn".parse().unwrap())
        .add_directive("al_entities::dispatch=info".parse().unwrap())
        // WSC crypto and message handlers are the interesting part.
        .add_directive("al_entities::wsc=debug".parse().unwrap())
        .add_directive("al_entities::handlers=debug".parse().unwrap())
}

/// Raise the default filter by `n` steps (`-v`, `-vv`, ...).
pub fn verbosity_filter(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => get_default_stdout_filter(),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Sets up logging to stdout and, optionally, a verbose log file.
/// The returned guard must be kept alive for file logging to keep working.
pub fn setup_logging(stdout_filter: EnvFilter, logfile: Option<String>) -> Option<WorkerGuard> {
    if let Some(path) = logfile {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("failed to open log file");
        let (file_writer, guard) = tracing_appender::non_blocking(file);

        INIT_LOG.call_once(|| {
            let file_layer = tracingfmt::layer()
                .event_format(AlignedFormatter)
                .with_writer(file_writer)
                .with_ansi(false);
            let stdout_layer = tracingfmt::layer().event_format(AlignedFormatter);

            tracing_subscriber::registry()
                .with(file_layer.with_filter(EnvFilter::new("debug")))
                .with(stdout_layer.with_filter(stdout_filter))
                .init();
        });
        Some(guard)
    } else {
        INIT_LOG.call_once(|| {
            let stdout_layer = tracingfmt::layer().event_format(AlignedFormatter);
            tracing_subscriber::registry()
                .with(stdout_layer.with_filter(stdout_filter))
                .init();
        });
        None
    }
}
