use core::fmt;
use std::fs::OpenOptions;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt as tracingfmt};

#[macro_export]
macro_rules! unimplemented_log {
    ( $($arg:tt)* ) => {{
        tracing::warn!("unimplemented: {}", format_args!($($arg)*));
    }};
}

/// Logs a warning when `cond` does not hold, instead of panicking
#[macro_export]
macro_rules! assert_warn {
    ($cond:expr, $($arg:tt)+) => {{
        if !$cond {
            tracing::warn!(
                target: module_path!(),
                "assertion `{}` failed: {} at {}:{}",
                stringify!($cond),
                format_args!($($arg)+),
                file!(),
                line!(),
            );
        }
    }};
}

/// Per-target levels on the console when RUST_LOG is not set
const STDOUT_DIRECTIVES: &[&str] = &[
    "info",
    // Field-level codec chatter
    "q931_core::bitbuffer=warn",
    "q931_ies=info",
    // Timer start/stop on every message
    "q931_lib::timer=info",
    "q931_lib=debug",
];

const LOGFILE_DIRECTIVES: &[&str] = &["debug", "q931_lib::timer=trace"];

fn filter_from(directives: &[&str]) -> EnvFilter {
    directives
        .iter()
        .filter_map(|d| d.parse().ok())
        .fold(EnvFilter::default(), |f, d| f.add_directive(d))
}

/// `intf` and `callref` fields of an event; they get their own columns
#[derive(Default)]
struct CallContext {
    intf: Option<String>,
    callref: Option<String>,
}

impl tracing::field::Visit for CallContext {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "intf" => self.intf = Some(format!("{:?}", value)),
            "callref" => self.callref = Some(format!("{:?}", value)),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "intf" => self.intf = Some(value.to_string()),
            "callref" => self.callref = Some(value.to_string()),
            _ => {}
        }
    }
}

/// Drops `name=value ` from a formatted field list
fn strip_field(fields: &mut String, name: &str) {
    let key = format!("{}=", name);
    let Some(start) = fields.find(&key) else { return };
    match fields[start..].find(' ') {
        Some(len) => fields.replace_range(start..start + len + 1, ""),
        None => fields.truncate(start),
    }
}

/// "crates/q931-lib/src/call/clearing.rs" as "lib/call clearing.rs"
fn short_location(file: &str) -> String {
    let Some((before, after)) = file.split_once("/src/") else {
        return file.to_string();
    };
    let krate = before.rsplit('/').next().unwrap_or(before);
    let krate = krate.strip_prefix("q931-").unwrap_or(krate);
    match after.rsplit_once('/') {
        Some((dir, name)) => format!("{}/{} {}", krate, dir.split('/').next().unwrap_or(dir), name),
        None => format!("{} {}", krate, after),
    }
}

/// "LEVEL intf callref location:line: message", with the message aligned in one column
struct CallFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for CallFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: format::Writer<'_>, event: &tracing::Event<'_>) -> fmt::Result {
        let metadata = event.metadata();
        let mut context = CallContext::default();
        event.record(&mut context);

        let mut fields = String::new();
        ctx.field_format().format_fields(format::Writer::new(&mut fields), event)?;
        if context.intf.is_some() {
            strip_field(&mut fields, "intf");
        }
        if context.callref.is_some() {
            strip_field(&mut fields, "callref");
        }

        let color = match *metadata.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            tracing::Level::DEBUG => "\x1b[34m",
            tracing::Level::TRACE => "\x1b[35m",
        };
        let level = if self.ansi {
            format!("{}{:<5}\x1b[0m", color, metadata.level())
        } else {
            format!("{:<5}", metadata.level())
        };

        let prefix = format!(
            "{} {:<4} {:<7} {}:{}:",
            level,
            context.intf.unwrap_or_default(),
            context.callref.unwrap_or_default(),
            short_location(metadata.file().unwrap_or("unknown")),
            metadata.line().unwrap_or(0)
        );
        let width = if self.ansi { 68 } else { 59 };
        writeln!(writer, "{:<width$} {}", prefix, fields, width = width)
    }
}

static INIT_LOG: Once = Once::new();

/// Trace everything to stdout. For unit tests; later calls are no-ops.
pub fn setup_logging_verbose() {
    setup_logging(EnvFilter::new("trace"), None);
}

/// Console logging at the default levels, or as RUST_LOG says, plus an optional debug-level log file.
/// The returned guard flushes the file and must be kept alive.
pub fn setup_logging_default(verbose_logfile: Option<String>) -> Option<WorkerGuard> {
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_from(STDOUT_DIRECTIVES));
    let logfile = verbose_logfile.map(|file| (file, filter_from(LOGFILE_DIRECTIVES)));
    setup_logging(stdout_filter, logfile)
}

fn setup_logging(stdout_filter: EnvFilter, logfile: Option<(String, EnvFilter)>) -> Option<WorkerGuard> {
    let file = logfile.and_then(|(path, filter)| match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => Some((f, filter)),
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path, e);
            None
        }
    });

    match file {
        Some((file, filter)) => {
            let stdout_layer = tracingfmt::layer().event_format(CallFormatter { ansi: true }).with_filter(stdout_filter);
            let (file_writer, guard) = tracing_appender::non_blocking(file);
            INIT_LOG.call_once(|| {
                let file_layer = tracingfmt::layer()
                    .event_format(CallFormatter { ansi: false })
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(filter);
                tracing_subscriber::registry().with(file_layer).with(stdout_layer).init();
            });
            Some(guard)
        }
        None => {
            let stdout_layer = tracingfmt::layer().event_format(CallFormatter { ansi: true }).with_filter(stdout_filter);
            INIT_LOG.call_once(|| {
                tracing_subscriber::registry().with(stdout_layer).init();
            });
            None
        }
    }
}
