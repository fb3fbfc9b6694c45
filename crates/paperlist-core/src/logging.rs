//! Logging setup with indicatif integration

use indicatif::MultiProgress;

/// HTTP stack crates that are too chatty at debug level
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "native_tls"];

/// ANSI color code and padded label for a log level.
fn level_style(level: log::Level, color: bool) -> (&'static str, &'static str, &'static str) {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return ("", label, "");
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    (ansi, label, "\x1b[0m")
}

/// Default filter string: base level plus `warn` for the HTTP stack.
fn default_filter(quiet: bool, debug: bool) -> String {
    let base = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let mut filter = base.to_string();
    for target in NOISY_TARGETS {
        filter.push_str(&format!(",{target}=warn"));
    }
    filter
}

/// Logger that prints through indicatif `MultiProgress` so log lines do not
/// tear the fetch spinner.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
    with_target: bool,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress, with_target: bool) -> Self {
        Self {
            inner,
            multi,
            with_target,
        }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.matches(record) {
            return;
        }
        let (pre, label, post) = level_style(record.level(), true);
        let line = if self.with_target {
            format!("[{pre}{label}{post} {}] {}", record.target(), record.args())
        } else {
            format!("[{pre}{label}{post}] {}", record.args())
        };
        self.multi.suspend(|| eprintln!("{line}"));
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize logging.
///
/// `RUST_LOG` overrides the computed default. With `multi` (TTY mode) logs go
/// through [`IndicatifLogger`]; otherwise plain `[LEVEL] message` lines
/// without color. Calling it twice is a no-op.
pub fn init_logging(quiet: bool, debug: bool, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(default_filter(quiet, debug));

    if let Some(multi) = multi {
        let logger = env_logger::Builder::from_env(env).build();
        let max_level = logger.filter();
        let logger = IndicatifLogger::new(logger, multi.clone(), debug);
        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(max_level);
        }
    } else {
        let _ = env_logger::Builder::from_env(env)
            .format(move |buf, record| {
                let (_, label, _) = level_style(record.level(), false);
                if debug {
                    writeln!(buf, "[{label} {}] {}", record.target(), record.args())
                } else {
                    writeln!(buf, "[{label}] {}", record.args())
                }
            })
            .try_init();
    }
}
