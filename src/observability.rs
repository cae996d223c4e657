//! This module provides the logging setup and diagnostics hooks for a tagging run.
//!
//! A batch job that skips failing issues instead of aborting needs visibility into
//! what it skipped and why. All library code logs through the `log` facade;
//! `init_logging` wires that facade to `env_logger` once per process, and the
//! `log_metric!` macro emits structured key/value lines for per-issue statistics.
//!
//! `log_metric!` is compiled out of release builds by `#[cfg(debug_assertions)]`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::BolimaError;

/// Logs a structured key-value metric string at debug level, only in debug builds.
///
/// # Example
/// ```
/// use bolima::log_metric;
/// let pages = 4;
/// log_metric!("event"="dispatch", "title"="BLM-1943:1", "pages"=&pages);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!(target: "bolima::metrics", "BOLIMA_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Initializes the global logger. Later calls are no-ops.
///
/// `RUST_LOG` still overrides `level` for individual modules. When `log_file` is
/// given, records are appended to that file instead of stderr.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), BolimaError> {
    let target = match log_file {
        Some(filename) => Some(OpenOptions::new().append(true).create(true).open(filename)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);
        builder.parse_default_env();

        builder.format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
