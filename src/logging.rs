//! Logging setup for the `docdex` binary.
//!
//! Events go to stderr as `HH:MM:SS.mmm LEVEL target: message`, leaving stdout
//! to command output. Library code logs under the targets `index`, `storage`,
//! `search` and `cli`, so levels can be tuned per area:
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! storage = "debug"
//! ```
//!
//! A set `RUST_LOG` replaces the configured levels entirely:
//! ```bash
//! RUST_LOG=search=trace docdex search "cellular automaton"
//! ```

use std::sync::OnceLock;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Wall-clock time without the date.
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_with_config(config: &LoggingConfig) {
    INSTALLED.get_or_init(|| {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(ClockTime)
            .with_target(true)
            .with_filter(env_filter(config));

        // Another subscriber may already be set (tests, embedding programs).
        let _ = tracing_subscriber::registry().with(layer).try_init();
    });
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(filter_directives(config)),
    }
}

/// `default,target=level,...` with targets sorted for stable output.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();

    std::iter::once(config.default.clone())
        .chain(modules.into_iter().map(|(target, level)| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}
