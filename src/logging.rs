//! Logging setup
//!
//! Diagnostics go through `tracing` to stderr so they never mix with command
//! output on stdout. The filter comes from `SPRIG_LOG` (e.g. `debug` or
//! `sprig::areas=trace`) and defaults to `warn`.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "SPRIG_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<(), TryInitError> {
    Registry::default()
        .with(build_env_filter(std::env::var(LOG_ENV).ok().as_deref()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

/// Filter from `directives`, falling back to the default level when they are
/// missing or unparseable
fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}
