use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging to stderr. Call once at startup.
///
/// Level is INFO unless overridden by `RUST_LOG`. Repeated calls are ignored.
pub fn init_logging() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(make_filter())
        .with(stderr_layer)
        .try_init();
}
