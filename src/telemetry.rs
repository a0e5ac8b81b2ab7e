//! Log subscriber for the `blockless` binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset: info for this crate, warn for everything else.
pub const DEFAULT_LOG_FILTER: &str = "blockless_swap=info,warn";

/// Installs a compact stderr logger filtered by `RUST_LOG`.
///
/// Stdout stays reserved for command output.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(env_filter)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Log subscriber already installed");
    }
}
