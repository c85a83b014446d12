//! Log output.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "veneer=info,veneer_core=info";

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already installed.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(filter()).init();
}

/// Like [`init`], but returns false instead of panicking if a subscriber is already installed.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .try_init()
        .is_ok()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
