//! Optional ready-made tracing subscriber.
//!
//! The crate only emits spans and events; installing a subscriber is the
//! host's call. Hosts without their own can use [`init_tracing`], which reads
//! `RUST_LOG` (defaulting to `warn`).

#[cfg(feature = "tracing")]
use tracing_subscriber::{EnvFilter, fmt};

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already set.
#[cfg(feature = "tracing")]
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// No-op without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub fn init_tracing() -> bool {
    false
}
