//! Log output setup for applications embedding the provider
//!
//! The library only emits `tracing` events; a host binary calls
//! [`init_tracing`] once to have them printed.

use tracing_subscriber::EnvFilter;

/// Error returned when a global subscriber is already installed
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs a formatted stderr subscriber
///
/// `RUST_LOG` takes precedence over `default_level` (e.g. `"info"` or
/// `"imgconf=debug"`).
pub fn init_tracing(default_level: &str) -> Result<(), InitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
