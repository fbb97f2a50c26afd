//! Tracing subscriber setup for the `ecdeploy` binary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: Level = Level::WARN;

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when a global subscriber is already installed, so tests and
/// embedding providers can install their own first.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(DEFAULT_LEVEL.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
