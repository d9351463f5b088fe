//! Tracing and logging setup shared by engine hosts, tests and benches.

/// Initialize process-wide tracing with the environment's settings.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogFormat, init_with};
