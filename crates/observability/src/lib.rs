//! Tracing setup shared by every entry point of the engine.

/// Initialize process-wide tracing with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use self::tracing::{init_for_tests, init_with_default_filter};
