//! Process-wide logging setup for hosts embedding the navigation crates.
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! the host's call.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing with the format chosen by `RESERVEI_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}
