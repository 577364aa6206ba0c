//! Tracing/logging setup shared by binaries.

/// Initialize process-wide tracing in the format named by `VITRINE_LOG_FORMAT`
/// (JSON when unset or unrecognized).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("VITRINE_LOG_FORMAT")
        .ok()
        .and_then(|f| f.parse().ok())
        .unwrap_or_default();
    tracing::init(format);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;
