//! Tracing/logging setup shared by every process embedding the tracker.

/// Initialize process-wide tracing/logging.
///
/// Output format comes from `ORDERTRACK_LOG_FORMAT` (`json` or `pretty`).
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Initialize with an explicit output format.
pub fn init_with(format: tracing::LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;
