//! Tracing and logging setup shared by the binaries.

/// Tracing configuration (filters, layers, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging using `STOCKPILE_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Initialize process-wide logging with an explicit format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
