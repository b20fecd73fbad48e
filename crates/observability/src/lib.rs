//! Tracing/logging setup shared by every binary.

use serde::Deserialize;

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line (default; what log shippers expect).
    #[default]
    Json,
    /// Human-readable, for local development.
    Pretty,
}

/// Initialize process-wide observability with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize process-wide observability with an explicit output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
