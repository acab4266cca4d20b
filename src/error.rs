use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError – caller-contract violations
// ---------------------------------------------------------------------------

/// A parameter rejected before any computation runs.
///
/// Data problems (malformed rows) are *not* errors of this kind: they are
/// skipped and counted at load time. `ConfigError` is reserved for values the
/// caller controls directly, so each variant names the offending parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("prior belief C must be within [{min}, {max}], got {value}")]
    PriorOutOfRange { value: f64, min: f64, max: f64 },

    #[error("confidence weight m must be within [{min}, {max}], got {value}")]
    WeightOutOfRange { value: u32, min: u32, max: u32 },

    #[error("{name} range is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
}
