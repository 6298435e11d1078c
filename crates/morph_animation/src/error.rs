//! Animated value error types

use thiserror::Error;

/// Errors raised when configuring animated values and helpers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// An offset window outside `[0, 1]` or with `start > end`
    #[error("invalid offset window {start}..{end} (expected 0 <= start <= end <= 1)")]
    InvalidWindow { start: f32, end: f32 },

    /// A stagger or stretch offset outside `[0, 1]`
    #[error("offset {0} outside [0, 1]")]
    OffsetOutOfRange(f32),
}

/// Result type for value configuration
pub type Result<T> = std::result::Result<T, ValueError>;

/// Validate a `[start, end]` window inside `[0, 1]`
pub(crate) fn check_window(start: f32, end: f32) -> Result<()> {
    if (0.0..=1.0).contains(&start) && (0.0..=1.0).contains(&end) && start <= end {
        Ok(())
    } else {
        Err(ValueError::InvalidWindow { start, end })
    }
}
