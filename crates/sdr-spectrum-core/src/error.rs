//! Error type shared by the DSP stages.

use thiserror::Error;

/// Configuration and contract errors raised by window and transform setup
/// or by passing a block of the wrong length.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DspError {
    /// A size of zero was requested.
    #[error("size must be non-zero")]
    ZeroSize,

    /// The requested size cannot be rounded up to a supported power of two.
    #[error("size {requested} exceeds the largest supported block")]
    SizeTooLarge {
        /// Size passed by the caller
        requested: usize,
    },

    /// The block length does not match the configured size.
    #[error("block holds {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Configured size
        expected: usize,
        /// Length of the block that was passed in
        actual: usize,
    },
}

/// Result alias for DSP operations.
pub type DspResult<T> = core::result::Result<T, DspError>;

/// Round a requested block size up to the next power of two.
///
/// # Errors
/// `ZeroSize` for 0, `SizeTooLarge` when the next power of two overflows.
pub fn round_up_pow2(requested: usize) -> DspResult<usize> {
    if requested == 0 {
        return Err(DspError::ZeroSize);
    }
    requested
        .checked_next_power_of_two()
        .ok_or(DspError::SizeTooLarge { requested })
}
