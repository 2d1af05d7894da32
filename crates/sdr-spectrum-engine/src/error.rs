//! Error types for the spectrum engine
//!
//! Centralized error handling using thiserror.

use sdr_spectrum_core::DspError;
use thiserror::Error;

/// Ring buffer configuration and drain errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    #[error("ring buffer capacity must be non-zero")]
    ZeroCapacity,

    #[error("ring buffer capacity {requested} cannot be rounded to a power of two")]
    CapacityOverflow { requested: usize },

    #[error("ring buffer has no storage allocated")]
    Unallocated,

    /// Not a fault: the producer has not delivered a full block yet
    #[error("ring buffer has not accumulated a full block since the last drain")]
    NotReady,

    #[error("destination holds {actual} samples, ring buffer capacity is {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Main error type for the spectrum engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("DSP error: {0}")]
    Dsp(#[from] DspError),

    #[error("Ring buffer error: {0}")]
    Ring(#[from] RingError),

    #[error("Engine is open; close it before resizing")]
    Busy,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for the spectrum engine
pub type EngineResult<T> = std::result::Result<T, EngineError>;
