//! Engine configuration and defaults
//!
//! Compile-time defaults for the spectrum engine plus the runtime
//! `EngineConfig` handed to `SpectrumEngine::new`.

use std::time::Duration;

use crate::error::{EngineError, EngineResult};

/// Spectrum length in bins, also the ring buffer capacity in samples
pub const DEFAULT_SPECTRUM_SIZE: usize = 4096;

/// Processing period of the worker loop in milliseconds (20 updates/s)
pub const DEFAULT_TICK_PERIOD_MS: u64 = 50;

/// Largest spectrum size accepted by `EngineConfig::validate` (2^24 bins)
pub const MAX_SPECTRUM_SIZE: usize = 1 << 24;

/// Name given to the worker thread
pub const WORKER_THREAD_NAME: &str = "spectrum-engine";

/// Runtime configuration for `SpectrumEngine`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Requested spectrum size; rounded up to a power of two
    pub spectrum_size: usize,
    /// Interval between processing ticks
    pub tick_period: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spectrum_size: DEFAULT_SPECTRUM_SIZE,
            tick_period: Duration::from_millis(DEFAULT_TICK_PERIOD_MS),
        }
    }
}

impl EngineConfig {
    /// Replace the spectrum size
    #[must_use]
    pub fn with_spectrum_size(mut self, size: usize) -> Self {
        self.spectrum_size = size;
        self
    }

    /// Replace the tick period
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Spectrum size after rounding up to a power of two
    #[must_use]
    pub fn effective_size(&self) -> usize {
        self.spectrum_size
            .checked_next_power_of_two()
            .unwrap_or(usize::MAX)
    }

    /// Check that the configuration describes a usable engine
    ///
    /// # Errors
    /// `InvalidConfig` for a zero or oversized spectrum, or a zero period.
    pub fn validate(&self) -> EngineResult<()> {
        if self.spectrum_size == 0 {
            return Err(EngineError::InvalidConfig(
                "spectrum size must be non-zero".to_string(),
            ));
        }
        if self.spectrum_size > MAX_SPECTRUM_SIZE {
            return Err(EngineError::InvalidConfig(format!(
                "spectrum size {} exceeds {}",
                self.spectrum_size, MAX_SPECTRUM_SIZE
            )));
        }
        if self.tick_period.is_zero() {
            return Err(EngineError::InvalidConfig(
                "tick period must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
