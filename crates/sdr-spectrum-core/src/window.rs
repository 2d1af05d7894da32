//! Blackman-Harris window.
//!
//! Four-term window applied to each block before the transform to keep
//! spectral leakage below the display floor.

use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::error::{round_up_pow2, DspError, DspResult};
use crate::types::IqSample;

const A0: f64 = 0.363_581_9;
const A1: f64 = 0.489_177_5;
const A2: f64 = 0.136_599_5;
const A3: f64 = 0.010_641_1;

/// Precomputed window coefficients for one block size.
#[derive(Clone, Debug, Default)]
pub struct Window {
    coeffs: Vec<f32>,
}

impl Window {
    /// Create a window for `size` samples (rounded up to a power of two).
    ///
    /// # Errors
    /// Fails for a size of zero.
    pub fn new(size: usize) -> DspResult<Self> {
        let mut window = Self::default();
        window.set_size(size)?;
        Ok(window)
    }

    /// Recompute coefficients for a new size and return the effective size.
    ///
    /// Calling again with the effective size leaves the table untouched.
    ///
    /// # Errors
    /// Fails for a size of zero.
    pub fn set_size(&mut self, size: usize) -> DspResult<usize> {
        let size = round_up_pow2(size)?;
        if size == self.coeffs.len() {
            return Ok(size);
        }

        let denom = (size.max(2) - 1) as f64;
        self.coeffs.clear();
        self.coeffs.resize(size, 0.0);

        // Mirror the first half so w[i] == w[n - 1 - i] holds exactly
        for i in 0..size.div_ceil(2) {
            let w = coefficient(i, denom);
            self.coeffs[i] = w;
            self.coeffs[size - 1 - i] = w;
        }

        Ok(size)
    }

    /// Number of coefficients.
    #[must_use]
    pub fn size(&self) -> usize {
        self.coeffs.len()
    }

    /// Coefficient table.
    #[must_use]
    pub fn coefficients(&self) -> &[f32] {
        &self.coeffs
    }

    /// Multiply I and Q of every sample by its coefficient.
    ///
    /// # Errors
    /// `LengthMismatch` if the block is not exactly `size()` samples; the
    /// block is left untouched.
    pub fn process(&self, block: &mut [IqSample]) -> DspResult<()> {
        if block.len() != self.coeffs.len() {
            return Err(DspError::LengthMismatch {
                expected: self.coeffs.len(),
                actual: block.len(),
            });
        }

        for (sample, &w) in block.iter_mut().zip(&self.coeffs) {
            *sample = sample.scale(w);
        }
        Ok(())
    }
}

fn coefficient(index: usize, denom: f64) -> f32 {
    let x = 2.0 * PI * index as f64 / denom;
    (A0 - A1 * libm::cos(x) + A2 * libm::cos(2.0 * x) - A3 * libm::cos(3.0 * x)) as f32
}
