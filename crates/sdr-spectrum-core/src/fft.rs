//! Fixed-size radix-2 FFT with precomputed twiddle factors.
//!
//! The forward pass carries the `1/N` normalization and the inverse pass is
//! unscaled, so `inverse(forward(x)) == x`. The forward kernel is
//! `exp(+2πi·nk/N)` and the inverse `exp(-2πi·nk/N)`. Display calibration
//! downstream depends on both conventions.

use core::f64::consts::PI;

use heapless::Vec;

use crate::error::{round_up_pow2, DspError, DspResult};
use crate::types::IqSample;

/// Capacity of the twiddle table (supports sizes up to 2^32).
pub const MAX_LOG2_SIZE: usize = 32;

/// Default size used by `Fft::default()`.
pub const DEFAULT_FFT_SIZE: usize = 16;

/// Complex rotation coefficient for one butterfly stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Twiddle {
    /// cos(2π / 2^k)
    pub re: f64,
    /// sin(2π / 2^k)
    pub im: f64,
}

/// Transform direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Scaled by `1/N` after the butterflies
    Forward,
    /// Conjugate twiddles, no scaling
    Inverse,
}

/// In-place iterative radix-2 transform over blocks of `size()` samples.
#[derive(Clone, Debug)]
pub struct Fft {
    size: usize,
    log2_size: usize,
    scale: f32,
    /// Entry `k - 1` holds the rotation for angle 2π/2^k
    twiddles: Vec<Twiddle, MAX_LOG2_SIZE>,
}

impl Fft {
    /// Create a transform for `size` samples (rounded up to a power of two).
    ///
    /// # Errors
    /// `ZeroSize` for 0, `SizeTooLarge` past 2^32.
    pub fn new(size: usize) -> DspResult<Self> {
        let mut fft = Self {
            size: 0,
            log2_size: 0,
            scale: 1.0,
            twiddles: Vec::new(),
        };
        fft.set_size(size)?;
        Ok(fft)
    }

    /// Change the transform size and return the effective size.
    ///
    /// The twiddle table is only rebuilt when the effective size changes.
    ///
    /// # Errors
    /// `ZeroSize` for 0, `SizeTooLarge` past 2^32. The previous size is kept.
    pub fn set_size(&mut self, requested: usize) -> DspResult<usize> {
        let size = round_up_pow2(requested)?;
        if size == self.size {
            return Ok(size);
        }

        let log2_size = size.trailing_zeros() as usize;
        if log2_size > MAX_LOG2_SIZE {
            return Err(DspError::SizeTooLarge { requested });
        }

        let twiddles = stage_twiddles(log2_size);

        self.size = size;
        self.log2_size = log2_size;
        self.scale = (1.0 / size as f64) as f32;
        self.twiddles = twiddles;
        Ok(size)
    }

    /// Transform size in samples.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// log2 of the transform size (number of butterfly stages).
    #[must_use]
    pub fn log2_size(&self) -> usize {
        self.log2_size
    }

    /// Precomputed stage rotations.
    #[must_use]
    pub fn twiddles(&self) -> &[Twiddle] {
        &self.twiddles
    }

    /// Transform `block` in place.
    ///
    /// # Errors
    /// `LengthMismatch` if the block is not exactly `size()` samples; the
    /// block is left untouched.
    pub fn process(&self, block: &mut [IqSample], direction: Direction) -> DspResult<()> {
        if block.len() != self.size {
            return Err(DspError::LengthMismatch {
                expected: self.size,
                actual: block.len(),
            });
        }

        match direction {
            Direction::Forward => {
                self.butterflies(block, 1.0);
                for sample in block.iter_mut() {
                    *sample = sample.scale(self.scale);
                }
            }
            Direction::Inverse => self.butterflies(block, -1.0),
        }
        Ok(())
    }

    /// Decimation-in-frequency stages followed by bit-reversal.
    fn butterflies(&self, block: &mut [IqSample], sign: f64) {
        let n = self.size;
        let mut span = n;

        for stage in 1..=self.log2_size {
            let w = self.twiddles[self.log2_size - stage];
            let (w_re, w_im) = (w.re, sign * w.im);
            let half = span >> 1;

            // Running rotation u = w^j, advanced by recurrence
            let (mut u_re, mut u_im) = (1.0f64, 0.0f64);
            for j in 0..half {
                let (ur, ui) = (u_re as f32, u_im as f32);
                for i in (j..n).step_by(span) {
                    let k = i + half;
                    let sum = block[i] + block[k];
                    let diff = block[i] - block[k];
                    block[k] = IqSample::new(diff.i * ur - diff.q * ui, diff.q * ur + diff.i * ui);
                    block[i] = sum;
                }
                let prev = u_re;
                u_re = u_re * w_re - u_im * w_im;
                u_im = u_im * w_re + prev * w_im;
            }
            span = half;
        }

        bit_reverse(block);
    }
}

impl Default for Fft {
    fn default() -> Self {
        let log2_size = DEFAULT_FFT_SIZE.trailing_zeros() as usize;
        Self {
            size: DEFAULT_FFT_SIZE,
            log2_size,
            scale: 1.0 / DEFAULT_FFT_SIZE as f32,
            twiddles: stage_twiddles(log2_size),
        }
    }
}

/// Rotations for angles 2π/2^k, k = 1..=log2_size.
///
/// `log2_size` must not exceed `MAX_LOG2_SIZE`.
fn stage_twiddles(log2_size: usize) -> Vec<Twiddle, MAX_LOG2_SIZE> {
    let mut twiddles = Vec::new();
    for k in 1..=log2_size.min(MAX_LOG2_SIZE) {
        let angle = 2.0 * PI / (1u64 << k) as f64;
        // Bounded by the min() above
        let _ = twiddles.push(Twiddle {
            re: libm::cos(angle),
            im: libm::sin(angle),
        });
    }
    twiddles
}

/// Reorder a power-of-two block into bit-reversed index order.
fn bit_reverse(block: &mut [IqSample]) {
    let n = block.len();
    let mut j = 0;
    for i in 0..n.saturating_sub(1) {
        if i < j {
            block.swap(i, j);
        }
        let mut k = n / 2;
        while k <= j {
            j -= k;
            k /= 2;
        }
        j += k;
    }
}
