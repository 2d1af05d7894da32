//! Spectrum reduction and display axis.
//!
//! Turns a transformed block into the values published to the display:
//! the halves are swapped so DC sits in the centre, then each bin is reduced
//! to `5·ln(I² + Q²)`.

use crate::error::{DspError, DspResult};
use crate::types::IqSample;

/// Factor applied to the natural log of bin power.
///
/// Display calibration expects `5·ln(p)`, not `10·log10(p)`.
pub const LOG_POWER_SCALE: f32 = 5.0;

/// Log-power of a single bin: `5 · ln(I² + Q²)`.
///
/// Zero power yields negative infinity.
#[must_use]
#[inline]
pub fn log_power(sample: IqSample) -> f32 {
    LOG_POWER_SCALE * libm::logf(sample.magnitude_squared())
}

/// Reduce a whole block into `out`.
///
/// # Errors
/// `LengthMismatch` when `out` and `block` differ in length; `out` is not
/// written.
pub fn reduce_log_power(block: &[IqSample], out: &mut [f32]) -> DspResult<()> {
    if block.len() != out.len() {
        return Err(DspError::LengthMismatch {
            expected: block.len(),
            actual: out.len(),
        });
    }
    for (dst, &sample) in out.iter_mut().zip(block) {
        *dst = log_power(sample);
    }
    Ok(())
}

/// Swap block halves so bin 0 (DC) moves to index `len / 2`.
pub fn fft_shift<T>(block: &mut [T]) {
    let half = block.len() / 2;
    block.rotate_left(half);
}

/// Index a transform-order bin occupies after [`fft_shift`].
#[must_use]
pub fn shifted_index(bin: usize, size: usize) -> usize {
    (bin + size / 2) % size
}

/// Receiver sample rates selectable on the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SampleRate {
    /// 48 kHz
    #[default]
    Sr48k,
    /// 96 kHz
    Sr96k,
    /// 192 kHz
    Sr192k,
    /// 384 kHz
    Sr384k,
    /// 768 kHz
    Sr768k,
    /// 1.536 MHz
    Sr1536k,
    /// 1.92 MHz
    Sr1920k,
    /// 2.56 MHz
    Sr2560k,
    /// 3.072 MHz
    Sr3072k,
}

impl SampleRate {
    /// All rates in ascending order (matches the driver's rate index).
    pub const ALL: [Self; 9] = [
        Self::Sr48k,
        Self::Sr96k,
        Self::Sr192k,
        Self::Sr384k,
        Self::Sr768k,
        Self::Sr1536k,
        Self::Sr1920k,
        Self::Sr2560k,
        Self::Sr3072k,
    ];

    /// Rate in samples per second.
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::Sr48k => 48_000,
            Self::Sr96k => 96_000,
            Self::Sr192k => 192_000,
            Self::Sr384k => 384_000,
            Self::Sr768k => 768_000,
            Self::Sr1536k => 1_536_000,
            Self::Sr1920k => 1_920_000,
            Self::Sr2560k => 2_560_000,
            Self::Sr3072k => 3_072_000,
        }
    }

    /// Look up a rate by its driver index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Frequency axis of a shifted spectrum.
///
/// Bin 0 is `-fs/2`, bin `N/2` is DC, the last bin is `fs/2 - fs/N`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyAxis {
    /// Number of bins
    pub fft_size: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl FrequencyAxis {
    /// Axis for `fft_size` bins at `rate`.
    #[must_use]
    pub const fn new(fft_size: usize, rate: SampleRate) -> Self {
        Self {
            fft_size,
            sample_rate: rate.as_hz(),
        }
    }

    /// Frequency resolution (Hz per bin).
    #[must_use]
    pub fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Offset from the tuned frequency for a shifted bin index.
    #[must_use]
    pub fn bin_offset_hz(&self, bin: usize) -> f32 {
        -(self.sample_rate as f32) / 2.0 + bin as f32 * self.bin_width()
    }

    /// Shifted bin index nearest to an offset, if it lies on the axis.
    #[must_use]
    pub fn bin_for_offset(&self, offset_hz: f32) -> Option<usize> {
        let half_span = self.sample_rate as f32 / 2.0;
        let position = (offset_hz + half_span) / self.bin_width() + 0.5;
        if position < 0.0 || position >= self.fft_size as f32 {
            return None;
        }
        Some(position as usize)
    }
}
