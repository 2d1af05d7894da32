//! Core sample type for IQ spectrum processing.

/// IQ sample pair representing complex baseband signal.
///
/// In-phase (I) and Quadrature (Q) components are the real and imaginary
/// parts of one ADC measurement. Blocks of these flow from the ring buffer
/// through the window and transform stages.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IqSample {
    /// In-phase component (real part)
    pub i: f32,
    /// Quadrature component (imaginary part)
    pub q: f32,
}

impl IqSample {
    /// Create a new IQ sample.
    #[must_use]
    #[inline]
    pub const fn new(i: f32, q: f32) -> Self {
        Self { i, q }
    }

    /// Create an IQ sample from a real value (Q = 0).
    #[must_use]
    #[inline]
    pub const fn from_real(i: f32) -> Self {
        Self { i, q: 0.0 }
    }

    /// Unit-magnitude sample at the given phase in radians.
    #[must_use]
    pub fn from_phase(phase: f64) -> Self {
        Self {
            i: libm::cos(phase) as f32,
            q: libm::sin(phase) as f32,
        }
    }

    /// Zero sample.
    pub const ZERO: Self = Self { i: 0.0, q: 0.0 };

    /// Calculate magnitude (absolute value).
    #[must_use]
    #[inline]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.magnitude_squared())
    }

    /// Calculate magnitude squared, i.e. instantaneous power.
    #[must_use]
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.i * self.i + self.q * self.q
    }

    /// Complex multiply with another sample.
    #[must_use]
    #[inline]
    pub fn multiply(&self, other: Self) -> Self {
        Self {
            i: self.i * other.i - self.q * other.q,
            q: self.i * other.q + self.q * other.i,
        }
    }

    /// Complex conjugate (negate Q component).
    #[must_use]
    #[inline]
    pub const fn conjugate(&self) -> Self {
        Self {
            i: self.i,
            q: -self.q,
        }
    }

    /// Scale both components by a real factor.
    #[must_use]
    #[inline]
    pub fn scale(&self, factor: f32) -> Self {
        Self {
            i: self.i * factor,
            q: self.q * factor,
        }
    }
}

impl core::ops::Add for IqSample {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            i: self.i + other.i,
            q: self.q + other.q,
        }
    }
}

impl core::ops::Sub for IqSample {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            i: self.i - other.i,
            q: self.q - other.q,
        }
    }
}

impl core::ops::Mul<f32> for IqSample {
    type Output = Self;

    fn mul(self, factor: f32) -> Self {
        self.scale(factor)
    }
}

impl core::ops::Mul for IqSample {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.multiply(other)
    }
}
