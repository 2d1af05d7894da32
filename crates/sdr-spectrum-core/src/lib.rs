//! SDR Spectrum Core Library
//!
//! DSP stages that turn a block of IQ samples into a display spectrum.
//! This crate is `no_std` compatible (it needs `alloc` for coefficient
//! tables) so the same stages can run on a host or a target without an OS.
//!
//! # Modules
//!
//! - [`types`] - Core types: IqSample
//! - [`window`] - Four-term Blackman-Harris window
//! - [`fft`] - Fixed-size radix-2 FFT with precomputed twiddles
//! - [`spectrum`] - Half swap, log-power reduction, frequency axis
//! - [`error`] - DspError and size rounding

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;
pub mod fft;
pub mod spectrum;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use error::{round_up_pow2, DspError, DspResult};
pub use fft::{Direction, Fft, Twiddle};
pub use spectrum::{
    fft_shift, log_power, reduce_log_power, shifted_index, FrequencyAxis, SampleRate,
};
pub use types::IqSample;
pub use window::Window;
