//! SDR Spectrum Engine
//!
//! Hosts the receive side of the spectrum display: a driver callback pushes
//! IQ bursts into a ring buffer, a worker thread drains one full block per
//! tick, windows and transforms it, and publishes a log-power snapshot that
//! display threads copy out on demand.
//!
//! # Modules
//!
//! - [`ring_buffer`] - Power-of-two IQ ring buffer with a drain-ready gate
//! - [`pipeline`] - Single processing tick (drain, window, FFT, shift, publish)
//! - [`snapshot`] - Lock-protected published spectrum
//! - [`engine`] - Worker lifecycle, ingest and reader handles
//! - [`events`] - Change notifications
//! - [`config`] - Defaults and `EngineConfig`
//! - [`error`] - RingError and EngineError
//!
//! # Example
//!
//! ```no_run
//! use sdr_spectrum_engine::{EngineConfig, IqSample, SpectrumEngine, SpectrumEvent};
//!
//! let mut engine = SpectrumEngine::new(EngineConfig::default())?;
//! let ingest = engine.ingest_handle();
//! let reader = engine.reader();
//! let events = reader.subscribe();
//! engine.open()?;
//!
//! ingest.ingest(&[IqSample::ZERO; 4096], false);
//!
//! if let Ok(SpectrumEvent::SpectrumUpdated) = events.recv() {
//!     let mut bins = Vec::new();
//!     reader.get_spectrum(&mut bins);
//! }
//! engine.close();
//! # Ok::<(), sdr_spectrum_engine::EngineError>(())
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod ring_buffer;
pub mod snapshot;

// Re-export commonly used types
pub use config::{EngineConfig, DEFAULT_SPECTRUM_SIZE, DEFAULT_TICK_PERIOD_MS};
pub use engine::{EngineStats, IngestHandle, SpectrumEngine, SpectrumReader};
pub use error::{EngineError, EngineResult, RingError};
pub use events::{EventBus, SpectrumEvent};
pub use pipeline::{SpectrumPipeline, TickOutcome};
pub use ring_buffer::SampleRingBuffer;
pub use snapshot::SpectrumSnapshot;

pub use sdr_spectrum_core::{FrequencyAxis, IqSample, SampleRate};
