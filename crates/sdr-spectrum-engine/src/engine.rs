//! Spectrum engine
//!
//! Runs the processing tick on a dedicated thread at a fixed period and
//! publishes a lock-protected snapshot plus an overload flag. The driver
//! feeds samples through an `IngestHandle`; the display pulls spectra through
//! a `SpectrumReader` and listens for `SpectrumEvent`s.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use log::{debug, info, trace, warn};
use parking_lot::Mutex;
use sdr_spectrum_core::IqSample;

use crate::config::{EngineConfig, WORKER_THREAD_NAME};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, SpectrumEvent};
use crate::pipeline::{SpectrumPipeline, TickOutcome};
use crate::ring_buffer::SampleRingBuffer;
use crate::snapshot::SpectrumSnapshot;

/// Counter snapshot returned by `SpectrumEngine::stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Ticks run, published or not
    pub ticks: u64,
    /// Ticks that wrote a new snapshot
    pub published: u64,
    /// Ticks skipped because the ring buffer had not filled
    pub underruns: u64,
    /// Worker threads started over the engine's lifetime
    pub workers_started: u64,
}

/// Atomic counters for the hot path (lock-free)
#[derive(Default)]
struct EngineCounters {
    ticks: AtomicU64,
    published: AtomicU64,
    underruns: AtomicU64,
    workers_started: AtomicU64,
}

impl EngineCounters {
    fn snapshot(&self) -> EngineStats {
        EngineStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            underruns: self.underruns.load(Ordering::Relaxed),
            workers_started: self.workers_started.load(Ordering::Relaxed),
        }
    }
}

/// State shared by the engine, its worker and all handles
struct Shared {
    ring: SampleRingBuffer,
    pipeline: Mutex<SpectrumPipeline>,
    snapshot: SpectrumSnapshot,
    overload: AtomicBool,
    bus: EventBus,
    counters: EngineCounters,
}

impl Shared {
    fn ingest(&self, samples: &[IqSample], overload: bool) -> bool {
        if let Err(e) = self.ring.write(samples) {
            trace!("dropped {} samples: {}", samples.len(), e);
        }
        self.set_overload(overload);
        true
    }

    fn set_overload(&self, state: bool) {
        if self.overload.swap(state, Ordering::AcqRel) != state {
            debug!("ADC overload {}", if state { "set" } else { "cleared" });
            self.bus.emit(SpectrumEvent::OverloadChanged(state));
        }
    }

    fn tick(&self) -> TickOutcome {
        self.counters.ticks.fetch_add(1, Ordering::Relaxed);

        let outcome = self.pipeline.lock().tick(&self.ring, &self.snapshot);
        match outcome {
            Ok(TickOutcome::Published) => {
                self.counters.published.fetch_add(1, Ordering::Relaxed);
                self.bus.emit(SpectrumEvent::SpectrumUpdated);
                TickOutcome::Published
            }
            Ok(TickOutcome::Underrun) => {
                self.counters.underruns.fetch_add(1, Ordering::Relaxed);
                trace!("tick skipped: {} samples pending", self.ring.pending());
                TickOutcome::Underrun
            }
            Err(e) => {
                warn!("tick failed: {}", e);
                self.counters.underruns.fetch_add(1, Ordering::Relaxed);
                TickOutcome::Underrun
            }
        }
    }

    fn get_spectrum(&self, dst: &mut Vec<f32>) {
        self.snapshot.copy_into(dst);
    }
}

/// Running worker and its stop signal
struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodic IQ-to-spectrum engine with explicit open/close lifecycle
pub struct SpectrumEngine {
    config: EngineConfig,
    shared: Arc<Shared>,
    worker: Option<Worker>,
}

impl SpectrumEngine {
    /// Create a closed engine sized by `config`.
    ///
    /// Fails on an invalid configuration.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;

        let pipeline = SpectrumPipeline::new(config.spectrum_size)?;
        let size = pipeline.size();
        let ring = SampleRingBuffer::new(size)?;

        let shared = Arc::new(Shared {
            ring,
            pipeline: Mutex::new(pipeline),
            snapshot: SpectrumSnapshot::new(size),
            overload: AtomicBool::new(false),
            bus: EventBus::new(),
            counters: EngineCounters::default(),
        });

        Ok(Self {
            config: EngineConfig {
                spectrum_size: size,
                ..config
            },
            shared,
            worker: None,
        })
    }

    /// Engine with the default 4096-bin, 50 ms configuration
    pub fn with_defaults() -> EngineResult<Self> {
        Self::new(EngineConfig::default())
    }

    /// Start the processing loop. Does nothing if already open.
    pub fn open(&mut self) -> EngineResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let shared = Arc::clone(&self.shared);
        let period = self.config.tick_period;

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || Self::run(shared, stop_rx, period))
            .map_err(EngineError::Spawn)?;

        self.worker = Some(Worker { stop_tx, handle });
        info!(
            "spectrum engine opened: {} bins every {:?}",
            self.config.spectrum_size, period
        );
        Ok(())
    }

    /// Stop the processing loop and wait for it to exit. Does nothing if
    /// already closed.
    ///
    /// Once this returns no further snapshot writes or notifications come
    /// from the worker.
    pub fn close(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        // A send error means the worker already exited
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            warn!("spectrum worker panicked");
        }
        info!("spectrum engine closed");
    }

    /// Whether the processing loop is running
    pub fn is_open(&self) -> bool {
        self.worker.is_some()
    }

    /// Run one tick on the calling thread
    pub fn tick(&self) -> TickOutcome {
        self.shared.tick()
    }

    /// Driver callback entry point. Always acknowledges.
    pub fn ingest(&self, samples: &[IqSample], overload: bool) -> bool {
        self.shared.ingest(samples, overload)
    }

    /// Copy the latest spectrum into `dst`, resizing it to the bin count
    pub fn get_spectrum(&self, dst: &mut Vec<f32>) {
        self.shared.get_spectrum(dst);
    }

    /// Last overload state reported by the driver
    pub fn is_overloaded(&self) -> bool {
        self.shared.overload.load(Ordering::Acquire)
    }

    /// Subscribe to spectrum and overload notifications
    pub fn subscribe(&self) -> Receiver<SpectrumEvent> {
        self.shared.bus.subscribe()
    }

    /// Cloneable handle for the driver's sample callback
    pub fn ingest_handle(&self) -> IngestHandle {
        IngestHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Cloneable handle for display threads
    pub fn reader(&self) -> SpectrumReader {
        SpectrumReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of bins per spectrum
    pub fn spectrum_size(&self) -> usize {
        self.config.spectrum_size
    }

    /// Effective configuration (size already rounded)
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Counter snapshot
    pub fn stats(&self) -> EngineStats {
        self.shared.counters.snapshot()
    }

    /// Change the spectrum size while closed and return the effective size.
    ///
    /// Ring buffer, window, transform and snapshot are re-derived together.
    /// Refused with `EngineError::Busy` while open.
    pub fn resize(&mut self, size: usize) -> EngineResult<usize> {
        if self.is_open() {
            return Err(EngineError::Busy);
        }
        self.config.with_spectrum_size(size).validate()?;

        let size = self.shared.pipeline.lock().resize(size)?;
        self.shared.ring.resize(size)?;
        self.shared.snapshot.resize(size);
        self.config.spectrum_size = size;

        info!("spectrum engine resized to {} bins", size);
        Ok(size)
    }

    /// The worker loop
    fn run(shared: Arc<Shared>, stop_rx: Receiver<()>, period: Duration) {
        shared.counters.workers_started.fetch_add(1, Ordering::Relaxed);
        debug!("spectrum worker started");

        let ticker = tick(period);
        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => {
                    shared.tick();
                }
            }
        }

        debug!("spectrum worker stopped");
    }
}

impl Drop for SpectrumEngine {
    fn drop(&mut self) {
        self.close();
    }
}

/// Producer-side handle passed to the driver callback
#[derive(Clone)]
pub struct IngestHandle {
    shared: Arc<Shared>,
}

impl IngestHandle {
    /// Write a burst and update the overload flag. Always returns `true`.
    pub fn ingest(&self, samples: &[IqSample], overload: bool) -> bool {
        self.shared.ingest(samples, overload)
    }
}

/// Consumer-side handle for display threads
#[derive(Clone)]
pub struct SpectrumReader {
    shared: Arc<Shared>,
}

impl SpectrumReader {
    /// Copy the latest spectrum into `dst`, resizing it to the bin count
    pub fn get_spectrum(&self, dst: &mut Vec<f32>) {
        self.shared.get_spectrum(dst);
    }

    /// Last overload state reported by the driver
    pub fn is_overloaded(&self) -> bool {
        self.shared.overload.load(Ordering::Acquire)
    }

    /// Subscribe to spectrum and overload notifications
    pub fn subscribe(&self) -> Receiver<SpectrumEvent> {
        self.shared.bus.subscribe()
    }

    /// Number of bins currently published
    pub fn spectrum_size(&self) -> usize {
        self.shared.snapshot.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_engine() -> SpectrumEngine {
        SpectrumEngine::new(
            EngineConfig::default()
                .with_spectrum_size(64)
                .with_tick_period(Duration::from_millis(5)),
        )
        .unwrap()
    }

    #[test]
    fn new_engine_is_closed() {
        let engine = small_engine();
        assert!(!engine.is_open());
        assert_eq!(engine.spectrum_size(), 64);
        assert_eq!(engine.stats(), EngineStats::default());
        assert!(!engine.is_overloaded());
    }

    #[test]
    fn new_rounds_configured_size() {
        let engine = SpectrumEngine::new(EngineConfig::default().with_spectrum_size(3000)).unwrap();
        assert_eq!(engine.spectrum_size(), 4096);
        assert_eq!(engine.config().spectrum_size, 4096);
    }

    #[test]
    fn invalid_config_rejected() {
        let result = SpectrumEngine::new(EngineConfig::default().with_spectrum_size(0));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn open_close_idempotent() {
        let mut engine = small_engine();
        engine.close();
        assert!(!engine.is_open());

        engine.open().unwrap();
        engine.open().unwrap();
        assert!(engine.is_open());

        engine.close();
        engine.close();
        assert!(!engine.is_open());
        assert_eq!(engine.stats().workers_started, 1);
    }

    #[test]
    fn reopen_starts_new_worker() {
        let mut engine = small_engine();
        engine.open().unwrap();
        engine.close();
        engine.open().unwrap();
        engine.close();
        assert_eq!(engine.stats().workers_started, 2);
    }

    #[test]
    fn manual_tick_counts_underrun() {
        let engine = small_engine();
        assert_eq!(engine.tick(), TickOutcome::Underrun);

        engine.ingest(&[IqSample::new(1.0, 0.0); 64], false);
        assert_eq!(engine.tick(), TickOutcome::Published);

        let stats = engine.stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.underruns, 1);
    }

    #[test]
    fn resize_refused_while_open() {
        let mut engine = small_engine();
        engine.open().unwrap();
        assert!(matches!(engine.resize(128), Err(EngineError::Busy)));
        engine.close();

        assert_eq!(engine.resize(100).unwrap(), 128);
        assert_eq!(engine.spectrum_size(), 128);

        let mut out = Vec::new();
        engine.get_spectrum(&mut out);
        assert_eq!(out.len(), 128);
        assert_eq!(engine.reader().spectrum_size(), 128);
    }

    #[test]
    fn resize_rejects_zero() {
        let mut engine = small_engine();
        assert!(engine.resize(0).is_err());
        assert_eq!(engine.spectrum_size(), 64);
    }
}
