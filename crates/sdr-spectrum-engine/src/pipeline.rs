//! One processing tick: drain, window, transform, shift, publish
//!
//! `SpectrumPipeline` owns the window, the transform and the reusable sample
//! block. The engine calls `tick` once per period; nothing is allocated on
//! that path.

use sdr_spectrum_core::{fft_shift, Direction, Fft, IqSample, Window};

use crate::error::{EngineResult, RingError};
use crate::ring_buffer::SampleRingBuffer;
use crate::snapshot::SpectrumSnapshot;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A fresh spectrum was written to the snapshot
    Published,
    /// The ring buffer had no full block; nothing was processed
    Underrun,
}

/// Window + FFT stages and their working block
#[derive(Debug, Clone)]
pub struct SpectrumPipeline {
    window: Window,
    fft: Fft,
    block: Vec<IqSample>,
}

impl SpectrumPipeline {
    /// Build the stages for `size` samples (rounded up to a power of two)
    pub fn new(size: usize) -> EngineResult<Self> {
        let fft = Fft::new(size)?;
        let window = Window::new(fft.size())?;
        let block = vec![IqSample::ZERO; fft.size()];
        Ok(Self { window, fft, block })
    }

    /// Block size in samples
    pub fn size(&self) -> usize {
        self.block.len()
    }

    /// Working block after the last successful tick (shifted spectrum)
    pub fn block(&self) -> &[IqSample] {
        &self.block
    }

    /// Re-derive window, twiddles and block for a new size
    pub fn resize(&mut self, size: usize) -> EngineResult<usize> {
        let size = self.fft.set_size(size)?;
        self.window.set_size(size)?;
        self.block.clear();
        self.block.resize(size, IqSample::ZERO);
        Ok(size)
    }

    /// Run one tick against `ring`, publishing into `snapshot`.
    ///
    /// A ring buffer that has not filled since the last drain is an
    /// under-run: the tick stops before touching the block or the snapshot.
    pub fn tick(
        &mut self,
        ring: &SampleRingBuffer,
        snapshot: &SpectrumSnapshot,
    ) -> EngineResult<TickOutcome> {
        match ring.read_all(&mut self.block) {
            Ok(()) => {}
            Err(RingError::NotReady) => return Ok(TickOutcome::Underrun),
            Err(err) => return Err(err.into()),
        }

        self.window.process(&mut self.block)?;
        self.fft.process(&mut self.block, Direction::Forward)?;
        fft_shift(&mut self.block);
        snapshot.publish(&self.block)?;

        Ok(TickOutcome::Published)
    }
}
