//! IQ ring buffer between the driver callback and the spectrum worker
//!
//! The producer writes bursts of any length; the consumer drains exactly one
//! full buffer at a time. A drain always returns the most recent `capacity`
//! samples, so a slow consumer sees the newest data and older, never-drained
//! samples are silently overwritten.
//!
//! Storage and cursors live behind one `parking_lot::Mutex`. Capacity, the
//! accumulation counter and the drain-ready gate are mirrored in atomics so a
//! consumer can poll readiness without taking the lock.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use sdr_spectrum_core::IqSample;

use crate::error::RingError;

/// Storage and cursors (guarded by the mutex)
#[derive(Debug, Default)]
struct RingState {
    buffer: Vec<IqSample>,
    mask: usize,
    read_pos: usize,
    write_pos: usize,
}

/// Fixed-capacity, power-of-two circular buffer of IQ samples
#[derive(Debug, Default)]
pub struct SampleRingBuffer {
    state: Mutex<RingState>,
    capacity: AtomicUsize,
    /// Samples written since the last drain, saturating at capacity
    pending: AtomicUsize,
    ready: AtomicBool,
}

impl SampleRingBuffer {
    /// Create a buffer holding at least `requested` samples.
    ///
    /// # Errors
    /// `ZeroCapacity` for 0, `CapacityOverflow` if rounding overflows.
    pub fn new(requested: usize) -> Result<Self, RingError> {
        let ring = Self::default();
        ring.resize(requested)?;
        Ok(ring)
    }

    /// Round `requested` up to a power of two and reallocate.
    ///
    /// Discards accumulation, resets both cursors and re-arms writing. A
    /// request that maps to the current capacity changes nothing. Must not
    /// race with an active producer/consumer pair.
    ///
    /// # Errors
    /// `ZeroCapacity` for 0, `CapacityOverflow` if rounding overflows. The
    /// buffer is left as it was.
    pub fn resize(&self, requested: usize) -> Result<usize, RingError> {
        if requested == 0 {
            return Err(RingError::ZeroCapacity);
        }
        let capacity = requested
            .checked_next_power_of_two()
            .ok_or(RingError::CapacityOverflow { requested })?;

        let mut state = self.state.lock();
        if capacity == state.buffer.len() {
            return Ok(capacity);
        }

        self.ready.store(false, Ordering::Release);
        self.pending.store(0, Ordering::Release);

        state.buffer.clear();
        state.buffer.resize(capacity, IqSample::ZERO);
        state.mask = capacity - 1;
        state.read_pos = 0;
        state.write_pos = 0;

        self.capacity.store(capacity, Ordering::Release);
        Ok(capacity)
    }

    /// Capacity in samples (0 before the first successful resize)
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Whether storage has been allocated
    pub fn is_allocated(&self) -> bool {
        self.capacity() != 0
    }

    /// Whether a full buffer has accumulated since the last drain
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Samples accumulated since the last drain (at most `capacity()`)
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Append a burst at the write cursor, wrapping modulo capacity.
    ///
    /// A burst longer than the buffer overwrites itself; only its last
    /// `capacity` samples survive, at the positions a linear write would
    /// leave them. An empty burst is a no-op.
    ///
    /// # Errors
    /// `Unallocated` if the buffer has no storage.
    pub fn write(&self, samples: &[IqSample]) -> Result<(), RingError> {
        let mut guard = self.state.lock();
        let RingState {
            buffer,
            mask,
            write_pos,
            ..
        } = &mut *guard;

        let capacity = buffer.len();
        if capacity == 0 {
            return Err(RingError::Unallocated);
        }
        if samples.is_empty() {
            return Ok(());
        }

        let skip = samples.len().saturating_sub(capacity);
        let src = &samples[skip..];
        let start = (*write_pos + skip) & *mask;

        let first = src.len().min(capacity - start);
        buffer[start..start + first].copy_from_slice(&src[..first]);
        let rest = src.len() - first;
        buffer[..rest].copy_from_slice(&src[first..]);
        *write_pos = (start + src.len()) & *mask;

        let pending = self
            .pending
            .load(Ordering::Acquire)
            .saturating_add(samples.len())
            .min(capacity);
        self.pending.store(pending, Ordering::Release);
        self.ready.store(pending == capacity, Ordering::Release);

        Ok(())
    }

    /// Drain the most recent `capacity` samples, oldest first.
    ///
    /// On success the gate closes, accumulation restarts from zero and the
    /// read cursor moves to the write cursor.
    ///
    /// # Errors
    /// `LengthMismatch` if `dst.len() != capacity()`, `NotReady` if a full
    /// buffer has not accumulated. Nothing changes on error.
    pub fn read_all(&self, dst: &mut [IqSample]) -> Result<(), RingError> {
        let mut guard = self.state.lock();
        let capacity = guard.buffer.len();

        if dst.len() != capacity {
            return Err(RingError::LengthMismatch {
                expected: capacity,
                actual: dst.len(),
            });
        }
        if !self.ready.load(Ordering::Acquire) {
            return Err(RingError::NotReady);
        }

        // Close the gate before copying
        self.ready.store(false, Ordering::Release);
        self.pending.store(0, Ordering::Release);

        let RingState {
            buffer,
            read_pos,
            write_pos,
            ..
        } = &mut *guard;
        *read_pos = *write_pos;

        let tail = capacity - *read_pos;
        dst[..tail].copy_from_slice(&buffer[*read_pos..]);
        dst[tail..].copy_from_slice(&buffer[..*read_pos]);

        Ok(())
    }

    /// Reset cursors, accumulation and gate. Contents are not zeroed.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        self.ready.store(false, Ordering::Release);
        self.pending.store(0, Ordering::Release);
        state.read_pos = 0;
        state.write_pos = 0;
    }

    /// Overwrite every slot with `value`
    pub fn fill(&self, value: IqSample) {
        self.state.lock().buffer.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: usize, len: usize) -> Vec<IqSample> {
        (start..start + len)
            .map(|n| IqSample::new(n as f32, -(n as f32)))
            .collect()
    }

    #[test]
    fn new_rounds_up() {
        let ring = SampleRingBuffer::new(1000).unwrap();
        assert_eq!(ring.capacity(), 1024);
        assert!(ring.is_allocated());
        assert!(!ring.is_ready());
        assert_eq!(ring.pending(), 0);
    }

    #[test]
    fn default_is_unallocated() {
        let ring = SampleRingBuffer::default();
        assert_eq!(ring.capacity(), 0);
        assert!(!ring.is_allocated());
        assert_eq!(ring.write(&ramp(0, 4)), Err(RingError::Unallocated));
        assert_eq!(ring.write(&[]), Err(RingError::Unallocated));
    }

    #[test]
    fn zero_resize_rejected() {
        let ring = SampleRingBuffer::new(8).unwrap();
        assert_eq!(ring.resize(0), Err(RingError::ZeroCapacity));
        assert_eq!(ring.capacity(), 8);
        assert_eq!(
            SampleRingBuffer::new(0).unwrap_err(),
            RingError::ZeroCapacity
        );
    }

    #[test]
    fn overflowing_resize_rejected() {
        let ring = SampleRingBuffer::new(8).unwrap();
        assert_eq!(
            ring.resize(usize::MAX),
            Err(RingError::CapacityOverflow {
                requested: usize::MAX
            })
        );
        assert_eq!(ring.capacity(), 8);
    }

    #[test]
    fn resize_same_capacity_keeps_state() {
        let ring = SampleRingBuffer::new(8).unwrap();
        ring.write(&ramp(0, 5)).unwrap();
        assert_eq!(ring.resize(7), Ok(8));
        assert_eq!(ring.pending(), 5);
    }

    #[test]
    fn resize_discards_accumulation() {
        let ring = SampleRingBuffer::new(8).unwrap();
        ring.write(&ramp(0, 8)).unwrap();
        assert!(ring.is_ready());

        assert_eq!(ring.resize(9), Ok(16));
        assert!(!ring.is_ready());
        assert_eq!(ring.pending(), 0);
    }

    #[test]
    fn empty_write_is_noop() {
        let ring = SampleRingBuffer::new(8).unwrap();
        assert_eq!(ring.write(&[]), Ok(()));
        assert_eq!(ring.pending(), 0);
    }

    #[test]
    fn long_burst_keeps_newest() {
        let ring = SampleRingBuffer::new(8).unwrap();
        ring.write(&ramp(0, 3)).unwrap();
        ring.write(&ramp(3, 21)).unwrap();

        let mut dst = vec![IqSample::ZERO; 8];
        ring.read_all(&mut dst).unwrap();
        assert_eq!(dst, ramp(16, 8));
    }

    #[test]
    fn clear_resets_gate() {
        let ring = SampleRingBuffer::new(4).unwrap();
        ring.write(&ramp(0, 4)).unwrap();
        ring.clear();
        assert!(!ring.is_ready());
        assert_eq!(ring.pending(), 0);

        let mut dst = vec![IqSample::ZERO; 4];
        assert_eq!(ring.read_all(&mut dst), Err(RingError::NotReady));
    }

    #[test]
    fn fill_overwrites_contents() {
        let ring = SampleRingBuffer::new(4).unwrap();
        ring.write(&ramp(0, 4)).unwrap();
        ring.fill(IqSample::new(0.5, 0.5));

        let mut dst = vec![IqSample::ZERO; 4];
        ring.read_all(&mut dst).unwrap();
        assert!(dst.iter().all(|s| *s == IqSample::new(0.5, 0.5)));
    }
}
