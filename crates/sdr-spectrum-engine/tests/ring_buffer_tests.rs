//! Ring Buffer Tests
//!
//! Tests for the IQ ring buffer between producer and consumer threads
//! Run with: cargo test -p sdr-spectrum-engine --test ring_buffer_tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use sdr_spectrum_engine::{IqSample, RingError, SampleRingBuffer};

fn counter(start: usize, len: usize) -> Vec<IqSample> {
    (start..start + len)
        .map(|n| IqSample::new(n as f32, 0.0))
        .collect()
}

// =============================================================================
// Gate Tests
// =============================================================================

#[test]
fn test_gate_opens_exactly_at_capacity() {
    let ring = SampleRingBuffer::new(16).unwrap();
    for n in 0..15 {
        ring.write(&counter(n, 1)).unwrap();
        assert!(!ring.is_ready(), "gate open after {} samples", n + 1);
    }
    ring.write(&counter(15, 1)).unwrap();
    assert!(ring.is_ready());
    assert_eq!(ring.pending(), 16);

    ring.write(&counter(16, 100)).unwrap();
    assert_eq!(ring.pending(), 16);
}

#[test]
fn test_read_all_rejects_without_side_effects() {
    let ring = SampleRingBuffer::new(8).unwrap();
    ring.write(&counter(0, 5)).unwrap();

    let mut dst = vec![IqSample::ZERO; 8];
    assert_eq!(ring.read_all(&mut dst), Err(RingError::NotReady));
    assert_eq!(ring.pending(), 5);

    ring.write(&counter(5, 3)).unwrap();
    let mut short = vec![IqSample::ZERO; 4];
    assert_eq!(
        ring.read_all(&mut short),
        Err(RingError::LengthMismatch {
            expected: 8,
            actual: 4
        })
    );
    assert!(ring.is_ready());
    assert!(short.iter().all(|s| *s == IqSample::ZERO));

    ring.read_all(&mut dst).unwrap();
    assert_eq!(dst, counter(0, 8));
}

#[test]
fn test_drain_closes_gate_until_refilled() {
    let ring = SampleRingBuffer::new(8).unwrap();
    ring.write(&counter(0, 8)).unwrap();

    let mut dst = vec![IqSample::ZERO; 8];
    ring.read_all(&mut dst).unwrap();
    assert!(!ring.is_ready());
    assert_eq!(ring.pending(), 0);
    assert_eq!(ring.read_all(&mut dst), Err(RingError::NotReady));

    ring.write(&counter(8, 7)).unwrap();
    assert!(!ring.is_ready());
    ring.write(&counter(15, 1)).unwrap();
    ring.read_all(&mut dst).unwrap();
    assert_eq!(dst, counter(8, 8));
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_drain_returns_most_recent_in_order() {
    let ring = SampleRingBuffer::new(8).unwrap();
    ring.write(&counter(0, 5)).unwrap();
    ring.write(&counter(5, 6)).unwrap();

    let mut dst = vec![IqSample::ZERO; 8];
    ring.read_all(&mut dst).unwrap();
    assert_eq!(dst, counter(3, 8));
}

#[test]
fn test_wrapping_bursts() {
    let ring = SampleRingBuffer::new(8).unwrap();
    let mut dst = vec![IqSample::ZERO; 8];
    let mut next = 0;

    for burst in [3usize, 5, 7, 8, 13, 1] {
        ring.write(&counter(next, burst)).unwrap();
        next += burst;
        if ring.is_ready() {
            ring.read_all(&mut dst).unwrap();
            assert_eq!(dst, counter(next - 8, 8));
        }
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_drains_are_consecutive() {
    const CAPACITY: usize = 256;

    let ring = Arc::new(SampleRingBuffer::new(CAPACITY).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let producer = {
        let ring = Arc::clone(&ring);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut next = 0;
            for burst in (1..=97).cycle().take(2000) {
                ring.write(&counter(next, burst)).unwrap();
                next += burst;
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut dst = vec![IqSample::ZERO; CAPACITY];
    let mut drains = 0;
    while !done.load(Ordering::Acquire) || ring.is_ready() {
        if ring.read_all(&mut dst).is_ok() {
            drains += 1;
            let first = dst[0].i;
            for (offset, sample) in dst.iter().enumerate() {
                assert_eq!(sample.i, first + offset as f32, "torn block");
            }
        } else {
            thread::yield_now();
        }
    }
    producer.join().unwrap();

    assert!(drains > 0);
}
