//! Published spectrum shared between the worker and readers
//!
//! The worker's sample block is the back buffer; this is the front buffer.
//! It is rewritten wholesale under its lock, so readers never see a
//! partially updated spectrum.

use parking_lot::Mutex;
use sdr_spectrum_core::{reduce_log_power, DspResult, IqSample};

/// Lock-protected log-power spectrum
#[derive(Debug)]
pub struct SpectrumSnapshot {
    bins: Mutex<Vec<f32>>,
}

impl SpectrumSnapshot {
    /// Snapshot of `size` bins, all zero until the first publish
    pub fn new(size: usize) -> Self {
        Self {
            bins: Mutex::new(vec![0.0; size]),
        }
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.lock().len()
    }

    /// Whether the snapshot has no bins
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reduce a transformed block to log power and store it
    pub fn publish(&self, block: &[IqSample]) -> DspResult<()> {
        let mut bins = self.bins.lock();
        reduce_log_power(block, &mut bins)
    }

    /// Copy the current spectrum into `dst`, resizing it if needed
    pub fn copy_into(&self, dst: &mut Vec<f32>) {
        let bins = self.bins.lock();
        if dst.len() != bins.len() {
            dst.resize(bins.len(), 0.0);
        }
        dst.copy_from_slice(&bins);
    }

    /// Change the bin count; contents reset to zero
    pub fn resize(&self, size: usize) {
        let mut bins = self.bins.lock();
        bins.clear();
        bins.resize(size, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let snapshot = SpectrumSnapshot::new(8);
        let mut out = Vec::new();
        snapshot.copy_into(&mut out);
        assert_eq!(out, vec![0.0; 8]);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn publish_reduces_block() {
        let snapshot = SpectrumSnapshot::new(2);
        snapshot
            .publish(&[IqSample::new(3.0, 4.0), IqSample::ZERO])
            .unwrap();

        let mut out = vec![1.0; 5];
        snapshot.copy_into(&mut out);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 5.0 * 25.0f32.ln()).abs() < 1e-5);
        assert_eq!(out[1], f32::NEG_INFINITY);
    }

    #[test]
    fn publish_rejects_wrong_length() {
        let snapshot = SpectrumSnapshot::new(4);
        assert!(snapshot.publish(&[IqSample::ZERO; 3]).is_err());

        let mut out = Vec::new();
        snapshot.copy_into(&mut out);
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn resize_resets_bins() {
        let snapshot = SpectrumSnapshot::new(2);
        snapshot.publish(&[IqSample::new(1.0, 1.0); 2]).unwrap();
        snapshot.resize(4);
        assert_eq!(snapshot.len(), 4);

        let mut out = Vec::new();
        snapshot.copy_into(&mut out);
        assert_eq!(out, vec![0.0; 4]);
    }
}
