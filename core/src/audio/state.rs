//! Per-run temporal state shared by every design.
//!
//! Holds the frequency bins, smoothed band energies, the history ring of
//! recent sample blocks, and a monotonic frame counter. One instance lives
//! for exactly one render run.

use std::collections::VecDeque;

use super::bands::{BandSmoother, Bands};
use super::fft::{SpectrumAnalyzer, FFT_SIZE};

/// Number of past sample blocks kept for trailing effects.
pub const HISTORY_CAPACITY: usize = 30;

/// Fixed-capacity FIFO of recent sample blocks.
///
/// Evicted block allocations are reused for the next push.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    blocks: VecDeque<Vec<f32>>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            blocks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Copy `block` into the ring, evicting the oldest entry when full.
    pub fn push(&mut self, block: &[f32]) {
        if self.capacity == 0 {
            return;
        }
        let mut slot = if self.blocks.len() >= self.capacity {
            self.blocks.pop_front().unwrap_or_default()
        } else {
            Vec::with_capacity(block.len())
        };
        slot.clear();
        slot.extend_from_slice(block);
        self.blocks.push_back(slot);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocks oldest-first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[f32]> + ExactSizeIterator {
        self.blocks.iter().map(Vec::as_slice)
    }

    /// Blocks newest-first, at most `n` of them.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &[f32]> {
        self.blocks.iter().rev().take(n).map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

/// Mean absolute amplitude of a block, 0 for an empty block.
pub fn average_amplitude(block: &[f32]) -> f32 {
    if block.is_empty() {
        return 0.0;
    }
    block.iter().map(|s| s.abs()).sum::<f32>() / block.len() as f32
}

/// Snapshot of the smoothed signals a color policy may read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Signals {
    pub frame: u64,
    /// Smoothed band levels in `[0, 1)`.
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

/// Rolling analysis state for one run.
#[derive(Debug, Clone)]
pub struct TemporalState {
    bins: Vec<f32>,
    smoother: BandSmoother,
    history: HistoryRing,
    frame: u64,
    amplitude: f32,
}

impl TemporalState {
    pub fn new() -> Self {
        Self {
            bins: vec![0.0; FFT_SIZE / 2],
            smoother: BandSmoother::new(),
            history: HistoryRing::default(),
            frame: 0,
            amplitude: 0.0,
        }
    }

    /// Advance by one frame: analyze `block`, blend bands, record history.
    pub fn advance(&mut self, block: &[f32], analyzer: &mut SpectrumAnalyzer) {
        analyzer.analyze_into(block, &mut self.bins);
        self.smoother.update(Bands::from_bins(&self.bins));
        self.history.push(block);
        self.amplitude = average_amplitude(block);
        self.frame += 1;
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Smoothed raw band averages.
    pub fn bands(&self) -> Bands {
        self.smoother.current()
    }

    /// Smoothed band levels in `[0, 1)`.
    pub fn levels(&self) -> Bands {
        self.smoother.current().levels()
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Mean absolute amplitude of the most recent block.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn signals(&self) -> Signals {
        let levels = self.levels();
        Signals {
            frame: self.frame,
            bass: levels.bass,
            mid: levels.mid,
            high: levels.high,
        }
    }
}

impl Default for TemporalState {
    fn default() -> Self {
        Self::new()
    }
}
