//! Bass/mid/high band aggregation with exponential smoothing.

use serde::{Deserialize, Serialize};

/// Blend factor for new band values (30% new, 70% history).
pub const BAND_SMOOTHING: f32 = 0.3;

/// Knee used to map raw band averages into drawing levels.
pub const BAND_KNEE: f32 = 2.0;

/// Map a non-negative magnitude into `[0, 1)` with a soft knee.
///
/// `knee` is the input that maps to 0.5. Negative or NaN input maps to 0.
#[inline]
pub fn soft_level(value: f32, knee: f32) -> f32 {
    if value.is_nan() || value <= 0.0 {
        return 0.0;
    }
    value / (value + knee.max(f32::EPSILON))
}

/// Three coarse energy bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl Bands {
    /// Instantaneous band averages of a magnitude spectrum.
    ///
    /// With `n = 2 * bins.len()` (the transform size): bass is `[0, n/8)`,
    /// mid `[n/8, n/4)`, high `[n/4, n/2)`.
    pub fn from_bins(bins: &[f32]) -> Self {
        let half = bins.len();
        let bass_end = half / 4;
        let mid_end = half / 2;

        Self {
            bass: average(&bins[..bass_end]),
            mid: average(&bins[bass_end..mid_end]),
            high: average(&bins[mid_end..]),
        }
    }

    /// Soft-knee levels in `[0, 1)` for drawing and coloring.
    pub fn levels(&self) -> Bands {
        Bands {
            bass: soft_level(self.bass, BAND_KNEE),
            mid: soft_level(self.mid, BAND_KNEE),
            high: soft_level(self.high, BAND_KNEE),
        }
    }
}

fn average(range: &[f32]) -> f32 {
    if range.is_empty() {
        return 0.0;
    }
    range.iter().sum::<f32>() / range.len() as f32
}

/// Exponentially smoothed band energies.
///
/// The smoothed value persists across frames for the life of a run.
#[derive(Debug, Clone, Default)]
pub struct BandSmoother {
    smoothed: Bands,
}

impl BandSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend an instantaneous reading into the smoothed state and return it.
    pub fn update(&mut self, instant: Bands) -> Bands {
        let lerp = |prev: f32, next: f32| prev + (next - prev) * BAND_SMOOTHING;
        self.smoothed = Bands {
            bass: lerp(self.smoothed.bass, instant.bass),
            mid: lerp(self.smoothed.mid, instant.mid),
            high: lerp(self.smoothed.high, instant.high),
        };
        self.smoothed
    }

    pub fn current(&self) -> Bands {
        self.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ranges_split_bins() {
        // 1024 bins: bass 0..256, mid 256..512, high 512..1024
        let mut bins = vec![0.0f32; 1024];
        bins[..256].fill(4.0);
        bins[256..512].fill(2.0);
        bins[512..].fill(1.0);

        let bands = Bands::from_bins(&bins);
        assert_eq!(bands.bass, 4.0);
        assert_eq!(bands.mid, 2.0);
        assert_eq!(bands.high, 1.0);
    }

    #[test]
    fn test_degenerate_bins_do_not_divide_by_zero() {
        for len in [0, 1, 2, 3] {
            let bins = vec![1.0f32; len];
            let bands = Bands::from_bins(&bins);
            assert!(bands.bass.is_finite());
            assert!(bands.mid.is_finite());
            assert!(bands.high.is_finite());
        }
    }

    #[test]
    fn test_smoothing_converges_to_constant() {
        let mut smoother = BandSmoother::new();
        let target = Bands { bass: 5.0, mid: 3.0, high: 1.0 };
        for _ in 0..100 {
            smoother.update(target);
        }
        let current = smoother.current();
        assert!((current.bass - 5.0).abs() < 1e-4);
        assert!((current.mid - 3.0).abs() < 1e-4);
        assert!((current.high - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_smoothing_step_is_bounded_by_blend_factor() {
        let mut smoother = BandSmoother::new();
        let mut prev = smoother.current();
        for step in 0..50 {
            let instant = Bands { bass: (step % 7) as f32 * 3.0, mid: 10.0, high: 0.0 };
            let next = smoother.update(instant);
            let max_move = (instant.bass - prev.bass).abs() * BAND_SMOOTHING + 1e-5;
            assert!((next.bass - prev.bass).abs() <= max_move);
            // Never overshoots the instantaneous value
            assert!((next.mid - prev.mid).abs() <= (10.0 - prev.mid).abs() + 1e-5);
            prev = next;
        }
    }

    #[test]
    fn test_soft_level_range() {
        assert_eq!(soft_level(0.0, 2.0), 0.0);
        assert_eq!(soft_level(-1.0, 2.0), 0.0);
        assert_eq!(soft_level(f32::NAN, 2.0), 0.0);
        assert!((soft_level(2.0, 2.0) - 0.5).abs() < 1e-6);
        assert!(soft_level(1e9, 2.0) < 1.0);
    }
}
