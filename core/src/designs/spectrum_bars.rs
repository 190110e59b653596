//! Spectrum bars visualization design.
//!
//! Vertical bars rising from the bottom edge, one per sampled frequency
//! range, with an optional faint glow behind each bar.

use super::{Design, DesignType, SpectrumBarsParams, BIN_KNEE};
use crate::audio::soft_level;
use crate::canvas::Frame;
use crate::context::AnalysisContext;

/// Lowest bin used by the log layout; bin 0 is DC.
const LOG_MIN_BIN: f32 = 1.0;

pub struct SpectrumBarsDesign {
    params: SpectrumBarsParams,
    indices: Vec<usize>,
}

impl SpectrumBarsDesign {
    pub fn new(params: SpectrumBarsParams) -> Self {
        Self {
            params,
            indices: Vec::new(),
        }
    }

    /// Bar level in `[0, 1]` for a peak bin magnitude.
    fn level(&self, peak: f32) -> f32 {
        if self.params.proportional {
            (peak.max(0.0) / self.params.full_scale.max(f32::EPSILON)).min(1.0)
        } else {
            soft_level(peak, BIN_KNEE)
        }
    }
}

/// Start bin of each of `bars` ranges over `bins` bins, plus a final end
/// bound. Non-decreasing; every entry is `<= bins`.
pub fn bar_bounds(bars: usize, bins: usize, log_scale: bool) -> Vec<usize> {
    if bars == 0 || bins == 0 {
        return Vec::new();
    }
    (0..=bars)
        .map(|i| {
            let t = i as f32 / bars as f32;
            let idx = if log_scale {
                let top = bins as f32;
                (LOG_MIN_BIN * (top / LOG_MIN_BIN).powf(t)).floor() as usize
            } else {
                i * bins / bars
            };
            idx.min(bins)
        })
        .collect()
}

impl Design for SpectrumBarsDesign {
    fn design_type(&self) -> DesignType {
        DesignType::SpectrumBars
    }

    fn render(&mut self, ctx: &mut AnalysisContext, block: &[f32], frame: &mut Frame) {
        let bins = ctx.state.bins();
        let bars = self.params.bar_count;
        if block.is_empty() || bins.is_empty() || bars == 0 {
            return;
        }
        if self.indices.len() != bars + 1 {
            self.indices = bar_bounds(bars, bins.len(), self.params.log_scale);
        }

        let width = frame.width() as f32;
        let height = frame.height() as f32;
        let slot = width / bars as f32;
        let gap = slot * self.params.gap_ratio.clamp(0.0, 0.9);
        let bar_width = (slot - gap).max(1.0);

        for i in 0..bars {
            let start = self.indices[i].min(bins.len() - 1);
            let end = self.indices[i + 1].clamp(start + 1, bins.len());
            let peak = bins[start..end].iter().copied().fold(0.0f32, f32::max);

            let level = self.level(peak);
            let bar_height = level * self.params.max_height * height;
            let x = i as f32 * slot + gap * 0.5;
            let y = height - bar_height;
            let color = ctx.color(level, i as f32 / bars as f32);

            if self.params.glow && bar_height > 0.0 {
                let halo = bar_width * 0.3;
                frame.fill_rect(x - halo, y - halo, bar_width + 2.0 * halo, bar_height + halo, color, 0.15);
            }
            frame.fill_rect(x, y, bar_width, bar_height, color, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_bounds() {
        assert_eq!(bar_bounds(4, 1024, false), vec![0, 256, 512, 768, 1024]);
    }

    #[test]
    fn test_log_bounds_are_monotonic_and_in_range() {
        let bounds = bar_bounds(64, 1024, true);
        assert_eq!(bounds.len(), 65);
        assert!(bounds.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*bounds.last().unwrap(), 1024);
        assert_eq!(bounds[0], 1);
    }

    #[test]
    fn test_proportional_level_is_linear_until_full_scale() {
        let design = SpectrumBarsDesign::new(SpectrumBarsParams {
            proportional: true,
            full_scale: 128.0,
            ..Default::default()
        });
        assert_eq!(design.level(0.0), 0.0);
        assert_eq!(design.level(32.0), 0.25);
        assert_eq!(design.level(64.0), 0.5);
        assert_eq!(design.level(1000.0), 1.0);
    }

    #[test]
    fn test_default_level_saturates_softly() {
        let design = SpectrumBarsDesign::new(SpectrumBarsParams::default());
        let low = design.level(32.0);
        let high = design.level(64.0);
        assert!(low > 0.0 && high > low && high < 1.0);
        assert!(high < 2.0 * low);
    }

    #[test]
    fn test_degenerate_bounds() {
        assert!(bar_bounds(0, 1024, true).is_empty());
        assert!(bar_bounds(8, 0, false).is_empty());
    }
}
