//! Frame planning and sequential frame generation.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioClip, SpectrumAnalyzer, TemporalState};
use crate::canvas::Frame;
use crate::context::AnalysisContext;
use crate::designs::{create_design, Design};

use super::PipelineConfig;

/// How a clip is cut into per-frame sample blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    pub total_frames: usize,
    pub samples_per_frame: usize,
    total_samples: usize,
}

impl FramePlan {
    /// `total_frames = floor(duration × fps)`; `samples_per_frame` is
    /// `total_samples / total_frames`, or 0 when there are no frames.
    pub fn new(total_samples: usize, sample_rate: u32, fps: u32) -> Self {
        let total_frames = if sample_rate == 0 {
            0
        } else {
            let duration = total_samples as f64 / sample_rate as f64;
            (duration * fps as f64).floor() as usize
        };
        let samples_per_frame = if total_frames == 0 { 0 } else { total_samples / total_frames };
        Self {
            total_frames,
            samples_per_frame,
            total_samples,
        }
    }

    pub fn for_clip(clip: &AudioClip, fps: u32) -> Self {
        Self::new(clip.len(), clip.sample_rate, fps)
    }

    /// Sample block for frame `index`, clamped to the clip.
    pub fn block<'a>(&self, samples: &'a [f32], index: usize) -> &'a [f32] {
        let len = samples.len().min(self.total_samples);
        let start = index.saturating_mul(self.samples_per_frame).min(len);
        let end = start.saturating_add(self.samples_per_frame).min(len);
        &samples[start..end]
    }

    pub fn is_empty(&self) -> bool {
        self.total_frames == 0
    }
}

/// Renders frames one at a time, in order, with fresh per-run state.
pub struct FrameGenerator<'a> {
    samples: &'a [f32],
    plan: FramePlan,
    ctx: AnalysisContext,
    design: Box<dyn Design>,
    next: usize,
}

impl<'a> FrameGenerator<'a> {
    pub fn new(clip: &'a AudioClip, config: &PipelineConfig) -> Self {
        let plan = FramePlan::for_clip(clip, config.fps);
        let ctx = AnalysisContext::new(
            config.width,
            config.height,
            config.color_mode,
            config.background,
            config.seed,
        );
        Self {
            samples: &clip.samples,
            plan,
            ctx,
            design: create_design(&config.design),
            next: 0,
        }
    }

    pub fn plan(&self) -> FramePlan {
        self.plan
    }

    /// Index of the next frame to be rendered.
    pub fn position(&self) -> usize {
        self.next
    }

    pub fn live_entities(&self) -> usize {
        self.design.live_entities()
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }
}

impl Iterator for FrameGenerator<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.plan.total_frames {
            return None;
        }
        let index = self.next;
        let block = self.plan.block(self.samples, index);

        self.ctx.advance(block);
        let mut frame = self.ctx.blank_frame();
        self.design.render(&mut self.ctx, block, &mut frame);
        log::trace!(
            "frame {}: {} samples, {} live entities",
            index,
            block.len(),
            self.design.live_entities()
        );

        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.plan.total_frames - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FrameGenerator<'_> {}

/// Smoothed band levels at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSnapshot {
    /// Frame start time in seconds.
    pub time: f64,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

/// Run band analysis over a clip at `fps` without rendering anything.
pub fn analyze_bands(clip: &AudioClip, fps: u32) -> Vec<BandSnapshot> {
    let plan = FramePlan::for_clip(clip, fps);
    let mut analyzer = SpectrumAnalyzer::default();
    let mut state = TemporalState::new();

    (0..plan.total_frames)
        .map(|i| {
            state.advance(plan.block(&clip.samples, i), &mut analyzer);
            let levels = state.levels();
            BandSnapshot {
                time: i as f64 / fps as f64,
                bass: levels.bass,
                mid: levels.mid,
                high: levels.high,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_counts() {
        let plan = FramePlan::new(88_200, 44_100, 60);
        assert_eq!(plan.total_frames, 120);
        assert_eq!(plan.samples_per_frame, 735);
    }

    #[test]
    fn test_plan_floors_partial_frames() {
        let plan = FramePlan::new(1000, 1000, 3);
        assert_eq!(plan.total_frames, 3);
        let plan = FramePlan::new(999, 1000, 3);
        assert_eq!(plan.total_frames, 2);
        assert_eq!(plan.samples_per_frame, 499);
    }

    #[test]
    fn test_empty_plan() {
        let plan = FramePlan::new(0, 44_100, 30);
        assert!(plan.is_empty());
        assert_eq!(plan.samples_per_frame, 0);
        assert!(FramePlan::new(100, 0, 30).is_empty());
    }

    #[test]
    fn test_blocks_are_clamped() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let plan = FramePlan::new(10, 10, 3);
        assert_eq!(plan.block(&samples, 0), &[0.0, 1.0, 2.0]);
        assert_eq!(plan.block(&samples, 2), &[6.0, 7.0, 8.0]);
        assert!(plan.block(&samples, 50).is_empty());
    }
}
