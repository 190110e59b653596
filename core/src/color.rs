//! Color policies.
//!
//! Every policy is a pure function of (intensity, position) and a copied
//! [`Signals`] snapshot, so mapping is deterministic and safe to call from
//! several threads at once.

use std::f32::consts::TAU;

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::audio::Signals;

/// Available color policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    /// Hue drifts with the frame counter, spread across position.
    #[default]
    HueRotation,
    /// Hue follows position, nudged by mid/high energy.
    FrequencyHue,
    /// Blue → red ramp driven by intensity.
    AmplitudeGradient,
    /// Three phase-shifted sinusoids per channel.
    OscillatingRgb,
    /// Reds and oranges that flare with bass.
    BassReactive,
    /// Cool tones that whiten with treble.
    TrebleSparkle,
    /// Hue weighted by the bass/mid/high balance.
    Emotional,
}

impl ColorMode {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hue-rotation" | "huerotation" | "rainbow" => Some(Self::HueRotation),
            "frequency-hue" | "frequencyhue" | "frequency" => Some(Self::FrequencyHue),
            "amplitude-gradient" | "amplitudegradient" | "amplitude" | "gradient" => {
                Some(Self::AmplitudeGradient)
            }
            "oscillating-rgb" | "oscillatingrgb" | "rgb" => Some(Self::OscillatingRgb),
            "bass-reactive" | "bassreactive" | "bass" => Some(Self::BassReactive),
            "treble-sparkle" | "treblesparkle" | "treble" | "sparkle" => Some(Self::TrebleSparkle),
            "emotional" | "mood" => Some(Self::Emotional),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HueRotation => "hue-rotation",
            Self::FrequencyHue => "frequency-hue",
            Self::AmplitudeGradient => "amplitude-gradient",
            Self::OscillatingRgb => "oscillating-rgb",
            Self::BassReactive => "bass-reactive",
            Self::TrebleSparkle => "treble-sparkle",
            Self::Emotional => "emotional",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::HueRotation,
            Self::FrequencyHue,
            Self::AmplitudeGradient,
            Self::OscillatingRgb,
            Self::BassReactive,
            Self::TrebleSparkle,
            Self::Emotional,
        ]
    }
}

/// Map a color policy, intensity and position to an RGB color.
///
/// `intensity` and `position` are clamped to `[0, 1]` first.
pub fn map_color(mode: ColorMode, intensity: f32, position: f32, signals: &Signals) -> Rgb<u8> {
    let i = clamp01(intensity);
    let p = clamp01(position);
    let t = signals.frame as f32;
    let (bass, mid, high) = (
        clamp01(signals.bass),
        clamp01(signals.mid),
        clamp01(signals.high),
    );

    match mode {
        ColorMode::HueRotation => hsv_to_rgb(t * 0.005 + p * 0.5, 0.8, 0.5 + 0.5 * i),
        ColorMode::FrequencyHue => {
            hsv_to_rgb(p * 0.75 + mid * 0.15 + high * 0.1, 0.85, 0.4 + 0.6 * i)
        }
        ColorMode::AmplitudeGradient => hsv_to_rgb(0.66 * (1.0 - i), 0.9, 0.45 + 0.55 * i),
        ColorMode::OscillatingRgb => {
            let phase = t * 0.05 + p * TAU;
            let gain = 0.35 + 0.65 * i;
            Rgb([
                channel((0.5 + 0.5 * phase.sin()) * gain),
                channel((0.5 + 0.5 * (phase + TAU / 3.0).sin()) * gain),
                channel((0.5 + 0.5 * (phase + 2.0 * TAU / 3.0).sin()) * gain),
            ])
        }
        ColorMode::BassReactive => {
            hsv_to_rgb(0.98 + bass * 0.12 + p * 0.04, 0.9, 0.3 + 0.7 * i.max(bass))
        }
        ColorMode::TrebleSparkle => {
            hsv_to_rgb(0.55 + high * 0.15 + p * 0.1, 1.0 - high * 0.7, 0.5 + 0.5 * i)
        }
        ColorMode::Emotional => {
            let total = bass + mid + high;
            let mood = if total > f32::EPSILON {
                (bass * 0.0 + mid * 0.33 + high * 0.62) / total
            } else {
                0.6
            };
            hsv_to_rgb(mood + t * 0.001 + p * 0.08, 0.75, 0.4 + 0.6 * i)
        }
    }
}

/// Standard six-sector HSV → RGB. Hue wraps into `[0, 1)`.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb<u8> {
    let h = hue.rem_euclid(1.0) * 6.0;
    let s = clamp01(saturation);
    let v = clamp01(value);

    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb([channel(r + m), channel(g + m), channel(b + m)])
}

/// Scale a color's channels by `factor` (clamped to `[0, 1]`).
pub fn dim(color: Rgb<u8>, factor: f32) -> Rgb<u8> {
    let f = clamp01(factor);
    Rgb(color.0.map(|c| (c as f32 * f).round() as u8))
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[inline]
fn channel(v: f32) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}
