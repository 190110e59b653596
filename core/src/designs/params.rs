//! Design parameter types.
//!
//! One record per design, built once before a run and never mutated during
//! it. Every field has a default, so a JSON parameter file only needs to name
//! the fields it changes:
//!
//! ```json
//! { "mode": "spectrum-bars", "bar_count": 48, "log_scale": false }
//! ```

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use super::DesignType;

/// Design-specific parameters, tagged by `"mode"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DesignParams {
    Waveform(WaveformParams),
    CircularWave(CircularWaveParams),
    SphericalPulse(SphericalPulseParams),
    SpectrumBars(SpectrumBarsParams),
    ParticleFlow(ParticleFlowParams),
    Kaleidoscope(KaleidoscopeParams),
    DnaHelix(DnaHelixParams),
    Aurora(AuroraParams),
    MatrixRain(MatrixRainParams),
    WaveGrid(WaveGridParams),
    LaserFan(LaserFanParams),
    RippleField(RippleFieldParams),
    FractalTree(FractalTreeParams),
}

impl Default for DesignParams {
    fn default() -> Self {
        Self::SpectrumBars(SpectrumBarsParams::default())
    }
}

impl DesignParams {
    pub fn design_type(&self) -> DesignType {
        match self {
            Self::Waveform(_) => DesignType::Waveform,
            Self::CircularWave(_) => DesignType::CircularWave,
            Self::SphericalPulse(_) => DesignType::SphericalPulse,
            Self::SpectrumBars(_) => DesignType::SpectrumBars,
            Self::ParticleFlow(_) => DesignType::ParticleFlow,
            Self::Kaleidoscope(_) => DesignType::Kaleidoscope,
            Self::DnaHelix(_) => DesignType::DnaHelix,
            Self::Aurora(_) => DesignType::Aurora,
            Self::MatrixRain(_) => DesignType::MatrixRain,
            Self::WaveGrid(_) => DesignType::WaveGrid,
            Self::LaserFan(_) => DesignType::LaserFan,
            Self::RippleField(_) => DesignType::RippleField,
            Self::FractalTree(_) => DesignType::FractalTree,
        }
    }
}

// ============================================================================
// Base designs
// ============================================================================

/// Parameters for the waveform design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformParams {
    /// Peak deflection as a fraction of frame height.
    pub amplitude: f32,
    /// Line thickness in pixels.
    pub line_width: f32,
}

impl Default for WaveformParams {
    fn default() -> Self {
        Self {
            amplitude: 0.4,
            line_width: 2.0,
        }
    }
}

/// Parameters for the circular wave design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularWaveParams {
    /// Base radius as a fraction of the smaller frame dimension.
    pub base_radius: f32,
    /// Maximum samples placed around the circle.
    pub points: usize,
    pub line_width: f32,
}

impl Default for CircularWaveParams {
    fn default() -> Self {
        Self {
            base_radius: 0.25,
            points: 360,
            line_width: 2.0,
        }
    }
}

/// Parameters for the spherical pulse design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphericalPulseParams {
    /// Upper bound on concentric circles.
    pub max_circles: usize,
    /// Innermost radius as a fraction of the smaller frame dimension.
    pub base_radius: f32,
    /// Radius added per step of age, same units.
    pub spacing: f32,
    /// How strongly historical amplitude inflates the rings.
    pub amplitude_gain: f32,
    pub line_width: f32,
}

impl Default for SphericalPulseParams {
    fn default() -> Self {
        Self {
            max_circles: 20,
            base_radius: 0.04,
            spacing: 0.022,
            amplitude_gain: 1.5,
            line_width: 2.0,
        }
    }
}

/// Parameters for the spectrum bars design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumBarsParams {
    pub bar_count: usize,
    /// Sample bins at logarithmically spaced indices instead of linear ones.
    pub log_scale: bool,
    /// Draw a faint halo rectangle behind each bar.
    pub glow: bool,
    /// Gap between bars as fraction of bar slot width (0.0 - 0.9).
    pub gap_ratio: f32,
    /// Tallest bar as a fraction of frame height.
    pub max_height: f32,
    /// Scale bars linearly with magnitude instead of through the soft knee.
    pub proportional: bool,
    /// Magnitude drawn at full height when `proportional` is set.
    pub full_scale: f32,
}

impl Default for SpectrumBarsParams {
    fn default() -> Self {
        Self {
            bar_count: 64,
            log_scale: true,
            glow: true,
            gap_ratio: 0.2,
            max_height: 0.9,
            proportional: false,
            full_scale: 128.0,
        }
    }
}

/// Parameters for the particle flow design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFlowParams {
    /// Live particle cap.
    pub max_particles: usize,
    /// Spawn cap per frame.
    pub max_spawn_per_frame: usize,
    /// Recent average amplitude below which nothing spawns.
    pub spawn_threshold: f32,
    /// Particles per unit of amplitude above the threshold.
    pub spawn_rate: f32,
    /// History blocks averaged for the spawn decision.
    pub lookback: usize,
    pub damping: f32,
    /// Life lost per frame.
    pub decay: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub bass_lift: f32,
    pub treble_push: f32,
}

impl Default for ParticleFlowParams {
    fn default() -> Self {
        Self {
            max_particles: 1500,
            max_spawn_per_frame: 40,
            spawn_threshold: 0.01,
            spawn_rate: 400.0,
            lookback: 5,
            damping: 0.98,
            decay: 0.015,
            min_size: 1.5,
            max_size: 4.0,
            bass_lift: 0.35,
            treble_push: 0.25,
        }
    }
}

/// Parameters for the kaleidoscope design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KaleidoscopeParams {
    /// Rotational symmetry order.
    pub segments: u32,
    /// Samples along the spiral.
    pub points: usize,
    /// Full turns of the spiral.
    pub turns: f32,
    /// Rotation per frame in radians.
    pub spin: f32,
    pub line_width: f32,
}

impl Default for KaleidoscopeParams {
    fn default() -> Self {
        Self {
            segments: 8,
            points: 160,
            turns: 2.5,
            spin: 0.01,
            line_width: 2.0,
        }
    }
}

/// Parameters for the DNA helix design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnaHelixParams {
    /// Points per strand.
    pub points: usize,
    /// Strand radius as a fraction of frame width.
    pub radius: f32,
    /// Full twists over the frame height.
    pub twists: f32,
    /// Phase advance per frame in radians.
    pub speed: f32,
    /// Draw a rung every this many points (0 disables rungs).
    pub connect_every: usize,
    pub line_width: f32,
}

impl Default for DnaHelixParams {
    fn default() -> Self {
        Self {
            points: 120,
            radius: 0.15,
            twists: 3.0,
            speed: 0.06,
            connect_every: 6,
            line_width: 2.0,
        }
    }
}

/// Parameters for the aurora design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraParams {
    /// Number of curtain layers.
    pub layers: usize,
    /// Traveling wave displacement as a fraction of frame height.
    pub wave_height: f32,
    /// Sample-driven displacement as a fraction of frame height.
    pub sample_gain: f32,
    /// Wave phase advance per frame.
    pub speed: f32,
    /// Alpha at the top edge of each curtain.
    pub alpha: f32,
}

impl Default for AuroraParams {
    fn default() -> Self {
        Self {
            layers: 4,
            wave_height: 0.06,
            sample_gain: 0.12,
            speed: 0.04,
            alpha: 0.35,
        }
    }
}

// ============================================================================
// Advanced designs
// ============================================================================

/// Parameters for the matrix rain design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixRainParams {
    /// Glyph cell size in pixels.
    pub cell_size: u32,
    /// Base spawn probability per free column per frame.
    pub spawn_chance: f32,
    /// Extra spawn probability per unit of bass.
    pub bass_weight: f32,
    /// Base fall speed in cells per frame.
    pub speed: f32,
    pub min_trail: u32,
    pub max_trail: u32,
    pub max_drops: usize,
}

impl Default for MatrixRainParams {
    fn default() -> Self {
        Self {
            cell_size: 14,
            spawn_chance: 0.02,
            bass_weight: 0.25,
            speed: 0.5,
            min_trail: 6,
            max_trail: 20,
            max_drops: 400,
        }
    }
}

/// Parameters for the 3D wave grid design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveGridParams {
    /// Grid rows; one per history block, newest in front.
    pub rows: usize,
    /// Points per row; each block is downsampled to this many.
    pub columns: usize,
    /// Row height scale as a fraction of frame height.
    pub height_scale: f32,
    /// Perspective strength; 0 is orthographic.
    pub perspective: f32,
    pub line_width: f32,
}

impl Default for WaveGridParams {
    fn default() -> Self {
        Self {
            rows: 24,
            columns: 48,
            height_scale: 0.15,
            perspective: 2.0,
            line_width: 1.0,
        }
    }
}

/// Parameters for the laser fan design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserFanParams {
    /// Beams per layer.
    pub beams: usize,
    pub layers: usize,
    /// Angular spread of the fan in radians.
    pub spread: f32,
    /// Rotation per frame in radians.
    pub spin: f32,
    /// Beam length as a fraction of the frame diagonal.
    pub length: f32,
    /// Treble level above which flash beams fire.
    pub flash_threshold: f32,
    pub max_flashes: usize,
}

impl Default for LaserFanParams {
    fn default() -> Self {
        Self {
            beams: 16,
            layers: 3,
            spread: PI * 0.75,
            spin: 0.015,
            length: 0.7,
            flash_threshold: 0.2,
            max_flashes: 32,
        }
    }
}

/// Parameters for the ripple field design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleFieldParams {
    /// Current amplitude must exceed the running average by this factor.
    pub spike_ratio: f32,
    /// Ignore spikes quieter than this.
    pub min_amplitude: f32,
    /// Ring growth in pixels per frame.
    pub speed: f32,
    /// Intensity lost per frame.
    pub decay: f32,
    /// Concentric rings per ripple.
    pub layers: u32,
    pub max_ripples: usize,
}

impl Default for RippleFieldParams {
    fn default() -> Self {
        Self {
            spike_ratio: 1.3,
            min_amplitude: 0.02,
            speed: 3.0,
            decay: 0.015,
            layers: 3,
            max_ripples: 48,
        }
    }
}

/// Parameters for the fractal tree design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalTreeParams {
    /// Recursion depth; clamped to 12.
    pub depth: u32,
    /// Trunk length as a fraction of frame height.
    pub trunk: f32,
    /// Base branch angle in radians.
    pub angle: f32,
    /// Child length relative to parent.
    pub shrink: f32,
    /// Bass level that adds a third, center branch.
    pub extra_branch_bass: f32,
}

impl Default for FractalTreeParams {
    fn default() -> Self {
        Self {
            depth: 9,
            trunk: 0.28,
            angle: 0.45,
            shrink: 0.72,
            extra_branch_bass: 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_json_uses_mode_tag() {
        let json = serde_json::to_string(&DesignParams::default()).unwrap();
        assert!(json.contains("\"mode\":\"spectrum-bars\""));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: DesignParams =
            serde_json::from_str(r#"{ "mode": "spectrum-bars", "bar_count": 32 }"#).unwrap();
        match params {
            DesignParams::SpectrumBars(p) => {
                assert_eq!(p.bar_count, 32);
                assert!(p.log_scale);
            }
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(serde_json::from_str::<DesignParams>(r#"{ "mode": "teapot" }"#).is_err());
    }
}
