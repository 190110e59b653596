//! Design registry and factory functions.
//!
//! Provides a centralized way to create design instances and get their default parameters.

use super::params::*;
use super::{
    AuroraDesign, CircularWaveDesign, Design, DesignType, DnaHelixDesign, FractalTreeDesign,
    KaleidoscopeDesign, LaserFanDesign, MatrixRainDesign, ParticleFlowDesign, RippleFieldDesign,
    SpectrumBarsDesign, SphericalPulseDesign, WaveGridDesign, WaveformDesign,
};

/// Create the design selected by `params`, taking ownership of a copy of them.
///
/// # Example
/// ```
/// use wavecast::designs::{create_design, DesignParams, DesignType};
///
/// let design = create_design(&DesignParams::default());
/// assert_eq!(design.design_type(), DesignType::SpectrumBars);
/// ```
pub fn create_design(params: &DesignParams) -> Box<dyn Design> {
    match params {
        DesignParams::Waveform(p) => Box::new(WaveformDesign::new(p.clone())),
        DesignParams::CircularWave(p) => Box::new(CircularWaveDesign::new(p.clone())),
        DesignParams::SphericalPulse(p) => Box::new(SphericalPulseDesign::new(p.clone())),
        DesignParams::SpectrumBars(p) => Box::new(SpectrumBarsDesign::new(p.clone())),
        DesignParams::ParticleFlow(p) => Box::new(ParticleFlowDesign::new(p.clone())),
        DesignParams::Kaleidoscope(p) => Box::new(KaleidoscopeDesign::new(p.clone())),
        DesignParams::DnaHelix(p) => Box::new(DnaHelixDesign::new(p.clone())),
        DesignParams::Aurora(p) => Box::new(AuroraDesign::new(p.clone())),
        DesignParams::MatrixRain(p) => Box::new(MatrixRainDesign::new(p.clone())),
        DesignParams::WaveGrid(p) => Box::new(WaveGridDesign::new(p.clone())),
        DesignParams::LaserFan(p) => Box::new(LaserFanDesign::new(p.clone())),
        DesignParams::RippleField(p) => Box::new(RippleFieldDesign::new(p.clone())),
        DesignParams::FractalTree(p) => Box::new(FractalTreeDesign::new(p.clone())),
    }
}

/// Get default params for a design type.
///
/// # Example
/// ```
/// use wavecast::designs::{default_params, DesignParams, DesignType};
///
/// let params = default_params(DesignType::Aurora);
/// assert!(matches!(params, DesignParams::Aurora(_)));
/// ```
pub fn default_params(design_type: DesignType) -> DesignParams {
    match design_type {
        DesignType::Waveform => DesignParams::Waveform(WaveformParams::default()),
        DesignType::CircularWave => DesignParams::CircularWave(CircularWaveParams::default()),
        DesignType::SphericalPulse => DesignParams::SphericalPulse(SphericalPulseParams::default()),
        DesignType::SpectrumBars => DesignParams::SpectrumBars(SpectrumBarsParams::default()),
        DesignType::ParticleFlow => DesignParams::ParticleFlow(ParticleFlowParams::default()),
        DesignType::Kaleidoscope => DesignParams::Kaleidoscope(KaleidoscopeParams::default()),
        DesignType::DnaHelix => DesignParams::DnaHelix(DnaHelixParams::default()),
        DesignType::Aurora => DesignParams::Aurora(AuroraParams::default()),
        DesignType::MatrixRain => DesignParams::MatrixRain(MatrixRainParams::default()),
        DesignType::WaveGrid => DesignParams::WaveGrid(WaveGridParams::default()),
        DesignType::LaserFan => DesignParams::LaserFan(LaserFanParams::default()),
        DesignType::RippleField => DesignParams::RippleField(RippleFieldParams::default()),
        DesignType::FractalTree => DesignParams::FractalTree(FractalTreeParams::default()),
    }
}
