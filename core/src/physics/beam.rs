//! Beams for the laser fan, fired on treble peaks.

use super::{Entity, Environment};

/// A flash beam fired from the laser fan origin on treble peaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub angle: f32,
    /// Angular drift per frame.
    pub spin: f32,
    /// Length as a fraction of the frame diagonal.
    pub length: f32,
    pub intensity: f32,
    pub decay: f32,
}

impl Entity for Beam {
    fn update(&mut self, env: &Environment) -> bool {
        self.angle += self.spin * (1.0 + env.high);
        self.intensity -= self.decay;
        self.intensity > 0.0
    }
}
