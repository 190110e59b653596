//! Expanding rings spawned on amplitude spikes.

use super::{Entity, Environment};

/// An expanding ring spawned on an amplitude spike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Radial growth per frame before the bass boost.
    pub speed: f32,
    /// Brightness in `[0, 1]`, falls by `decay` each frame.
    pub intensity: f32,
    pub decay: f32,
    /// Number of concentric rings drawn for this ripple.
    pub layers: u32,
}

impl Entity for Ripple {
    fn update(&mut self, env: &Environment) -> bool {
        self.radius += self.speed * (1.0 + env.bass);
        self.intensity -= self.decay;
        let reach = env.width.hypot(env.height) + env.margin;
        self.intensity > 0.0 && self.radius < reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ripple_expands_and_fades() {
        let mut r = Ripple { x: 0.0, y: 0.0, radius: 0.0, speed: 2.0, intensity: 1.0, decay: 0.5, layers: 3 };
        let env = Environment { width: 100.0, height: 100.0, ..Default::default() };
        assert!(r.update(&env));
        assert_eq!(r.radius, 2.0);
        assert!(!r.update(&env));
    }
}
