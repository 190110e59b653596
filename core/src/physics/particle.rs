//! Drifting particles, lifted by bass and pushed sideways by treble.
//!
//! ```
//! use wavecast::physics::{Environment, Particle, Pool};
//!
//! let mut pool = Pool::new(4);
//! pool.spawn(Particle {
//!     x: 10.0, y: 10.0, vx: 0.0, vy: 0.0,
//!     life: 1.0, decay: 0.5, size: 2.0, damping: 1.0,
//!     bass_lift: 0.0, treble_push: 0.0, hue: 0.0,
//! });
//! let env = Environment { width: 20.0, height: 20.0, ..Default::default() };
//! assert_eq!(pool.update(&env), 0);
//! assert_eq!(pool.update(&env), 1);
//! assert!(pool.is_empty());
//! ```

use super::{Entity, Environment};

/// A point mass with a finite life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
    /// Life lost per frame.
    pub decay: f32,
    pub size: f32,
    /// Velocity multiplier applied every frame.
    pub damping: f32,
    /// Upward acceleration per unit of bass.
    pub bass_lift: f32,
    /// Horizontal push per unit of treble, along the current heading.
    pub treble_push: f32,
    /// Position along the spectrum used for coloring.
    pub hue: f32,
}

impl Entity for Particle {
    fn update(&mut self, env: &Environment) -> bool {
        self.vy -= env.bass * self.bass_lift;
        self.vx += env.high * self.treble_push * self.vx.signum();
        self.vx *= self.damping;
        self.vy *= self.damping;
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.life > 0.0 && env.contains(self.x, self.y)
    }
}
