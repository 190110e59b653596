//! Transient entity pools used by the stateful designs.
//!
//! Every pool has a hard capacity. Entities are updated once per frame and
//! removed in the same update in which they die or leave the frame margin.

mod particle;
mod ripple;
mod rain;
mod beam;

pub use beam::Beam;
pub use particle::Particle;
pub use rain::RainDrop;
pub use ripple::Ripple;

/// Per-frame inputs for entity updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment {
    pub width: f32,
    pub height: f32,
    /// Distance outside the frame an entity may travel before it is culled.
    pub margin: f32,
    /// Smoothed band levels in `[0, 1)`.
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl Environment {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= -self.margin
            && y >= -self.margin
            && x <= self.width + self.margin
            && y <= self.height + self.margin
    }
}

/// Something a [`Pool`] can hold.
pub trait Entity {
    /// Advance one frame. Returns `false` once the entity should be removed.
    fn update(&mut self, env: &Environment) -> bool;
}

/// Capacity-bounded collection of live entities.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
    spawned: u64,
}

impl<T: Entity> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(4096)),
            capacity,
            spawned: 0,
        }
    }

    /// Add an entity. Returns `false` and drops it when the pool is full.
    pub fn spawn(&mut self, item: T) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        self.spawned += 1;
        true
    }

    /// Slots left before the pool is full.
    pub fn room(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Update every entity and drop the dead ones. Returns how many were removed.
    pub fn update(&mut self, env: &Environment) -> usize {
        let before = self.items.len();
        self.items.retain_mut(|item| item.update(env));
        before - self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entities ever accepted.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u32);

    impl Entity for Countdown {
        fn update(&mut self, _env: &Environment) -> bool {
            self.0 = self.0.saturating_sub(1);
            self.0 > 0
        }
    }

    #[test]
    fn test_pool_respects_capacity() {
        let mut pool = Pool::new(3);
        for i in 0..10 {
            pool.spawn(Countdown(i + 5));
        }
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.spawned(), 3);
        assert_eq!(pool.room(), 0);
    }

    #[test]
    fn test_dead_entities_removed_same_update() {
        let mut pool = Pool::new(10);
        pool.spawn(Countdown(1));
        pool.spawn(Countdown(3));
        let removed = pool.update(&Environment::default());
        assert_eq!(removed, 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_environment_margin() {
        let env = Environment { width: 100.0, height: 50.0, margin: 10.0, ..Default::default() };
        assert!(env.contains(-5.0, 55.0));
        assert!(!env.contains(-11.0, 0.0));
        assert!(!env.contains(0.0, 61.0));
    }
}
