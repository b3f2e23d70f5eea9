//! Particle pool shared by the spawn/drift/fade verses
//!
//! Particles move with constant velocity, age by `dt` each step and are
//! removed once `life` exceeds `max_life`. The pool writes into a fixed-size
//! point geometry, hiding unused slots.

use crate::color::Rgba;
use crate::scene::Geometry;
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Unique within the pool that spawned it
    pub id: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since spawn
    pub life: f32,
    pub max_life: f32,
    pub color: Rgba,
    pub size: f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, max_life: f32, color: Rgba, size: f32) -> Self {
        Self {
            id: 0,
            position,
            velocity,
            life: 0.0,
            max_life,
            color,
            size,
        }
    }

    /// Fraction of life used, in [0, 1]
    pub fn age(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.life > self.max_life
    }
}

/// Fade that rises then falls over a particle's life
pub fn fade_in_out(p: &Particle) -> f32 {
    (p.age() * std::f32::consts::PI).sin()
}

/// Fade that falls linearly over a particle's life
pub fn fade_out(p: &Particle) -> f32 {
    1.0 - p.age()
}

#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
    next_id: u64,
    spawned: u64,
    expired: u64,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
            next_id: 0,
            spawned: 0,
            expired: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// Total particles ever spawned and expired
    pub fn totals(&self) -> (u64, u64) {
        (self.spawned, self.expired)
    }

    /// Add a particle, assigning its id; `None` when the pool is full
    pub fn spawn(&mut self, mut particle: Particle) -> Option<u64> {
        if self.is_full() {
            return None;
        }
        let id = self.next_id;
        particle.id = id;
        self.next_id += 1;
        self.spawned += 1;
        self.particles.push(particle);
        Some(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Integrate and age every particle, returning the ones that expired
    pub fn step(&mut self, dt: f32) -> Vec<Particle> {
        self.step_with(dt, |_| {})
    }

    /// Like [`step`](Self::step) with a per-particle hook run before integration
    pub fn step_with(&mut self, dt: f32, mut hook: impl FnMut(&mut Particle)) -> Vec<Particle> {
        for p in &mut self.particles {
            hook(p);
            p.position += p.velocity * dt;
            p.life += dt;
        }

        let mut expired = Vec::new();
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_expired() {
                expired.push(self.particles.swap_remove(i));
            } else {
                i += 1;
            }
        }
        self.expired += expired.len() as u64;
        expired
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Copy live particles into the leading slots of a point geometry and
    /// hide the remaining slots
    pub fn write_points(&self, geometry: &mut Geometry, fade: impl Fn(&Particle) -> f32) {
        let slots = geometry.len();
        for (i, p) in self.particles.iter().take(slots).enumerate() {
            geometry.positions_mut()[i] = p.position;
            let alpha = (p.color[3] * fade(p)).clamp(0.0, 1.0);
            geometry.colors_mut()[i] = [p.color[0], p.color[1], p.color[2], alpha];
            geometry.sizes_mut()[i] = p.size;
        }
        for i in self.particles.len().min(slots)..slots {
            geometry.colors_mut()[i][3] = 0.0;
            geometry.sizes_mut()[i] = 0.0;
        }
    }
}

/// Reflect a particle off the inside of a sphere centred at the origin
pub fn reflect_in_sphere(p: &mut Particle, radius: f32) {
    let r = p.position.length();
    if r > radius && r > 0.0 {
        let normal = p.position / r;
        let vn = p.velocity.dot(normal);
        if vn > 0.0 {
            p.velocity -= 2.0 * vn * normal;
        }
        p.position = normal * radius;
    }
}

/// Reflect a particle off the walls of an axis-aligned box centred at the origin
pub fn reflect_in_box(p: &mut Particle, half_extent: Vec3) {
    for axis in 0..3 {
        let limit = half_extent[axis];
        if p.position[axis] > limit {
            p.position[axis] = limit;
            p.velocity[axis] = -p.velocity[axis].abs();
        } else if p.position[axis] < -limit {
            p.position[axis] = -limit;
            p.velocity[axis] = p.velocity[axis].abs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;

    fn particle(max_life: f32) -> Particle {
        Particle::new(Vec3::ZERO, Vec3::X, max_life, WHITE, 0.1)
    }

    #[test]
    fn life_increases_every_step() {
        let mut pool = ParticlePool::new(4);
        pool.spawn(particle(10.0));
        let mut last = 0.0;
        for _ in 0..20 {
            pool.step(0.016);
            let life = pool.iter().next().map(|p| p.life).unwrap_or_default();
            assert!(life > last);
            last = life;
        }
    }

    #[test]
    fn expired_particles_are_removed_exactly_once() {
        let mut pool = ParticlePool::new(4);
        let id = pool.spawn(particle(0.1)).unwrap();
        let mut removals = Vec::new();
        for _ in 0..30 {
            for p in pool.step(0.016) {
                assert!(p.life > p.max_life);
                removals.push(p.id);
            }
        }
        assert_eq!(removals, vec![id]);
        assert!(pool.is_empty());
        assert_eq!(pool.totals(), (1, 1));
    }

    #[test]
    fn spawn_refuses_when_full() {
        let mut pool = ParticlePool::new(2);
        assert!(pool.spawn(particle(1.0)).is_some());
        assert!(pool.spawn(particle(1.0)).is_some());
        assert!(pool.spawn(particle(1.0)).is_none());
    }

    #[test]
    fn write_points_hides_unused_slots() {
        let mut pool = ParticlePool::new(8);
        pool.spawn(particle(1.0));
        let mut geometry = Geometry::points(4, WHITE, 0.2);
        pool.write_points(&mut geometry, |_| 1.0);
        assert_eq!(geometry.len(), 4);
        assert_eq!(geometry.sizes()[0], 0.1);
        assert!(geometry.colors()[1..].iter().all(|c| c[3] == 0.0));
    }

    #[test]
    fn sphere_reflection_turns_velocity_inward() {
        let mut p = Particle::new(Vec3::new(3.0, 0.0, 0.0), Vec3::X, 1.0, WHITE, 0.1);
        reflect_in_sphere(&mut p, 2.0);
        assert!((p.position.length() - 2.0).abs() < 1e-5);
        assert!(p.velocity.x < 0.0);
    }

    #[test]
    fn box_reflection_clamps_position() {
        let mut p = Particle::new(Vec3::new(0.0, -5.0, 0.0), Vec3::NEG_Y, 1.0, WHITE, 0.1);
        reflect_in_box(&mut p, Vec3::splat(4.0));
        assert_eq!(p.position.y, -4.0);
        assert!(p.velocity.y > 0.0);
    }
}
