//! Vacuum fluctuations
//!
//! Virtual particle/antiparticle pairs pop out of empty space, fly apart,
//! and fade away again within a bounded region.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::particles::{fade_in_out, reflect_in_sphere, Particle, ParticlePool};
use crate::scene::{Geometry, ObjectId};
use crate::shapes;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

const RADIUS: f32 = 5.0;
const MAX_PARTICLES: usize = 400;
const PAIRS_PER_RATE: f32 = 0.4;

const ANTI_COLOR: color::Rgba = [0.55, 0.35, 1.0, 1.0];

struct Handles {
    particles: ObjectId,
    links: ObjectId,
}

pub struct VacuumFluctuation {
    rng: StdRng,
    rate: f32,
    pool: ParticlePool,
    spawn_budget: f32,
    pairs_created: u64,
    handles: Option<Handles>,
}

impl VacuumFluctuation {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            rate: 40.0,
            pool: ParticlePool::new(MAX_PARTICLES),
            spawn_budget: 0.0,
            pairs_created: 0,
            handles: None,
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) -> f32 {
        if rate.is_finite() {
            self.rate = rate.clamp(0.0, 100.0);
        }
        self.rate
    }

    pub fn live_particles(&self) -> usize {
        self.pool.len()
    }

    /// Spawn a particle and its antiparticle with opposite velocities.
    /// Pairs get consecutive ids starting at an even one.
    fn spawn_pair(&mut self) -> bool {
        if self.pool.capacity() - self.pool.len() < 2 {
            return false;
        }
        let origin = loop {
            let p = Vec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            );
            if p.length_squared() <= 1.0 {
                break p * (RADIUS * 0.8);
            }
        };
        let direction = Vec3::new(
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::X);
        let velocity = direction * self.rng.gen_range(0.5..1.2);
        let life = self.rng.gen_range(1.0..2.5);

        self.pool
            .spawn(Particle::new(origin, velocity, life, color::PARTICLE_GOLD, 0.12));
        self.pool
            .spawn(Particle::new(origin, -velocity, life, ANTI_COLOR, 0.12));
        self.pairs_created += 1;
        true
    }
}

impl Default for VacuumFluctuation {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseAnimation for VacuumFluctuation {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::ZERO, 14.0, 0.0, 0.3);
        ctx.scene.add(
            "boundary",
            shapes::wire_sphere(RADIUS, 8, 6, 48, color::with_alpha(color::DIM_GRAY, 0.2)),
        );
        let particles = ctx
            .scene
            .add("virtual_particles", Geometry::points(MAX_PARTICLES, color::WHITE, 0.12));
        let links = ctx.scene.add(
            "pair_links",
            Geometry::segments(
                vec![Vec3::ZERO; MAX_PARTICLES],
                color::with_alpha(color::WHITE, 0.3),
            ),
        );
        self.handles = Some(Handles { particles, links });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let dt = ctx.clock.dt;

        self.spawn_budget += self.rate * PAIRS_PER_RATE * dt;
        while self.spawn_budget >= 1.0 {
            self.spawn_budget -= 1.0;
            if !self.spawn_pair() {
                self.spawn_budget = 0.0;
                break;
            }
        }
        self.pool.step_with(dt, |p| reflect_in_sphere(p, RADIUS));

        let Some(h) = &self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(h.particles) {
            self.pool.write_points(g, fade_in_out);
        }

        if let Some(g) = ctx.scene.geometry_mut(h.links) {
            let by_id: HashMap<u64, &Particle> = self.pool.iter().map(|p| (p.id, p)).collect();
            let slots = g.len();
            let mut used = 0;
            for p in self.pool.iter().filter(|p| p.id % 2 == 0) {
                if used + 2 > slots {
                    break;
                }
                if let Some(partner) = by_id.get(&(p.id + 1)) {
                    let alpha = 0.3 * fade_in_out(p);
                    g.positions_mut()[used] = p.position;
                    g.positions_mut()[used + 1] = partner.position;
                    g.colors_mut()[used] = color::with_alpha(color::WHITE, alpha);
                    g.colors_mut()[used + 1] = color::with_alpha(color::WHITE, alpha);
                    used += 2;
                }
            }
            for i in used..slots {
                g.positions_mut()[i] = Vec3::ZERO;
                g.colors_mut()[i][3] = 0.0;
            }
        }

        ctx.panel.set_readout("pairs", (self.pool.len() / 2).to_string());
        ctx.panel.set_readout("created", self.pairs_created.to_string());
    }

    fn cleanup(&mut self) {
        self.pool.clear();
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Vacuum Fluctuations")
            .text("Empty space is never quite empty: pairs borrow energy and give it back.")
            .slider(
                Slider::new("rate", "Fluctuation rate", 0.0, 100.0, self.rate)
                    .with_step(1.0)
                    .with_format(ValueFormat::Number { decimals: 0 }),
            )
            .readout("pairs", "Live pairs", "0")
            .readout("created", "Pairs created", "0");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        if let ControlEvent::SliderChanged { id: "rate", value } = *event {
            self.set_rate(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_have_opposite_velocities() {
        let mut vacuum = VacuumFluctuation::with_seed(9);
        assert!(vacuum.spawn_pair());
        let particles: Vec<&Particle> = vacuum.pool.iter().collect();
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[0].id + 1, particles[1].id);
        assert!((particles[0].velocity + particles[1].velocity).length() < 1e-6);
    }

    #[test]
    fn full_pool_refuses_pairs() {
        let mut vacuum = VacuumFluctuation::with_seed(9);
        while vacuum.spawn_pair() {}
        assert_eq!(vacuum.live_particles(), MAX_PARTICLES);
    }

    #[test]
    fn rate_is_clamped() {
        let mut vacuum = VacuumFluctuation::with_seed(9);
        assert_eq!(vacuum.set_rate(250.0), 100.0);
        assert_eq!(vacuum.set_rate(-5.0), 0.0);
    }
}
