//! Quantum field
//!
//! A wireframe sheet rippled by travelling waves, with localized
//! excitations rising and sinking back into it. Field energy sets both the
//! ripple amplitude and how often excitations appear.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::particles::{fade_in_out, Particle, ParticlePool};
use crate::scene::ObjectId;
use crate::shapes;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

const GRID: usize = 48;
const EXTENT: f32 = 12.0;
const MAX_EXCITATIONS: usize = 64;
const MAX_SPAWN_RATE: f32 = 6.0;
const BUMP_HEIGHT: f32 = 0.9;
const BUMP_WIDTH_SQ: f32 = 0.8;

pub struct QuantumField {
    rng: StdRng,
    energy: f32,
    excitations: ParticlePool,
    spawn_budget: f32,
    rest: Vec<Vec3>,
    handles: Option<(ObjectId, ObjectId)>,
}

impl QuantumField {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            energy: 0.5,
            excitations: ParticlePool::new(MAX_EXCITATIONS),
            spawn_budget: 0.0,
            rest: shapes::grid_positions(GRID, GRID, EXTENT, EXTENT),
            handles: None,
        }
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f32) -> f32 {
        self.energy = if energy.is_finite() { energy.clamp(0.0, 1.0) } else { self.energy };
        self.energy
    }

    pub fn excitation_count(&self) -> usize {
        self.excitations.len()
    }

    /// Height of the field at `(x, z)` at time `t`
    pub fn height(&self, x: f32, z: f32, t: f32) -> f32 {
        let amplitude = 0.15 + 0.45 * self.energy;
        let waves = ((x * 0.9 - t * 1.6).sin() + (z * 0.7 + t * 1.1).cos()) * 0.5;
        let bumps: f32 = self
            .excitations
            .iter()
            .map(|p| {
                let dx = x - p.position.x;
                let dz = z - p.position.z;
                BUMP_HEIGHT * fade_in_out(p) * (-(dx * dx + dz * dz) / BUMP_WIDTH_SQ).exp()
            })
            .sum();
        amplitude * waves + bumps
    }

    fn spawn_excitation(&mut self) {
        let half = EXTENT * 0.4;
        let position = Vec3::new(
            self.rng.gen_range(-half..half),
            0.0,
            self.rng.gen_range(-half..half),
        );
        let drift = Vec3::new(self.rng.gen_range(-0.4..0.4), 0.0, self.rng.gen_range(-0.4..0.4));
        let life = self.rng.gen_range(2.0..4.0);
        self.excitations
            .spawn(Particle::new(position, drift, life, color::PARTICLE_GOLD, 0.18));
    }
}

impl Default for QuantumField {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseAnimation for QuantumField {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::ZERO, 14.0, 0.4, 0.55);
        let surface = ctx.scene.add(
            "field",
            shapes::grid_surface(
                GRID,
                GRID,
                EXTENT,
                EXTENT,
                color::with_alpha(color::WAVE_BLUE, 0.7),
            ),
        );
        let quanta = ctx.scene.add(
            "excitations",
            crate::scene::Geometry::points(MAX_EXCITATIONS, color::PARTICLE_GOLD, 0.18),
        );
        self.handles = Some((surface, quanta));
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let dt = ctx.clock.dt;
        let t = ctx.clock.elapsed;

        self.spawn_budget += MAX_SPAWN_RATE * self.energy * dt;
        while self.spawn_budget >= 1.0 {
            self.spawn_budget -= 1.0;
            self.spawn_excitation();
        }
        self.excitations.step(dt);

        let Some((surface, quanta)) = self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(surface) {
            for (i, rest) in self.rest.iter().enumerate() {
                let h = self.height(rest.x, rest.z, t);
                g.positions_mut()[i] = Vec3::new(rest.x, h, rest.z);
                let glow = (h / (BUMP_HEIGHT + 0.6)).clamp(0.0, 1.0);
                let tint = color::lerp(color::WAVE_BLUE, color::PARTICLE_GOLD, glow);
                g.colors_mut()[i] = color::with_alpha(tint, 0.7);
            }
        }

        // Lift each excitation marker onto the sheet
        let lifted: Vec<f32> = self
            .excitations
            .iter()
            .map(|p| self.height(p.position.x, p.position.z, t) + 0.2)
            .collect();
        for (p, y) in self.excitations.iter_mut().zip(lifted) {
            p.position.y = y;
        }
        if let Some(g) = ctx.scene.geometry_mut(quanta) {
            self.excitations.write_points(g, fade_in_out);
        }

        ctx.panel.set_readout("excitations", self.excitations.len().to_string());
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Quantum Field")
            .text("Particles are passing excitations of one underlying field.")
            .slider(
                Slider::new("energy", "Field energy", 0.0, 1.0, self.energy)
                    .with_format(ValueFormat::Number { decimals: 2 }),
            )
            .readout("excitations", "Excitations", "0");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        if let ControlEvent::SliderChanged { id: "energy", value } = *event {
            self.set_energy(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_is_clamped() {
        let mut field = QuantumField::with_seed(1);
        assert_eq!(field.set_energy(4.0), 1.0);
        assert_eq!(field.set_energy(-1.0), 0.0);
        assert_eq!(field.set_energy(f32::NAN), 0.0);
    }

    #[test]
    fn excitation_raises_the_sheet() {
        let mut field = QuantumField::with_seed(1);
        field.set_energy(0.0);
        let flat = field.height(0.0, 0.0, 0.0);
        field
            .excitations
            .spawn(Particle::new(Vec3::ZERO, Vec3::ZERO, 2.0, color::WHITE, 0.1));
        field.excitations.step(1.0);
        assert!(field.height(0.0, 0.0, 0.0) > flat + 0.5);
    }
}
