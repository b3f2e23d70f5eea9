//! Bose-Einstein condensate
//!
//! Atoms bounce around a box with thermal jitter. Lower the temperature and
//! they slow down, fall into the centre and glow as one cold cluster.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider};
use crate::particles::{reflect_in_box, Particle, ParticlePool};
use crate::scene::{Geometry, ObjectId};
use crate::shapes;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

const ATOMS: usize = 300;
const BOX_HALF: f32 = 4.0;
const THERMAL_KICK: f32 = 6.0;
const DAMPING: f32 = 0.6;
const ATTRACTION: f32 = 3.0;
const RAMP_RATE: f32 = 0.15;
const CORE_RADIUS: f32 = 1.0;

/// Direction the temperature is being ramped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Cooling,
    Heating,
}

struct Handles {
    atoms: ObjectId,
}

pub struct Condensate {
    rng: StdRng,
    temperature: f32,
    ramp: Option<Ramp>,
    atoms: ParticlePool,
    handles: Option<Handles>,
}

impl Condensate {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let mut atoms = ParticlePool::new(ATOMS);
        for _ in 0..ATOMS {
            let position = Vec3::new(
                rng.gen_range(-BOX_HALF..BOX_HALF),
                rng.gen_range(-BOX_HALF..BOX_HALF),
                rng.gen_range(-BOX_HALF..BOX_HALF),
            );
            let velocity = Vec3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            );
            // Atoms live as long as the verse
            atoms.spawn(Particle::new(position, velocity, f32::INFINITY, color::HOT, 0.14));
        }
        Self {
            rng,
            temperature: 1.0,
            ramp: None,
            atoms,
            handles: None,
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: f32) -> f32 {
        if temperature.is_finite() {
            self.temperature = temperature.clamp(0.0, 1.0);
        }
        self.temperature
    }

    pub fn ramp(&self) -> Option<Ramp> {
        self.ramp
    }

    /// Start ramping down (`true`) or up (`false`); repeating a request
    /// leaves the ramp as it is
    pub fn set_cooling(&mut self, cooling: bool) {
        let ramp = if cooling { Ramp::Cooling } else { Ramp::Heating };
        if self.ramp != Some(ramp) {
            log::debug!("condensate ramp: {:?}", ramp);
        }
        self.ramp = Some(ramp);
    }

    /// Share of atoms inside the central core
    pub fn condensed_fraction(&self) -> f32 {
        let inside = self
            .atoms
            .iter()
            .filter(|p| p.position.length() < CORE_RADIUS)
            .count();
        inside as f32 / self.atoms.len().max(1) as f32
    }

    pub fn step(&mut self, dt: f32) {
        match self.ramp {
            Some(Ramp::Cooling) => {
                self.set_temperature(self.temperature - RAMP_RATE * dt);
                if self.temperature <= 0.0 {
                    self.ramp = None;
                }
            }
            Some(Ramp::Heating) => {
                self.set_temperature(self.temperature + RAMP_RATE * dt);
                if self.temperature >= 1.0 {
                    self.ramp = None;
                }
            }
            None => {}
        }

        let t = self.temperature;
        let kick = THERMAL_KICK * t.sqrt() * dt;
        let pull = ATTRACTION * (1.0 - t).powi(2) * dt;
        let damping = 1.0 - DAMPING * (1.0 - t) * dt;
        let rng = &mut self.rng;
        self.atoms.step_with(dt, |p| {
            p.velocity += Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ) * kick;
            p.velocity -= p.position * pull;
            p.velocity *= damping;
        });
        for p in self.atoms.iter_mut() {
            reflect_in_box(p, Vec3::splat(BOX_HALF));
        }
    }
}

impl Default for Condensate {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseAnimation for Condensate {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::ZERO, 15.0, 0.5, 0.4);
        ctx.scene.add(
            "trap",
            shapes::wire_box(Vec3::splat(BOX_HALF), color::with_alpha(color::DIM_GRAY, 0.5)),
        );
        let atoms = ctx.scene.add("atoms", Geometry::points(ATOMS, color::HOT, 0.14));
        self.handles = Some(Handles { atoms });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let ramping = self.ramp.is_some();
        self.step(ctx.clock.dt);

        let Some(h) = &self.handles else { return };
        let t = self.temperature;
        let tint = color::lerp(color::COLD, color::HOT, t);
        for p in self.atoms.iter_mut() {
            let core = (1.0 - p.position.length() / BOX_HALF).clamp(0.0, 1.0) * (1.0 - t);
            p.color = color::lerp(tint, color::WHITE, core * 0.6);
            p.size = 0.14 + 0.1 * core;
        }
        if let Some(g) = ctx.scene.geometry_mut(h.atoms) {
            self.atoms.write_points(g, |_| 1.0);
        }

        if ramping {
            ctx.panel.set_slider("temperature", t);
        }
        ctx.panel.set_toggle("cool", self.ramp == Some(Ramp::Cooling));
        ctx.panel
            .set_readout("temperatureDisplay", format!("T = {:.2}", t));
        ctx.panel.set_readout(
            "condensed",
            format!("{:.0}%", self.condensed_fraction() * 100.0),
        );
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Condensate")
            .text("Cooled far enough, many atoms stop being many and act as one.")
            .slider(
                Slider::new("temperature", "Temperature", 0.0, 1.0, self.temperature)
                    .with_step(0.01),
            )
            .toggle("cool", "Cool", "Heat", self.ramp == Some(Ramp::Cooling))
            .readout("temperatureDisplay", "Temperature", "")
            .readout("condensed", "In condensate", "");
    }

    fn handle_control(&mut self, ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::SliderChanged { id: "temperature", value } => {
                self.ramp = None;
                self.set_temperature(value);
                ctx.panel.set_toggle("cool", false);
            }
            ControlEvent::Toggled { id: "cool", on } => self.set_cooling(on),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Stage;

    #[test]
    fn temperature_is_clamped() {
        let mut verse = Condensate::with_seed(1);
        assert_eq!(verse.set_temperature(3.0), 1.0);
        assert_eq!(verse.set_temperature(-0.5), 0.0);
    }

    #[test]
    fn atoms_stay_in_the_box() {
        let mut verse = Condensate::with_seed(1);
        for _ in 0..300 {
            verse.step(0.016);
        }
        let limit = BOX_HALF + 1e-4;
        assert!(verse
            .atoms
            .iter()
            .all(|p| p.position.abs().max_element() <= limit));
        assert_eq!(verse.atoms.len(), ATOMS);
    }

    #[test]
    fn cooling_gathers_atoms_at_the_centre() {
        let mut verse = Condensate::with_seed(1);
        let before = verse.condensed_fraction();
        verse.set_temperature(0.0);
        for _ in 0..600 {
            verse.step(0.016);
        }
        assert!(verse.condensed_fraction() > before);
    }

    #[test]
    fn cooling_ramp_reaches_zero_and_stops() {
        let mut verse = Condensate::with_seed(1);
        verse.set_cooling(true);
        verse.set_cooling(true);
        assert_eq!(verse.ramp(), Some(Ramp::Cooling));
        for _ in 0..200 {
            verse.step(0.05);
        }
        assert_eq!(verse.temperature(), 0.0);
        assert_eq!(verse.ramp(), None);
    }

    #[test]
    fn dragging_temperature_releases_the_cool_toggle() {
        let mut stage = Stage::new(1.0);
        let mut verse = Condensate::with_seed(2);
        stage.mount(&mut verse);
        stage.dispatch(&mut verse, ControlEvent::Toggled { id: "cool", on: true });
        assert_eq!(stage.panel.toggle_state("cool"), Some(true));

        let drag = ControlEvent::SliderChanged {
            id: "temperature",
            value: 0.4,
        };
        stage.dispatch(&mut verse, drag);
        assert_eq!(verse.ramp(), None);
        assert_eq!(stage.panel.toggle_state("cool"), Some(false));
    }

    #[test]
    fn finished_cooling_ramp_releases_the_cool_toggle() {
        let mut stage = Stage::new(1.0);
        let mut verse = Condensate::with_seed(2);
        stage.mount(&mut verse);
        let drag = ControlEvent::SliderChanged {
            id: "temperature",
            value: 0.1,
        };
        stage.dispatch(&mut verse, drag);
        stage.dispatch(&mut verse, ControlEvent::Toggled { id: "cool", on: true });

        // 0.1 at RAMP_RATE per second finishes well inside two seconds
        for _ in 0..120 {
            stage.tick(&mut verse, 1.0 / 60.0);
        }
        assert_eq!(verse.ramp(), None);
        assert_eq!(verse.temperature(), 0.0);
        assert_eq!(stage.panel.toggle_state("cool"), Some(false));
    }
}
