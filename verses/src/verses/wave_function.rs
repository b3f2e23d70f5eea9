//! Wave function and measurement
//!
//! A travelling Gaussian wave packet drawn as a phase-coloured surface.
//! Measuring samples a position from |ψ|² and eases the packet into a narrow
//! spike there; resetting eases it back out.

use crate::animation::{Tween, VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider};
use crate::scene::{Geometry, ObjectId};
use crate::shapes;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

const NX: usize = 64;
const NZ: usize = 16;
const WIDTH: f32 = 16.0;
const DEPTH: f32 = 3.0;
const HALF_RANGE: f32 = WIDTH / 2.0;
const HEIGHT_SCALE: f32 = 2.5;
const COLLAPSED_SPREAD: f32 = 0.15;
const COLLAPSE_SECONDS: f32 = 0.6;
const GROUP_VELOCITY: f32 = 0.8;

/// |ψ|² of a Gaussian packet, normalized to a peak of 1
pub fn packet_density(x: f32, center: f32, spread: f32) -> f32 {
    let s = spread.max(1e-3);
    (-(x - center).powi(2) / (2.0 * s * s)).exp()
}

struct Handles {
    surface: ObjectId,
    real_part: ObjectId,
    marker: ObjectId,
}

pub struct WaveFunction {
    rng: StdRng,
    momentum: f32,
    spread: f32,
    center: f32,
    measured: bool,
    collapsed_at: f32,
    collapse: Tween,
    measurements: u32,
    rest: Vec<Vec3>,
    handles: Option<Handles>,
}

impl WaveFunction {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            momentum: 1.5,
            spread: 1.0,
            center: -4.0,
            measured: false,
            collapsed_at: 0.0,
            collapse: Tween::settled(0.0),
            measurements: 0,
            rest: shapes::grid_positions(NX, NZ, WIDTH, DEPTH),
            handles: None,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// 0 for the free packet, 1 when fully collapsed
    pub fn collapse_progress(&self) -> f32 {
        self.collapse.value()
    }

    pub fn measurements(&self) -> u32 {
        self.measurements
    }

    pub fn set_momentum(&mut self, momentum: f32) -> f32 {
        if momentum.is_finite() {
            self.momentum = momentum.clamp(-3.0, 3.0);
        }
        self.momentum
    }

    pub fn set_spread(&mut self, spread: f32) -> f32 {
        if spread.is_finite() {
            self.spread = spread.clamp(0.3, 2.0);
        }
        self.spread
    }

    /// Collapse (`true`) or release (`false`) the packet. Requesting the
    /// current state does nothing.
    pub fn set_measured(&mut self, measured: bool) {
        if measured == self.measured {
            return;
        }
        self.measured = measured;
        if measured {
            let sample = self.center + self.spread * gaussian(&mut self.rng);
            self.collapsed_at = sample.clamp(-HALF_RANGE, HALF_RANGE);
            self.measurements += 1;
            self.collapse.retarget(1.0, COLLAPSE_SECONDS);
            log::debug!("wave function collapsed at x = {:.2}", self.collapsed_at);
        } else {
            self.center = self.collapsed_at;
            self.collapse.retarget(0.0, COLLAPSE_SECONDS);
            log::debug!("wave function released");
        }
    }

    /// Density, phase at `x` and time `t`, blending towards the collapsed spike
    fn sample(&self, x: f32, t: f32) -> (f32, f32) {
        let c = self.collapse.value();
        let free = packet_density(x, self.center, self.spread);
        let spike = packet_density(x, self.collapsed_at, COLLAPSED_SPREAD);
        let density = free * (1.0 - c) + spike * c;
        let omega = 0.5 * self.momentum * self.momentum;
        let phase = self.momentum * x - omega * t;
        (density, phase)
    }
}

impl Default for WaveFunction {
    fn default() -> Self {
        Self::new()
    }
}

fn gaussian(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.gen_range(1e-6..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl VerseAnimation for WaveFunction {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::new(0.0, 1.0, 0.0), 15.0, 0.2, 0.45);
        ctx.scene.add(
            "axis",
            Geometry::segments(
                vec![Vec3::new(-HALF_RANGE, 0.0, 0.0), Vec3::new(HALF_RANGE, 0.0, 0.0)],
                color::DIM_GRAY,
            ),
        );
        let surface = ctx
            .scene
            .add("packet", shapes::grid_surface(NX, NZ, WIDTH, DEPTH, color::WAVE_BLUE));
        let real_part = ctx.scene.add(
            "real_part",
            Geometry::line_strip(vec![Vec3::ZERO; NX], color::with_alpha(color::WHITE, 0.6)),
        );
        let marker = ctx.scene.add(
            "detector_flash",
            Geometry::points(1, color::PARTICLE_GOLD, 0.45),
        );
        ctx.scene.set_visible(marker, self.measured);
        self.handles = Some(Handles {
            surface,
            real_part,
            marker,
        });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let dt = ctx.clock.dt;
        let t = ctx.clock.elapsed;

        self.collapse.advance(dt);
        if !self.measured {
            self.center += self.momentum * GROUP_VELOCITY * dt;
            // Re-enter from the far side once the packet leaves the stage
            if self.center > HALF_RANGE + 2.0 {
                self.center = -HALF_RANGE - 2.0;
            } else if self.center < -HALF_RANGE - 2.0 {
                self.center = HALF_RANGE + 2.0;
            }
        }

        let Some(h) = &self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(h.surface) {
            for (i, rest) in self.rest.iter().enumerate() {
                let (density, phase) = self.sample(rest.x, t);
                g.positions_mut()[i] = Vec3::new(rest.x, density * HEIGHT_SCALE, rest.z);
                let wrapped = phase.rem_euclid(2.0 * PI) - PI;
                g.colors_mut()[i] = color::phase_color(wrapped, 0.25 + 0.75 * density);
            }
        }

        if let Some(g) = ctx.scene.geometry_mut(h.real_part) {
            for i in 0..NX {
                let x = (i as f32 / (NX - 1) as f32 - 0.5) * WIDTH;
                let (density, phase) = self.sample(x, t);
                let y = density.sqrt() * phase.cos() * 1.2 + HEIGHT_SCALE + 0.8;
                g.positions_mut()[i] = Vec3::new(x, y, -DEPTH / 2.0);
            }
        }

        ctx.scene.set_visible(h.marker, self.measured);
        if let Some(g) = ctx.scene.geometry_mut(h.marker) {
            g.positions_mut()[0] = Vec3::new(self.collapsed_at, HEIGHT_SCALE + 0.3, 0.0);
        }

        let state = if self.measured { "Collapsed" } else { "Superposed" };
        ctx.panel.set_readout("state", state);
        ctx.panel.set_readout(
            "position",
            if self.measured {
                format!("x = {:.2}", self.collapsed_at)
            } else {
                format!("⟨x⟩ ≈ {:.2}", self.center)
            },
        );
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Wave Function")
            .text("Before measurement the particle has no single place; afterwards it does.")
            .slider(Slider::new("momentum", "Momentum", -3.0, 3.0, self.momentum).with_step(0.1))
            .slider(Slider::new("spread", "Spread", 0.3, 2.0, self.spread).with_step(0.05))
            .toggle("measure", "Measure", "Reset", self.measured)
            .readout("state", "State", "")
            .readout("position", "Position", "");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::SliderChanged { id: "momentum", value } => {
                self.set_momentum(value);
            }
            ControlEvent::SliderChanged { id: "spread", value } => {
                self.set_spread(value);
            }
            ControlEvent::Toggled { id: "measure", on } => self.set_measured(on),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measuring_twice_samples_once() {
        let mut wave = WaveFunction::with_seed(5);
        wave.set_measured(true);
        let at = wave.collapsed_at;
        wave.set_measured(true);
        assert_eq!(wave.measurements(), 1);
        assert_eq!(wave.collapsed_at, at);
    }

    #[test]
    fn collapse_eases_in() {
        let mut wave = WaveFunction::with_seed(5);
        wave.set_measured(true);
        assert_eq!(wave.collapse_progress(), 0.0);
        for _ in 0..60 {
            wave.collapse.advance(0.016);
        }
        assert_eq!(wave.collapse_progress(), 1.0);
    }

    #[test]
    fn density_peaks_at_center() {
        assert_eq!(packet_density(1.0, 1.0, 0.5), 1.0);
        assert!(packet_density(2.0, 1.0, 0.5) < 0.2);
    }
}
