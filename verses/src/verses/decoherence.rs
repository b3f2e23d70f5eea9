//! Decoherence
//!
//! A ring of oscillators that swing in lock-step while coherent. As
//! coherence drops, their phases scatter and the fringe visibility plotted
//! behind the ring washes out.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::quantum::Complex;
use crate::scene::{Geometry, ObjectId};
use crate::shapes;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

const OSCILLATORS: usize = 48;
const RING_RADIUS: f32 = 3.0;
const SWING: f32 = 0.8;
const OMEGA: f32 = 2.0;
const PLOT_POINTS: usize = 160;
const PLOT_WIDTH: f32 = 8.0;
const PLOT_Z: f32 = -3.5;
/// Coherence lost per second while coupled to the environment, in percent
const ENVIRONMENT_DECAY: f32 = 12.0;

/// Magnitude of the mean phasor, 1 when every phase agrees
pub fn order_parameter(phases: &[f32]) -> f32 {
    if phases.is_empty() {
        return 0.0;
    }
    let sum = phases
        .iter()
        .fold(Complex::ZERO, |acc, &p| acc + Complex::from_polar(1.0, p));
    sum.norm_sq().sqrt() / phases.len() as f32
}

/// Interference intensity at `x` for fringe visibility `v`
pub fn fringe(x: f32, visibility: f32) -> f32 {
    0.5 * (1.0 + visibility.clamp(0.0, 1.0) * (x * 2.4).cos())
}

struct Handles {
    oscillators: ObjectId,
    spokes: ObjectId,
    plot: ObjectId,
}

pub struct Decoherence {
    rng: StdRng,
    coherence: f32,
    coupled: bool,
    offsets: Vec<f32>,
    drift: Vec<f32>,
    phases: Vec<f32>,
    handles: Option<Handles>,
}

impl Decoherence {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let offsets = (0..OSCILLATORS).map(|_| rng.gen_range(-PI..PI)).collect();
        Self {
            rng,
            coherence: 100.0,
            coupled: false,
            offsets,
            drift: vec![0.0; OSCILLATORS],
            phases: vec![0.0; OSCILLATORS],
            handles: None,
        }
    }

    /// Coherence in percent
    pub fn coherence(&self) -> f32 {
        self.coherence
    }

    pub fn set_coherence(&mut self, percent: f32) -> f32 {
        if percent.is_finite() {
            self.coherence = percent.clamp(0.0, 100.0);
        }
        self.coherence
    }

    pub fn is_coupled(&self) -> bool {
        self.coupled
    }

    pub fn set_coupled(&mut self, coupled: bool) {
        if self.coupled != coupled {
            log::debug!("environment coupling {}", if coupled { "on" } else { "off" });
        }
        self.coupled = coupled;
    }

    pub fn visibility(&self) -> f32 {
        order_parameter(&self.phases)
    }

    /// Advance every oscillator's phase by `dt` seconds
    pub fn step(&mut self, dt: f32, t: f32) {
        if self.coupled {
            self.set_coherence(self.coherence - ENVIRONMENT_DECAY * dt);
        }
        let disorder = 1.0 - self.coherence / 100.0;
        for i in 0..OSCILLATORS {
            // Random walk grows with disorder and relaxes back when coherent
            let kick: f32 = self.rng.gen_range(-1.0..1.0);
            let relax = 1.0 - (1.0 - disorder) * dt;
            self.drift[i] = (self.drift[i] + kick * disorder * 2.0 * dt) * relax;
            self.phases[i] = OMEGA * t + disorder * (self.offsets[i] + self.drift[i]);
        }
    }
}

impl Default for Decoherence {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseAnimation for Decoherence {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::new(0.0, 0.0, -1.0), 13.0, 0.0, 0.45);
        ctx.scene
            .add("ring", shapes::circle(RING_RADIUS, 96, color::with_alpha(color::DIM_GRAY, 0.4)));
        let oscillators = ctx
            .scene
            .add("oscillators", Geometry::points(OSCILLATORS, color::WAVE_BLUE, 0.22));
        let spokes = ctx.scene.add(
            "spokes",
            Geometry::segments(
                vec![Vec3::ZERO; 2 * OSCILLATORS],
                color::with_alpha(color::WHITE, 0.25),
            ),
        );
        let plot = ctx.scene.add(
            "fringe_plot",
            Geometry::line_strip(vec![Vec3::ZERO; PLOT_POINTS], color::PARTICLE_GOLD),
        );
        self.handles = Some(Handles {
            oscillators,
            spokes,
            plot,
        });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        self.step(ctx.clock.dt, ctx.clock.elapsed);
        let visibility = self.visibility();

        let Some(h) = &self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(h.oscillators) {
            for (i, phase) in self.phases.iter().enumerate() {
                let a = i as f32 / OSCILLATORS as f32 * TAU;
                g.positions_mut()[i] =
                    Vec3::new(RING_RADIUS * a.cos(), SWING * phase.sin(), RING_RADIUS * a.sin());
                let wrapped = (phase + PI).rem_euclid(TAU) - PI;
                g.colors_mut()[i] = color::phase_color(wrapped, 1.0);
            }
        }
        if let Some(g) = ctx.scene.geometry_mut(h.spokes) {
            for (i, phase) in self.phases.iter().enumerate() {
                let a = i as f32 / OSCILLATORS as f32 * TAU;
                let base = Vec3::new(RING_RADIUS * a.cos(), 0.0, RING_RADIUS * a.sin());
                g.positions_mut()[2 * i] = base;
                g.positions_mut()[2 * i + 1] = base + Vec3::Y * SWING * phase.sin();
            }
        }
        if let Some(g) = ctx.scene.geometry_mut(h.plot) {
            for i in 0..PLOT_POINTS {
                let x = (i as f32 / (PLOT_POINTS - 1) as f32 - 0.5) * PLOT_WIDTH;
                let y = 1.5 + 2.0 * fringe(x, visibility);
                g.positions_mut()[i] = Vec3::new(x, y, PLOT_Z);
            }
            g.fill_color(color::lerp(color::DIM_GRAY, color::PARTICLE_GOLD, visibility));
        }

        if self.coupled {
            ctx.panel.set_slider("coherence", self.coherence);
        }
        ctx.panel
            .set_readout("coherenceDisplay", ValueFormat::Percent.format(self.coherence));
        ctx.panel
            .set_readout("visibility", format!("{:.2}", visibility));
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Decoherence")
            .text("Coherence is not owned by the system; it is shared with its surroundings.")
            .slider(
                Slider::new("coherence", "Coherence", 0.0, 100.0, self.coherence)
                    .with_step(1.0)
                    .with_format(ValueFormat::Percent),
            )
            .toggle("environment", "Couple to environment", "Isolate", self.coupled)
            .readout("coherenceDisplay", "Coherence", "")
            .readout("visibility", "Fringe visibility", "");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::SliderChanged { id: "coherence", value } => {
                self.set_coherence(value);
            }
            ControlEvent::Toggled { id: "environment", on } => self.set_coupled(on),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coherence_is_clamped() {
        let mut verse = Decoherence::with_seed(1);
        assert_eq!(verse.set_coherence(140.0), 100.0);
        assert_eq!(verse.set_coherence(-20.0), 0.0);
    }

    #[test]
    fn full_coherence_locks_phases() {
        let mut verse = Decoherence::with_seed(1);
        verse.step(0.016, 1.0);
        assert!((verse.visibility() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_coherence_scatters_phases() {
        let mut verse = Decoherence::with_seed(1);
        verse.set_coherence(0.0);
        verse.step(0.016, 1.0);
        assert!(verse.visibility() < 0.5);
    }

    #[test]
    fn environment_drains_coherence() {
        let mut verse = Decoherence::with_seed(1);
        verse.set_coupled(true);
        for _ in 0..200 {
            verse.step(0.05, 0.0);
        }
        assert_eq!(verse.coherence(), 0.0);
    }
}
