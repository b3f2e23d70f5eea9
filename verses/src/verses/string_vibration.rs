//! String vibration
//!
//! A fixed string showing one standing-wave harmonic at a time. Plucking
//! kicks the amplitude up for a short, exponentially decaying transient.

use crate::animation::{Countdown, VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::scene::{Geometry, ObjectId};
use glam::Vec3;
use std::f32::consts::PI;

pub const PLUCK_SECONDS: f32 = 2.5;
const LENGTH: f32 = 10.0;
const POINTS: usize = 200;
const MAX_HARMONIC: u32 = 8;
const REST_AMPLITUDE: f32 = 0.15;
const PLUCK_AMPLITUDE: f32 = 1.4;
const PLUCK_DECAY: f32 = 1.6;
const BASE_OMEGA: f32 = 3.0;

/// What each vibration mode is read as, lowest first
const MODE_NAMES: [&str; MAX_HARMONIC as usize] = [
    "fundamental",
    "photon-like",
    "electron-like",
    "quark-like",
    "gluon-like",
    "muon-like",
    "neutrino-like",
    "graviton-like",
];

/// Displacement of harmonic `n` at `x` (string spans ±LENGTH/2) before the
/// time factor
pub fn mode_shape(n: u32, x: f32) -> f32 {
    (n as f32 * PI * (x / LENGTH + 0.5)).sin()
}

struct Handles {
    string: ObjectId,
    upper: ObjectId,
    lower: ObjectId,
    nodes: ObjectId,
}

pub struct StringVibration {
    harmonic: u32,
    plucking: bool,
    timer: Countdown,
    since_pluck: f32,
    plucks: u32,
    handles: Option<Handles>,
}

impl StringVibration {
    pub fn new() -> Self {
        Self {
            harmonic: 1,
            plucking: false,
            timer: Countdown::default(),
            since_pluck: 0.0,
            plucks: 0,
            handles: None,
        }
    }

    pub fn harmonic(&self) -> u32 {
        self.harmonic
    }

    pub fn set_harmonic(&mut self, value: f32) -> u32 {
        if value.is_finite() {
            self.harmonic = value.round().clamp(1.0, MAX_HARMONIC as f32) as u32;
        }
        self.harmonic
    }

    pub fn is_plucking(&self) -> bool {
        self.plucking
    }

    /// Pluck the string, restarting the transient if one is running
    pub fn pluck(&mut self) {
        self.plucking = true;
        self.since_pluck = 0.0;
        self.plucks += 1;
        self.timer.start(PLUCK_SECONDS);
        log::debug!("string plucked at harmonic {}", self.harmonic);
    }

    pub fn amplitude(&self) -> f32 {
        if self.plucking {
            REST_AMPLITUDE + PLUCK_AMPLITUDE * (-PLUCK_DECAY * self.since_pluck).exp()
        } else {
            REST_AMPLITUDE
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.since_pluck += dt;
        if self.timer.tick(dt) {
            self.plucking = false;
        }
    }
}

impl Default for StringVibration {
    fn default() -> Self {
        Self::new()
    }
}

fn string_x(i: usize) -> f32 {
    (i as f32 / (POINTS - 1) as f32 - 0.5) * LENGTH
}

impl VerseAnimation for StringVibration {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::ZERO, 12.0, 0.0, 0.15);
        let anchors = vec![
            Vec3::new(-LENGTH / 2.0, -0.6, 0.0),
            Vec3::new(-LENGTH / 2.0, 0.6, 0.0),
            Vec3::new(LENGTH / 2.0, -0.6, 0.0),
            Vec3::new(LENGTH / 2.0, 0.6, 0.0),
        ];
        ctx.scene.add("anchors", Geometry::segments(anchors, color::DIM_GRAY));
        let flat = || (0..POINTS).map(|i| Vec3::new(string_x(i), 0.0, 0.0)).collect::<Vec<_>>();
        let envelope = color::with_alpha(color::WAVE_BLUE, 0.25);
        let upper = ctx.scene.add("envelope_upper", Geometry::line_strip(flat(), envelope));
        let lower = ctx.scene.add("envelope_lower", Geometry::line_strip(flat(), envelope));
        let string = ctx.scene.add("string", Geometry::line_strip(flat(), color::PARTICLE_GOLD));
        let nodes = ctx.scene.add(
            "nodes",
            Geometry::points(MAX_HARMONIC as usize + 1, color::WHITE, 0.18),
        );
        self.handles = Some(Handles {
            string,
            upper,
            lower,
            nodes,
        });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        self.advance(ctx.clock.dt);
        let n = self.harmonic;
        let amplitude = self.amplitude();
        let omega = BASE_OMEGA * n as f32;
        let swing = (omega * ctx.clock.elapsed).cos();

        let Some(h) = &self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(h.string) {
            for i in 0..POINTS {
                let x = string_x(i);
                let shape = mode_shape(n, x);
                g.positions_mut()[i] = Vec3::new(x, amplitude * shape * swing, 0.0);
                let energy = (shape * swing).abs();
                let glow = energy * amplitude / (REST_AMPLITUDE + PLUCK_AMPLITUDE);
                g.colors_mut()[i] = color::lerp(color::PARTICLE_GOLD, color::WHITE, glow);
            }
        }
        for (id, sign) in [(h.upper, 1.0), (h.lower, -1.0)] {
            if let Some(g) = ctx.scene.geometry_mut(id) {
                for i in 0..POINTS {
                    let x = string_x(i);
                    let y = sign * amplitude * mode_shape(n, x).abs();
                    g.positions_mut()[i] = Vec3::new(x, y, 0.0);
                }
            }
        }
        if let Some(g) = ctx.scene.geometry_mut(h.nodes) {
            for i in 0..g.len() {
                if i as u32 <= n {
                    let x = (i as f32 / n as f32 - 0.5) * LENGTH;
                    g.positions_mut()[i] = Vec3::new(x, 0.0, 0.0);
                    g.sizes_mut()[i] = 0.18;
                } else {
                    g.sizes_mut()[i] = 0.0;
                }
            }
        }

        ctx.panel
            .set_readout("mode", format!("f = {}·f₁ ({})", n, MODE_NAMES[n as usize - 1]));
        ctx.panel.set_readout(
            "state",
            if self.plucking { "Plucking" } else { "Resting" },
        );
        ctx.panel.set_readout("plucks", self.plucks.to_string());
    }

    fn cleanup(&mut self) {
        self.timer.cancel();
        self.plucking = false;
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("String Vibration")
            .text("One string, many notes: what a thing is depends on how it vibrates.")
            .slider(
                Slider::new("harmonic", "Harmonic", 1.0, MAX_HARMONIC as f32, self.harmonic as f32)
                    .with_step(1.0)
                    .with_format(ValueFormat::Number { decimals: 0 }),
            )
            .button("pluck", "Pluck")
            .readout("mode", "Mode", "")
            .readout("state", "String", "Resting")
            .readout("plucks", "Plucks", "0");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::SliderChanged { id: "harmonic", value } => {
                self.set_harmonic(value);
            }
            ControlEvent::ButtonPressed { id: "pluck" } => self.pluck(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_are_nodes() {
        for n in 1..=MAX_HARMONIC {
            assert!(mode_shape(n, -LENGTH / 2.0).abs() < 1e-5);
            assert!(mode_shape(n, LENGTH / 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn harmonic_is_clamped_and_rounded() {
        let mut verse = StringVibration::new();
        assert_eq!(verse.set_harmonic(12.0), MAX_HARMONIC);
        assert_eq!(verse.set_harmonic(0.0), 1);
        assert_eq!(verse.set_harmonic(3.4), 3);
    }

    #[test]
    fn pluck_decays_and_ends() {
        let mut verse = StringVibration::new();
        verse.pluck();
        let start = verse.amplitude();
        verse.advance(0.5);
        assert!(verse.amplitude() < start);
        for _ in 0..60 {
            verse.advance(0.05);
        }
        assert!(!verse.is_plucking());
        assert_eq!(verse.amplitude(), REST_AMPLITUDE);
    }
}
