//! Quantum dice
//!
//! A tumbling wireframe die whose face stays undetermined until it lands.
//! Rolling is a timed transient; the outcome is drawn from bias-weighted
//! probabilities and tallied in a histogram.

use crate::animation::{Countdown, VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider};
use crate::scene::{Geometry, ObjectId, Transform};
use crate::shapes;
use glam::{Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const ROLL_SECONDS: f32 = 1.2;
const DIE_HALF: f32 = 1.0;
const BAR_SPACING: f32 = 0.7;
const BAR_MAX_HEIGHT: f32 = 3.0;
const HISTOGRAM_ORIGIN: Vec3 = Vec3::new(3.0, -1.5, 0.0);

/// Face probabilities; `bias` in [0, 1] tilts the odds towards high faces
pub fn probabilities(bias: f32) -> [f32; 6] {
    let bias = bias.clamp(0.0, 1.0);
    let mut weights = [0.0; 6];
    for (k, w) in weights.iter_mut().enumerate() {
        *w = 1.0 + bias * k as f32;
    }
    let total: f32 = weights.iter().sum();
    weights.map(|w| w / total)
}

/// Pip offsets on a unit face for a given value
fn pip_layout(face: u8) -> &'static [(f32, f32)] {
    const C: f32 = 0.5;
    match face {
        1 => &[(0.0, 0.0)],
        2 => &[(-C, -C), (C, C)],
        3 => &[(-C, -C), (0.0, 0.0), (C, C)],
        4 => &[(-C, -C), (C, -C), (-C, C), (C, C)],
        5 => &[(-C, -C), (C, -C), (0.0, 0.0), (-C, C), (C, C)],
        _ => &[(-C, -C), (C, -C), (-C, 0.0), (C, 0.0), (-C, C), (C, C)],
    }
}

struct Handles {
    die: ObjectId,
    pips: ObjectId,
    bars: ObjectId,
}

pub struct QuantumDice {
    rng: StdRng,
    bias: f32,
    rolling: bool,
    timer: Countdown,
    spin: Vec3,
    orientation: Quat,
    shown_face: u8,
    outcome: Option<u8>,
    counts: [u32; 6],
    handles: Option<Handles>,
}

impl QuantumDice {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            bias: 0.0,
            rolling: false,
            timer: Countdown::default(),
            spin: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            shown_face: 1,
            outcome: None,
            counts: [0; 6],
            handles: None,
        }
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    pub fn outcome(&self) -> Option<u8> {
        self.outcome
    }

    pub fn counts(&self) -> [u32; 6] {
        self.counts
    }

    pub fn set_bias(&mut self, bias: f32) -> f32 {
        if bias.is_finite() {
            self.bias = bias.clamp(0.0, 1.0);
        }
        self.bias
    }

    /// Start a roll; ignored while one is in progress
    pub fn roll(&mut self) -> bool {
        if self.rolling {
            return false;
        }
        self.rolling = true;
        self.outcome = None;
        self.timer.start(ROLL_SECONDS);
        self.spin = Vec3::new(
            self.rng.gen_range(4.0..9.0),
            self.rng.gen_range(4.0..9.0),
            self.rng.gen_range(-3.0..3.0),
        );
        log::debug!("dice roll started");
        true
    }

    fn land(&mut self) -> u8 {
        let probs = probabilities(self.bias);
        let mut draw: f32 = self.rng.gen();
        let mut face = 6;
        for (k, p) in probs.iter().enumerate() {
            if draw < *p {
                face = k as u8 + 1;
                break;
            }
            draw -= p;
        }
        self.rolling = false;
        self.outcome = Some(face);
        self.shown_face = face;
        self.counts[face as usize - 1] += 1;
        self.orientation = Quat::IDENTITY;
        log::debug!("dice landed on {}", face);
        face
    }

    pub fn reset_stats(&mut self) {
        self.counts = [0; 6];
    }

    /// Advance the roll timer and tumble; lands when the timer fires
    pub fn advance(&mut self, dt: f32) {
        if !self.rolling {
            return;
        }
        let spin = self.spin * dt;
        let turn = Quat::from_euler(glam::EulerRot::XYZ, spin.x, spin.y, spin.z);
        self.orientation = (turn * self.orientation).normalize();
        self.shown_face = self.rng.gen_range(1..=6);
        if self.timer.tick(dt) {
            self.land();
        }
    }
}

impl Default for QuantumDice {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseAnimation for QuantumDice {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::new(1.5, 0.0, 0.0), 11.0, 0.5, 0.35);
        let die = ctx
            .scene
            .add("die", shapes::wire_box(Vec3::splat(DIE_HALF), color::WHITE));
        let pips = ctx.scene.add("pips", Geometry::points(6, color::PARTICLE_GOLD, 0.22));
        let bars = ctx.scene.add(
            "histogram",
            Geometry::segments(vec![HISTOGRAM_ORIGIN; 12], color::WAVE_BLUE),
        );
        self.handles = Some(Handles { die, pips, bars });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let dt = ctx.clock.dt;
        self.advance(dt);
        if !self.rolling {
            // Idle sway
            let sway = Quat::from_rotation_y(0.3 * (ctx.clock.elapsed * 0.5).sin());
            self.orientation = self.orientation.slerp(sway, (dt * 4.0).min(1.0));
        }

        let Some(h) = &self.handles else { return };

        ctx.scene.set_transform(
            h.die,
            Transform {
                rotation: self.orientation,
                ..Transform::IDENTITY
            },
        );
        ctx.scene.set_transform(
            h.pips,
            Transform {
                rotation: self.orientation,
                ..Transform::IDENTITY
            },
        );

        if let Some(g) = ctx.scene.geometry_mut(h.pips) {
            let layout = pip_layout(self.shown_face);
            let alpha = if self.rolling { 0.45 } else { 1.0 };
            for i in 0..g.len() {
                match layout.get(i) {
                    Some((u, v)) => {
                        g.positions_mut()[i] =
                            Vec3::new(u * DIE_HALF, DIE_HALF + 0.02, v * DIE_HALF);
                        g.colors_mut()[i] = color::with_alpha(color::PARTICLE_GOLD, alpha);
                        g.sizes_mut()[i] = 0.22;
                    }
                    None => {
                        g.colors_mut()[i][3] = 0.0;
                        g.sizes_mut()[i] = 0.0;
                    }
                }
            }
        }

        let max = self.counts.iter().copied().max().unwrap_or(0).max(1) as f32;
        if let Some(g) = ctx.scene.geometry_mut(h.bars) {
            for (k, count) in self.counts.iter().enumerate() {
                let x = HISTOGRAM_ORIGIN + Vec3::X * (k as f32 * BAR_SPACING);
                let height = *count as f32 / max * BAR_MAX_HEIGHT;
                g.positions_mut()[2 * k] = x;
                g.positions_mut()[2 * k + 1] = x + Vec3::Y * height;
                let highlight = self.outcome == Some(k as u8 + 1);
                let c = if highlight { color::PARTICLE_GOLD } else { color::WAVE_BLUE };
                g.colors_mut()[2 * k] = c;
                g.colors_mut()[2 * k + 1] = c;
            }
        }

        let outcome = match (self.rolling, self.outcome) {
            (true, _) => "Rolling…".to_string(),
            (false, Some(face)) => face.to_string(),
            (false, None) => "—".to_string(),
        };
        ctx.panel.set_readout("outcome", outcome);
        ctx.panel
            .set_readout("rolls", self.counts.iter().sum::<u32>().to_string());
    }

    fn cleanup(&mut self) {
        self.timer.cancel();
        self.rolling = false;
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Quantum Dice")
            .text("The face is not hidden inside the die; it arises when the die lands.")
            .button("roll", "Roll")
            .slider(Slider::new("bias", "Bias towards six", 0.0, 1.0, self.bias).with_step(0.05))
            .button("resetStats", "Reset statistics")
            .readout("outcome", "Outcome", "—")
            .readout("rolls", "Rolls", "0");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::ButtonPressed { id: "roll" } => {
                self.roll();
            }
            ControlEvent::ButtonPressed { id: "resetStats" } => self.reset_stats(),
            ControlEvent::SliderChanged { id: "bias", value } => {
                self.set_bias(value);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        for bias in [0.0, 0.4, 1.0, 7.0] {
            let total: f32 = probabilities(bias).iter().sum();
            assert!((total - 1.0).abs() < 1e-5);
        }
        assert!(probabilities(0.0).iter().all(|p| (p - 1.0 / 6.0).abs() < 1e-6));
    }

    #[test]
    fn roll_ends_after_countdown() {
        let mut dice = QuantumDice::with_seed(11);
        assert!(dice.roll());
        assert!(!dice.roll());
        let mut elapsed = 0.0;
        while dice.is_rolling() {
            dice.advance(0.05);
            elapsed += 0.05;
            assert!(elapsed < ROLL_SECONDS + 0.2);
        }
        let face = dice.outcome().unwrap();
        assert!((1..=6).contains(&face));
        assert_eq!(dice.counts().iter().sum::<u32>(), 1);
    }

    #[test]
    fn full_bias_favours_six() {
        let mut dice = QuantumDice::with_seed(4);
        dice.set_bias(1.0);
        for _ in 0..300 {
            dice.land();
        }
        let counts = dice.counts();
        assert!(counts[5] > counts[0]);
    }
}
