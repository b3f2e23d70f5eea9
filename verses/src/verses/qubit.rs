//! Qubit on the Bloch sphere
//!
//! The state arrow and its colour follow the |1⟩ probability and relative
//! phase. Measurement collapses the arrow to a pole; Hadamard swings it
//! across the sphere; precession winds the phase continuously.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color::{self, Rgba};
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::quantum::Qubit;
use crate::scene::{Geometry, ObjectId, Scene, Transform};
use crate::shapes;
use glam::{Quat, Vec3};
use rand::{rngs::StdRng, SeedableRng};

const RADIUS: f32 = 2.5;
const TRAIL_POINTS: usize = 96;
const PRECESSION_RATE: f32 = 1.2;
const BAR_X: f32 = 4.0;

/// Visual classification of a qubit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateClass {
    Zero,
    One,
    Superposition,
}

impl StateClass {
    pub fn classify(prob_one: f32) -> Self {
        if prob_one < 0.1 {
            StateClass::Zero
        } else if prob_one > 0.9 {
            StateClass::One
        } else {
            StateClass::Superposition
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            StateClass::Zero => color::STATE_ZERO,
            StateClass::One => color::STATE_ONE,
            StateClass::Superposition => color::SUPERPOSITION,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StateClass::Zero => "|0⟩",
            StateClass::One => "|1⟩",
            StateClass::Superposition => "Superposition",
        }
    }
}

struct Handles {
    arrow: ObjectId,
    tip: ObjectId,
    trail: ObjectId,
    bars: ObjectId,
}

pub struct QubitVerse {
    rng: StdRng,
    qubit: Qubit,
    class: StateClass,
    precessing: bool,
    trail_head: usize,
    handles: Option<Handles>,
}

impl QubitVerse {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let qubit = Qubit::from_probability(0.5, 0.0);
        Self {
            rng,
            qubit,
            class: StateClass::classify(qubit.prob_one()),
            precessing: false,
            trail_head: 0,
            handles: None,
        }
    }

    pub fn qubit(&self) -> Qubit {
        self.qubit
    }

    pub fn class(&self) -> StateClass {
        self.class
    }

    pub fn is_precessing(&self) -> bool {
        self.precessing
    }

    /// Set the state from a |1⟩ probability (clamped to [0, 1]) and relative
    /// phase, repaint the arrow and return the resulting class
    pub fn update_qubit_state(
        &mut self,
        scene: &mut Scene,
        prob_one: f32,
        phase: f32,
    ) -> StateClass {
        let prob_one = if prob_one.is_finite() { prob_one } else { self.qubit.prob_one() };
        let phase = if phase.is_finite() { phase } else { 0.0 };
        self.qubit = Qubit::from_probability(prob_one, phase);
        self.refresh(scene)
    }

    /// Collapse to |0⟩ or |1⟩; returns `true` for |1⟩
    pub fn measure(&mut self, scene: &mut Scene) -> bool {
        let one = self.qubit.measure(&mut self.rng);
        self.refresh(scene);
        log::debug!("qubit measured: |{}⟩", u8::from(one));
        one
    }

    pub fn hadamard(&mut self, scene: &mut Scene) {
        self.qubit.hadamard();
        self.refresh(scene);
        log::debug!("hadamard applied, P(1) = {:.2}", self.qubit.prob_one());
    }

    fn refresh(&mut self, scene: &mut Scene) -> StateClass {
        self.class = StateClass::classify(self.qubit.prob_one());
        let Some(h) = &self.handles else { return self.class };

        let bloch = self.qubit.bloch_vector();
        let direction = bloch.try_normalize().unwrap_or(Vec3::Y);
        scene.set_transform(
            h.arrow,
            Transform {
                rotation: Quat::from_rotation_arc(Vec3::Y, direction),
                scale: Vec3::splat(RADIUS),
                ..Transform::IDENTITY
            },
        );
        let c = self.class.color();
        if let Some(g) = scene.geometry_mut(h.arrow) {
            g.fill_color(c);
        }
        if let Some(g) = scene.geometry_mut(h.tip) {
            g.positions_mut()[0] = direction * RADIUS;
            g.colors_mut()[0] = c;
        }
        if let Some(g) = scene.geometry_mut(h.bars) {
            let p0 = self.qubit.prob_zero();
            let p1 = self.qubit.prob_one();
            let positions = g.positions_mut();
            positions[0] = Vec3::new(BAR_X, -RADIUS, 0.0);
            positions[1] = Vec3::new(BAR_X, -RADIUS + 2.0 * RADIUS * p0, 0.0);
            positions[2] = Vec3::new(BAR_X + 0.6, -RADIUS, 0.0);
            positions[3] = Vec3::new(BAR_X + 0.6, -RADIUS + 2.0 * RADIUS * p1, 0.0);
            let colors = g.colors_mut();
            colors[0] = color::STATE_ZERO;
            colors[1] = color::STATE_ZERO;
            colors[2] = color::STATE_ONE;
            colors[3] = color::STATE_ONE;
        }
        self.class
    }

    fn sync_panel(&self, panel: &mut ControlPanel) {
        panel.set_slider("probability", self.qubit.prob_one());
        panel.apply(ControlEvent::DialTurned {
            id: "phase",
            angle: self.qubit.relative_phase(),
        });
    }

    fn current_phase(&self) -> f32 {
        // A pole has no meaningful phase
        if self.qubit.prob_one() > 1e-6 {
            self.qubit.relative_phase()
        } else {
            0.0
        }
    }
}

impl Default for QubitVerse {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseAnimation for QubitVerse {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::new(0.8, 0.0, 0.0), 10.0, 0.6, 0.35);
        ctx.scene.add(
            "bloch_sphere",
            shapes::wire_sphere(RADIUS, 8, 6, 48, color::with_alpha(color::DIM_GRAY, 0.3)),
        );
        ctx.scene
            .add("bloch_axes", shapes::axes(RADIUS * 1.2, color::with_alpha(color::WHITE, 0.35)));
        ctx.scene.add(
            "equator",
            shapes::circle(RADIUS, 64, color::with_alpha(color::WHITE, 0.4)),
        );
        let poles = ctx.scene.add(
            "poles",
            Geometry::points_at(vec![Vec3::Y * RADIUS, Vec3::NEG_Y * RADIUS], color::WHITE, 0.15),
        );
        if let Some(g) = ctx.scene.geometry_mut(poles) {
            g.colors_mut()[0] = color::STATE_ZERO;
            g.colors_mut()[1] = color::STATE_ONE;
        }
        let arrow = ctx.scene.add("state_arrow", shapes::arrow(color::SUPERPOSITION));
        let tip = ctx.scene.add("state_tip", Geometry::points(1, color::SUPERPOSITION, 0.3));
        let trail = ctx
            .scene
            .add("trail", Geometry::points(TRAIL_POINTS, color::SUPERPOSITION, 0.0));
        let bars = ctx.scene.add(
            "probability_bars",
            Geometry::segments(vec![Vec3::ZERO; 4], color::WHITE),
        );
        self.handles = Some(Handles {
            arrow,
            tip,
            trail,
            bars,
        });
        self.refresh(ctx.scene);
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        if self.precessing && self.class == StateClass::Superposition {
            self.qubit.rotate_phase(PRECESSION_RATE * ctx.clock.dt);
            self.refresh(ctx.scene);
            self.sync_panel(ctx.panel);
        }

        let Some(h) = &self.handles else { return };
        let tip = self.qubit.bloch_vector().try_normalize().unwrap_or(Vec3::Y) * RADIUS;
        let head = self.trail_head;
        if let Some(g) = ctx.scene.geometry_mut(h.trail) {
            g.positions_mut()[head] = tip;
            let c = self.class.color();
            for i in 0..TRAIL_POINTS {
                // Age 0 at the head, growing backwards around the ring
                let age = (head + TRAIL_POINTS - i) % TRAIL_POINTS;
                let fade = 1.0 - age as f32 / TRAIL_POINTS as f32;
                g.colors_mut()[i] = color::with_alpha(c, 0.6 * fade);
                g.sizes_mut()[i] = 0.08 * fade;
            }
        }
        self.trail_head = (head + 1) % TRAIL_POINTS;

        // Pulse the tip
        if let Some(g) = ctx.scene.geometry_mut(h.tip) {
            g.sizes_mut()[0] = 0.3 + 0.05 * (ctx.clock.elapsed * 4.0).sin();
        }

        ctx.panel.set_readout("state", self.class.label());
        ctx.panel.set_readout(
            "amplitudes",
            format!(
                "P(0) = {:.2}, P(1) = {:.2}",
                self.qubit.prob_zero(),
                self.qubit.prob_one()
            ),
        );
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Qubit")
            .text("Neither 0 nor 1 until asked; the answer depends on the asking.")
            .slider(
                Slider::new("probability", "P(|1⟩)", 0.0, 1.0, self.qubit.prob_one())
                    .with_format(ValueFormat::Number { decimals: 2 }),
            )
            .dial("phase", "Relative phase", self.current_phase())
            .button("measure", "Measure")
            .button("hadamard", "Hadamard")
            .toggle("precess", "Precess", "Stop precession", self.precessing)
            .readout("state", "State", "")
            .readout("amplitudes", "Probabilities", "");
    }

    fn handle_control(&mut self, ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::SliderChanged { id: "probability", value } => {
                let phase = self.current_phase();
                self.update_qubit_state(ctx.scene, value, phase);
            }
            ControlEvent::DialTurned { id: "phase", angle } => {
                let p1 = self.qubit.prob_one();
                self.update_qubit_state(ctx.scene, p1, angle);
            }
            ControlEvent::ButtonPressed { id: "measure" } => {
                self.measure(ctx.scene);
                self.sync_panel(ctx.panel);
            }
            ControlEvent::ButtonPressed { id: "hadamard" } => {
                self.hadamard(ctx.scene);
                self.sync_panel(ctx.panel);
            }
            ControlEvent::Toggled { id: "precess", on } => self.precessing = on,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_thresholds() {
        assert_eq!(StateClass::classify(0.05), StateClass::Zero);
        assert_eq!(StateClass::classify(0.5), StateClass::Superposition);
        assert_eq!(StateClass::classify(0.95), StateClass::One);
    }

    #[test]
    fn probability_is_clamped() {
        let mut scene = Scene::new();
        let mut verse = QubitVerse::with_seed(1);
        assert_eq!(verse.update_qubit_state(&mut scene, 1.7, 0.0), StateClass::One);
        assert!((verse.qubit().prob_one() - 1.0).abs() < 1e-6);
        assert_eq!(verse.update_qubit_state(&mut scene, -0.4, 0.0), StateClass::Zero);
    }

    #[test]
    fn hadamard_from_pole_gives_superposition() {
        let mut scene = Scene::new();
        let mut verse = QubitVerse::with_seed(1);
        verse.update_qubit_state(&mut scene, 0.0, 0.0);
        verse.hadamard(&mut scene);
        assert_eq!(verse.class(), StateClass::Superposition);
        assert!((verse.qubit().prob_one() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn measurement_lands_on_a_pole() {
        let mut scene = Scene::new();
        let mut verse = QubitVerse::with_seed(6);
        let one = verse.measure(&mut scene);
        let expected = if one { StateClass::One } else { StateClass::Zero };
        assert_eq!(verse.class(), expected);
    }
}
