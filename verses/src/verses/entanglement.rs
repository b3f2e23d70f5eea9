//! Entanglement
//!
//! Two spin-½ particles in the singlet state, each drawn on its own Bloch
//! sphere. Neither spin has a direction until measured; once measured the
//! outcomes are anti-correlated according to the analyser angle.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::scene::{Geometry, ObjectId, Transform};
use crate::shapes;
use glam::{Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

const SPHERE_RADIUS: f32 = 1.5;
const SEPARATION: f32 = 3.5;
const LINK_POINTS: usize = 48;
const BATCH_SIZE: u32 = 100;

/// Expected product of the two ±1 outcomes for analysers `theta` apart
pub fn singlet_correlation(theta: f32) -> f32 {
    -theta.cos()
}

/// Draw one pair of outcomes. A's analyser is fixed; B's is rotated by `theta`.
pub fn sample_pair<R: Rng>(rng: &mut R, theta: f32) -> (i8, i8) {
    let a: i8 = if rng.gen::<bool>() { 1 } else { -1 };
    // Singlet: P(equal outcomes) = sin²(θ/2)
    let same = rng.gen::<f32>() < (theta / 2.0).sin().powi(2);
    (a, if same { a } else { -a })
}

/// Running tally of measured pairs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrelationStats {
    pub trials: u32,
    product_sum: i64,
}

impl CorrelationStats {
    pub fn record(&mut self, a: i8, b: i8) {
        self.trials += 1;
        self.product_sum += (a * b) as i64;
    }

    pub fn estimate(&self) -> Option<f32> {
        (self.trials > 0).then(|| self.product_sum as f32 / self.trials as f32)
    }
}

struct Handles {
    arrow_a: ObjectId,
    arrow_b: ObjectId,
    analyser_b: ObjectId,
    link: ObjectId,
}

pub struct Entanglement {
    rng: StdRng,
    theta: f32,
    outcome: Option<(i8, i8)>,
    stats: CorrelationStats,
    handles: Option<Handles>,
}

impl Entanglement {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            theta: 0.0,
            outcome: None,
            stats: CorrelationStats::default(),
            handles: None,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<(i8, i8)> {
        self.outcome
    }

    pub fn stats(&self) -> CorrelationStats {
        self.stats
    }

    pub fn set_theta(&mut self, theta: f32) -> f32 {
        if theta.is_finite() {
            self.theta = theta.clamp(0.0, PI);
        }
        self.theta
    }

    /// Measure both particles, or return them to the singlet. Repeating the
    /// current state does nothing.
    pub fn set_measured(&mut self, measured: bool) {
        match (measured, self.outcome) {
            (true, None) => {
                let (a, b) = sample_pair(&mut self.rng, self.theta);
                self.stats.record(a, b);
                self.outcome = Some((a, b));
                log::debug!("entangled pair measured: A = {:+}, B = {:+}", a, b);
            }
            (false, Some(_)) => {
                self.outcome = None;
                log::debug!("entangled pair reset");
            }
            _ => {}
        }
    }

    /// Measure many fresh pairs at the current angle without touching the display
    pub fn measure_batch(&mut self, count: u32) {
        for _ in 0..count {
            let (a, b) = sample_pair(&mut self.rng, self.theta);
            self.stats.record(a, b);
        }
    }

    fn analyser_b(&self) -> Vec3 {
        Vec3::new(self.theta.sin(), self.theta.cos(), 0.0)
    }
}

impl Default for Entanglement {
    fn default() -> Self {
        Self::new()
    }
}

fn arrow_transform(origin: Vec3, direction: Vec3, length: f32) -> Transform {
    Transform {
        translation: origin,
        rotation: Quat::from_rotation_arc(Vec3::Y, direction.normalize_or_zero()),
        scale: Vec3::splat(length),
    }
}

impl VerseAnimation for Entanglement {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::ZERO, 12.0, 0.0, 0.25);
        let sphere_color = color::with_alpha(color::DIM_GRAY, 0.35);
        for (name, x) in [("sphere_a", -SEPARATION), ("sphere_b", SEPARATION)] {
            let id = ctx
                .scene
                .add(name, shapes::wire_sphere(SPHERE_RADIUS, 6, 4, 40, sphere_color));
            ctx.scene.set_transform(id, Transform::at(Vec3::new(x, 0.0, 0.0)));
        }

        let analyser_color = color::with_alpha(color::WHITE, 0.3);
        let analyser_a = ctx.scene.add("analyser_a", shapes::arrow(analyser_color));
        ctx.scene.set_transform(
            analyser_a,
            arrow_transform(Vec3::new(-SEPARATION, 0.0, 0.0), Vec3::Y, SPHERE_RADIUS * 1.3),
        );
        let analyser_b = ctx.scene.add("analyser_b", shapes::arrow(analyser_color));

        let arrow_a = ctx.scene.add("spin_a", shapes::arrow(color::SUPERPOSITION));
        let arrow_b = ctx.scene.add("spin_b", shapes::arrow(color::SUPERPOSITION));
        let link = ctx.scene.add(
            "link",
            Geometry::line_strip(vec![Vec3::ZERO; LINK_POINTS], color::SUPERPOSITION),
        );
        self.handles = Some(Handles {
            arrow_a,
            arrow_b,
            analyser_b,
            link,
        });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let t = ctx.clock.elapsed;
        let Some(h) = &self.handles else { return };

        let origin_a = Vec3::new(-SEPARATION, 0.0, 0.0);
        let origin_b = Vec3::new(SEPARATION, 0.0, 0.0);
        let axis_b = self.analyser_b();

        ctx.scene
            .set_transform(h.analyser_b, arrow_transform(origin_b, axis_b, SPHERE_RADIUS * 1.3));

        let (dir_a, dir_b, spin_color) = match self.outcome {
            Some((a, b)) => (
                Vec3::Y * a as f32,
                axis_b * b as f32,
                if a == b { color::STATE_ONE } else { color::STATE_ZERO },
            ),
            None => {
                // Undetermined: the two arrows wander, always opposite
                let wander = Vec3::new((t * 1.3).cos(), (t * 0.7).sin(), (t * 1.3).sin())
                    .normalize_or_zero();
                (wander, -wander, color::SUPERPOSITION)
            }
        };
        ctx.scene
            .set_transform(h.arrow_a, arrow_transform(origin_a, dir_a, SPHERE_RADIUS));
        ctx.scene
            .set_transform(h.arrow_b, arrow_transform(origin_b, dir_b, SPHERE_RADIUS));
        for id in [h.arrow_a, h.arrow_b] {
            if let Some(g) = ctx.scene.geometry_mut(id) {
                g.fill_color(spin_color);
            }
        }

        let measured = self.outcome.is_some();
        if let Some(g) = ctx.scene.geometry_mut(h.link) {
            for i in 0..LINK_POINTS {
                let s = i as f32 / (LINK_POINTS - 1) as f32;
                let x = -SEPARATION + SPHERE_RADIUS + s * 2.0 * (SEPARATION - SPHERE_RADIUS);
                let y = if measured {
                    0.0
                } else {
                    0.25 * (s * PI).sin() * (s * 6.0 * PI - t * 4.0).sin()
                };
                g.positions_mut()[i] = Vec3::new(x, y, 0.0);
                g.colors_mut()[i] = if measured {
                    color::with_alpha(color::DIM_GRAY, 0.25)
                } else {
                    color::SUPERPOSITION
                };
            }
        }

        ctx.panel.set_readout(
            "outcome",
            match self.outcome {
                Some((a, b)) => format!("A {:+}  B {:+}", a, b),
                None => "Undetermined".to_string(),
            },
        );
        ctx.panel
            .set_readout("expected", format!("{:.3}", singlet_correlation(self.theta)));
        ctx.panel.set_readout(
            "measuredCorrelation",
            match self.stats.estimate() {
                Some(e) => format!("{:.3} over {} pairs", e, self.stats.trials),
                None => "—".to_string(),
            },
        );
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Entanglement")
            .text("Neither particle has a spin of its own; only the pair has a definite relation.")
            .toggle("measure", "Measure", "Reset", self.outcome.is_some())
            .slider(
                Slider::new("theta", "Analyser angle", 0.0, PI, self.theta)
                    .with_format(ValueFormat::Degrees),
            )
            .button("batch", "Measure 100 pairs")
            .readout("outcome", "Outcome", "Undetermined")
            .readout("expected", "E = −cos θ", "")
            .readout("measuredCorrelation", "Measured E", "—");
    }

    fn handle_control(&mut self, _ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::Toggled { id: "measure", on } => self.set_measured(on),
            ControlEvent::SliderChanged { id: "theta", value } => {
                let previous = self.theta;
                if self.set_theta(value) != previous {
                    self.stats = CorrelationStats::default();
                }
            }
            ControlEvent::ButtonPressed { id: "batch" } => self.measure_batch(BATCH_SIZE),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_analysers_always_disagree() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let (a, b) = sample_pair(&mut rng, 0.0);
            assert_eq!(a, -b);
        }
    }

    #[test]
    fn batch_estimate_tracks_theory() {
        let mut verse = Entanglement::with_seed(8);
        verse.set_theta(PI / 3.0);
        verse.measure_batch(4000);
        let estimate = verse.stats().estimate().unwrap();
        assert!((estimate - singlet_correlation(PI / 3.0)).abs() < 0.08);
    }

    #[test]
    fn measuring_twice_keeps_first_outcome() {
        let mut verse = Entanglement::with_seed(8);
        verse.set_measured(true);
        let first = verse.outcome();
        verse.set_measured(true);
        assert_eq!(verse.outcome(), first);
        assert_eq!(verse.stats().trials, 1);
        verse.set_measured(false);
        verse.set_measured(false);
        assert!(!verse.is_measured());
    }
}
