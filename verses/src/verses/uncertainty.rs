//! Heisenberg uncertainty
//!
//! A phase-space cloud with position along X and momentum along Y. The
//! observation angle trades one spread for the other while their product
//! stays at the ħ/2 floor.

use crate::animation::{Tween, VerseAnimation, VerseContext};
use crate::color;
use crate::controls::{ControlEvent, ControlPanel, Slider, ValueFormat};
use crate::scene::{Geometry, ObjectId, Transform};
use crate::shapes;
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::{FRAC_PI_2, PI};

/// Reduced Planck constant in natural units
pub const HBAR: f32 = 1.0;

const CLOUD_POINTS: usize = 800;
const PLOT_SCALE: f32 = 2.0;
const SQUEEZE_RANGE: f32 = 2.4;
const RETARGET_SECONDS: f32 = 0.35;

/// Position and momentum spreads for an observation angle in [0, π/2].
/// 0 pins position, π/2 pins momentum.
pub fn spreads(angle: f32) -> (f32, f32) {
    let s = angle.clamp(0.0, FRAC_PI_2) / FRAC_PI_2;
    let r = (s - 0.5) * SQUEEZE_RANGE;
    let base = (HBAR / 2.0).sqrt();
    (base * r.exp(), base * (-r).exp())
}

/// Fold a dial angle in [0, 2π) onto the usable quarter turn
fn fold_dial(angle: f32) -> f32 {
    if angle <= FRAC_PI_2 {
        angle
    } else if angle < 1.25 * PI {
        FRAC_PI_2
    } else {
        0.0
    }
}

struct Handles {
    cloud: ObjectId,
    one_sigma: ObjectId,
    two_sigma: ObjectId,
}

pub struct Uncertainty {
    angle: f32,
    squeeze: Tween,
    unit_samples: Vec<(f32, f32, f32)>,
    handles: Option<Handles>,
}

impl Uncertainty {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let unit_samples = (0..CLOUD_POINTS)
            .map(|_| {
                let (a, b) = gaussian_pair(&mut rng);
                (a, b, rng.gen_range(-0.3..0.3))
            })
            .collect();
        let angle = FRAC_PI_2 / 2.0;
        Self {
            angle,
            squeeze: Tween::settled(angle),
            unit_samples,
            handles: None,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) -> f32 {
        if angle.is_finite() {
            self.angle = angle.clamp(0.0, FRAC_PI_2);
            self.squeeze.retarget(self.angle, RETARGET_SECONDS);
        }
        self.angle
    }

    /// Spreads currently drawn, trailing the target angle while easing
    pub fn displayed_spreads(&self) -> (f32, f32) {
        spreads(self.squeeze.value())
    }
}

impl Default for Uncertainty {
    fn default() -> Self {
        Self::new()
    }
}

fn gaussian_pair(rng: &mut StdRng) -> (f32, f32) {
    let u1: f32 = rng.gen_range(1e-6..1.0);
    let u2: f32 = rng.gen();
    let r = (-2.0 * u1.ln()).sqrt();
    (r * (2.0 * PI * u2).cos(), r * (2.0 * PI * u2).sin())
}

impl VerseAnimation for Uncertainty {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::ZERO, 12.0, 0.0, 0.05);
        ctx.scene.add("axes", shapes::axes(5.0, color::DIM_GRAY));
        let cloud = ctx
            .scene
            .add("phase_space", Geometry::points(CLOUD_POINTS, color::SUPERPOSITION, 0.07));
        let one_sigma = ctx
            .scene
            .add("one_sigma", shapes::ellipse(1.0, 1.0, 64, color::with_alpha(color::WHITE, 0.8)));
        let two_sigma = ctx
            .scene
            .add("two_sigma", shapes::ellipse(1.0, 1.0, 64, color::with_alpha(color::WHITE, 0.35)));
        self.handles = Some(Handles {
            cloud,
            one_sigma,
            two_sigma,
        });
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        self.squeeze.advance(ctx.clock.dt);
        let (dx, dp) = self.displayed_spreads();
        let t = ctx.clock.elapsed;

        let Some(h) = &self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(h.cloud) {
            for (i, (a, b, z)) in self.unit_samples.iter().enumerate() {
                // Slow breathing in depth keeps the cloud from looking flat
                let depth = z * (1.0 + 0.3 * (t + i as f32 * 0.05).sin());
                g.positions_mut()[i] = Vec3::new(a * dx * PLOT_SCALE, b * dp * PLOT_SCALE, depth);
                let r = (a * a + b * b).sqrt();
                let alpha = (1.0 - r / 3.5).clamp(0.15, 1.0);
                g.colors_mut()[i] = color::with_alpha(color::SUPERPOSITION, alpha);
            }
        }

        for (id, k) in [(h.one_sigma, 1.0), (h.two_sigma, 2.0)] {
            ctx.scene.set_transform(
                id,
                Transform {
                    scale: Vec3::new(dx * PLOT_SCALE * k, dp * PLOT_SCALE * k, 1.0),
                    ..Transform::IDENTITY
                },
            );
        }

        let (tx, tp) = spreads(self.angle);
        ctx.panel.set_readout("dx", format!("{:.3}", tx));
        ctx.panel.set_readout("dp", format!("{:.3}", tp));
        ctx.panel
            .set_readout("product", format!("{:.3} ≥ ħ/2 = {:.3}", tx * tp, HBAR / 2.0));
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Uncertainty")
            .text("Sharpen position and momentum blurs; neither has a value on its own.")
            .slider(
                Slider::new("angle", "Observation angle", 0.0, FRAC_PI_2, self.angle)
                    .with_format(ValueFormat::Degrees),
            )
            .dial("angleDial", "Drag to observe", self.angle)
            .readout("dx", "Δx", "")
            .readout("dp", "Δp", "")
            .readout("product", "Δx·Δp", "");
    }

    fn handle_control(&mut self, ctx: &mut VerseContext, event: &ControlEvent) {
        let angle = match *event {
            ControlEvent::SliderChanged { id: "angle", value } => self.set_angle(value),
            ControlEvent::DialTurned { id: "angleDial", angle } => self.set_angle(fold_dial(angle)),
            _ => return,
        };
        // Keep both widgets showing the same angle
        ctx.panel.set_slider("angle", angle);
        ctx.panel.apply(ControlEvent::DialTurned {
            id: "angleDial",
            angle,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_never_drops_below_floor() {
        for i in 0..=30 {
            let (dx, dp) = spreads(i as f32 / 30.0 * FRAC_PI_2);
            assert!(dx * dp >= HBAR / 2.0 - 1e-5);
        }
    }

    #[test]
    fn angle_trades_spreads() {
        let (x0, p0) = spreads(0.0);
        let (x1, p1) = spreads(FRAC_PI_2);
        assert!(x0 < x1);
        assert!(p0 > p1);
    }

    #[test]
    fn dial_folds_into_quarter_turn() {
        assert_eq!(fold_dial(0.3), 0.3);
        assert_eq!(fold_dial(2.0), FRAC_PI_2);
        assert_eq!(fold_dial(5.5), 0.0);
    }

    #[test]
    fn angle_setter_clamps() {
        let mut verse = Uncertainty::with_seed(2);
        assert_eq!(verse.set_angle(3.0), FRAC_PI_2);
        assert_eq!(verse.set_angle(-1.0), 0.0);
    }
}
