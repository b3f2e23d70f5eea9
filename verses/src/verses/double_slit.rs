//! Double-slit experiment
//!
//! Quanta stream from a source through two slits onto a screen. Unobserved,
//! they build an interference pattern; with which-path observation switched
//! on, the fringes give way to two plain bands.

use crate::animation::{VerseAnimation, VerseContext};
use crate::color::{self, Rgba};
use crate::controls::{ControlEvent, ControlPanel, Slider};
use crate::particles::{fade_out, Particle, ParticlePool};
use crate::scene::{Geometry, ObjectId, Scene};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

const SOURCE_X: f32 = -6.0;
const BARRIER_X: f32 = -1.0;
const SCREEN_X: f32 = 4.0;
const SCREEN_HALF_HEIGHT: f32 = 3.0;
const SCREEN_HALF_DEPTH: f32 = 0.6;
const WAVELENGTH: f32 = 0.5;
const SLIT_WIDTH: f32 = 0.3;
const BAND_SIGMA: f32 = 0.35;

const FRINGE_ROWS: usize = 160;
const FRINGE_COLUMNS: usize = 6;
const BAND_POINTS: usize = 600;
const MAX_QUANTA: usize = 300;
const EMIT_RATE: f32 = 40.0;
const TRAVEL_TIME: f32 = 2.5;

const WAVEFRONT_ARCS: usize = 6;
const ARC_SEGMENTS: usize = 24;
const WAVEFRONT_SPACING: f32 = 0.8;

/// Relative screen brightness at height `y` for two coherent slits
pub fn interference_intensity(y: f32, separation: f32) -> f32 {
    let distance = SCREEN_X - BARRIER_X;
    let phase = PI * separation * y / (WAVELENGTH * distance);
    let beta = PI * SLIT_WIDTH * y / (WAVELENGTH * distance);
    let envelope = if beta.abs() < 1e-6 {
        1.0
    } else {
        (beta.sin() / beta).powi(2)
    };
    phase.cos().powi(2) * envelope
}

/// Relative screen brightness at height `y` when the path is known
pub fn which_path_intensity(y: f32, separation: f32) -> f32 {
    // Straight-line projection from the source doubles the slit offset
    let center = separation;
    let g = |c: f32| (-(y - c).powi(2) / (2.0 * BAND_SIGMA * BAND_SIGMA)).exp();
    (g(center) + g(-center)).min(1.0)
}

struct Handles {
    barrier: ObjectId,
    wave_pattern: ObjectId,
    particle_pattern: ObjectId,
    wavefronts: ObjectId,
    quanta: ObjectId,
}

pub struct DoubleSlit {
    rng: StdRng,
    observed: bool,
    separation: f32,
    quanta: ParticlePool,
    emit_budget: f32,
    detected: u64,
    handles: Option<Handles>,
}

impl DoubleSlit {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            observed: false,
            separation: 1.5,
            quanta: ParticlePool::new(MAX_QUANTA),
            emit_budget: 0.0,
            detected: 0,
            handles: None,
        }
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    pub fn separation(&self) -> f32 {
        self.separation
    }

    pub fn wave_pattern(&self) -> Option<ObjectId> {
        self.handles.as_ref().map(|h| h.wave_pattern)
    }

    pub fn particle_pattern(&self) -> Option<ObjectId> {
        self.handles.as_ref().map(|h| h.particle_pattern)
    }

    /// Switch which-path observation on or off. Exactly one of the two
    /// screen patterns is visible afterwards.
    pub fn toggle_observation(&mut self, scene: &mut Scene, observed: bool) {
        self.observed = observed;
        if let Some(h) = &self.handles {
            scene.set_visible(h.wave_pattern, !observed);
            scene.set_visible(h.wavefronts, !observed);
            scene.set_visible(h.particle_pattern, observed);
        }
        log::debug!("double slit observation {}", if observed { "on" } else { "off" });
    }

    pub fn set_separation(&mut self, scene: &mut Scene, separation: f32) -> f32 {
        self.separation = separation.clamp(0.6, 2.5);
        if let Some(h) = &self.handles {
            if let Some(g) = scene.geometry_mut(h.barrier) {
                write_barrier(g, self.separation);
            }
            if let Some(g) = scene.geometry_mut(h.particle_pattern) {
                scatter_bands(g, self.separation, &mut self.rng);
            }
        }
        self.separation
    }

    /// Sample a landing height on the screen for the current mode
    fn sample_landing(&mut self) -> f32 {
        if self.observed {
            band_landing(self.separation, &mut self.rng)
        } else {
            // Rejection-sample the fringe intensity
            for _ in 0..32 {
                let y = self.rng.gen_range(-SCREEN_HALF_HEIGHT..SCREEN_HALF_HEIGHT);
                if self.rng.gen::<f32>() < interference_intensity(y, self.separation) {
                    return y;
                }
            }
            0.0
        }
    }

    fn emit(&mut self) {
        let landing = self.sample_landing();
        let target = Vec3::new(
            SCREEN_X,
            landing,
            self.rng.gen_range(-SCREEN_HALF_DEPTH..SCREEN_HALF_DEPTH),
        );
        let origin = Vec3::new(SOURCE_X, 0.0, 0.0);
        let (color, size): (Rgba, f32) = if self.observed {
            (color::PARTICLE_GOLD, 0.07)
        } else {
            (color::WAVE_BLUE, 0.09)
        };
        let velocity = (target - origin) / TRAVEL_TIME;
        self.quanta
            .spawn(Particle::new(origin, velocity, TRAVEL_TIME, color, size));
    }
}

impl Default for DoubleSlit {
    fn default() -> Self {
        Self::new()
    }
}

fn gaussian(rng: &mut StdRng) -> f32 {
    // Box-Muller
    let u1: f32 = rng.gen_range(1e-6..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Three wall segments leaving two gaps of `SLIT_WIDTH` at ±separation/2
fn write_barrier(g: &mut Geometry, separation: f32) {
    let half = separation / 2.0;
    let w = SLIT_WIDTH / 2.0;
    let ys = [
        (-SCREEN_HALF_HEIGHT, -half - w),
        (-half + w, half - w),
        (half + w, SCREEN_HALF_HEIGHT),
    ];
    let positions = g.positions_mut();
    for (i, (y0, y1)) in ys.iter().enumerate() {
        positions[2 * i] = Vec3::new(BARRIER_X, *y0, 0.0);
        positions[2 * i + 1] = Vec3::new(BARRIER_X, y1.max(*y0), 0.0);
    }
}

/// Height behind one slit or the other, kept on the screen
fn band_landing(separation: f32, rng: &mut StdRng) -> f32 {
    let side = if rng.gen::<bool>() { 1.0 } else { -1.0 };
    let y = side * separation + gaussian(rng) * BAND_SIGMA;
    y.clamp(-SCREEN_HALF_HEIGHT, SCREEN_HALF_HEIGHT)
}

fn scatter_bands(g: &mut Geometry, separation: f32, rng: &mut StdRng) {
    for p in g.positions_mut() {
        let y = band_landing(separation, rng);
        *p = Vec3::new(SCREEN_X, y, rng.gen_range(-SCREEN_HALF_DEPTH..SCREEN_HALF_DEPTH));
    }
}

fn fringe_positions() -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(FRINGE_ROWS * FRINGE_COLUMNS);
    for row in 0..FRINGE_ROWS {
        let y = (row as f32 / (FRINGE_ROWS - 1) as f32 * 2.0 - 1.0) * SCREEN_HALF_HEIGHT;
        for col in 0..FRINGE_COLUMNS {
            let z = (col as f32 / (FRINGE_COLUMNS - 1) as f32 * 2.0 - 1.0) * SCREEN_HALF_DEPTH;
            positions.push(Vec3::new(SCREEN_X, y, z));
        }
    }
    positions
}

/// Half-circle arcs expanding from both slits towards the screen
fn wavefront_geometry() -> Geometry {
    let count = 2 * WAVEFRONT_ARCS * (ARC_SEGMENTS + 1);
    let positions = vec![Vec3::new(BARRIER_X, 0.0, 0.0); count];
    let mut edges = Vec::new();
    for arc in 0..2 * WAVEFRONT_ARCS {
        let base = (arc * (ARC_SEGMENTS + 1)) as u32;
        for s in 0..ARC_SEGMENTS as u32 {
            edges.push([base + s, base + s + 1]);
        }
    }
    Geometry::lines(positions, edges, color::with_alpha(color::WAVE_BLUE, 0.35))
}

fn write_wavefronts(g: &mut Geometry, separation: f32, time: f32) {
    let max_radius = SCREEN_X - BARRIER_X;
    let positions = g.positions_mut();
    for slit in 0..2 {
        let cy = if slit == 0 { separation / 2.0 } else { -separation / 2.0 };
        for k in 0..WAVEFRONT_ARCS {
            let radius = (time * 1.2 + k as f32 * WAVEFRONT_SPACING) % max_radius;
            let base = (slit * WAVEFRONT_ARCS + k) * (ARC_SEGMENTS + 1);
            for s in 0..=ARC_SEGMENTS {
                let a = -PI / 2.0 + PI * s as f32 / ARC_SEGMENTS as f32;
                positions[base + s] =
                    Vec3::new(BARRIER_X + radius * a.cos(), cy + radius * a.sin(), 0.0);
            }
        }
    }
}

impl VerseAnimation for DoubleSlit {
    fn init(&mut self, ctx: &mut VerseContext) {
        ctx.camera.set_orbit(Vec3::new(-0.5, 0.0, 0.0), 13.0, 0.6, 0.25);

        ctx.scene.add(
            "source",
            Geometry::points_at(vec![Vec3::new(SOURCE_X, 0.0, 0.0)], color::WHITE, 0.25),
        );

        let mut barrier = Geometry::segments(vec![Vec3::ZERO; 6], color::DIM_GRAY);
        write_barrier(&mut barrier, self.separation);
        let barrier = ctx.scene.add("barrier", barrier);

        let mut wave = Geometry::points_at(fringe_positions(), color::WAVE_BLUE, 0.06);
        for (p, c) in wave.positions().to_vec().iter().zip(wave.colors_mut()) {
            let i = interference_intensity(p.y, self.separation);
            *c = color::with_alpha(color::WAVE_BLUE, i);
        }
        let wave_pattern = ctx.scene.add("wave_pattern", wave);

        let mut bands = Geometry::points(BAND_POINTS, color::PARTICLE_GOLD, 0.05);
        scatter_bands(&mut bands, self.separation, &mut self.rng);
        let particle_pattern = ctx.scene.add("particle_pattern", bands);

        let wavefronts = ctx.scene.add("wavefronts", wavefront_geometry());
        let quanta = ctx.scene.add("quanta", Geometry::points(MAX_QUANTA, color::WHITE, 0.08));

        self.handles = Some(Handles {
            barrier,
            wave_pattern,
            particle_pattern,
            wavefronts,
            quanta,
        });
        let observed = self.observed;
        self.toggle_observation(ctx.scene, observed);
    }

    fn update(&mut self, ctx: &mut VerseContext) {
        let dt = ctx.clock.dt;
        let time = ctx.clock.elapsed;

        self.emit_budget += EMIT_RATE * dt;
        while self.emit_budget >= 1.0 {
            self.emit_budget -= 1.0;
            self.emit();
        }
        self.detected += self.quanta.step(dt).len() as u64;

        let Some(h) = &self.handles else { return };

        if let Some(g) = ctx.scene.geometry_mut(h.quanta) {
            self.quanta.write_points(g, |p| 0.4 + 0.6 * fade_out(p));
        }

        if !self.observed {
            let separation = self.separation;
            if let Some(g) = ctx.scene.geometry_mut(h.wave_pattern) {
                let ys: Vec<f32> = g.positions().iter().map(|p| p.y).collect();
                for (y, c) in ys.iter().zip(g.colors_mut()) {
                    let shimmer = 0.75 + 0.25 * (time * 2.0 + y * 3.0).sin();
                    let intensity = interference_intensity(*y, separation) * shimmer;
                    *c = color::with_alpha(color::WAVE_BLUE, intensity);
                }
            }
            if let Some(g) = ctx.scene.geometry_mut(h.wavefronts) {
                write_wavefronts(g, separation, time);
            }
        }

        ctx.panel.set_readout(
            "pattern",
            if self.observed { "Two bands" } else { "Interference fringes" },
        );
        ctx.panel.set_readout("detected", self.detected.to_string());
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel
            .heading("Double Slit")
            .text("Watch which slit each quantum passes and the fringes vanish.")
            .toggle("observe", "Observe which slit", "Stop observing", self.observed)
            .slider(
                Slider::new("separation", "Slit separation", 0.6, 2.5, self.separation)
                    .with_step(0.05),
            )
            .readout("pattern", "Pattern", "")
            .readout("detected", "Quanta detected", "0");
    }

    fn handle_control(&mut self, ctx: &mut VerseContext, event: &ControlEvent) {
        match *event {
            ControlEvent::Toggled { id: "observe", on } => self.toggle_observation(ctx.scene, on),
            ControlEvent::SliderChanged { id: "separation", value } => {
                self.set_separation(ctx.scene, value);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_fringe_is_brightest() {
        let center = interference_intensity(0.0, 1.5);
        assert!((center - 1.0).abs() < 1e-5);
        assert!((0..100).all(|i| interference_intensity(i as f32 * 0.03, 1.5) <= center + 1e-5));
    }

    #[test]
    fn first_dark_fringe() {
        // cos² vanishes where separation·y / (λ·L) = 1/2
        let y = 0.5 * WAVELENGTH * (SCREEN_X - BARRIER_X) / 1.5;
        assert!(interference_intensity(y, 1.5) < 1e-4);
    }

    #[test]
    fn which_path_bands_peak_at_projected_slits() {
        assert!(which_path_intensity(1.5, 1.5) > 0.99);
        assert!(which_path_intensity(0.0, 1.5) < 0.01);
    }

    #[test]
    fn landing_samples_stay_on_screen() {
        let mut verse = DoubleSlit::with_seed(3);
        for _ in 0..200 {
            let y = verse.sample_landing();
            assert!(y.abs() <= SCREEN_HALF_HEIGHT);
        }
    }

    #[test]
    fn observed_landings_stay_on_screen_at_widest_separation() {
        let mut verse = DoubleSlit::with_seed(3);
        verse.observed = true;
        verse.separation = 2.5;
        for _ in 0..2000 {
            let y = verse.sample_landing();
            assert!(y.abs() <= SCREEN_HALF_HEIGHT, "landed off screen at {}", y);
        }
    }
}
