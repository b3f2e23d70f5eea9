//! Verse animation lifecycle and per-frame timing

use crate::controls::{ControlEvent, ControlPanel};
use crate::scene::{Light, Scene};
use common::Camera3D;

/// Largest frame delta fed to animations, so a stalled window does not
/// teleport everything
pub const MAX_FRAME_DT: f32 = 0.1;
/// Smallest frame delta; keeps per-frame counters strictly increasing
pub const MIN_FRAME_DT: f32 = 1.0 / 240.0;

/// Wall-clock state handed to `update`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the verse was activated
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub dt: f32,
    /// Frames since the verse was activated
    pub frame: u64,
}

impl FrameClock {
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt } else { MIN_FRAME_DT };
        self.dt = dt.clamp(MIN_FRAME_DT, MAX_FRAME_DT);
        self.elapsed += self.dt;
        self.frame += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Handles a verse may touch during its lifecycle
pub struct VerseContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera3D,
    pub panel: &'a mut ControlPanel,
    pub clock: &'a FrameClock,
}

/// Uniform lifecycle every verse module implements
pub trait VerseAnimation {
    /// Allocate scene objects; called once when the verse becomes active
    fn init(&mut self, ctx: &mut VerseContext);

    /// Advance animation state; called once per rendered frame
    fn update(&mut self, ctx: &mut VerseContext);

    /// Release timers and other verse-owned resources. Scene objects are
    /// cleared by the host.
    fn cleanup(&mut self) {}

    /// Populate the freshly cleared control panel
    fn setup_controls(&mut self, panel: &mut ControlPanel);

    /// React to a normalized control event
    fn handle_control(&mut self, _ctx: &mut VerseContext, _event: &ControlEvent) {}
}

/// Scene, camera, panel and clock owned together
///
/// The host owns one; tests build their own to drive a verse directly.
pub struct Stage {
    pub scene: Scene,
    pub camera: Camera3D,
    pub panel: ControlPanel,
    pub clock: FrameClock,
}

impl Stage {
    /// Empty stage with the persistent ambient light
    pub fn new(aspect_ratio: f32) -> Self {
        let mut scene = Scene::new();
        scene.add_light("ambient", Light::ambient(1.0));
        Self {
            scene,
            camera: Camera3D::new(aspect_ratio),
            panel: ControlPanel::new(),
            clock: FrameClock::default(),
        }
    }

    pub fn context(&mut self) -> VerseContext<'_> {
        VerseContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            panel: &mut self.panel,
            clock: &self.clock,
        }
    }

    /// `init` followed by `setup_controls`, as the host does on activation
    pub fn mount(&mut self, verse: &mut dyn VerseAnimation) {
        verse.init(&mut self.context());
        verse.setup_controls(&mut self.panel);
    }

    /// Advance the clock and run one `update`
    pub fn tick(&mut self, verse: &mut dyn VerseAnimation, dt: f32) {
        self.clock.advance(dt);
        verse.update(&mut self.context());
    }

    /// Normalize an event through the panel and deliver it
    pub fn dispatch(&mut self, verse: &mut dyn VerseAnimation, event: ControlEvent) {
        let event = self.panel.apply(event);
        verse.handle_control(&mut self.context(), &event);
    }
}

/// One-shot timer advanced from `update`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: Option<f32>,
}

impl Countdown {
    pub fn start(&mut self, seconds: f32) {
        self.remaining = Some(seconds.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `dt`; returns `true` on the tick the timer fires
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.remaining {
            Some(left) if left - dt <= 0.0 => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}

/// Smooth cubic ease-in-out on [0, 1]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Eased transition between two values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    /// Already finished at `value`
    pub fn settled(value: f32) -> Self {
        let mut tween = Self::new(value, value, 1.0);
        tween.elapsed = tween.duration;
        tween
    }

    /// Restart from the current value towards `to`
    pub fn retarget(&mut self, to: f32, duration: f32) {
        *self = Self::new(self.value(), to, duration);
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f32 {
        let t = ease_in_out(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_clamps_delta() {
        let mut clock = FrameClock::default();
        clock.advance(5.0);
        assert_eq!(clock.dt, MAX_FRAME_DT);
        clock.advance(0.0);
        assert_eq!(clock.dt, MIN_FRAME_DT);
        clock.advance(f32::NAN);
        assert_eq!(clock.frame, 3);
        assert!(clock.elapsed > 0.0);
    }

    #[test]
    fn countdown_fires_once() {
        let mut timer = Countdown::default();
        timer.start(0.05);
        let fired: Vec<bool> = (0..6).map(|_| timer.tick(0.016)).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn tween_reaches_target() {
        let mut tween = Tween::new(0.0, 2.0, 0.5);
        assert_eq!(tween.value(), 0.0);
        for _ in 0..40 {
            tween.advance(0.016);
        }
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 2.0);
    }

    #[test]
    fn ease_is_monotonic() {
        let samples: Vec<f32> = (0..=20).map(|i| ease_in_out(i as f32 / 20.0)).collect();
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[20], 1.0);
    }
}
