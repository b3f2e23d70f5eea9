//! Scene host: verse navigation and the active animation's lifecycle

use crate::animation::{Stage, VerseAnimation};
use crate::content::{self, Chapter, VerseInfo};
use crate::controls::{ControlEvent, ControlPanel};
use crate::error::{VerseError, VerseResult};
use crate::scene::Scene;
use common::Camera3D;

/// Builds the animation for a verse when it becomes active
pub type VerseFactory = Box<dyn FnMut(&VerseInfo) -> Box<dyn VerseAnimation>>;

pub struct SceneHost {
    stage: Stage,
    catalogue: &'static [Chapter],
    verses: Vec<&'static VerseInfo>,
    factory: VerseFactory,
    current: Option<usize>,
    active: Option<Box<dyn VerseAnimation>>,
    /// Camera pose the active verse set up in `init`
    home_camera: Camera3D,
    paused: bool,
}

impl SceneHost {
    /// Host over `catalogue` with OS-seeded verse animations
    pub fn new(catalogue: &'static [Chapter]) -> Self {
        Self::with_factory(catalogue, Box::new(|info: &VerseInfo| info.kind.create()))
    }

    /// Host whose animations replay identically for the same seed
    pub fn seeded(catalogue: &'static [Chapter], seed: u64) -> Self {
        Self::with_factory(
            catalogue,
            Box::new(move |info: &VerseInfo| info.kind.create_seeded(seed)),
        )
    }

    pub fn with_factory(catalogue: &'static [Chapter], factory: VerseFactory) -> Self {
        let stage = Stage::new(16.0 / 9.0);
        let home_camera = stage.camera.clone();
        Self {
            stage,
            catalogue,
            verses: content::flatten(catalogue),
            factory,
            current: None,
            active: None,
            home_camera,
            paused: false,
        }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Make the verse at `index` in the flattened catalogue active
    pub fn activate(&mut self, index: usize) -> VerseResult<()> {
        if index >= self.verses.len() {
            return Err(VerseError::IndexOutOfRange {
                index,
                len: self.verses.len(),
            });
        }

        if let Some(mut outgoing) = self.active.take() {
            outgoing.cleanup();
        }

        self.stage.scene.clear_non_lights();
        self.stage.camera.reset();
        self.stage.panel.clear();
        self.stage.clock.reset();

        let info = self.verses[index];
        let mut animation = (self.factory)(info);
        self.stage.mount(animation.as_mut());
        self.home_camera = self.stage.camera.clone();
        self.active = Some(animation);
        self.current = Some(index);

        log::info!(
            "verse {}.{} \"{}\" active ({} objects, {} controls)",
            info.chapter,
            info.number,
            info.title,
            self.stage.scene.len(),
            self.stage.panel.len()
        );
        Ok(())
    }

    /// Activate by chapter and verse number
    pub fn activate_verse(&mut self, chapter: u32, verse: u32) -> VerseResult<()> {
        let index = self
            .verses
            .iter()
            .position(|v| v.chapter == chapter && v.number == verse)
            .ok_or(VerseError::UnknownVerse { chapter, verse })?;
        self.activate(index)
    }

    /// Step forward; `false` at the last verse
    pub fn next(&mut self) -> bool {
        let target = match self.current {
            Some(i) => i + 1,
            None => 0,
        };
        self.navigate(target)
    }

    /// Step back; `false` at the first verse
    pub fn previous(&mut self) -> bool {
        match self.current {
            Some(i) if i > 0 => self.navigate(i - 1),
            _ => {
                log::debug!("already at the first verse");
                false
            }
        }
    }

    fn navigate(&mut self, index: usize) -> bool {
        match self.activate(index) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("navigation ignored: {}", err);
                false
            }
        }
    }

    /// Advance the active animation by one frame
    pub fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        if let Some(animation) = self.active.as_mut() {
            self.stage.tick(animation.as_mut(), dt);
        }
    }

    /// Normalize a control event and hand it to the active animation
    pub fn dispatch(&mut self, event: ControlEvent) {
        match self.active.as_mut() {
            Some(animation) => self.stage.dispatch(animation.as_mut(), event),
            None => {
                self.stage.panel.apply(event);
            }
        }
    }

    pub fn current(&self) -> Option<&'static VerseInfo> {
        self.current.map(|i| self.verses[i])
    }

    /// Title of the chapter holding the active verse
    pub fn chapter_title(&self) -> Option<&'static str> {
        self.current()
            .and_then(|info| content::chapter_title(self.catalogue, info.chapter))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn has_next(&self) -> bool {
        self.current.map_or(!self.verses.is_empty(), |i| i + 1 < self.verses.len())
    }

    pub fn has_previous(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("{}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    pub fn toggle_paused(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Return the camera to the pose the active verse started from
    pub fn reset_camera(&mut self) {
        let aspect = self.stage.camera.aspect_ratio;
        self.stage.camera = self.home_camera.clone();
        self.stage.camera.update_aspect_ratio(aspect);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.stage.camera.update_aspect_ratio(aspect_ratio);
        self.home_camera.update_aspect_ratio(aspect_ratio);
    }

    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    pub fn camera(&self) -> &Camera3D {
        &self.stage.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.stage.camera
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.stage.panel
    }
}
