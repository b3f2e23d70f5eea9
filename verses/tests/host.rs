use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use quantum_verses::color;
use quantum_verses::controls::ControlPanel;
use quantum_verses::scene::Geometry;
use quantum_verses::{
    ControlEvent, SceneHost, Slider, VerseAnimation, VerseContext, VerseError, VerseInfo, CATALOGUE,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Records its lifecycle calls and leaves a marker object behind
struct Recorder {
    tag: String,
    log: Log,
    distance: f32,
}

impl VerseAnimation for Recorder {
    fn init(&mut self, ctx: &mut VerseContext) {
        self.log.borrow_mut().push(format!("init {}", self.tag));
        ctx.scene
            .add(&format!("marker {}", self.tag), Geometry::points(4, color::WHITE, 0.1));
        ctx.camera.set_orbit(Vec3::ZERO, self.distance, 0.2, 0.1);
    }

    fn update(&mut self, _ctx: &mut VerseContext) {
        self.log.borrow_mut().push(format!("update {}", self.tag));
    }

    fn cleanup(&mut self) {
        self.log.borrow_mut().push(format!("cleanup {}", self.tag));
    }

    fn setup_controls(&mut self, panel: &mut ControlPanel) {
        panel.slider(Slider::new("level", &self.tag, 0.0, 1.0, 0.5));
    }
}

fn recording_host() -> (SceneHost, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let factory_log = log.clone();
    let host = SceneHost::with_factory(
        CATALOGUE,
        Box::new(move |info: &VerseInfo| {
            Box::new(Recorder {
                tag: format!("{}.{}", info.chapter, info.number),
                log: factory_log.clone(),
                distance: 10.0 + info.number as f32,
            }) as Box<dyn VerseAnimation>
        }),
    );
    (host, log)
}

fn light_count(host: &SceneHost) -> usize {
    host.scene().objects().filter(|(_, o)| o.is_light()).count()
}

#[test]
fn cleanup_runs_before_next_init() {
    let (mut host, log) = recording_host();
    host.activate(0).unwrap();
    host.activate(1).unwrap();

    assert_eq!(*log.borrow(), vec!["init 1.1", "cleanup 1.1", "init 1.2"]);
}

#[test]
fn switching_clears_objects_but_keeps_lights() {
    let (mut host, _log) = recording_host();
    host.activate(0).unwrap();
    assert!(host.scene().find("marker 1.1").is_some());

    host.activate(2).unwrap();
    assert!(host.scene().find("marker 1.1").is_none());
    assert!(host.scene().find("marker 1.3").is_some());
    assert_eq!(light_count(&host), 1);
    assert!(host.scene().find("ambient").is_some());
}

#[test]
fn panel_is_rebuilt_for_each_verse() {
    let (mut host, _log) = recording_host();
    host.activate(0).unwrap();
    host.dispatch(ControlEvent::SliderChanged {
        id: "level",
        value: 0.9,
    });
    assert_eq!(host.panel().slider_value("level"), Some(0.9));

    host.activate(1).unwrap();
    assert_eq!(host.panel().len(), 1);
    assert_eq!(host.panel().slider_value("level"), Some(0.5));
}

#[test]
fn camera_reset_returns_to_verse_pose() {
    let (mut host, _log) = recording_host();
    host.activate(0).unwrap();
    let home = host.camera().clone();

    host.camera_mut().drag(120.0, -40.0);
    host.camera_mut().zoom(3.0);
    assert!((host.camera().distance - home.distance).abs() > 0.1);

    host.reset_camera();
    assert!((host.camera().distance - home.distance).abs() < 1e-5);
    assert!((host.camera().yaw - home.yaw).abs() < 1e-5);
    assert!((host.camera().pitch - home.pitch).abs() < 1e-5);
}

#[test]
fn verse_switch_discards_camera_drag() {
    let (mut host, _log) = recording_host();
    host.activate(0).unwrap();
    host.camera_mut().drag(300.0, 0.0);

    host.activate(1).unwrap();
    assert!((host.camera().yaw - 0.2).abs() < 1e-5);
    assert!((host.camera().distance - 12.0).abs() < 1e-5);
}

#[test]
fn navigation_stops_at_both_ends() {
    let (mut host, log) = recording_host();
    host.activate(0).unwrap();
    assert!(!host.has_previous());
    assert!(!host.previous());
    assert_eq!(host.current_index(), Some(0));

    let last = host.len() - 1;
    host.activate(last).unwrap();
    assert!(!host.has_next());
    assert!(!host.next());
    assert_eq!(host.current_index(), Some(last));

    // Refused moves never tear down the active verse
    let cleanups = log.borrow().iter().filter(|l| l.starts_with("cleanup")).count();
    assert_eq!(cleanups, 1);
}

#[test]
fn next_and_previous_walk_the_catalogue() {
    let (mut host, _log) = recording_host();
    assert!(host.next());
    assert_eq!(host.current_index(), Some(0));
    assert!(host.next());
    assert!(host.next());
    assert_eq!(host.current().map(|v| v.number), Some(3));
    assert!(host.previous());
    assert_eq!(host.current().map(|v| v.number), Some(2));
}

#[test]
fn chapters_chain_in_navigation_order() {
    let (mut host, _log) = recording_host();
    host.activate_verse(1, 8).unwrap();
    assert!(host.next());
    let info = host.current().unwrap();
    assert_eq!((info.chapter, info.number), (24, 18));
    assert!(host.chapter_title().is_some());
}

#[test]
fn bad_targets_are_errors() {
    let (mut host, _log) = recording_host();
    let err = host.activate(host.len()).unwrap_err();
    assert!(matches!(err, VerseError::IndexOutOfRange { .. }));

    let err = host.activate_verse(3, 1).unwrap_err();
    assert!(matches!(err, VerseError::UnknownVerse { chapter: 3, verse: 1 }));
    assert_eq!(host.current_index(), None);
}

#[test]
fn paused_host_does_not_update() {
    let (mut host, log) = recording_host();
    host.activate(0).unwrap();
    host.set_paused(true);
    host.tick(0.016);
    assert!(!log.borrow().iter().any(|l| l.starts_with("update")));

    host.toggle_paused();
    host.tick(0.016);
    assert!(log.borrow().iter().any(|l| l == "update 1.1"));
}

#[test]
fn catalogue_verses_run_under_the_host() {
    let mut host = SceneHost::seeded(CATALOGUE, 11);
    host.activate(0).unwrap();
    loop {
        for _ in 0..30 {
            host.tick(1.0 / 60.0);
        }
        assert_eq!(light_count(&host), 1);
        assert!(!host.panel().is_empty());
        if !host.next() {
            break;
        }
    }
    assert_eq!(host.current_index(), Some(host.len() - 1));
}
