use quantum_verses::color;
use quantum_verses::verses::{
    Condensate, Decoherence, DoubleSlit, Entanglement, QuantumDice, QubitVerse, StateClass,
    StringVibration, WaveFunction,
};
use quantum_verses::{ControlEvent, ObjectId, Stage, VerseAnimation, VerseKind};

const DT: f32 = 1.0 / 60.0;

fn mounted<V: VerseAnimation>(mut verse: V) -> (Stage, V) {
    let mut stage = Stage::new(16.0 / 9.0);
    stage.mount(&mut verse);
    (stage, verse)
}

/// Attribute lengths of every geometry in the scene
fn layout(stage: &Stage) -> Vec<(ObjectId, [usize; 4])> {
    stage
        .scene
        .objects()
        .filter_map(|(id, object)| {
            object.geometry().map(|g| {
                (
                    id,
                    [g.positions().len(), g.colors().len(), g.sizes().len(), g.edges().len()],
                )
            })
        })
        .collect()
}

#[test]
fn every_verse_keeps_its_buffers_through_updates() {
    for kind in VerseKind::ALL {
        let mut stage = Stage::new(16.0 / 9.0);
        let mut verse = kind.create_seeded(7);
        stage.mount(verse.as_mut());
        let before = layout(&stage);
        assert!(!before.is_empty(), "{:?} built no geometry", kind);

        for _ in 0..200 {
            stage.tick(verse.as_mut(), DT);
        }
        assert_eq!(layout(&stage), before, "{:?} resized a buffer", kind);

        verse.cleanup();
    }
}

#[test]
fn every_verse_survives_a_long_frame() {
    for kind in VerseKind::ALL {
        let mut stage = Stage::new(1.0);
        let mut verse = kind.create_seeded(3);
        stage.mount(verse.as_mut());
        stage.tick(verse.as_mut(), 0.1);
        stage.tick(verse.as_mut(), 0.0);
    }
}

#[test]
fn qubit_state_classes_follow_probability() {
    let (mut stage, mut qubit) = mounted(QubitVerse::with_seed(1));

    assert_eq!(qubit.update_qubit_state(&mut stage.scene, 0.5, 0.0), StateClass::Superposition);
    assert_eq!(qubit.update_qubit_state(&mut stage.scene, 0.95, 0.0), StateClass::One);

    let tip = stage.scene.find("state_tip").unwrap();
    let geometry = stage.scene.get(tip).and_then(|o| o.geometry()).unwrap();
    assert_eq!(geometry.colors()[0], color::STATE_ONE);
}

#[test]
fn qubit_slider_drives_the_readout() {
    let (mut stage, mut qubit) = mounted(QubitVerse::with_seed(1));
    stage.dispatch(&mut qubit, ControlEvent::SliderChanged { id: "probability", value: 0.5 });
    stage.tick(&mut qubit, DT);
    assert_eq!(stage.panel.readout_value("state"), Some("Superposition"));

    stage.dispatch(&mut qubit, ControlEvent::SliderChanged { id: "probability", value: 4.0 });
    assert_eq!(stage.panel.slider_value("probability"), Some(1.0));
    assert_eq!(qubit.class(), StateClass::One);
}

#[test]
fn observation_switches_screen_patterns() {
    let (mut stage, mut slit) = mounted(DoubleSlit::with_seed(2));
    let wave = slit.wave_pattern().unwrap();
    let particle = slit.particle_pattern().unwrap();
    assert!(stage.scene.is_visible(wave));
    assert!(!stage.scene.is_visible(particle));

    slit.toggle_observation(&mut stage.scene, true);
    assert!(!stage.scene.is_visible(wave));
    assert!(stage.scene.is_visible(particle));

    slit.toggle_observation(&mut stage.scene, false);
    assert!(stage.scene.is_visible(wave));
    assert!(!stage.scene.is_visible(particle));
}

#[test]
fn observe_toggle_is_idempotent() {
    let (mut stage, mut slit) = mounted(DoubleSlit::with_seed(2));
    let observe = ControlEvent::Toggled { id: "observe", on: true };
    stage.dispatch(&mut slit, observe);
    stage.dispatch(&mut slit, observe);
    stage.tick(&mut slit, DT);

    assert!(slit.is_observed());
    assert_eq!(stage.panel.toggle_state("observe"), Some(true));
    assert!(stage.scene.is_visible(slit.particle_pattern().unwrap()));
    assert!(!stage.scene.is_visible(slit.wave_pattern().unwrap()));
}

#[test]
fn measurement_toggles_are_idempotent() {
    let (mut stage, mut wave) = mounted(WaveFunction::with_seed(4));
    let measure = ControlEvent::Toggled { id: "measure", on: true };
    stage.dispatch(&mut wave, measure);
    let measurements = wave.measurements();
    stage.dispatch(&mut wave, measure);
    assert!(wave.is_measured());
    assert_eq!(wave.measurements(), measurements);

    let (mut stage, mut pair) = mounted(Entanglement::with_seed(4));
    stage.dispatch(&mut pair, ControlEvent::Toggled { id: "measure", on: true });
    stage.dispatch(&mut pair, ControlEvent::Toggled { id: "measure", on: true });
    assert_eq!(stage.panel.toggle_state("measure"), Some(true));

    let (mut stage, mut gas) = mounted(Condensate::with_seed(4));
    stage.dispatch(&mut gas, ControlEvent::Toggled { id: "cool", on: true });
    let ramp = gas.ramp();
    stage.dispatch(&mut gas, ControlEvent::Toggled { id: "cool", on: true });
    assert_eq!(gas.ramp(), ramp);
}

#[test]
fn sliders_clamp_through_dispatch() {
    let (mut stage, mut field) = mounted(Decoherence::with_seed(5));
    stage.dispatch(&mut field, ControlEvent::SliderChanged { id: "coherence", value: 250.0 });
    assert_eq!(stage.panel.slider_value("coherence"), Some(100.0));
    stage.dispatch(&mut field, ControlEvent::SliderChanged { id: "coherence", value: -3.0 });
    assert_eq!(stage.panel.slider_value("coherence"), Some(0.0));

    let (mut stage, mut gas) = mounted(Condensate::with_seed(5));
    stage.dispatch(&mut gas, ControlEvent::SliderChanged { id: "temperature", value: 1.7 });
    assert_eq!(stage.panel.slider_value("temperature"), Some(1.0));
    assert_eq!(gas.temperature(), 1.0);
}

#[test]
fn dice_roll_settles_after_its_duration() {
    let (mut stage, mut dice) = mounted(QuantumDice::with_seed(6));
    stage.dispatch(&mut dice, ControlEvent::ButtonPressed { id: "roll" });
    assert!(dice.is_rolling());

    let frames = (quantum_verses::verses::quantum_dice::ROLL_SECONDS / DT) as usize + 5;
    for _ in 0..frames {
        stage.tick(&mut dice, DT);
    }
    assert!(!dice.is_rolling());
    assert!(dice.outcome().is_some());
    assert_eq!(dice.counts().iter().sum::<u32>(), 1);
}

#[test]
fn cleanup_cancels_a_running_roll() {
    let (mut stage, mut dice) = mounted(QuantumDice::with_seed(6));
    stage.dispatch(&mut dice, ControlEvent::ButtonPressed { id: "roll" });
    dice.cleanup();
    assert!(!dice.is_rolling());
}

#[test]
fn pluck_rings_then_rests() {
    let (mut stage, mut string) = mounted(StringVibration::new());
    stage.dispatch(&mut string, ControlEvent::ButtonPressed { id: "pluck" });
    assert!(string.is_plucking());

    let frames = (quantum_verses::verses::string_vibration::PLUCK_SECONDS / DT) as usize + 5;
    for _ in 0..frames {
        stage.tick(&mut string, DT);
    }
    assert!(!string.is_plucking());
    assert_eq!(stage.panel.readout_value("state"), Some("Resting"));
}
