//! Retained description of a verse's control panel
//!
//! Verses describe their widgets once in `setup_controls`; the UI layer draws
//! them and reports [`ControlEvent`]s, which the panel normalizes before the
//! host forwards them to the active verse.

use std::f32::consts::TAU;

/// Stable identifier a verse uses to recognise its own widgets
pub type ControlId = &'static str;

/// How a slider value is displayed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFormat {
    /// Value shown with the given number of decimals
    Number { decimals: usize },
    /// Value already in percent units (0–100)
    Percent,
    /// Radians shown as degrees
    Degrees,
}

impl ValueFormat {
    pub fn format(&self, value: f32) -> String {
        match *self {
            ValueFormat::Number { decimals } => format!("{:.*}", decimals, value),
            ValueFormat::Percent => format!("{:.0}%", value),
            ValueFormat::Degrees => format!("{:.0}°", value.to_degrees()),
        }
    }

    /// Inverse of [`format`](Self::format) for typed-in values; units
    /// are optional
    pub fn parse(&self, text: &str) -> Option<f32> {
        let number = text.trim().trim_end_matches(['%', '°']).trim();
        let value: f32 = number.parse().ok()?;
        match *self {
            ValueFormat::Degrees => Some(value.to_radians()),
            ValueFormat::Number { .. } | ValueFormat::Percent => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub id: ControlId,
    pub label: String,
    pub min: f32,
    pub max: f32,
    /// Snap increment, 0 for continuous
    pub step: f32,
    pub value: f32,
    pub format: ValueFormat,
}

impl Slider {
    pub fn new(id: ControlId, label: &str, min: f32, max: f32, value: f32) -> Self {
        let mut slider = Self {
            id,
            label: label.to_string(),
            min: min.min(max),
            max: max.max(min),
            step: 0.0,
            value: min,
            format: ValueFormat::Number { decimals: 2 },
        };
        slider.set(value);
        slider
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step.max(0.0);
        let v = self.value;
        self.set(v);
        self
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    /// Snap and clamp `value` into range; non-finite input leaves the value unchanged
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.value;
        }
        let snapped = if self.step > 0.0 {
            self.min + ((value - self.min) / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }

    pub fn set(&mut self, value: f32) -> f32 {
        self.value = self.clamp(value);
        self.value
    }

    pub fn display(&self) -> String {
        self.format.format(self.value)
    }
}

/// A widget in the panel
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Heading(String),
    Text(String),
    Slider(Slider),
    Button {
        id: ControlId,
        label: String,
    },
    /// Two-state button; shows `on_label` while on
    Toggle {
        id: ControlId,
        off_label: String,
        on_label: String,
        on: bool,
    },
    /// Live text written by the verse each frame
    Readout {
        id: ControlId,
        label: String,
        value: String,
    },
    /// Circular angle handle, dragged around its rim
    Dial {
        id: ControlId,
        label: String,
        angle: f32,
    },
}

impl Control {
    pub fn id(&self) -> Option<ControlId> {
        match self {
            Control::Heading(_) | Control::Text(_) => None,
            Control::Slider(s) => Some(s.id),
            Control::Button { id, .. }
            | Control::Toggle { id, .. }
            | Control::Readout { id, .. }
            | Control::Dial { id, .. } => Some(*id),
        }
    }
}

/// User interaction reported by the UI layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SliderChanged { id: ControlId, value: f32 },
    ButtonPressed { id: ControlId },
    Toggled { id: ControlId, on: bool },
    DialTurned { id: ControlId, angle: f32 },
}

impl ControlEvent {
    pub fn id(&self) -> ControlId {
        match *self {
            ControlEvent::SliderChanged { id, .. }
            | ControlEvent::ButtonPressed { id }
            | ControlEvent::Toggled { id, .. }
            | ControlEvent::DialTurned { id, .. } => id,
        }
    }
}

/// Wrap an angle into [0, 2π)
pub fn wrap_angle(angle: f32) -> f32 {
    if angle.is_finite() {
        angle.rem_euclid(TAU)
    } else {
        0.0
    }
}

/// The side panel's widgets, rebuilt by the host for every verse
#[derive(Debug, Default)]
pub struct ControlPanel {
    controls: Vec<Control>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.controls.clear();
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.controls.push(Control::Heading(text.to_string()));
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.controls.push(Control::Text(text.to_string()));
        self
    }

    pub fn slider(&mut self, slider: Slider) -> &mut Self {
        self.controls.push(Control::Slider(slider));
        self
    }

    pub fn button(&mut self, id: ControlId, label: &str) -> &mut Self {
        self.controls.push(Control::Button {
            id,
            label: label.to_string(),
        });
        self
    }

    pub fn toggle(
        &mut self,
        id: ControlId,
        off_label: &str,
        on_label: &str,
        on: bool,
    ) -> &mut Self {
        self.controls.push(Control::Toggle {
            id,
            off_label: off_label.to_string(),
            on_label: on_label.to_string(),
            on,
        });
        self
    }

    pub fn readout(&mut self, id: ControlId, label: &str, value: &str) -> &mut Self {
        self.controls.push(Control::Readout {
            id,
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn dial(&mut self, id: ControlId, label: &str, angle: f32) -> &mut Self {
        self.controls.push(Control::Dial {
            id,
            label: label.to_string(),
            angle: wrap_angle(angle),
        });
        self
    }

    fn find_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.id() == Some(id))
    }

    pub fn find(&self, id: ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| c.id() == Some(id))
    }

    /// Store an event's value in the matching widget and return the
    /// normalized event. Events for unknown widgets pass through unchanged.
    pub fn apply(&mut self, event: ControlEvent) -> ControlEvent {
        match (self.find_mut(event.id()), event) {
            (Some(Control::Slider(slider)), ControlEvent::SliderChanged { id, value }) => {
                ControlEvent::SliderChanged {
                    id,
                    value: slider.set(value),
                }
            }
            (Some(Control::Toggle { on, .. }), ControlEvent::Toggled { id, on: requested }) => {
                *on = requested;
                ControlEvent::Toggled { id, on: requested }
            }
            (
                Some(Control::Dial { angle, .. }),
                ControlEvent::DialTurned {
                    id,
                    angle: requested,
                },
            ) => {
                *angle = wrap_angle(requested);
                ControlEvent::DialTurned { id, angle: *angle }
            }
            (_, ControlEvent::DialTurned { id, angle }) => ControlEvent::DialTurned {
                id,
                angle: wrap_angle(angle),
            },
            (_, other) => other,
        }
    }

    /// Update a readout's text; absent readouts are silently skipped
    pub fn set_readout(&mut self, id: ControlId, text: impl Into<String>) {
        if let Some(Control::Readout { value, .. }) = self.find_mut(id) {
            *value = text.into();
        }
    }

    pub fn readout_value(&self, id: ControlId) -> Option<&str> {
        match self.find(id) {
            Some(Control::Readout { value, .. }) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn slider_value(&self, id: ControlId) -> Option<f32> {
        match self.find(id) {
            Some(Control::Slider(s)) => Some(s.value),
            _ => None,
        }
    }

    /// Programmatic slider move (e.g. an auto-ramping temperature)
    pub fn set_slider(&mut self, id: ControlId, value: f32) {
        if let Some(Control::Slider(s)) = self.find_mut(id) {
            s.set(value);
        }
    }

    pub fn set_toggle(&mut self, id: ControlId, state: bool) {
        if let Some(Control::Toggle { on, .. }) = self.find_mut(id) {
            *on = state;
        }
    }

    pub fn toggle_state(&self, id: ControlId) -> Option<bool> {
        match self.find(id) {
            Some(Control::Toggle { on, .. }) => Some(*on),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ControlPanel {
        let mut panel = ControlPanel::new();
        panel
            .heading("Test")
            .slider(
                Slider::new("coherence", "Coherence", 0.0, 100.0, 50.0)
                    .with_format(ValueFormat::Percent),
            )
            .slider(Slider::new("harmonic", "Harmonic", 1.0, 8.0, 1.0).with_step(1.0))
            .toggle("observe", "Observe", "Stop observing", false)
            .readout("display", "Coherence", "")
            .dial("angle", "Angle", 0.0);
        panel
    }

    #[test]
    fn slider_events_are_clamped() {
        let mut panel = panel();
        let ev = panel.apply(ControlEvent::SliderChanged { id: "coherence", value: 250.0 });
        assert_eq!(ev, ControlEvent::SliderChanged { id: "coherence", value: 100.0 });
        let ev = panel.apply(ControlEvent::SliderChanged { id: "coherence", value: -3.0 });
        assert_eq!(ev, ControlEvent::SliderChanged { id: "coherence", value: 0.0 });
        assert_eq!(panel.slider_value("coherence"), Some(0.0));
    }

    #[test]
    fn stepped_slider_snaps() {
        let mut panel = panel();
        let ev = panel.apply(ControlEvent::SliderChanged { id: "harmonic", value: 3.4 });
        assert_eq!(ev, ControlEvent::SliderChanged { id: "harmonic", value: 3.0 });
    }

    #[test]
    fn non_finite_slider_input_is_ignored() {
        let mut panel = panel();
        panel.apply(ControlEvent::SliderChanged { id: "coherence", value: f32::NAN });
        assert_eq!(panel.slider_value("coherence"), Some(50.0));
    }

    #[test]
    fn dial_angles_wrap() {
        let mut panel = panel();
        let ev = panel.apply(ControlEvent::DialTurned { id: "angle", angle: -0.5 });
        match ev {
            ControlEvent::DialTurned { angle, .. } => assert!((angle - (TAU - 0.5)).abs() < 1e-5),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn missing_readout_is_skipped() {
        let mut panel = panel();
        panel.set_readout("temperatureDisplay", "T = 1");
        assert_eq!(panel.readout_value("temperatureDisplay"), None);
        panel.set_readout("display", "42%");
        assert_eq!(panel.readout_value("display"), Some("42%"));
    }

    #[test]
    fn toggles_record_state() {
        let mut panel = panel();
        panel.apply(ControlEvent::Toggled { id: "observe", on: true });
        assert_eq!(panel.toggle_state("observe"), Some(true));
    }

    #[test]
    fn typed_values_parse_in_display_units() {
        let degrees = ValueFormat::Degrees.parse("45").unwrap();
        assert!((degrees - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        let right = ValueFormat::Degrees.parse(" 90° ").unwrap();
        assert!((right.to_degrees() - 90.0).abs() < 1e-3);
        assert_eq!(ValueFormat::Percent.parse("40%"), Some(40.0));
        assert_eq!(ValueFormat::Number { decimals: 2 }.parse("1.25"), Some(1.25));
        assert_eq!(ValueFormat::Degrees.parse("north"), None);
    }
}
