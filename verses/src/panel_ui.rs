//! egui panels: verse text on the left, navigation on top, controls on the right
//!
//! Drawing never mutates the host; interactions are collected into a
//! [`PanelOutput`] the event loop applies after the frame.

use crate::content::{Equation, VerseInfo};
use crate::controls::{wrap_angle, Control, ControlEvent, ControlPanel, Slider};
use crate::host::SceneHost;
use egui::{Color32, Context, FontFamily, FontId, RichText, Stroke};

const TITLE_COLOR: Color32 = Color32::from_rgb(100, 200, 255);
const SECTION_COLOR: Color32 = Color32::from_rgb(255, 200, 100);
const VALUE_COLOR: Color32 = Color32::from_rgb(150, 255, 150);
const DIAL_SIZE: f32 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Previous,
    Next,
    TogglePause,
    ResetCamera,
}

/// Everything the user did in the panels this frame
#[derive(Debug, Default)]
pub struct PanelOutput {
    pub events: Vec<ControlEvent>,
    pub nav: Option<NavAction>,
}

/// Draw all panels for the active verse
pub fn draw(ctx: &Context, host: &SceneHost) -> PanelOutput {
    let mut output = PanelOutput::default();

    draw_nav_bar(ctx, host, &mut output);

    if let Some(info) = host.current() {
        draw_verse_sidebar(ctx, info);
    }

    egui::SidePanel::right("controls_panel")
        .min_width(240.0)
        .max_width(320.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Controls").color(TITLE_COLOR));
            });
            ui.add_space(6.0);
            ui.separator();
            draw_controls(ui, host.panel(), &mut output.events);
        });

    output
}

fn draw_nav_bar(ctx: &Context, host: &SceneHost, output: &mut PanelOutput) {
    egui::TopBottomPanel::top("verse_nav").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(host.has_previous(), egui::Button::new("< Previous"))
                .clicked()
            {
                output.nav = Some(NavAction::Previous);
            }
            if ui
                .add_enabled(host.has_next(), egui::Button::new("Next >"))
                .clicked()
            {
                output.nav = Some(NavAction::Next);
            }
            let pause_label = if host.is_paused() { "Resume" } else { "Pause" };
            if ui.button(pause_label).clicked() {
                output.nav = Some(NavAction::TogglePause);
            }
            if ui.button("Reset camera").clicked() {
                output.nav = Some(NavAction::ResetCamera);
            }

            ui.separator();

            if let Some(info) = host.current() {
                let chapter = host.chapter_title().unwrap_or("");
                ui.label(
                    RichText::new(format!("Chapter {}: {}", info.chapter, chapter))
                        .color(Color32::LIGHT_GRAY),
                );
                ui.label(
                    RichText::new(format!("Verse {}", info.number))
                        .strong()
                        .color(SECTION_COLOR),
                );
            }
            if let Some(index) = host.current_index() {
                ui.label(
                    RichText::new(format!("({}/{})", index + 1, host.len()))
                        .small()
                        .color(Color32::GRAY),
                );
            }
        });
    });
}

fn draw_verse_sidebar(ctx: &Context, info: &VerseInfo) {
    egui::SidePanel::left("verse_panel")
        .min_width(300.0)
        .max_width(380.0)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(RichText::new(info.title).color(TITLE_COLOR));
                });
                ui.add_space(8.0);
                ui.label(
                    RichText::new(info.original_text)
                        .italics()
                        .color(Color32::from_rgb(230, 220, 190)),
                );

                ui.add_space(10.0);
                ui.separator();

                draw_section(ui, "Concept", info.concept);
                draw_section(ui, "Quantum Parallel", info.parallel);
                draw_section(ui, "Why It Fits", info.rationale);
                draw_section(ui, "Example", info.example);

                if !info.equations.is_empty() {
                    ui.add_space(5.0);
                    ui.separator();
                    ui.label(RichText::new("Equations").strong().color(SECTION_COLOR));
                    ui.add_space(5.0);
                    for eq in info.equations {
                        draw_equation(ui, eq);
                        ui.add_space(8.0);
                    }
                }
            });
        });
}

fn draw_section(ui: &mut egui::Ui, heading: &str, body: &str) {
    ui.add_space(5.0);
    ui.label(RichText::new(heading).strong().color(SECTION_COLOR));
    ui.label(RichText::new(body).color(Color32::LIGHT_GRAY));
}

/// Draw a single equation with name, formula, and description
fn draw_equation(ui: &mut egui::Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::WHITE));
        ui.label(
            RichText::new(eq.formula)
                .font(FontId::new(16.0, FontFamily::Monospace))
                .color(Color32::from_rgb(200, 220, 255)),
        );
        ui.label(RichText::new(eq.description).small().color(Color32::GRAY));
    });
}

fn draw_controls(ui: &mut egui::Ui, panel: &ControlPanel, events: &mut Vec<ControlEvent>) {
    for control in panel.controls() {
        match control {
            Control::Heading(text) => {
                ui.add_space(6.0);
                ui.label(RichText::new(text).strong().color(SECTION_COLOR));
            }
            Control::Text(text) => {
                ui.label(RichText::new(text).small().color(Color32::GRAY));
            }
            Control::Slider(slider) => draw_slider(ui, slider, events),
            Control::Button { id, label } => {
                if ui.button(label).clicked() {
                    events.push(ControlEvent::ButtonPressed { id: *id });
                }
            }
            Control::Toggle {
                id,
                off_label,
                on_label,
                on,
            } => {
                let label = if *on { on_label } else { off_label };
                if ui.selectable_label(*on, label).clicked() {
                    events.push(ControlEvent::Toggled { id: *id, on: !*on });
                }
            }
            Control::Readout { label, value, .. } => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).color(Color32::LIGHT_GRAY));
                    ui.label(
                        RichText::new(value)
                            .font(FontId::new(14.0, FontFamily::Monospace))
                            .color(VALUE_COLOR),
                    );
                });
            }
            Control::Dial { id, label, angle } => {
                ui.label(RichText::new(label).color(Color32::LIGHT_GRAY));
                if let Some(turned) = draw_dial(ui, *angle) {
                    events.push(ControlEvent::DialTurned { id: *id, angle: turned });
                }
            }
        }
        ui.add_space(4.0);
    }
}

fn draw_slider(ui: &mut egui::Ui, slider: &Slider, events: &mut Vec<ControlEvent>) {
    ui.label(RichText::new(&slider.label).color(Color32::LIGHT_GRAY));
    let mut value = slider.value;
    let format = slider.format;
    let mut widget = egui::Slider::new(&mut value, slider.min..=slider.max)
        .custom_formatter(move |n, _| format.format(n as f32))
        .custom_parser(move |text| format.parse(text).map(f64::from));
    if slider.step > 0.0 {
        widget = widget.step_by(slider.step as f64);
    }
    if ui.add(widget).changed() {
        events.push(ControlEvent::SliderChanged {
            id: slider.id,
            value,
        });
    }
}

/// Painter-drawn angle handle; returns the new angle while dragged
fn draw_dial(ui: &mut egui::Ui, angle: f32) -> Option<f32> {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(DIAL_SIZE, DIAL_SIZE),
        egui::Sense::click_and_drag(),
    );
    let center = rect.center();
    let radius = rect.width() * 0.5 - 8.0;

    let mut turned = None;
    if response.dragged() || response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let d = pointer - center;
            // Screen y grows downwards
            turned = Some(wrap_angle((-d.y).atan2(d.x)));
        }
    }

    let shown = turned.unwrap_or(angle);
    let painter = ui.painter();
    painter.circle_stroke(center, radius, Stroke::new(1.5, Color32::from_gray(120)));
    let handle = center + egui::vec2(shown.cos(), -shown.sin()) * radius;
    painter.line_segment([center, handle], Stroke::new(2.0, TITLE_COLOR));
    painter.circle_filled(handle, 6.0, TITLE_COLOR);
    painter.text(
        center + egui::vec2(0.0, radius * 0.45),
        egui::Align2::CENTER_CENTER,
        format!("{:.0}°", shown.to_degrees()),
        FontId::new(12.0, FontFamily::Monospace),
        Color32::LIGHT_GRAY,
    );

    turned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CATALOGUE;

    #[test]
    fn idle_frame_reports_nothing() {
        let mut host = SceneHost::seeded(CATALOGUE, 3);
        host.activate(0).unwrap();

        let ctx = Context::default();
        let mut output = PanelOutput::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            output = draw(ctx, &host);
        });

        assert!(output.events.is_empty());
        assert_eq!(output.nav, None);
    }

    #[test]
    fn every_verse_panel_draws() {
        let mut host = SceneHost::seeded(CATALOGUE, 3);
        let ctx = Context::default();
        for index in 0..host.len() {
            host.activate(index).unwrap();
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                draw(ctx, &host);
            });
        }
    }
}
