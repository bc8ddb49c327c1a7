// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Properties panel for the selected element.
//!
//! Lists the elements of the active frame and shows editors for whichever
//! one is selected. Every edit is reported as a [`PropertiesAction`] so the
//! app applies it through the canvas controller.

use reelframe::editor::canvas::CanvasController;
use reelframe::models::element::{Color, Element, ElementId, ElementKind, PositionPreset, MAX_CORNER_RADIUS};

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    Select(Option<ElementId>),
    SetConstrain(bool),
    SetEnabled(ElementId, bool),
    SetContent(ElementId, String),
    SetFontSize(ElementId, u32),
    SetBold(ElementId, bool),
    SetColor(ElementId, Color),
    SetBorderColor(ElementId, Color),
    SetPreset(ElementId, PositionPreset),
    SetCornerRadius(ElementId, i64),
    SetAspectLock(ElementId, bool),
    SetLocked(ElementId, bool),
    LoadPlugin(ElementId),
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn from_color32(color: egui::Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::rgba(r, g, b, a)
}

pub fn show(ui: &mut egui::Ui, canvas: &CanvasController) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Frame");
    let mut constrain = canvas.constrain_to_frame();
    if ui.checkbox(&mut constrain, "Constrain to frame").changed() {
        action = PropertiesAction::SetConstrain(constrain);
    }
    let frame = canvas.content_frame();
    ui.label(
        egui::RichText::new(format!("{:.0} × {:.0}", frame.width, frame.height))
            .small()
            .weak(),
    );

    ui.separator();
    ui.heading("Elements");
    for element in canvas.elements() {
        let selected = canvas.selected() == Some(element.id.as_str());
        let label = format!("{} ({})", element.id, element.type_name());
        if ui.selectable_label(selected, label).clicked() {
            let id = if selected { None } else { Some(element.id.clone()) };
            action = PropertiesAction::Select(id);
        }
    }

    ui.separator();
    match canvas.selected_element() {
        Some(element) => {
            let edit = element_editor(ui, element);
            if !matches!(edit, PropertiesAction::None) {
                action = edit;
            }
        }
        None => {
            ui.label(egui::RichText::new("Select an element to edit it").italics().weak());
        }
    }

    action
}

fn element_editor(ui: &mut egui::Ui, element: &Element) -> PropertiesAction {
    let mut action = PropertiesAction::None;
    let id = || element.id.clone();

    ui.heading(&element.id);
    let mut enabled = element.enabled;
    if ui.checkbox(&mut enabled, "Enabled").changed() {
        action = PropertiesAction::SetEnabled(id(), enabled);
    }
    let rect = element.rect;
    ui.label(format!(
        "Position: {:.0}, {:.0}  Size: {:.0} × {:.0}",
        rect.x, rect.y, rect.width, rect.height
    ));

    match &element.kind {
        ElementKind::Text(text) => {
            ui.label("Text:");
            let mut content = text.content.clone();
            if ui.text_edit_singleline(&mut content).changed() {
                action = PropertiesAction::SetContent(id(), content);
            }

            let mut font_size = text.font_size;
            if ui
                .add(egui::Slider::new(&mut font_size, 8..=120).text("Font size"))
                .changed()
            {
                action = PropertiesAction::SetFontSize(id(), font_size);
            }

            let mut bold = text.bold;
            if ui.checkbox(&mut bold, "Bold").changed() {
                action = PropertiesAction::SetBold(id(), bold);
            }

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = to_color32(text.color);
                if ui.color_edit_button_srgba(&mut color).changed() {
                    action = PropertiesAction::SetColor(id(), from_color32(color));
                }
                ui.monospace(text.color.to_hex());
            });

            ui.horizontal(|ui| {
                ui.label("Position:");
                for preset in PositionPreset::ALL {
                    if ui
                        .selectable_label(text.position_preset == preset, preset.as_str())
                        .clicked()
                    {
                        action = PropertiesAction::SetPreset(id(), preset);
                    }
                }
            });
        }
        ElementKind::Pip(pip) => {
            let mut locked = pip.locked;
            if ui.checkbox(&mut locked, "Lock to center").changed() {
                action = PropertiesAction::SetLocked(id(), locked);
            }

            let mut corner_radius = pip.corner_radius;
            if ui
                .add(egui::Slider::new(&mut corner_radius, 0..=MAX_CORNER_RADIUS).text("Corner radius"))
                .changed()
            {
                action = PropertiesAction::SetCornerRadius(id(), corner_radius as i64);
            }

            ui.horizontal(|ui| {
                ui.label("Fill:");
                let mut color = to_color32(pip.color);
                if ui.color_edit_button_srgba(&mut color).changed() {
                    action = PropertiesAction::SetColor(id(), from_color32(color));
                }
                ui.label("Border:");
                let mut border = to_color32(pip.border_color);
                if ui.color_edit_button_srgba(&mut border).changed() {
                    action = PropertiesAction::SetBorderColor(id(), from_color32(border));
                }
            });
            ui.label(
                egui::RichText::new(format!("{}  {}", pip.color.to_hex(), pip.border_color.to_hex()))
                    .monospace()
                    .weak(),
            );

            ui.separator();
            let mut aspect_lock = pip.use_aspect_lock;
            if ui.checkbox(&mut aspect_lock, "Use plugin aspect ratio").changed() {
                action = PropertiesAction::SetAspectLock(id(), aspect_lock);
            }
            ui.label(format!("Aspect ratio: {:.3}", pip.effective_aspect()));
            if let Some(path) = &pip.plugin_path {
                ui.label(egui::RichText::new(path.as_str()).small().weak());
            }
            if ui.button("Load plugin…").clicked() {
                action = PropertiesAction::LoadPlugin(id());
            }
        }
    }

    action
}
