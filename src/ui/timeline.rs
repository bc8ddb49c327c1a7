// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame timeline strip shown under the canvas for timeline content types.

use reelframe::editor::canvas::CanvasController;
use reelframe::editor::timeline::TimelineController;

/// Result of timeline interaction.
pub enum TimelineAction {
    None,
    Select(usize),
    Add,
    Remove(usize),
    Duplicate(usize),
    DescriptionChanged(String),
}

pub fn show(ui: &mut egui::Ui, timeline: &TimelineController, canvas: &CanvasController) -> TimelineAction {
    let mut action = TimelineAction::None;
    let count = timeline.frame_count(canvas);
    let active = timeline.active_index(canvas);
    let max = timeline.content_type(canvas).max_frames();

    ui.horizontal(|ui| {
        ui.strong(format!("Frames ({}/{})", count, max));
        ui.separator();

        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for index in 0..count {
                    let label = format!("{}", index + 1);
                    let button = ui
                        .selectable_label(index == active, label)
                        .on_hover_text(timeline.frame_description(canvas, index));
                    if button.clicked() && index != active {
                        action = TimelineAction::Select(index);
                    }
                }
            });
        });

        ui.separator();
        if ui.add_enabled(count < max, egui::Button::new("➕ Add")).clicked() {
            action = TimelineAction::Add;
        }
        if ui.add_enabled(count < max, egui::Button::new("Duplicate")).clicked() {
            action = TimelineAction::Duplicate(active);
        }
        if ui.add_enabled(count > 1, egui::Button::new("🗑 Remove")).clicked() {
            action = TimelineAction::Remove(active);
        }
    });

    ui.horizontal(|ui| {
        ui.label("Description:");
        let mut text = timeline.description(canvas).to_string();
        let response = ui.add(egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY));
        if response.changed() {
            action = TimelineAction::DescriptionChanged(text);
        }
    });

    action
}
