// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar for picking the content type being edited.

use reelframe::models::content_type::ContentType;

/// Show the toolbar. Returns the content type the user picked, if it changed.
pub fn show(ui: &mut egui::Ui, current: ContentType, zoom: f64) -> Option<ContentType> {
    let mut picked = None;

    ui.horizontal(|ui| {
        ui.label("Content:");
        for content_type in ContentType::ALL {
            if ui
                .selectable_label(current == content_type, content_type.label())
                .clicked()
                && current != content_type
            {
                picked = Some(content_type);
            }
        }

        ui.separator();
        ui.label(format!("Zoom: {:.0}%", zoom * 100.0));

        ui.separator();
        let hint = if current.has_timeline() {
            "Drag to move, corner handles to resize, Ctrl+scroll to zoom"
        } else {
            "Single frame layout. Drag to move, corner handles to resize"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    picked
}
