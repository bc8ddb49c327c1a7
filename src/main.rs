// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reelframe - overlay template editor
//!
//! A desktop application for laying out picture-in-picture windows and
//! text overlays across the frames of a video, picture or tutorial template.

mod app;
mod ui;

use anyhow::Result;
use app::EditorApp;
use reelframe::settings::EditorSettings;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = EditorSettings::from_env();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Reelframe - Overlay Template Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Reelframe",
        options,
        Box::new(move |_cc| Ok(Box::new(EditorApp::new(&settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
