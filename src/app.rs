// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! [`EditorApp`] hosts a [`TemplateEditor`] and wires the menu bar, the
//! content type toolbar, the timeline strip, the properties panel and the
//! canvas to it. All state changes go through the editor.

use crate::ui::{canvas, properties, timeline, toolbar};
use reelframe::error::RecoveredError;
use reelframe::models::element::Point;
use reelframe::settings::EditorSettings;
use reelframe::TemplateEditor;
use std::path::{Path, PathBuf};

/// Main application state.
pub struct EditorApp {
    editor: TemplateEditor,
    /// Template file the editor was last saved to or opened from
    current_file: Option<PathBuf>,
    /// Last status message shown in the status bar
    status: String,
}

impl EditorApp {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            editor: TemplateEditor::new(settings),
            current_file: None,
            status: "Ready".to_string(),
        }
    }

    fn report_recovered(&mut self, path: &Path, report: &[RecoveredError]) {
        self.status = if report.is_empty() {
            format!("Opened {}", path.display())
        } else {
            format!("Opened {} ({} value(s) repaired)", path.display(), report.len())
        };
    }

    fn open_template(&mut self, path: PathBuf) {
        match self.editor.open_template(&path) {
            Ok(report) => {
                self.report_recovered(&path, &report);
                self.current_file = Some(path);
            }
            Err(e) => {
                log::error!("Failed to open template: {:#}", e);
                self.status = format!("Failed to open template: {}", e);
            }
        }
    }

    fn save_template(&mut self, path: PathBuf) {
        match self.editor.save_template(&path) {
            Ok(()) => {
                self.status = format!("Saved {}", path.display());
                self.current_file = Some(path);
            }
            Err(e) => {
                log::error!("Failed to save template: {:#}", e);
                self.status = format!("Failed to save template: {}", e);
            }
        }
    }

    fn save_template_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name("template.json")
            .save_file()
        {
            self.save_template(path);
        }
    }

    fn load_plugin(&mut self, id: &str) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Plugin descriptor", &["adsp"])
            .pick_file()
        {
            if self.editor.canvas_mut().load_plugin_aspect_ratio(id, &path) {
                self.status = format!("Applied aspect ratio from {}", path.display());
            } else {
                self.status = format!("No usable plugin size in {}", path.display());
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (nudge, escape, save) = ctx.input(|i| {
            let step = if i.modifiers.shift { 10.0 } else { 1.0 };
            let mut nudge = Point::new(0.0, 0.0);
            if i.key_pressed(egui::Key::ArrowLeft) {
                nudge.x -= step;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                nudge.x += step;
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                nudge.y -= step;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                nudge.y += step;
            }
            (
                nudge,
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::S),
            )
        });

        if nudge.x != 0.0 || nudge.y != 0.0 {
            if let Some(id) = self.editor.canvas().selected().map(str::to_string) {
                self.editor.canvas_mut().move_element(&id, nudge.x, nudge.y);
            }
        }
        if escape {
            self.editor.canvas_mut().select_by_id(None);
        }
        if save {
            match self.current_file.clone() {
                Some(path) => self.save_template(path),
                None => self.save_template_as(),
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Template").clicked() {
                        self.editor.new_template();
                        self.current_file = None;
                        self.status = "New template".to_string();
                        ui.close_menu();
                    }

                    if ui.button("Open Template…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Template", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.open_template(path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Save Template").clicked() {
                        match self.current_file.clone() {
                            Some(path) => self.save_template(path),
                            None => self.save_template_as(),
                        }
                        ui.close_menu();
                    }

                    if ui.button("Save Template As…").clicked() {
                        self.save_template_as();
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("Reset Positions").clicked() {
                        self.editor.reset_positions();
                        self.status = "Positions reset".to_string();
                        ui.close_menu();
                    }
                    if ui.button("Reset All Frames").clicked() {
                        self.editor.reset_content_type();
                        self.status = format!("Reset all {} frames", self.editor.content_type().label());
                        ui.close_menu();
                    }
                    if ui.button("Deselect").clicked() {
                        self.editor.canvas_mut().select_by_id(None);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    let viewport = self.editor.canvas().store().viewport();
                    let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
                    if ui.button("Zoom In").clicked() {
                        self.editor.canvas_mut().zoom_in(center);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.editor.canvas_mut().zoom_out(center);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.editor.canvas_mut().reset_zoom();
                        ui.close_menu();
                    }
                    if ui.button("Fit to View").clicked() {
                        self.editor.canvas_mut().fit_to_view(viewport);
                        ui.close_menu();
                    }
                });
            });
        });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);
        self.menu_bar(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let zoom = self.editor.canvas().transform().zoom();
            if let Some(content_type) = toolbar::show(ui, self.editor.content_type(), zoom) {
                self.editor.switch_content_type(content_type);
                self.status = format!("Editing {}", content_type.label());
            }
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let canvas = self.editor.canvas();
                ui.label(format!(
                    "{} · frame {}/{}",
                    self.editor.content_type().label(),
                    canvas.frame_index() + 1,
                    canvas.frame_count(self.editor.content_type())
                ));
                ui.separator();
                ui.label(&self.status);
            });
        });

        if self.editor.timeline().is_visible(self.editor.canvas()) {
            egui::TopBottomPanel::bottom("timeline").show(ctx, |ui| {
                let action = timeline::show(ui, self.editor.timeline(), self.editor.canvas());
                match action {
                    timeline::TimelineAction::None => {}
                    timeline::TimelineAction::Select(index) => {
                        self.editor.select_frame(index);
                    }
                    timeline::TimelineAction::Add => match self.editor.add_frame() {
                        Ok(index) => self.status = format!("Added frame {}", index + 1),
                        Err(e) => self.status = e.to_string(),
                    },
                    timeline::TimelineAction::Remove(index) => {
                        if let Err(e) = self.editor.remove_frame(index) {
                            self.status = e.to_string();
                        }
                    }
                    timeline::TimelineAction::Duplicate(index) => match self.editor.duplicate_frame(index) {
                        Ok(copy) => self.status = format!("Duplicated frame {} as {}", index + 1, copy + 1),
                        Err(e) => self.status = e.to_string(),
                    },
                    timeline::TimelineAction::DescriptionChanged(text) => {
                        self.editor.set_description(&text);
                    }
                }
            });
        }

        egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = properties::show(ui, self.editor.canvas());
                    let canvas = self.editor.canvas_mut();
                    match action {
                        properties::PropertiesAction::None => {}
                        properties::PropertiesAction::Select(id) => canvas.select_by_id(id.as_deref()),
                        properties::PropertiesAction::SetConstrain(on) => canvas.set_constrain_to_frame(on),
                        properties::PropertiesAction::SetEnabled(id, on) => {
                            canvas.set_enabled(&id, on);
                        }
                        properties::PropertiesAction::SetContent(id, text) => {
                            canvas.set_text_content(&id, &text);
                        }
                        properties::PropertiesAction::SetFontSize(id, size) => {
                            canvas.set_font_size(&id, size);
                        }
                        properties::PropertiesAction::SetBold(id, bold) => {
                            canvas.set_bold(&id, bold);
                        }
                        properties::PropertiesAction::SetColor(id, color) => {
                            canvas.set_color(&id, color);
                        }
                        properties::PropertiesAction::SetBorderColor(id, color) => {
                            canvas.set_border_color(&id, color);
                        }
                        properties::PropertiesAction::SetPreset(id, preset) => {
                            canvas.set_position_preset(&id, preset);
                        }
                        properties::PropertiesAction::SetCornerRadius(id, radius) => {
                            canvas.set_corner_radius(&id, radius);
                        }
                        properties::PropertiesAction::SetAspectLock(id, on) => {
                            canvas.set_aspect_lock(&id, on);
                        }
                        properties::PropertiesAction::SetLocked(id, on) => {
                            canvas.set_locked(&id, on);
                        }
                        properties::PropertiesAction::LoadPlugin(id) => self.load_plugin(&id),
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = canvas::show(ui, self.editor.canvas());
            let canvas = self.editor.canvas_mut();
            match action {
                canvas::CanvasAction::None => {}
                canvas::CanvasAction::Resize(size) => canvas.set_viewport(size),
                canvas::CanvasAction::Click(view) => {
                    let point = canvas.transform().view_to_canvas(view);
                    canvas.select_element(point);
                }
                canvas::CanvasAction::PointerDown(view) => {
                    canvas.pointer_down(view);
                }
                canvas::CanvasAction::PointerMove(view) => canvas.pointer_move(view),
                canvas::CanvasAction::PointerUp => canvas.pointer_up(),
                canvas::CanvasAction::Zoom { anchor, factor } => canvas.transform_mut().zoom_at(anchor, factor),
                canvas::CanvasAction::Pan(delta) => canvas.transform_mut().pan_by(delta),
            }
        });
    }
}
