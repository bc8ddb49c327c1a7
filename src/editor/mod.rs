// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template editor state engine.
//!
//! [`TemplateEditor`] pairs the canvas controller (which owns the frame
//! store) with the timeline controller and exposes the operations the host
//! application needs: content type switching, timeline edits, and template
//! save/load through [`get_template_config`](TemplateEditor::get_template_config)
//! and [`set_template_config`](TemplateEditor::set_template_config).

pub mod canvas;
pub mod timeline;

use crate::error::{RecoveredError, TimelineError};
use crate::io::{codec, serialization};
use crate::models::content_type::ContentType;
use crate::models::store::FrameStateStore;
use crate::settings::EditorSettings;
use anyhow::Result;
use canvas::CanvasController;
use serde_json::Value;
use std::path::Path;
use timeline::TimelineController;

pub struct TemplateEditor {
    canvas: CanvasController,
    timeline: TimelineController,
}

impl Default for TemplateEditor {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

impl TemplateEditor {
    pub fn new(settings: &EditorSettings) -> Self {
        let canvas = CanvasController::with_settings(settings);
        Self {
            canvas,
            timeline: TimelineController::new(),
        }
    }

    pub fn canvas(&self) -> &CanvasController {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasController {
        &mut self.canvas
    }

    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    pub fn content_type(&self) -> ContentType {
        self.canvas.content_type()
    }

    pub fn switch_content_type(&mut self, content_type: ContentType) {
        if content_type != self.canvas.content_type() {
            self.timeline.set_content_type(&mut self.canvas, content_type);
        }
    }

    pub fn add_frame(&mut self) -> Result<usize, TimelineError> {
        self.timeline.add_frame(&mut self.canvas)
    }

    pub fn remove_frame(&mut self, index: usize) -> Result<(), TimelineError> {
        self.timeline.remove_frame(&mut self.canvas, index)
    }

    pub fn duplicate_frame(&mut self, index: usize) -> Result<usize, TimelineError> {
        self.timeline.duplicate_frame(&mut self.canvas, index)
    }

    pub fn select_frame(&mut self, index: usize) -> bool {
        self.timeline.select_frame(&mut self.canvas, index)
    }

    pub fn set_frame_count(&mut self, count: usize) -> usize {
        self.timeline.set_frame_count(&mut self.canvas, count)
    }

    pub fn set_description(&mut self, description: &str) {
        self.timeline.edit_description(&mut self.canvas, description);
    }

    pub fn reset_positions(&mut self) {
        let content_type = self.canvas.content_type();
        self.canvas.reset_positions(content_type);
    }

    /// Discard all frames of the active content type.
    pub fn reset_content_type(&mut self) {
        let content_type = self.canvas.content_type();
        self.canvas.reset_content_type(content_type);
    }

    /// Start over with an empty store, keeping the active content type.
    pub fn new_template(&mut self) {
        let mut store = FrameStateStore::new(self.canvas.store().viewport());
        store.set_active_content_type(self.canvas.content_type());
        self.canvas.replace_store(store);
        log::info!("Started a new template");
    }

    /// Flush the live frame and encode the whole store.
    pub fn get_template_config(&mut self) -> Value {
        codec::encode(self.canvas.snapshot())
    }

    /// Replace all state with a decoded template blob. Returns what had to be repaired.
    pub fn set_template_config(&mut self, config: &Value) -> Vec<RecoveredError> {
        let (store, report) = codec::decode_with_report(config);
        self.load_store(store);
        report
    }

    fn load_store(&mut self, store: FrameStateStore) {
        self.canvas.replace_store(store);
        log::debug!(
            "Template active on {} frame {}",
            self.canvas.content_type(),
            self.canvas.frame_index()
        );
    }

    pub fn save_template(&mut self, path: &Path) -> Result<()> {
        serialization::save_template(self.canvas.snapshot(), path)
    }

    pub fn open_template(&mut self, path: &Path) -> Result<Vec<RecoveredError>> {
        let (store, report) = serialization::load_template(path)?;
        self.load_store(store);
        Ok(report)
    }
}
