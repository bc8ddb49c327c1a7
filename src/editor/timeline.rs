// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame timeline controller.
//!
//! The timeline drives frame selection and frame count for the active
//! content type. It keeps no state of its own: the content type, counts and
//! descriptions are read from the store through the canvas every time, so
//! the two can never disagree.

use super::canvas::CanvasController;
use crate::error::TimelineError;
use crate::models::content_type::ContentType;

/// Timeline operations over whatever content type the canvas has active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineController;

impl TimelineController {
    pub fn new() -> Self {
        Self
    }

    pub fn content_type(&self, canvas: &CanvasController) -> ContentType {
        canvas.content_type()
    }

    /// Whether the timeline strip applies to the active content type.
    pub fn is_visible(&self, canvas: &CanvasController) -> bool {
        canvas.content_type().has_timeline()
    }

    pub fn frame_count(&self, canvas: &CanvasController) -> usize {
        canvas.frame_count(canvas.content_type())
    }

    pub fn active_index(&self, canvas: &CanvasController) -> usize {
        canvas.frame_index()
    }

    /// Description of the active frame, read from the store.
    pub fn description<'a>(&self, canvas: &'a CanvasController) -> &'a str {
        self.frame_description(canvas, canvas.frame_index())
    }

    /// Description stored for frame `index`, for labelling timeline entries.
    pub fn frame_description<'a>(&self, canvas: &'a CanvasController, index: usize) -> &'a str {
        canvas.description(canvas.content_type(), index).unwrap_or_default()
    }

    /// Append a default frame. Returns its index.
    pub fn add_frame(&self, canvas: &mut CanvasController) -> Result<usize, TimelineError> {
        let content_type = canvas.content_type();
        let count = self.frame_count(canvas);
        let max = content_type.max_frames();
        if count >= max {
            log::warn!("Cannot add frame: {} already has {} frames", content_type, count);
            return Err(TimelineError::FrameLimit { content_type, max });
        }

        let count = canvas.set_frame_count(content_type, count + 1);
        log::info!("Added {} frame {}", content_type, count - 1);
        Ok(count - 1)
    }

    /// Remove frame `index`; the active index becomes `min(active, count - 1)`.
    pub fn remove_frame(&self, canvas: &mut CanvasController, index: usize) -> Result<(), TimelineError> {
        canvas.remove_frame(canvas.content_type(), index)
    }

    /// Insert a copy of frame `index` after it. Returns the copy's index.
    pub fn duplicate_frame(&self, canvas: &mut CanvasController, index: usize) -> Result<usize, TimelineError> {
        canvas.duplicate_frame(canvas.content_type(), index)
    }

    /// Set the frame count directly (clamped to the type's limits). Returns the resulting count.
    pub fn set_frame_count(&self, canvas: &mut CanvasController, count: usize) -> usize {
        canvas.set_frame_count(canvas.content_type(), count)
    }

    /// Make frame `index` active. An out-of-range index is ignored and returns false.
    pub fn select_frame(&self, canvas: &mut CanvasController, index: usize) -> bool {
        let count = self.frame_count(canvas);
        if index >= count {
            log::debug!("Ignoring selection of frame {} ({} frames)", index, count);
            return false;
        }
        canvas.activate(canvas.content_type(), index);
        true
    }

    /// Switch content type, restoring that type's own frame selection.
    pub fn set_content_type(&self, canvas: &mut CanvasController, content_type: ContentType) {
        let index = canvas.store().current_frame(content_type);
        canvas.activate(content_type, index);
        log::info!(
            "Switched to {} ({} frames, frame {} active)",
            content_type,
            self.frame_count(canvas),
            canvas.frame_index()
        );
    }

    /// Store a new description for the active frame.
    pub fn edit_description(&self, canvas: &mut CanvasController, description: &str) {
        let content_type = canvas.content_type();
        let index = canvas.frame_index();
        if !canvas.set_description(content_type, index, description) {
            log::warn!("No {} frame {} to describe", content_type, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::FrameStateStore;

    fn setup() -> (CanvasController, TimelineController) {
        let canvas = CanvasController::new(FrameStateStore::default());
        let timeline = TimelineController::new();
        (canvas, timeline)
    }

    fn assert_consistent(canvas: &CanvasController, timeline: &TimelineController) {
        let store_count = canvas
            .store()
            .state(timeline.content_type(canvas))
            .map_or(1, |state| state.frames().len());
        assert_eq!(timeline.frame_count(canvas), store_count);
    }

    #[test]
    fn test_add_frame_updates_store() {
        let (mut canvas, timeline) = setup();
        assert_eq!(timeline.add_frame(&mut canvas), Ok(1));
        assert_eq!(canvas.store().frame_count(ContentType::Video), 2);
        assert_eq!(timeline.frame_description(&canvas, 1), "Video frame 2");
        assert_eq!(timeline.active_index(&canvas), 0);
        assert_consistent(&canvas, &timeline);
    }

    #[test]
    fn test_add_frame_rejected_at_limit() {
        let (mut canvas, timeline) = setup();
        for _ in 1..10 {
            timeline.add_frame(&mut canvas).unwrap();
        }
        assert_eq!(
            timeline.add_frame(&mut canvas),
            Err(TimelineError::FrameLimit {
                content_type: ContentType::Video,
                max: 10
            })
        );
        assert_eq!(timeline.frame_count(&canvas), 10);
    }

    #[test]
    fn test_picture_has_single_frame() {
        let (mut canvas, timeline) = setup();
        timeline.set_content_type(&mut canvas, ContentType::Picture);
        assert!(!timeline.is_visible(&canvas));
        assert!(timeline.add_frame(&mut canvas).is_err());
        assert_eq!(timeline.set_frame_count(&mut canvas, 4), 1);
    }

    #[test]
    fn test_remove_frame_repoints_active() {
        let (mut canvas, timeline) = setup();
        timeline.set_frame_count(&mut canvas, 3);
        timeline.select_frame(&mut canvas, 2);

        timeline.remove_frame(&mut canvas, 2).unwrap();
        assert_eq!(timeline.active_index(&canvas), 1);
        assert_eq!(canvas.frame_index(), 1);
        assert_consistent(&canvas, &timeline);

        timeline.remove_frame(&mut canvas, 0).unwrap();
        assert_eq!(timeline.frame_count(&canvas), 1);
        assert_eq!(timeline.remove_frame(&mut canvas, 0), Err(TimelineError::LastFrame));
    }

    #[test]
    fn test_remove_frame_keeps_indices_contiguous() {
        let (mut canvas, timeline) = setup();
        timeline.set_frame_count(&mut canvas, 4);
        for i in 0..4 {
            canvas.set_description(ContentType::Video, i, &format!("d{}", i));
        }

        timeline.remove_frame(&mut canvas, 1).unwrap();
        let descriptions: Vec<&str> = (0..3).map(|i| timeline.frame_description(&canvas, i)).collect();
        assert_eq!(descriptions, ["d0", "d2", "d3"]);
    }

    #[test]
    fn test_select_out_of_range_is_noop() {
        let (mut canvas, timeline) = setup();
        timeline.set_frame_count(&mut canvas, 2);
        timeline.select_frame(&mut canvas, 1);
        assert!(!timeline.select_frame(&mut canvas, 2));
        assert_eq!(canvas.frame_index(), 1);
    }

    #[test]
    fn test_select_reads_description_from_store() {
        let (mut canvas, timeline) = setup();
        timeline.set_frame_count(&mut canvas, 2);
        canvas.set_description(ContentType::Video, 1, "Finale");

        assert!(timeline.select_frame(&mut canvas, 1));
        assert_eq!(timeline.description(&canvas), "Finale");
    }

    #[test]
    fn test_edit_description_writes_store() {
        let (mut canvas, timeline) = setup();
        timeline.edit_description(&mut canvas, "Opening");
        assert_eq!(canvas.store().description(ContentType::Video, 0), Some("Opening"));
    }

    #[test]
    fn test_content_type_switch_restores_count_and_selection() {
        let (mut canvas, timeline) = setup();
        timeline.set_frame_count(&mut canvas, 5);
        timeline.select_frame(&mut canvas, 3);

        timeline.set_content_type(&mut canvas, ContentType::Picture);
        assert_eq!(timeline.frame_count(&canvas), 1);

        timeline.set_content_type(&mut canvas, ContentType::Video);
        assert_eq!(timeline.frame_count(&canvas), 5);
        assert_eq!(timeline.active_index(&canvas), 3);
    }

    #[test]
    fn test_follows_canvas_activated_directly() {
        let (mut canvas, timeline) = setup();
        timeline.set_frame_count(&mut canvas, 3);
        canvas.set_description(ContentType::Video, 2, "Finale");

        canvas.activate(ContentType::Video, 2);
        assert_eq!(timeline.active_index(&canvas), 2);
        assert_eq!(timeline.description(&canvas), "Finale");

        canvas.activate(ContentType::Picture, 0);
        assert_eq!(timeline.content_type(&canvas), ContentType::Picture);
        assert_eq!(timeline.frame_count(&canvas), 1);
        assert!(timeline.add_frame(&mut canvas).is_err());
        assert_eq!(canvas.store().frame_count(ContentType::Video), 3);
    }

    #[test]
    fn test_duplicate_frame() {
        let (mut canvas, timeline) = setup();
        timeline.edit_description(&mut canvas, "Intro");
        assert_eq!(timeline.duplicate_frame(&mut canvas, 0), Ok(1));
        assert_eq!(timeline.frame_description(&canvas, 1), "Intro (copy)");
        assert_consistent(&canvas, &timeline);
    }

    #[test]
    fn test_count_consistency_over_mixed_operations() {
        let (mut canvas, timeline) = setup();
        let _ = timeline.add_frame(&mut canvas);
        let _ = timeline.add_frame(&mut canvas);
        assert_consistent(&canvas, &timeline);
        let _ = timeline.remove_frame(&mut canvas, 1);
        assert_consistent(&canvas, &timeline);
        timeline.set_frame_count(&mut canvas, 7);
        assert_consistent(&canvas, &timeline);
        let _ = timeline.remove_frame(&mut canvas, 9);
        assert_consistent(&canvas, &timeline);
        timeline.set_frame_count(&mut canvas, 0);
        assert_consistent(&canvas, &timeline);
        assert_eq!(timeline.frame_count(&canvas), 1);
    }
}
