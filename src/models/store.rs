// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame state store.
//!
//! The store owns every frame of every content type and is the only
//! authoritative copy of element configuration. Content types are
//! materialized lazily with a single default frame the first time they are
//! touched; frame indices are always contiguous (`0..frame_count`).

use super::content_type::ContentType;
use super::element::{Rect, Size};
use super::frame::Frame;
use crate::error::{RecoveredError, TimelineError};
use crate::util::layout;
use std::collections::BTreeMap;

/// Viewport assumed before the host reports a real one.
pub const DEFAULT_VIEWPORT: Size = Size { width: 900.0, height: 700.0 };

/// Frames of one content type plus its selected frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentState {
    frames: Vec<Frame>,
    current_frame: usize,
}

impl ContentState {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }
}

/// All frames, keyed by content type and frame index.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStateStore {
    states: BTreeMap<ContentType, ContentState>,
    active: ContentType,
    viewport: Size,
}

impl Default for FrameStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT)
    }
}

impl FrameStateStore {
    /// Create an empty store; `viewport` sizes the content frame of new frames.
    pub fn new(viewport: Size) -> Self {
        Self {
            states: BTreeMap::new(),
            active: ContentType::default(),
            viewport,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if !viewport.is_empty() {
            self.viewport = viewport;
        }
    }

    /// Content frame new frames of `content_type` are laid out against.
    pub fn layout_frame(&self, content_type: ContentType) -> Rect {
        layout::content_frame_for(self.viewport, content_type.aspect_ratio())
    }

    /// Content type last activated by the canvas.
    pub fn active_content_type(&self) -> ContentType {
        self.active
    }

    pub fn set_active_content_type(&mut self, content_type: ContentType) {
        self.active = content_type;
    }

    /// Content types that have been materialized, in stable order.
    pub fn content_types(&self) -> impl Iterator<Item = ContentType> + '_ {
        self.states.keys().copied()
    }

    pub fn state(&self, content_type: ContentType) -> Option<&ContentState> {
        self.states.get(&content_type)
    }

    fn new_frame(&self, content_type: ContentType, index: usize) -> Frame {
        Frame::with_defaults(content_type, index, self.layout_frame(content_type))
    }

    fn ensure(&mut self, content_type: ContentType) -> &mut ContentState {
        let layout_frame = self.layout_frame(content_type);
        self.states.entry(content_type).or_insert_with(|| {
            log::debug!("Materializing {} with default frame", content_type);
            ContentState {
                frames: vec![Frame::with_defaults(content_type, 0, layout_frame)],
                current_frame: 0,
            }
        })
    }

    /// Return frame `index`, materializing the content type if needed.
    ///
    /// An out-of-range index is logged and clamped to frame 0.
    pub fn get_frame(&mut self, content_type: ContentType, index: usize) -> &Frame {
        let state = self.ensure(content_type);
        let index = if index < state.frames.len() {
            index
        } else {
            RecoveredError::InvalidIndex {
                content_type,
                index,
                frame_count: state.frames.len(),
                fallback: 0,
            }
            .logged();
            0
        };
        &state.frames[index]
    }

    /// Read a frame without materializing anything.
    pub fn frame(&self, content_type: ContentType, index: usize) -> Option<&Frame> {
        self.states.get(&content_type)?.frames.get(index)
    }

    pub(crate) fn frame_mut(&mut self, content_type: ContentType, index: usize) -> Option<&mut Frame> {
        self.states.get_mut(&content_type)?.frames.get_mut(index)
    }

    /// Number of frames of `content_type` (a never-touched type has its one implicit frame).
    pub fn frame_count(&self, content_type: ContentType) -> usize {
        self.states
            .get(&content_type)
            .map_or(1, |state| state.frames.len())
    }

    /// Grow or shrink the frame list to `count` frames.
    ///
    /// The count is clamped to `1..=max_frames`. New frames get type defaults;
    /// frames at index `>= count` are dropped. Returns the resulting count.
    pub fn set_frame_count(&mut self, content_type: ContentType, count: usize) -> usize {
        let max = content_type.max_frames();
        let target = count.clamp(1, max);
        if target != count {
            log::warn!(
                "Frame count {} for {} out of range 1..={}, using {}",
                count,
                content_type,
                max,
                target
            );
        }

        let current = self.ensure(content_type).frames.len();
        let new_frames: Vec<Frame> = (current..target)
            .map(|index| self.new_frame(content_type, index))
            .collect();

        let state = self.ensure(content_type);
        state.frames.truncate(target);
        state.frames.extend(new_frames);
        if state.current_frame >= target {
            state.current_frame = 0;
        }

        log::debug!("{} now has {} frames", content_type, target);
        target
    }

    /// Remove frame `index`; later frames shift down one index.
    ///
    /// The selected frame becomes `min(selected, count - 1)`.
    pub fn remove_frame(&mut self, content_type: ContentType, index: usize) -> Result<(), TimelineError> {
        let state = self.ensure(content_type);
        let count = state.frames.len();
        if count <= 1 {
            return Err(TimelineError::LastFrame);
        }
        if index >= count {
            return Err(TimelineError::OutOfRange { index, count });
        }

        state.frames.remove(index);
        state.current_frame = state.current_frame.min(state.frames.len() - 1);
        Ok(())
    }

    /// Insert a deep copy of frame `index` right after it; returns the copy's index.
    ///
    /// A selected frame after `index` keeps pointing at the same frame.
    pub fn duplicate_frame(&mut self, content_type: ContentType, index: usize) -> Result<usize, TimelineError> {
        let state = self.ensure(content_type);
        let count = state.frames.len();
        if count >= content_type.max_frames() {
            return Err(TimelineError::FrameLimit {
                content_type,
                max: content_type.max_frames(),
            });
        }
        let source = state
            .frames
            .get(index)
            .ok_or(TimelineError::OutOfRange { index, count })?;

        let mut copy = source.clone();
        copy.description = format!("{} (copy)", source.description);
        state.frames.insert(index + 1, copy);
        if state.current_frame > index {
            state.current_frame += 1;
        }
        Ok(index + 1)
    }

    pub fn current_frame(&self, content_type: ContentType) -> usize {
        self.states
            .get(&content_type)
            .map_or(0, |state| state.current_frame)
    }

    /// Select frame `index`, clamping to 0 if it does not exist. Returns the selected index.
    pub fn set_current_frame(&mut self, content_type: ContentType, index: usize) -> usize {
        let state = self.ensure(content_type);
        let count = state.frames.len();
        state.current_frame = if index < count {
            index
        } else {
            RecoveredError::InvalidIndex {
                content_type,
                index,
                frame_count: count,
                fallback: 0,
            }
            .logged();
            0
        };
        state.current_frame
    }

    pub fn description(&self, content_type: ContentType, index: usize) -> Option<&str> {
        self.frame(content_type, index).map(|f| f.description.as_str())
    }

    /// Set a frame description; returns false when the frame does not exist.
    pub fn set_description(&mut self, content_type: ContentType, index: usize, description: impl Into<String>) -> bool {
        self.ensure(content_type);
        match self.frame_mut(content_type, index) {
            Some(frame) => {
                frame.description = description.into();
                true
            }
            None => false,
        }
    }

    /// Drop every frame of `content_type` and start over with one default frame.
    pub fn reset_content_type(&mut self, content_type: ContentType) {
        self.states.remove(&content_type);
        self.ensure(content_type);
        log::info!("Reset {} to a single default frame", content_type);
    }

    /// Replace a content type's frames wholesale (used when restoring a template).
    pub(crate) fn insert_content(&mut self, content_type: ContentType, mut frames: Vec<Frame>, current_frame: usize) {
        frames.truncate(content_type.max_frames());
        if frames.is_empty() {
            frames.push(self.new_frame(content_type, 0));
        }
        let current_frame = if current_frame < frames.len() { current_frame } else { 0 };
        self.states.insert(content_type, ContentState { frames, current_frame });
    }
}
