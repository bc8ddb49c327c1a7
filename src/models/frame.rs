// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! A single keyframe of element layout.

use super::content_type::ContentType;
use super::element::{Element, Rect};

/// Element layout for one (content type, frame index) slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Elements in stacking order (last is topmost).
    pub elements: Vec<Element>,
    /// Content frame the element rects were last laid out against.
    pub content_frame: Rect,
    pub constrain_to_frame: bool,
    pub description: String,
}

impl Frame {
    /// Create frame `index` of `content_type` with its default elements.
    pub fn with_defaults(content_type: ContentType, index: usize, content_frame: Rect) -> Self {
        Self {
            elements: content_type.default_elements(&content_frame),
            content_frame,
            constrain_to_frame: false,
            description: content_type.default_description(index),
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Discard the elements and regenerate the type defaults in the current content frame.
    pub fn reset_elements(&mut self, content_type: ContentType) {
        self.elements = content_type.default_elements(&self.content_frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_lookup() {
        let frame = Frame::with_defaults(ContentType::Video, 1, Rect::new(0.0, 0.0, 360.0, 640.0));
        assert_eq!(frame.description, "Video frame 2");
        assert!(!frame.constrain_to_frame);
        assert!(frame.element("title").is_some());
        assert!(frame.element("missing").is_none());
    }

    #[test]
    fn test_reset_elements_restores_defaults() {
        let mut frame = Frame::with_defaults(ContentType::Picture, 0, Rect::new(0.0, 0.0, 500.0, 500.0));
        let original = frame.elements.clone();

        frame.element_mut("title").unwrap().rect.x += 40.0;
        frame.elements.pop();
        assert_ne!(frame.elements, original);

        frame.reset_elements(ContentType::Picture);
        assert_eq!(frame.elements, original);
    }

    #[test]
    fn test_clone_is_deep() {
        let frame = Frame::with_defaults(ContentType::Video, 0, Rect::new(0.0, 0.0, 360.0, 640.0));
        let mut copy = frame.clone();
        copy.element_mut("title").unwrap().as_text_mut().unwrap().content = "Changed".into();
        assert_eq!(frame.element("title").unwrap().as_text().unwrap().content, "Video Title");
    }
}
