// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Content types and their type-specific defaults.
//!
//! A content type fixes the canvas aspect ratio, whether a frame timeline
//! applies, and the default set of elements a fresh frame starts with.
//! Defaults are built per type; nothing is ever inherited from another type.

use super::element::{Color, Element, PipStyle, PositionPreset, Rect, TextStyle};
use crate::util::layout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of frames a timeline content type may hold.
pub const MAX_TIMELINE_FRAMES: usize = 10;

/// Target social-media format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Short portrait video (9:16) with a frame timeline.
    #[default]
    Video,
    /// Square still picture (1:1), single frame.
    Picture,
    /// Landscape tutorial video (16:9) with a frame timeline.
    Tutorial,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [Self::Video, Self::Picture, Self::Tutorial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Picture => "picture",
            Self::Tutorial => "tutorial",
        }
    }

    /// Human-readable label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Video => "Short video (9:16)",
            Self::Picture => "Picture (1:1)",
            Self::Tutorial => "Tutorial (16:9)",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Picture => "Picture",
            Self::Tutorial => "Tutorial",
        }
    }

    /// Width / height of the content frame.
    pub fn aspect_ratio(&self) -> f64 {
        match self {
            Self::Video => 9.0 / 16.0,
            Self::Picture => 1.0,
            Self::Tutorial => 16.0 / 9.0,
        }
    }

    pub fn has_timeline(&self) -> bool {
        matches!(self, Self::Video | Self::Tutorial)
    }

    pub fn max_frames(&self) -> usize {
        if self.has_timeline() {
            MAX_TIMELINE_FRAMES
        } else {
            1
        }
    }

    /// Auto-generated description for frame `index` (zero-based).
    pub fn default_description(&self, index: usize) -> String {
        format!("{} frame {}", self.title(), index + 1)
    }

    /// Fresh element set for this type, laid out inside `frame`.
    pub fn default_elements(&self, frame: &Rect) -> Vec<Element> {
        let (title, subtitle, title_size) = match self {
            Self::Video => ("Video Title", "Subtitle", 28),
            Self::Picture => ("Post Title", "Post Subtitle", 24),
            Self::Tutorial => ("Tutorial Title", "Step description", 32),
        };

        let pip = PipStyle::default();
        let pip_rect = layout::pip_rect(frame, pip.effective_aspect());

        let title_style = TextStyle {
            content: title.to_string(),
            font_size: title_size,
            color: Color::WHITE,
            position_preset: PositionPreset::Top,
            bold: true,
        };
        let subtitle_style = TextStyle {
            content: subtitle.to_string(),
            font_size: 18,
            color: Color::LIGHT_GRAY,
            position_preset: PositionPreset::Bottom,
            bold: false,
        };

        vec![
            Element::pip("pip", pip_rect, pip),
            Element::text(
                "title",
                layout::text_rect(frame, PositionPreset::Top, title_style.font_size),
                title_style,
            ),
            Element::text(
                "subtitle",
                layout::text_rect(frame, PositionPreset::Bottom, subtitle_style.font_size),
                subtitle_style,
            ),
        ]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    /// Case-insensitive; accepts the older `reel`, `story` and `post` names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "reel" | "story" => Ok(Self::Video),
            "picture" | "post" => Ok(Self::Picture),
            "tutorial" => Ok(Self::Tutorial),
            other => Err(format!("unknown content type '{}'", other)),
        }
    }
}
