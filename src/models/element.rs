// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Element data structures.
//!
//! This module defines the value types (points, sizes, rectangles, colors)
//! and the overlay elements positioned on a template frame: the locked
//! picture-in-picture window and free text overlays.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable element identifier (`pip`, `title`, `subtitle`, ...).
pub type ElementId = String;

/// Default PiP aspect ratio.
pub const DEFAULT_PIP_ASPECT: f64 = 16.0 / 9.0;

/// Largest allowed PiP corner radius.
pub const MAX_CORNER_RADIUS: u8 = 50;

/// A 2D point (or delta) in logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Width and height of a viewport or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle in logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Fallback used when a persisted rect is missing or garbled.
    pub const FALLBACK: Rect = Rect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle of `width` x `height` centered on `center`.
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `point` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Both dimensions strictly positive and every component finite.
    pub fn is_valid(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite()) && self.width > 0.0 && self.height > 0.0
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const PIP_FILL: Color = Color::rgba(100, 150, 200, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Coarse vertical placement for text overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionPreset {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl PositionPreset {
    pub const ALL: [PositionPreset; 3] = [Self::Top, Self::Middle, Self::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }

    /// Parse a preset name; `center` is accepted for `middle`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "middle" | "center" | "centre" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for PositionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picture-in-picture window properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PipStyle {
    pub use_aspect_lock: bool,
    pub aspect_ratio: f64,
    pub corner_radius: u8,
    /// Locked PiP windows stay centered and ignore drag/resize.
    pub locked: bool,
    pub color: Color,
    pub border_color: Color,
    pub border_width: u32,
    /// Plugin descriptor the aspect ratio was loaded from.
    pub plugin_path: Option<String>,
}

impl Default for PipStyle {
    fn default() -> Self {
        Self {
            use_aspect_lock: false,
            aspect_ratio: DEFAULT_PIP_ASPECT,
            corner_radius: 0,
            locked: true,
            color: Color::PIP_FILL,
            border_color: Color::WHITE,
            border_width: 2,
            plugin_path: None,
        }
    }
}

impl PipStyle {
    /// Ratio the window is laid out and resized with.
    pub fn effective_aspect(&self) -> f64 {
        if self.use_aspect_lock && self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            DEFAULT_PIP_ASPECT
        }
    }

    pub fn set_corner_radius(&mut self, radius: i64) {
        self.corner_radius = radius.clamp(0, MAX_CORNER_RADIUS as i64) as u8;
    }
}

/// Text overlay properties.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub content: String,
    pub font_size: u32,
    pub color: Color,
    pub position_preset: PositionPreset,
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: 24,
            color: Color::WHITE,
            position_preset: PositionPreset::Middle,
            bold: false,
        }
    }
}

/// Variant-specific part of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Pip(PipStyle),
    Text(TextStyle),
}

/// One overlay on a template frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub rect: Rect,
    pub enabled: bool,
    pub kind: ElementKind,
}

impl Element {
    pub fn pip(id: impl Into<ElementId>, rect: Rect, style: PipStyle) -> Self {
        Self { id: id.into(), rect, enabled: true, kind: ElementKind::Pip(style) }
    }

    pub fn text(id: impl Into<ElementId>, rect: Rect, style: TextStyle) -> Self {
        Self { id: id.into(), rect, enabled: true, kind: ElementKind::Text(style) }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Pip(_) => "pip",
            ElementKind::Text(_) => "text",
        }
    }

    pub fn as_pip(&self) -> Option<&PipStyle> {
        match &self.kind {
            ElementKind::Pip(style) => Some(style),
            ElementKind::Text(_) => None,
        }
    }

    pub fn as_pip_mut(&mut self) -> Option<&mut PipStyle> {
        match &mut self.kind {
            ElementKind::Pip(style) => Some(style),
            ElementKind::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::Text(style) => Some(style),
            ElementKind::Pip(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            ElementKind::Text(style) => Some(style),
            ElementKind::Pip(_) => None,
        }
    }

    /// Locked PiP windows are positioned by layout only.
    pub fn is_locked(&self) -> bool {
        self.as_pip().is_some_and(|pip| pip.locked)
    }

    /// Aspect ratio to hold while resizing, if any.
    pub fn aspect_lock(&self) -> Option<f64> {
        self.as_pip()
            .filter(|pip| pip.use_aspect_lock)
            .map(PipStyle::effective_aspect)
    }
}
