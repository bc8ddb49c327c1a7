// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the view/canvas coordinate transform (pan + zoom)
//! and conversions between absolute rectangles and rectangles expressed as
//! fractions of a content frame.

use crate::models::element::{Point, Rect, Size};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Maps between view (widget) coordinates and logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pan: Point,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM)
    }
}

impl CoordinateTransform {
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        let min_zoom = min_zoom.max(f64::EPSILON);
        Self {
            pan: Point::default(),
            zoom: 1.0,
            min_zoom,
            max_zoom: max_zoom.max(min_zoom),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Set the zoom factor, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan.offset(delta);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }

    pub fn view_to_canvas(&self, view: Point) -> Point {
        Point::new((view.x - self.pan.x) / self.zoom, (view.y - self.pan.y) / self.zoom)
    }

    pub fn canvas_to_view(&self, canvas: Point) -> Point {
        Point::new(canvas.x * self.zoom + self.pan.x, canvas.y * self.zoom + self.pan.y)
    }

    pub fn rect_to_view(&self, rect: &Rect) -> Rect {
        let origin = self.canvas_to_view(Point::new(rect.x, rect.y));
        Rect::new(origin.x, origin.y, rect.width * self.zoom, rect.height * self.zoom)
    }

    /// Multiply the zoom by `factor`, keeping the canvas point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let old_zoom = self.zoom;
        self.set_zoom(old_zoom * factor);
        let actual = self.zoom / old_zoom;
        if (actual - 1.0).abs() < 1e-3 {
            self.zoom = old_zoom;
            return;
        }

        self.pan = Point::new(
            anchor.x - (anchor.x - self.pan.x) * actual,
            anchor.y - (anchor.y - self.pan.y) * actual,
        );
    }
}

/// Zoom that fits `canvas` inside `view` with padding, never above 100%.
pub fn fit_zoom(canvas: Size, view: Size) -> f64 {
    const PADDING: f64 = 20.0;
    if canvas.is_empty() {
        return 1.0;
    }
    let zoom_w = (view.width - 2.0 * PADDING) / canvas.width;
    let zoom_h = (view.height - 2.0 * PADDING) / canvas.height;
    zoom_w.min(zoom_h).clamp(MIN_ZOOM, 1.0)
}

/// Express `rect` as fractions of `frame` (0.0 - 1.0 when inside it).
pub fn to_relative(rect: &Rect, frame: &Rect) -> Rect {
    Rect::new(
        (rect.x - frame.x) / frame.width,
        (rect.y - frame.y) / frame.height,
        rect.width / frame.width,
        rect.height / frame.height,
    )
}

/// Convert a fractional rect back to absolute coordinates inside `frame`.
pub fn from_relative(relative: &Rect, frame: &Rect) -> Rect {
    Rect::new(
        frame.x + relative.x * frame.width,
        frame.y + relative.y * frame.height,
        relative.width * frame.width,
        relative.height * frame.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_canvas_roundtrip() {
        let mut transform = CoordinateTransform::default();
        transform.set_zoom(2.0);
        transform.set_pan(Point::new(30.0, -15.0));

        let view = Point::new(250.0, 120.0);
        let canvas = transform.view_to_canvas(view);
        let back = transform.canvas_to_view(canvas);

        assert!((back.x - view.x).abs() < 0.0001);
        assert!((back.y - view.y).abs() < 0.0001);
        assert!((canvas.x - 110.0).abs() < 0.0001);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut transform = CoordinateTransform::default();
        transform.set_zoom(50.0);
        assert_eq!(transform.zoom(), MAX_ZOOM);
        transform.set_zoom(0.0);
        assert_eq!(transform.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut transform = CoordinateTransform::default();
        transform.set_pan(Point::new(10.0, 20.0));
        let anchor = Point::new(200.0, 150.0);
        let before = transform.view_to_canvas(anchor);

        transform.zoom_at(anchor, 1.5);
        let after = transform.view_to_canvas(anchor);

        assert!((transform.zoom() - 1.5).abs() < 1e-9);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_zoom_never_magnifies() {
        assert_eq!(fit_zoom(Size::new(100.0, 100.0), Size::new(1000.0, 1000.0)), 1.0);
        let zoom = fit_zoom(Size::new(1080.0, 1920.0), Size::new(800.0, 600.0));
        assert!((zoom - 560.0 / 1920.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_roundtrip() {
        let frame = Rect::new(50.0, 40.0, 400.0, 800.0);
        let rect = Rect::new(150.0, 240.0, 100.0, 80.0);

        let relative = to_relative(&rect, &frame);
        assert_eq!(relative, Rect::new(0.25, 0.25, 0.25, 0.1));

        let back = from_relative(&relative, &frame);
        assert!((back.x - rect.x).abs() < 1e-9);
        assert!((back.height - rect.height).abs() < 1e-9);
    }
}
