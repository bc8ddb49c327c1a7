// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Content frame and preset layout.
//!
//! The content frame is the largest rectangle of the content type's aspect
//! ratio that fits the viewport (minus padding), centered. PiP windows and
//! text presets are positioned relative to it.

use crate::models::element::{PositionPreset, Rect, Size};

/// Gap kept between the viewport edge and the content frame.
pub const FRAME_PADDING: f64 = 40.0;

/// PiP width as a fraction of the content frame width.
pub const PIP_WIDTH_FRACTION: f64 = 0.75;

/// Text overlay width as a fraction of the content frame width.
pub const TEXT_WIDTH_FRACTION: f64 = 0.8;

/// Distance of top/bottom presets from the frame edge, as a fraction of height.
pub const PRESET_MARGIN_FRACTION: f64 = 0.08;

/// Compute the content frame for `viewport` at `aspect` (width / height).
pub fn content_frame_for(viewport: Size, aspect: f64) -> Rect {
    let available_w = (viewport.width - 2.0 * FRAME_PADDING).max(1.0);
    let available_h = (viewport.height - 2.0 * FRAME_PADDING).max(1.0);

    let (width, height) = if available_w / available_h > aspect {
        // Viewport is wider than the content - fit to height
        (available_h * aspect, available_h)
    } else {
        (available_w, available_w / aspect)
    };

    Rect::new(
        (viewport.width - width) / 2.0,
        (viewport.height - height) / 2.0,
        width,
        height,
    )
}

/// Centered PiP rectangle `PIP_WIDTH_FRACTION` of the frame wide.
///
/// Tall ratios are shrunk so the window never exceeds 90% of the frame height.
pub fn pip_rect(frame: &Rect, aspect: f64) -> Rect {
    let mut width = frame.width * PIP_WIDTH_FRACTION;
    let mut height = width / aspect;
    let max_height = frame.height * 0.9;
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }
    Rect::centered_at(frame.center(), width, height)
}

/// Rectangle for a text overlay placed at `preset`.
pub fn text_rect(frame: &Rect, preset: PositionPreset, font_size: u32) -> Rect {
    let width = frame.width * TEXT_WIDTH_FRACTION;
    let height = (font_size as f64 * 2.0).clamp(20.0, (frame.height * 0.3).max(20.0));
    let x = frame.x + (frame.width - width) / 2.0;
    let margin = frame.height * PRESET_MARGIN_FRACTION;
    let y = match preset {
        PositionPreset::Top => frame.y + margin,
        PositionPreset::Middle => frame.y + (frame.height - height) / 2.0,
        PositionPreset::Bottom => frame.bottom() - height - margin,
    };
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_frame_fits_height() {
        let frame = content_frame_for(Size::new(1000.0, 800.0), 9.0 / 16.0);
        assert!((frame.height - 720.0).abs() < 1e-9);
        assert!((frame.width - 405.0).abs() < 1e-9);
        assert!((frame.center().x - 500.0).abs() < 1e-9);
        assert!((frame.center().y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_landscape_frame_fits_width() {
        let frame = content_frame_for(Size::new(500.0, 1000.0), 16.0 / 9.0);
        assert!((frame.width - 420.0).abs() < 1e-9);
        assert!((frame.width / frame.height - 16.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_viewport_still_yields_positive_frame() {
        let frame = content_frame_for(Size::new(10.0, 10.0), 1.0);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_pip_rect_centered_three_quarters() {
        let frame = Rect::new(100.0, 50.0, 400.0, 700.0);
        let pip = pip_rect(&frame, 16.0 / 9.0);
        assert!((pip.width - 300.0).abs() < 1e-9);
        assert!((pip.width / pip.height - 16.0 / 9.0).abs() < 1e-9);
        assert!((pip.center().x - frame.center().x).abs() < 1e-9);
        assert!((pip.center().y - frame.center().y).abs() < 1e-9);
    }

    #[test]
    fn test_pip_rect_tall_ratio_fits_frame() {
        let frame = Rect::new(0.0, 0.0, 400.0, 400.0);
        let pip = pip_rect(&frame, 0.5);
        assert!(pip.height <= frame.height * 0.9 + 1e-9);
        assert!((pip.width / pip.height - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_text_presets_are_ordered() {
        let frame = Rect::new(0.0, 0.0, 400.0, 800.0);
        let top = text_rect(&frame, PositionPreset::Top, 24);
        let middle = text_rect(&frame, PositionPreset::Middle, 24);
        let bottom = text_rect(&frame, PositionPreset::Bottom, 24);
        assert!(top.y < middle.y && middle.y < bottom.y);
        assert!(bottom.bottom() <= frame.bottom());
        assert!((top.width - 320.0).abs() < 1e-9);
    }
}
