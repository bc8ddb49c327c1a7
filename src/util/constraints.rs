// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Element constraint engine.
//!
//! Pure functions applied to element rectangles after every interaction:
//! confinement to the content frame, corner resizing with an optional
//! aspect lock, grid snapping, and proportional relayout when the content
//! frame itself moves or changes size.

use super::geometry::{from_relative, to_relative};
use super::layout;
use crate::error::RecoveredError;
use crate::models::element::{Element, ElementKind, Point, Rect};

/// Smallest width and height an element may be resized to.
pub const MIN_SIZE: f64 = 20.0;

/// Corner handle being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// Position of this corner on `rect`.
    pub fn corner_of(self, rect: &Rect) -> Point {
        match self {
            Self::TopLeft => Point::new(rect.x, rect.y),
            Self::TopRight => Point::new(rect.right(), rect.y),
            Self::BottomLeft => Point::new(rect.x, rect.bottom()),
            Self::BottomRight => Point::new(rect.right(), rect.bottom()),
        }
    }

    /// +1 when the corner moves away from the anchor along positive x / y.
    fn direction(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Grow `rect` to at least `MIN_SIZE` in both dimensions, keeping its origin.
pub fn enforce_min_size(rect: Rect) -> Rect {
    Rect::new(rect.x, rect.y, rect.width.max(MIN_SIZE), rect.height.max(MIN_SIZE))
}

/// Scale a positive-sized `rect` up uniformly until both sides reach `MIN_SIZE`, keeping its origin.
pub fn enforce_min_size_keep_aspect(rect: Rect) -> Rect {
    let grow = (MIN_SIZE / rect.width).max(MIN_SIZE / rect.height).max(1.0);
    Rect::new(rect.x, rect.y, rect.width * grow, rect.height * grow)
}

/// Confine `rect` to `frame` when `constrain` is set; a no-op otherwise.
///
/// Oversized rects are first shrunk to the frame size, then translated inside.
pub fn clamp_to_frame(rect: Rect, frame: &Rect, constrain: bool) -> Rect {
    if !constrain {
        return rect;
    }
    let width = rect.width.min(frame.width);
    let height = rect.height.min(frame.height);
    let x = rect.x.max(frame.x).min(frame.right() - width);
    let y = rect.y.max(frame.y).min(frame.bottom() - height);
    Rect::new(x, y, width, height)
}

/// Like [`clamp_to_frame`], but shrinks uniformly so the width/height ratio survives.
pub fn clamp_to_frame_keep_aspect(rect: Rect, frame: &Rect, constrain: bool) -> Rect {
    if !constrain {
        return rect;
    }
    let scale = (frame.width / rect.width).min(frame.height / rect.height).min(1.0);
    let scaled = Rect::new(rect.x, rect.y, rect.width * scale, rect.height * scale);
    clamp_to_frame(scaled, frame, true)
}

/// Apply `delta` to the dragged corner of `original`, keeping the opposite corner fixed.
///
/// With `aspect_lock` the dominant axis of the drag drives the other
/// dimension. Sizes below `MIN_SIZE` are clamped up.
pub fn resize_from_handle(original: &Rect, delta: Point, handle: ResizeHandle, aspect_lock: Option<f64>) -> Rect {
    let anchor = handle.opposite().corner_of(original);
    let dragged = handle.corner_of(original).offset(delta);
    let (sx, sy) = handle.direction();

    let sized = enforce_min_size(Rect::new(0.0, 0.0, (dragged.x - anchor.x) * sx, (dragged.y - anchor.y) * sy));
    let size = match aspect_lock.filter(|r| r.is_finite() && *r > 0.0) {
        Some(ratio) => {
            let width_change = delta.x.abs() / original.width.max(1.0);
            let height_change = delta.y.abs() / original.height.max(1.0);
            let locked = if width_change >= height_change {
                Rect::new(0.0, 0.0, sized.width, sized.width / ratio)
            } else {
                Rect::new(0.0, 0.0, sized.height * ratio, sized.height)
            };
            enforce_min_size_keep_aspect(locked).size()
        }
        None => sized.size(),
    };

    let x = if sx > 0.0 { anchor.x } else { anchor.x - size.width };
    let y = if sy > 0.0 { anchor.y } else { anchor.y - size.height };
    Rect::new(x, y, size.width, size.height)
}

/// Snap the position of `rect` to a `grid`-sized lattice; `grid <= 0` disables snapping.
pub fn snap_to_grid(rect: Rect, grid: f64) -> Rect {
    if grid <= 0.0 || !grid.is_finite() {
        return rect;
    }
    Rect::new(
        (rect.x / grid).round() * grid,
        (rect.y / grid).round() * grid,
        rect.width,
        rect.height,
    )
}

/// Which corner handle of `rect` (if any) lies under `point`.
pub fn handle_at(point: Point, rect: &Rect, handle_size: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let corner = handle.corner_of(rect);
        Rect::centered_at(corner, handle_size, handle_size).contains(point)
    })
}

/// Centered layout of a locked PiP window inside `frame`.
pub fn pip_layout(element: &mut Element, frame: &Rect) {
    if let ElementKind::Pip(pip) = &element.kind {
        if pip.locked {
            element.rect = layout::pip_rect(frame, pip.effective_aspect());
        }
    }
}

/// Re-express every element rect as fractions of `old_frame` and apply them to `new_frame`.
///
/// Locked PiP windows are re-centered instead. A degenerate old frame leaves
/// free elements where they are.
pub fn relayout(old_frame: &Rect, new_frame: &Rect, elements: &mut [Element]) {
    let proportional = old_frame.is_valid();
    if !proportional {
        RecoveredError::malformed("relayout", "content_frame", format!("degenerate frame {:?}", old_frame)).logged();
    }

    for element in elements.iter_mut() {
        if element.is_locked() {
            pip_layout(element, new_frame);
        } else if proportional {
            let relative = to_relative(&element.rect, old_frame);
            element.rect = from_relative(&relative, new_frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::{PipStyle, TextStyle};

    fn frame() -> Rect {
        Rect::new(100.0, 100.0, 400.0, 600.0)
    }

    #[test]
    fn test_clamp_is_noop_when_unconstrained() {
        let rect = Rect::new(-50.0, 900.0, 100.0, 50.0);
        assert_eq!(clamp_to_frame(rect, &frame(), false), rect);
    }

    #[test]
    fn test_clamp_translates_inside() {
        let clamped = clamp_to_frame(Rect::new(450.0, 50.0, 100.0, 50.0), &frame(), true);
        assert_eq!(clamped, Rect::new(400.0, 100.0, 100.0, 50.0));
    }

    #[test]
    fn test_clamp_shrinks_oversized() {
        let clamped = clamp_to_frame(Rect::new(0.0, 0.0, 900.0, 50.0), &frame(), true);
        assert_eq!(clamped, Rect::new(100.0, 100.0, 400.0, 50.0));
    }

    #[test]
    fn test_clamp_keep_aspect() {
        let clamped = clamp_to_frame_keep_aspect(Rect::new(0.0, 0.0, 800.0, 450.0), &frame(), true);
        assert!((clamped.width - 400.0).abs() < 1e-9);
        assert!((clamped.width / clamped.height - 800.0 / 450.0).abs() < 1e-9);
        assert!(clamped.x >= 100.0 && clamped.y >= 100.0);
    }

    #[test]
    fn test_resize_keeps_opposite_corner() {
        let original = Rect::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_from_handle(&original, Point::new(-30.0, -20.0), ResizeHandle::TopLeft, None);
        assert_eq!(resized, Rect::new(70.0, 80.0, 230.0, 120.0));
        assert_eq!(resized.right(), original.right());
        assert_eq!(resized.bottom(), original.bottom());
    }

    #[test]
    fn test_resize_clamps_minimum() {
        let original = Rect::new(0.0, 0.0, 100.0, 100.0);
        let resized = resize_from_handle(&original, Point::new(-150.0, -150.0), ResizeHandle::BottomRight, None);
        assert_eq!(resized, Rect::new(0.0, 0.0, MIN_SIZE, MIN_SIZE));
    }

    #[test]
    fn test_enforce_min_size() {
        let rect = Rect::new(5.0, 6.0, 8.0, 40.0);
        assert_eq!(enforce_min_size(rect), Rect::new(5.0, 6.0, MIN_SIZE, 40.0));

        let grown = enforce_min_size_keep_aspect(Rect::new(5.0, 6.0, 16.0, 8.0));
        assert_eq!(grown, Rect::new(5.0, 6.0, 40.0, MIN_SIZE));
        let big = Rect::new(0.0, 0.0, 300.0, 200.0);
        assert_eq!(enforce_min_size_keep_aspect(big), big);
    }

    #[test]
    fn test_resize_with_aspect_lock_from_every_corner() {
        let ratio = 16.0 / 9.0;
        let original = Rect::new(200.0, 200.0, 320.0, 180.0);
        let deltas = [
            Point::new(40.0, 5.0),
            Point::new(-25.0, 60.0),
            Point::new(-300.0, -290.0),
            Point::new(13.0, -7.0),
        ];

        for handle in ResizeHandle::ALL {
            for delta in deltas {
                let resized = resize_from_handle(&original, delta, handle, Some(ratio));
                assert!(
                    (resized.width / resized.height - ratio).abs() < 0.02,
                    "{:?} {:?} -> {:?}",
                    handle,
                    delta,
                    resized
                );
                assert!(resized.width >= MIN_SIZE && resized.height >= MIN_SIZE);

                let anchor = handle.opposite();
                let before = anchor.corner_of(&original);
                let after = anchor.corner_of(&resized);
                assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_snap_to_grid() {
        let snapped = snap_to_grid(Rect::new(14.0, 26.0, 33.0, 33.0), 10.0);
        assert_eq!(snapped, Rect::new(10.0, 30.0, 33.0, 33.0));
        let rect = Rect::new(14.0, 26.0, 33.0, 33.0);
        assert_eq!(snap_to_grid(rect, 0.0), rect);
    }

    #[test]
    fn test_handle_at_corners() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(handle_at(Point::new(102.0, 98.0), &rect, 8.0), Some(ResizeHandle::TopLeft));
        assert_eq!(handle_at(Point::new(300.0, 200.0), &rect, 8.0), Some(ResizeHandle::BottomRight));
        assert_eq!(handle_at(Point::new(200.0, 150.0), &rect, 8.0), None);
    }

    #[test]
    fn test_relayout_preserves_relative_position() {
        let old = Rect::new(100.0, 50.0, 300.0, 533.0);
        let mut elements = vec![
            Element::text("title", Rect::new(130.0, 90.0, 240.0, 48.0), TextStyle::default()),
            Element::text("free", Rect::new(20.0, 700.0, 60.0, 30.0), TextStyle::default()),
        ];
        let before: Vec<Rect> = elements.iter().map(|e| to_relative(&e.rect, &old)).collect();

        let frames = [
            Rect::new(10.0, 10.0, 450.0, 800.0),
            Rect::new(300.0, 20.0, 123.0, 219.0),
            Rect::new(0.0, 0.0, 1080.0, 1920.0),
        ];
        let mut current = old;
        for next in frames {
            relayout(&current, &next, &mut elements);
            current = next;
        }

        for (element, rel) in elements.iter().zip(before) {
            let now = to_relative(&element.rect, &current);
            assert!((now.x - rel.x).abs() < 0.01);
            assert!((now.y - rel.y).abs() < 0.01);
            assert!((now.width - rel.width).abs() < 0.01);
        }
    }

    #[test]
    fn test_relayout_recenters_locked_pip() {
        let old = Rect::new(0.0, 0.0, 300.0, 533.0);
        let new = Rect::new(50.0, 40.0, 600.0, 1066.0);
        let mut elements = vec![Element::pip("pip", Rect::new(5.0, 5.0, 30.0, 30.0), PipStyle::default())];

        relayout(&old, &new, &mut elements);
        let pip = elements[0].rect;
        assert!((pip.width - 450.0).abs() < 1e-9);
        assert!((pip.width / pip.height - 16.0 / 9.0).abs() < 1e-9);
        assert!((pip.center().x - new.center().x).abs() < 1e-9);
    }

    #[test]
    fn test_relayout_from_degenerate_frame_keeps_rects() {
        let rect = Rect::new(10.0, 10.0, 50.0, 50.0);
        let mut elements = vec![Element::text("t", rect, TextStyle::default())];
        relayout(&Rect::default(), &frame(), &mut elements);
        assert_eq!(elements[0].rect, rect);
    }
}
