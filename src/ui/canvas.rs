// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the template frame and its overlays.
//!
//! This module paints the content frame and the live elements of the
//! active frame, and turns mouse input into canvas actions. It never
//! mutates editor state itself.

use reelframe::editor::canvas::CanvasController;
use reelframe::models::element::{Color, Element, ElementKind, Point, Rect, Size};
use reelframe::util::constraints::ResizeHandle;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Widget size changed; the logical viewport should follow.
    Resize(Size),
    /// Click without a drag: select whatever is under the point.
    Click(Point),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Zoom by `factor` keeping the view point `anchor` fixed.
    Zoom { anchor: Point, factor: f64 },
    Pan(Point),
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Map a view-space rect to screen space.
fn to_screen(origin: egui::Pos2, rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

fn to_view(origin: egui::Pos2, pos: egui::Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

/// Display the canvas and report the interaction that happened this frame.
pub fn show(ui: &mut egui::Ui, canvas: &CanvasController) -> CanvasAction {
    let mut action = CanvasAction::None;

    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let origin = response.rect.min;
    painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(40));

    let widget_size = Size::new(response.rect.width() as f64, response.rect.height() as f64);
    if (widget_size.width - canvas.store().viewport().width).abs() >= 1.0
        || (widget_size.height - canvas.store().viewport().height).abs() >= 1.0
    {
        action = CanvasAction::Resize(widget_size);
    }

    let transform = canvas.transform();
    let zoom = transform.zoom() as f32;

    // Content frame
    let frame = to_screen(origin, &transform.rect_to_view(&canvas.content_frame()));
    painter.rect_filled(frame, 0.0, egui::Color32::from_gray(15));
    let frame_stroke = if canvas.constrain_to_frame() {
        egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 170, 0))
    } else {
        egui::Stroke::new(1.0, egui::Color32::from_gray(120))
    };
    painter.rect_stroke(frame, 0.0, frame_stroke);

    for element in canvas.elements() {
        let rect = to_screen(origin, &transform.rect_to_view(&element.rect));
        draw_element(&painter, element, rect, zoom);
    }

    if let Some(selected) = canvas.selected_element() {
        let rect = to_screen(origin, &transform.rect_to_view(&selected.rect));
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.5, egui::Color32::from_rgb(0, 200, 255)));
        if !selected.is_locked() {
            let size = (canvas.handle_size() as f32 * zoom).max(6.0);
            for handle in ResizeHandle::ALL {
                let corner = handle.corner_of(&transform.rect_to_view(&selected.rect));
                let center = origin + egui::vec2(corner.x as f32, corner.y as f32);
                let handle_rect = egui::Rect::from_center_size(center, egui::vec2(size, size));
                painter.rect(
                    handle_rect,
                    0.0,
                    egui::Color32::WHITE,
                    egui::Stroke::new(1.0, egui::Color32::BLACK),
                );
            }
        }
    }

    // Mouse interaction
    let middle_drag = ui.input(|i| i.pointer.middle_down());
    if response.drag_started() && !middle_drag {
        if let Some(pos) = response.interact_pointer_pos() {
            action = CanvasAction::PointerDown(to_view(origin, pos));
        }
    } else if response.dragged() {
        if middle_drag {
            let delta = response.drag_delta();
            action = CanvasAction::Pan(Point::new(delta.x as f64, delta.y as f64));
        } else if let Some(pos) = response.interact_pointer_pos() {
            action = CanvasAction::PointerMove(to_view(origin, pos));
        }
    } else if response.drag_stopped() {
        action = CanvasAction::PointerUp;
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            action = CanvasAction::Click(to_view(origin, pos));
        }
    }

    if let Some(hover) = response.hover_pos() {
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if (zoom_delta - 1.0).abs() > f32::EPSILON {
            action = CanvasAction::Zoom {
                anchor: to_view(origin, hover),
                factor: zoom_delta as f64,
            };
        }
    }

    action
}

/// Draw one element into its screen rect.
fn draw_element(painter: &egui::Painter, element: &Element, rect: egui::Rect, zoom: f32) {
    let fade = if element.enabled { 1.0 } else { 0.3 };

    match &element.kind {
        ElementKind::Pip(pip) => {
            let rounding = pip.corner_radius as f32 * zoom;
            painter.rect(
                rect,
                rounding,
                to_color32(pip.color).gamma_multiply(fade),
                egui::Stroke::new(pip.border_width as f32 * zoom, to_color32(pip.border_color).gamma_multiply(fade)),
            );
            let label = if pip.locked { "PiP (locked)" } else { "PiP" };
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(12.0 * zoom.max(0.5)),
                egui::Color32::WHITE.gamma_multiply(fade),
            );
        }
        ElementKind::Text(text) => {
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::from_gray(90).gamma_multiply(fade)),
            );
            let font = egui::FontId::proportional((text.font_size as f32 * zoom).max(4.0));
            let color = to_color32(text.color).gamma_multiply(fade);
            painter.text(rect.center(), egui::Align2::CENTER_CENTER, &text.content, font.clone(), color);
            if text.bold {
                painter.text(
                    rect.center() + egui::vec2(0.6, 0.0),
                    egui::Align2::CENTER_CENTER,
                    &text.content,
                    font,
                    color,
                );
            }
        }
    }
}
