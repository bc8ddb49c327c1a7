// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas controller.
//!
//! The controller owns the [`FrameStateStore`] and keeps one frame of it
//! materialized as the live working set that the renderer reads and pointer
//! input edits. Every edit that completes (pointer release, property change,
//! frame or content type switch) is flushed back into the store, and the
//! outgoing frame is always flushed before another frame is activated.

use crate::error::{RecoveredError, TimelineError};
use crate::io::plugin;
use crate::models::content_type::ContentType;
use crate::models::element::{Color, Element, ElementId, ElementKind, Point, PositionPreset, Rect, Size};
use crate::models::store::FrameStateStore;
use crate::settings::EditorSettings;
use crate::util::constraints::{self, ResizeHandle};
use crate::util::geometry::{fit_zoom, CoordinateTransform};
use crate::util::layout;
use std::path::Path;

/// Zoom step used by the zoom in / zoom out commands.
pub const ZOOM_STEP: f64 = 1.25;

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: ElementId,
    /// Corner handle of the selected element, if one was hit.
    pub handle: Option<ResizeHandle>,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
enum Interaction {
    #[default]
    Idle,
    Dragging {
        id: ElementId,
        start: Point,
        original: Rect,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start: Point,
        original: Rect,
    },
}

pub struct CanvasController {
    store: FrameStateStore,
    content_type: ContentType,
    frame_index: usize,
    elements: Vec<Element>,
    content_frame: Rect,
    constrain_to_frame: bool,
    selected: Option<ElementId>,
    interaction: Interaction,
    transform: CoordinateTransform,
    snap_grid: Option<f64>,
    handle_size: f64,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(FrameStateStore::default())
    }
}

impl CanvasController {
    /// Take ownership of `store` and activate its recorded active frame.
    pub fn new(store: FrameStateStore) -> Self {
        let mut canvas = Self {
            content_type: store.active_content_type(),
            frame_index: 0,
            store,
            elements: Vec::new(),
            content_frame: Rect::default(),
            constrain_to_frame: false,
            selected: None,
            interaction: Interaction::Idle,
            transform: CoordinateTransform::default(),
            snap_grid: None,
            handle_size: 8.0,
        };
        let index = canvas.store.current_frame(canvas.content_type);
        canvas.load(canvas.content_type, index);
        canvas
    }

    pub fn with_settings(settings: &EditorSettings) -> Self {
        let mut store = FrameStateStore::new(settings.viewport_size());
        store.set_active_content_type(settings.content_type);
        let mut canvas = Self::new(store);
        canvas.apply_settings(settings);
        canvas
    }

    pub fn apply_settings(&mut self, settings: &EditorSettings) {
        self.snap_grid = settings.snap_grid();
        self.handle_size = settings.handle_size.max(1.0);
        let zoom = self.transform.zoom();
        let pan = self.transform.pan();
        self.transform = CoordinateTransform::new(settings.min_zoom, settings.max_zoom);
        self.transform.set_zoom(zoom);
        self.transform.set_pan(pan);
    }

    // --- State access ---

    /// The store as of the last flush.
    pub fn store(&self) -> &FrameStateStore {
        &self.store
    }

    /// Flush and return the store.
    pub fn snapshot(&mut self) -> &FrameStateStore {
        self.flush();
        &self.store
    }

    /// Swap in a different store (e.g. a freshly loaded template) and activate its active frame.
    ///
    /// The live working set is discarded without flushing. The current
    /// viewport is kept so the loaded frames are laid out for this view.
    pub fn replace_store(&mut self, mut store: FrameStateStore) {
        store.set_viewport(self.store.viewport());
        self.store = store;
        self.selected = None;
        self.interaction = Interaction::Idle;

        let content_type = self.store.active_content_type();
        let index = self.store.current_frame(content_type);
        self.load(content_type, index);
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Live elements of the active frame, in stacking order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn content_frame(&self) -> Rect {
        self.content_frame
    }

    pub fn constrain_to_frame(&self) -> bool {
        self.constrain_to_frame
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.as_deref().and_then(|id| self.element(id))
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut CoordinateTransform {
        &mut self.transform
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction != Interaction::Idle
    }

    // --- Frame activation ---

    /// Write the live working set back into the store at the active key.
    pub fn flush(&mut self) {
        match self.store.frame_mut(self.content_type, self.frame_index) {
            Some(frame) => {
                frame.elements = self.elements.clone();
                frame.content_frame = self.content_frame;
                frame.constrain_to_frame = self.constrain_to_frame;
            }
            None => log::debug!(
                "Nothing to flush for {} frame {}",
                self.content_type,
                self.frame_index
            ),
        }
    }

    /// Flush the active frame, then make frame `index` of `content_type` live.
    ///
    /// An index outside `0..frame_count` is logged and replaced by 0.
    pub fn activate(&mut self, content_type: ContentType, index: usize) {
        self.flush();
        self.load(content_type, index);
    }

    fn load(&mut self, content_type: ContentType, index: usize) {
        let count = self.store.frame_count(content_type);
        let index = if index < count {
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

        let frame = self.store.get_frame(content_type, index).clone();
        self.store.set_active_content_type(content_type);
        self.store.set_current_frame(content_type, index);

        self.content_type = content_type;
        self.frame_index = index;
        self.elements = frame.elements;
        self.constrain_to_frame = frame.constrain_to_frame;
        self.interaction = Interaction::Idle;

        let target = self.store.layout_frame(content_type);
        if frame.content_frame != target {
            log::debug!(
                "Relayout {} frame {} from {:?} to {:?}",
                content_type,
                index,
                frame.content_frame,
                target
            );
            constraints::relayout(&frame.content_frame, &target, &mut self.elements);
        }
        self.content_frame = target;

        if self.selected().is_some_and(|id| self.element(id).is_none()) {
            self.selected = None;
        }
        self.flush();
        log::debug!("Activated {} frame {}", content_type, index);
    }

    /// Follow a viewport size change, re-laying out the live frame proportionally.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport.is_empty() || viewport == self.store.viewport() {
            return;
        }
        self.store.set_viewport(viewport);
        let target = self.store.layout_frame(self.content_type);
        if target != self.content_frame {
            constraints::relayout(&self.content_frame, &target, &mut self.elements);
            self.content_frame = target;
            self.flush();
        }
    }

    // --- Timeline passthroughs ---

    pub fn frame_count(&self, content_type: ContentType) -> usize {
        self.store.frame_count(content_type)
    }

    /// Resize the frame list of `content_type`; returns the resulting count.
    pub fn set_frame_count(&mut self, content_type: ContentType, count: usize) -> usize {
        self.flush();
        let count = self.store.set_frame_count(content_type, count);
        self.reload_if_active(content_type);
        count
    }

    pub fn remove_frame(&mut self, content_type: ContentType, index: usize) -> Result<(), TimelineError> {
        self.flush();
        self.store.remove_frame(content_type, index)?;
        log::info!("Removed {} frame {}", content_type, index);
        self.reload_if_active(content_type);
        Ok(())
    }

    pub fn duplicate_frame(&mut self, content_type: ContentType, index: usize) -> Result<usize, TimelineError> {
        self.flush();
        let copy = self.store.duplicate_frame(content_type, index)?;
        log::info!("Duplicated {} frame {} to {}", content_type, index, copy);
        self.reload_if_active(content_type);
        Ok(copy)
    }

    /// The active slot may have moved or vanished; reload it from the store without flushing.
    fn reload_if_active(&mut self, content_type: ContentType) {
        if content_type == self.content_type {
            let index = self.store.current_frame(content_type);
            self.load(content_type, index);
        }
    }

    pub fn description(&self, content_type: ContentType, index: usize) -> Option<&str> {
        self.store.description(content_type, index)
    }

    pub fn set_description(&mut self, content_type: ContentType, index: usize, description: &str) -> bool {
        self.store.set_description(content_type, index, description)
    }

    /// Regenerate default elements for the selected frame of `content_type`.
    ///
    /// Other frames and content types are untouched.
    pub fn reset_positions(&mut self, content_type: ContentType) {
        if content_type == self.content_type {
            self.elements = content_type.default_elements(&self.content_frame);
            self.selected = None;
            self.interaction = Interaction::Idle;
            self.flush();
        } else {
            let index = self.store.current_frame(content_type);
            self.store.get_frame(content_type, index);
            if let Some(frame) = self.store.frame_mut(content_type, index) {
                frame.reset_elements(content_type);
            }
        }
        log::info!("Reset element positions for {}", content_type);
    }

    /// Drop every frame of `content_type` and start it over from one default frame.
    pub fn reset_content_type(&mut self, content_type: ContentType) {
        self.store.reset_content_type(content_type);
        if content_type == self.content_type {
            self.selected = None;
            self.load(content_type, 0);
        }
    }

    // --- Hit testing and selection ---

    /// Element under `point` (canvas coordinates).
    ///
    /// Corner handles of the selected element win over element bodies; bodies
    /// are tested topmost first.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        if let Some(selected) = self.selected_element().filter(|e| !e.is_locked()) {
            if let Some(handle) = constraints::handle_at(point, &selected.rect, self.handle_size) {
                return Some(Hit {
                    id: selected.id.clone(),
                    handle: Some(handle),
                });
            }
        }

        self.elements
            .iter()
            .rev()
            .find(|e| e.rect.contains(point))
            .map(|e| Hit {
                id: e.id.clone(),
                handle: None,
            })
    }

    /// Select the element under `point`, or clear the selection.
    pub fn select_element(&mut self, point: Point) -> Option<ElementId> {
        self.selected = self.hit_test(point).map(|hit| hit.id);
        self.selected.clone()
    }

    pub fn select_by_id(&mut self, id: Option<&str>) {
        self.selected = id.filter(|id| self.element(id).is_some()).map(str::to_string);
    }

    // --- Geometry edits ---

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Snap and confine `rect`, then store it on element `id`.
    fn place(&mut self, id: &str, rect: Rect, aspect: Option<f64>) {
        let frame = self.content_frame;
        let constrain = self.constrain_to_frame;
        let rect = match self.snap_grid {
            Some(grid) => constraints::snap_to_grid(rect, grid),
            None => rect,
        };
        let rect = match aspect {
            Some(_) => constraints::clamp_to_frame_keep_aspect(rect, &frame, constrain),
            None => constraints::clamp_to_frame(rect, &frame, constrain),
        };
        if let Some(element) = self.element_mut(id) {
            element.rect = rect;
        }
    }

    /// Move element `id` by a canvas-space delta. Locked elements do not move.
    pub fn move_element(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        let Some(element) = self.element(id).filter(|e| !e.is_locked()) else {
            return false;
        };
        let rect = element.rect.translated(dx, dy);
        let aspect = element.aspect_lock();
        self.place(id, rect, aspect);
        true
    }

    /// Drag `handle` of element `id` by a canvas-space delta. Locked elements do not resize.
    pub fn resize_element(&mut self, id: &str, handle: ResizeHandle, delta: Point) -> bool {
        let Some(original) = self.element(id).filter(|e| !e.is_locked()).map(|e| e.rect) else {
            return false;
        };
        self.resize_from(id, &original, handle, delta)
    }

    fn resize_from(&mut self, id: &str, original: &Rect, handle: ResizeHandle, delta: Point) -> bool {
        let Some(aspect) = self.element(id).map(Element::aspect_lock) else {
            return false;
        };
        let rect = constraints::resize_from_handle(original, delta, handle, aspect);
        let rect = match aspect {
            Some(_) => constraints::clamp_to_frame_keep_aspect(rect, &self.content_frame, self.constrain_to_frame),
            None => constraints::clamp_to_frame(rect, &self.content_frame, self.constrain_to_frame),
        };
        if let Some(element) = self.element_mut(id) {
            element.rect = rect;
        }
        true
    }

    // --- Pointer input (view coordinates) ---

    /// Start a gesture at `view`: select what is there and begin dragging or resizing it.
    pub fn pointer_down(&mut self, view: Point) -> Option<ElementId> {
        let point = self.transform.view_to_canvas(view);
        let hit = self.hit_test(point);
        self.selected = hit.as_ref().map(|h| h.id.clone());

        self.interaction = match hit {
            Some(hit) => match self.element(&hit.id) {
                Some(element) if !element.is_locked() => {
                    let original = element.rect;
                    match hit.handle {
                        Some(handle) => Interaction::Resizing {
                            id: hit.id,
                            handle,
                            start: point,
                            original,
                        },
                        None => Interaction::Dragging {
                            id: hit.id,
                            start: point,
                            original,
                        },
                    }
                }
                _ => Interaction::Idle,
            },
            None => Interaction::Idle,
        };
        self.selected.clone()
    }

    pub fn pointer_move(&mut self, view: Point) {
        let point = self.transform.view_to_canvas(view);
        match self.interaction.clone() {
            Interaction::Idle => {}
            Interaction::Dragging { id, start, original } => {
                let rect = original.translated(point.x - start.x, point.y - start.y);
                let aspect = self.element(&id).and_then(Element::aspect_lock);
                self.place(&id, rect, aspect);
            }
            Interaction::Resizing {
                id,
                handle,
                start,
                original,
            } => {
                let delta = Point::new(point.x - start.x, point.y - start.y);
                self.resize_from(&id, &original, handle, delta);
            }
        }
    }

    /// Finish the gesture and commit the result to the store.
    pub fn pointer_up(&mut self) {
        if self.interaction != Interaction::Idle {
            self.interaction = Interaction::Idle;
            self.flush();
        }
    }

    // --- Property edits ---

    /// Apply `edit` to element `id` and commit. Returns false if there is no such element.
    fn edit(&mut self, id: &str, edit: impl FnOnce(&mut Element, &Rect, bool)) -> bool {
        let frame = self.content_frame;
        let constrain = self.constrain_to_frame;
        let label = (self.content_type, self.frame_index);
        let Some(element) = self.element_mut(id) else {
            log::warn!("No element '{}' in {} frame {}", id, label.0, label.1);
            return false;
        };
        edit(element, &frame, constrain);
        self.flush();
        true
    }

    /// Toggle confinement for the active frame; enabling it pulls every enabled element inside.
    pub fn set_constrain_to_frame(&mut self, constrain: bool) {
        self.constrain_to_frame = constrain;
        if constrain {
            let frame = self.content_frame;
            for element in self.elements.iter_mut().filter(|e| e.enabled && !e.is_locked()) {
                element.rect = match element.aspect_lock() {
                    Some(_) => constraints::clamp_to_frame_keep_aspect(element.rect, &frame, true),
                    None => constraints::clamp_to_frame(element.rect, &frame, true),
                };
            }
        }
        self.flush();
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        self.edit(id, |element, _, _| element.enabled = enabled)
    }

    pub fn set_text_content(&mut self, id: &str, content: &str) -> bool {
        self.edit(id, |element, _, _| {
            if let Some(text) = element.as_text_mut() {
                text.content = content.to_string();
            }
        })
    }

    pub fn set_font_size(&mut self, id: &str, font_size: u32) -> bool {
        self.edit(id, |element, _, _| {
            if let Some(text) = element.as_text_mut() {
                text.font_size = font_size.max(1);
            }
        })
    }

    pub fn set_bold(&mut self, id: &str, bold: bool) -> bool {
        self.edit(id, |element, _, _| {
            if let Some(text) = element.as_text_mut() {
                text.bold = bold;
            }
        })
    }

    /// Set the color of a text element, or the fill of a PiP window.
    pub fn set_color(&mut self, id: &str, color: Color) -> bool {
        self.edit(id, |element, _, _| match &mut element.kind {
            ElementKind::Text(text) => text.color = color,
            ElementKind::Pip(pip) => pip.color = color,
        })
    }

    pub fn set_border_color(&mut self, id: &str, color: Color) -> bool {
        self.edit(id, |element, _, _| {
            if let Some(pip) = element.as_pip_mut() {
                pip.border_color = color;
            }
        })
    }

    /// Move a text element to a preset vertical slot in the content frame.
    pub fn set_position_preset(&mut self, id: &str, preset: PositionPreset) -> bool {
        self.edit(id, |element, frame, _| {
            let Some(text) = element.as_text_mut() else {
                return;
            };
            text.position_preset = preset;
            let font_size = text.font_size;
            element.rect = layout::text_rect(frame, preset, font_size);
        })
    }

    pub fn set_corner_radius(&mut self, id: &str, radius: i64) -> bool {
        self.edit(id, |element, _, _| {
            if let Some(pip) = element.as_pip_mut() {
                pip.set_corner_radius(radius);
            }
        })
    }

    pub fn set_aspect_lock(&mut self, id: &str, lock: bool) -> bool {
        self.edit(id, |element, frame, constrain| {
            if let Some(pip) = element.as_pip_mut() {
                pip.use_aspect_lock = lock;
                refit_pip(element, frame, constrain);
            }
        })
    }

    /// Lock a PiP window (re-centering it) or free it for dragging.
    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        self.edit(id, |element, frame, _| {
            if let Some(pip) = element.as_pip_mut() {
                pip.locked = locked;
                constraints::pip_layout(element, frame);
            }
        })
    }

    /// Lock a PiP window to `ratio` and re-fit it around its center.
    pub fn apply_aspect_ratio(&mut self, id: &str, ratio: f64) -> bool {
        if !(ratio.is_finite() && ratio > 0.0) {
            RecoveredError::malformed(id, "aspect_ratio", format!("{} is not a usable ratio", ratio)).logged();
            return false;
        }
        self.edit(id, |element, frame, constrain| {
            if let Some(pip) = element.as_pip_mut() {
                pip.aspect_ratio = ratio;
                pip.use_aspect_lock = true;
                refit_pip(element, frame, constrain);
            }
        })
    }

    /// Read the aspect ratio of the plugin descriptor at `path` into PiP `id`.
    ///
    /// On failure the existing ratio is left untouched and `false` is returned.
    pub fn load_plugin_aspect_ratio(&mut self, id: &str, path: &Path) -> bool {
        if self.element(id).and_then(Element::as_pip).is_none() {
            log::warn!("'{}' is not a PiP element", id);
            return false;
        }
        let Some(ratio) = plugin::load_aspect_ratio(path) else {
            return false;
        };
        let path = path.display().to_string();
        self.apply_aspect_ratio(id, ratio)
            && self.edit(id, |element, _, _| {
                if let Some(pip) = element.as_pip_mut() {
                    pip.plugin_path = Some(path);
                }
            })
    }

    // --- Zoom ---

    pub fn zoom_in(&mut self, anchor: Point) {
        self.transform.zoom_at(anchor, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, anchor: Point) {
        self.transform.zoom_at(anchor, 1.0 / ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.transform.reset();
    }

    /// Zoom so the whole viewport fits `view`.
    pub fn fit_to_view(&mut self, view: Size) {
        self.transform.reset();
        self.transform.set_zoom(fit_zoom(self.store.viewport(), view));
    }
}

/// Re-fit a PiP window to its effective aspect ratio.
///
/// Locked windows are re-centered; free windows keep their width and center.
fn refit_pip(element: &mut Element, frame: &Rect, constrain: bool) {
    if element.is_locked() {
        constraints::pip_layout(element, frame);
        return;
    }
    let Some(aspect) = element.as_pip().map(|pip| pip.effective_aspect()) else {
        return;
    };
    let width = element.rect.width;
    let rect = Rect::centered_at(element.rect.center(), width, width / aspect);
    let rect = constraints::clamp_to_frame_keep_aspect(rect, frame, constrain);
    element.rect = constraints::enforce_min_size_keep_aspect(rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::DEFAULT_PIP_ASPECT;

    fn canvas() -> CanvasController {
        let _ = env_logger::builder().is_test(true).try_init();
        CanvasController::default()
    }

    fn center_of(canvas: &CanvasController, id: &str) -> Point {
        canvas.element(id).unwrap().rect.center()
    }

    #[test]
    fn test_new_activates_first_frame() {
        let canvas = canvas();
        assert_eq!(canvas.content_type(), ContentType::Video);
        assert_eq!(canvas.frame_index(), 0);
        assert_eq!(canvas.elements().len(), 3);
        assert_eq!(canvas.store().frame(ContentType::Video, 0).unwrap().elements, canvas.elements());
    }

    #[test]
    fn test_activate_flushes_outgoing_frame() {
        let mut canvas = canvas();
        canvas.set_frame_count(ContentType::Video, 2);
        let before = canvas.element("title").unwrap().rect;

        assert!(canvas.move_element("title", 15.0, 25.0));
        canvas.activate(ContentType::Video, 1);
        assert_eq!(canvas.element("title").unwrap().rect, before);

        canvas.activate(ContentType::Video, 0);
        assert_eq!(canvas.element("title").unwrap().rect, before.translated(15.0, 25.0));
    }

    #[test]
    fn test_activate_out_of_range_clamps_to_first() {
        let mut canvas = canvas();
        canvas.set_frame_count(ContentType::Video, 3);
        canvas.activate(ContentType::Video, 2);
        canvas.activate(ContentType::Video, 7);
        assert_eq!(canvas.frame_index(), 0);
        assert_eq!(canvas.store().current_frame(ContentType::Video), 0);
    }

    #[test]
    fn test_live_edits_do_not_alias_store() {
        let mut canvas = canvas();
        canvas.move_element("title", 10.0, 0.0);
        let live = canvas.element("title").unwrap().rect;
        let stored = canvas.store().frame(ContentType::Video, 0).unwrap().element("title").unwrap().rect;
        assert_ne!(live, stored);

        canvas.flush();
        let stored = canvas.store().frame(ContentType::Video, 0).unwrap().element("title").unwrap().rect;
        assert_eq!(live, stored);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut canvas = canvas();
        let pip = canvas.element("pip").unwrap().rect;
        let title = canvas.element("title").unwrap().rect;
        // Put the title over the middle of the PiP window.
        canvas.move_element("title", pip.center().x - title.center().x, pip.center().y - title.center().y);

        let hit = canvas.hit_test(pip.center()).unwrap();
        assert_eq!(hit.id, "title");
        assert_eq!(hit.handle, None);
    }

    #[test]
    fn test_hit_test_prefers_selected_handles() {
        let mut canvas = canvas();
        let title = canvas.element("title").unwrap().rect;
        canvas.select_by_id(Some("title"));

        let hit = canvas.hit_test(Point::new(title.right(), title.bottom())).unwrap();
        assert_eq!(hit.id, "title");
        assert_eq!(hit.handle, Some(ResizeHandle::BottomRight));

        canvas.select_by_id(None);
        assert_eq!(canvas.hit_test(Point::new(title.right(), title.bottom())).unwrap().handle, None);
    }

    #[test]
    fn test_select_empty_space_clears_selection() {
        let mut canvas = canvas();
        canvas.select_by_id(Some("title"));
        assert_eq!(canvas.select_element(Point::new(-500.0, -500.0)), None);
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn test_locked_pip_ignores_move_and_resize() {
        let mut canvas = canvas();
        let pip = canvas.element("pip").unwrap().rect;
        assert!(!canvas.move_element("pip", 30.0, 30.0));
        assert!(!canvas.resize_element("pip", ResizeHandle::BottomRight, Point::new(40.0, 40.0)));
        assert_eq!(canvas.element("pip").unwrap().rect, pip);
    }

    #[test]
    fn test_locked_pip_is_centered() {
        let canvas = canvas();
        let pip = canvas.element("pip").unwrap().rect;
        let frame = canvas.content_frame();
        assert!((pip.width - frame.width * 0.75).abs() < 1e-9);
        assert!((pip.width / pip.height - DEFAULT_PIP_ASPECT).abs() < 1e-9);
        assert!((pip.center().x - frame.center().x).abs() < 1e-9);
        assert!((pip.center().y - frame.center().y).abs() < 1e-9);
    }

    #[test]
    fn test_drag_gesture_commits_on_release() {
        let mut canvas = canvas();
        let start = center_of(&canvas, "subtitle");

        assert_eq!(canvas.pointer_down(start).as_deref(), Some("subtitle"));
        canvas.pointer_move(start.offset(Point::new(12.0, -30.0)));
        assert!(canvas.is_interacting());

        let stored = canvas.store().frame(ContentType::Video, 0).unwrap().element("subtitle").unwrap().rect;
        assert_eq!(stored.center(), start);

        canvas.pointer_up();
        assert!(!canvas.is_interacting());
        let stored = canvas.store().frame(ContentType::Video, 0).unwrap().element("subtitle").unwrap().rect;
        assert!((stored.center().x - (start.x + 12.0)).abs() < 1e-9);
        assert!((stored.center().y - (start.y - 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_drag_respects_zoom() {
        let mut canvas = canvas();
        canvas.transform_mut().set_zoom(2.0);
        let start = center_of(&canvas, "title");
        let view_start = canvas.transform().canvas_to_view(start);

        canvas.pointer_down(view_start);
        canvas.pointer_move(view_start.offset(Point::new(20.0, 0.0)));
        canvas.pointer_up();

        assert!((center_of(&canvas, "title").x - (start.x + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_resize_gesture_from_handle() {
        let mut canvas = canvas();
        let title = canvas.element("title").unwrap().rect;
        canvas.select_by_id(Some("title"));

        canvas.pointer_down(Point::new(title.right(), title.bottom()));
        canvas.pointer_move(Point::new(title.right() + 10.0, title.bottom() + 6.0));
        canvas.pointer_up();

        let resized = canvas.element("title").unwrap().rect;
        assert_eq!(resized.x, title.x);
        assert_eq!(resized.y, title.y);
        assert!((resized.width - (title.width + 10.0)).abs() < 1e-9);
        assert!((resized.height - (title.height + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_unlocked_pip_resizes_with_aspect_lock() {
        let mut canvas = canvas();
        canvas.set_locked("pip", false);
        canvas.apply_aspect_ratio("pip", 1.75);

        for handle in ResizeHandle::ALL {
            assert!(canvas.resize_element("pip", handle, Point::new(-23.0, 17.0)));
            let rect = canvas.element("pip").unwrap().rect;
            assert!((rect.width / rect.height - 1.75).abs() < 0.02, "{:?}", rect);
        }
    }

    #[test]
    fn test_constrain_to_frame_confines_elements() {
        let mut canvas = canvas();
        let frame = canvas.content_frame();
        canvas.move_element("title", -frame.width, 0.0);
        assert!(canvas.element("title").unwrap().rect.x < frame.x);

        canvas.set_constrain_to_frame(true);
        let title = canvas.element("title").unwrap().rect;
        assert_eq!(title.x, frame.x);

        canvas.move_element("title", 0.0, 10_000.0);
        assert!((canvas.element("title").unwrap().rect.bottom() - frame.bottom()).abs() < 1e-9);
        assert!(canvas.store().frame(ContentType::Video, 0).unwrap().constrain_to_frame);
    }

    #[test]
    fn test_constrain_flag_is_per_frame() {
        let mut canvas = canvas();
        canvas.set_frame_count(ContentType::Video, 2);
        canvas.set_constrain_to_frame(true);
        canvas.activate(ContentType::Video, 1);
        assert!(!canvas.constrain_to_frame());
        canvas.activate(ContentType::Video, 0);
        assert!(canvas.constrain_to_frame());
    }

    #[test]
    fn test_snap_to_grid_on_move() {
        let settings = EditorSettings {
            snap_to_grid: true,
            grid_size: 10.0,
            ..EditorSettings::default()
        };
        let mut canvas = CanvasController::with_settings(&settings);
        canvas.move_element("title", 3.0, 7.0);
        let rect = canvas.element("title").unwrap().rect;
        assert_eq!(rect.x % 10.0, 0.0);
        assert_eq!(rect.y % 10.0, 0.0);
    }

    #[test]
    fn test_reset_positions_only_touches_active_frame() {
        let mut canvas = canvas();
        canvas.set_frame_count(ContentType::Video, 2);
        canvas.move_element("title", 5.0, 5.0);
        canvas.activate(ContentType::Video, 1);
        canvas.move_element("title", 9.0, 9.0);
        let moved_first = canvas.store().frame(ContentType::Video, 0).unwrap().clone();

        canvas.reset_positions(ContentType::Video);
        let defaults = ContentType::Video.default_elements(&canvas.content_frame());
        assert_eq!(canvas.elements(), defaults.as_slice());
        assert_eq!(canvas.store().frame(ContentType::Video, 0).unwrap(), &moved_first);
    }

    #[test]
    fn test_viewport_change_relayouts_live_frame() {
        let mut canvas = canvas();
        let frame = canvas.content_frame();
        let title = canvas.element("title").unwrap().rect;
        let rel_x = (title.x - frame.x) / frame.width;

        canvas.set_viewport(Size::new(1600.0, 1200.0));
        let frame = canvas.content_frame();
        let title = canvas.element("title").unwrap().rect;
        assert!(((title.x - frame.x) / frame.width - rel_x).abs() < 0.01);
        assert_eq!(canvas.store().frame(ContentType::Video, 0).unwrap().content_frame, frame);
    }

    #[test]
    fn test_inactive_frame_relayouts_on_activation() {
        let mut canvas = canvas();
        canvas.set_frame_count(ContentType::Video, 2);
        canvas.set_viewport(Size::new(1400.0, 1000.0));

        canvas.activate(ContentType::Video, 1);
        assert_eq!(canvas.content_frame(), canvas.store().layout_frame(ContentType::Video));
        let pip = canvas.element("pip").unwrap().rect;
        assert!((pip.center().x - canvas.content_frame().center().x).abs() < 1e-9);
    }

    #[test]
    fn test_position_preset_moves_text() {
        let mut canvas = canvas();
        let frame = canvas.content_frame();
        assert!(canvas.set_position_preset("title", PositionPreset::Bottom));
        let title = canvas.element("title").unwrap();
        assert_eq!(title.as_text().unwrap().position_preset, PositionPreset::Bottom);
        assert!(title.rect.center().y > frame.center().y);
    }

    #[test]
    fn test_property_edits_commit_immediately() {
        let mut canvas = canvas();
        assert!(canvas.set_text_content("title", "Opening"));
        assert!(canvas.set_color("title", Color::rgb(255, 0, 0)));
        assert!(canvas.set_corner_radius("pip", 99));
        assert!(!canvas.set_enabled("missing", false));

        let stored = canvas.store().frame(ContentType::Video, 0).unwrap();
        let title = stored.element("title").unwrap().as_text().unwrap();
        assert_eq!(title.content, "Opening");
        assert_eq!(title.color, Color::rgb(255, 0, 0));
        assert_eq!(stored.element("pip").unwrap().as_pip().unwrap().corner_radius, 50);
    }

    #[test]
    fn test_apply_aspect_ratio_refits_locked_pip() {
        let mut canvas = canvas();
        assert!(canvas.apply_aspect_ratio("pip", 1.0));
        let pip = canvas.element("pip").unwrap();
        assert!(pip.as_pip().unwrap().use_aspect_lock);
        assert!((pip.rect.width / pip.rect.height - 1.0).abs() < 1e-9);
        assert!(!canvas.apply_aspect_ratio("pip", 0.0));
        assert!(!canvas.apply_aspect_ratio("pip", f64::NAN));
    }

    #[test]
    fn test_plugin_failure_keeps_ratio() {
        let mut canvas = canvas();
        canvas.apply_aspect_ratio("pip", 1.5);
        assert!(!canvas.load_plugin_aspect_ratio("pip", Path::new("/nonexistent/plugin.adsp")));
        assert_eq!(canvas.element("pip").unwrap().as_pip().unwrap().aspect_ratio, 1.5);
    }

    #[test]
    fn test_plugin_ratio_is_applied() {
        let dir = std::env::temp_dir().join("reelframe_canvas_plugin");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("plugin.adsp");
        std::fs::write(&path, r#"{"pluginName":"p","pluginSize":[700,400]}"#).unwrap();

        let mut canvas = canvas();
        assert!(canvas.load_plugin_aspect_ratio("pip", &path));
        let pip = canvas.element("pip").unwrap().as_pip().unwrap();
        assert_eq!(pip.aspect_ratio, 1.75);
        assert_eq!(pip.plugin_path.as_deref(), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn test_duplicate_before_active_keeps_active_frame() {
        let mut canvas = canvas();
        canvas.set_frame_count(ContentType::Video, 3);
        canvas.activate(ContentType::Video, 2);
        canvas.set_text_content("title", "Third");

        canvas.duplicate_frame(ContentType::Video, 0).unwrap();
        assert_eq!(canvas.frame_index(), 3);
        assert_eq!(canvas.element("title").unwrap().as_text().unwrap().content, "Third");
    }

    #[test]
    fn test_zoom_commands() {
        let mut canvas = canvas();
        canvas.zoom_in(Point::default());
        assert!((canvas.transform().zoom() - ZOOM_STEP).abs() < 1e-9);
        canvas.zoom_out(Point::default());
        assert!((canvas.transform().zoom() - 1.0).abs() < 1e-9);

        canvas.fit_to_view(Size::new(450.0, 350.0));
        assert!(canvas.transform().zoom() < 1.0);
        canvas.reset_zoom();
        assert_eq!(canvas.transform().zoom(), 1.0);
    }
}
