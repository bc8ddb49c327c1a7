// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template blob codec.
//!
//! Converts a [`FrameStateStore`] to and from a `serde_json::Value` tree.
//! The writer always places rectangles and colors under named fields
//! (`rect`, `content_frame`, `color`, `border_color`) so the reader never
//! has to guess what a 4-number array means. Older blobs are still accepted:
//! a `canvas_config` wrapper, `frame_data`/`frame_description` keys,
//! `{x,y,width,height}` and `{r,g,b,a}` objects, hex colors and the legacy
//! element keys are all understood.
//!
//! Decoding never fails. Anything missing or garbled is replaced by a
//! default and reported as a [`RecoveredError`].

use crate::error::RecoveredError;
use crate::models::content_type::ContentType;
use crate::models::element::{Color, Element, ElementKind, PipStyle, PositionPreset, Rect, Size, TextStyle};
use crate::models::frame::Frame;
use crate::models::store::{ContentState, FrameStateStore, DEFAULT_VIEWPORT};
use crate::util::constraints::{self, MIN_SIZE};
use serde_json::{json, Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub const FORMAT_VERSION: &str = "1.0";

/// Largest coordinate a schema-less 4-array may hold and still be read as a rectangle.
const PLAUSIBLE_PIXEL_RANGE: f64 = 16384.0;

/// Whole numbers are written as integers.
fn number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn rect_value(rect: &Rect) -> Value {
    Value::Array(rect.to_array().iter().map(|v| number(*v)).collect())
}

fn color_value(color: &Color) -> Value {
    json!(color.to_array())
}

// --- Encoding ---

/// Encode the whole store.
pub fn encode(store: &FrameStateStore) -> Value {
    let active = store.active_content_type();
    let current = store.current_frame(active);
    let mut root = Map::new();

    root.insert("version".into(), json!(FORMAT_VERSION));
    root.insert("content_type".into(), json!(active.as_str()));

    // Active frame at the top level for readers that only look there.
    let (constrain, elements) = match store.frame(active, current) {
        Some(frame) => (frame.constrain_to_frame, encode_elements(&frame.elements)),
        None => (false, Value::Object(Map::new())),
    };
    root.insert("constrain_to_frame".into(), json!(constrain));
    root.insert("elements".into(), elements);
    if let (true, Some(state)) = (active.has_timeline(), store.state(active)) {
        root.insert("frames".into(), encode_frames(state));
    }
    root.insert("current_frame".into(), json!(current));
    root.insert("frame_count".into(), json!(store.frame_count(active)));

    let viewport = store.viewport();
    root.insert(
        "viewport".into(),
        Value::Array(vec![number(viewport.width), number(viewport.height)]),
    );

    let mut content_types = Map::new();
    for content_type in store.content_types() {
        if let Some(state) = store.state(content_type) {
            content_types.insert(
                content_type.as_str().into(),
                json!({
                    "current_frame": state.current_frame(),
                    "frame_count": state.frames().len(),
                    "frames": encode_frames(state),
                }),
            );
        }
    }
    root.insert("content_types".into(), Value::Object(content_types));

    Value::Object(root)
}

fn encode_frames(state: &ContentState) -> Value {
    let frames: Map<String, Value> = state
        .frames()
        .iter()
        .enumerate()
        .map(|(index, frame)| (index.to_string(), encode_frame(frame)))
        .collect();
    Value::Object(frames)
}

fn encode_frame(frame: &Frame) -> Value {
    json!({
        "description": frame.description,
        "constrain_to_frame": frame.constrain_to_frame,
        "content_frame": rect_value(&frame.content_frame),
        "elements": encode_elements(&frame.elements),
    })
}

fn encode_elements(elements: &[Element]) -> Value {
    let map: Map<String, Value> = elements
        .iter()
        .enumerate()
        .map(|(z_index, element)| (element.id.clone(), encode_element(element, z_index)))
        .collect();
    Value::Object(map)
}

fn encode_element(element: &Element, z_index: usize) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), json!(element.type_name()));
    map.insert("z_index".into(), json!(z_index));
    map.insert("rect".into(), rect_value(&element.rect));
    map.insert("enabled".into(), json!(element.enabled));

    match &element.kind {
        ElementKind::Pip(pip) => {
            map.insert("use_aspect_lock".into(), json!(pip.use_aspect_lock));
            map.insert("aspect_ratio".into(), number(pip.aspect_ratio));
            map.insert("corner_radius".into(), json!(pip.corner_radius));
            map.insert("locked".into(), json!(pip.locked));
            map.insert("color".into(), color_value(&pip.color));
            map.insert("border_color".into(), color_value(&pip.border_color));
            map.insert("border_width".into(), json!(pip.border_width));
            if let Some(path) = &pip.plugin_path {
                map.insert("plugin_path".into(), json!(path));
            }
        }
        ElementKind::Text(text) => {
            map.insert("content".into(), json!(text.content));
            map.insert("font_size".into(), json!(text.font_size));
            map.insert("color".into(), color_value(&text.color));
            map.insert("position_preset".into(), json!(text.position_preset.as_str()));
            map.insert("bold".into(), json!(text.bold));
        }
    }
    Value::Object(map)
}

// --- Decoding ---

/// Result of guessing what an unlabelled 4-number array is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quad {
    Rect(Rect),
    Color(Color),
}

/// Classify a schema-less 4-number array.
///
/// Non-negative values inside a plausible pixel range are a rectangle,
/// anything else is a color. Only used for legacy input that carries no
/// field name; the writer never emits such arrays.
pub fn classify_quad(values: [f64; 4]) -> Quad {
    if values.iter().all(|v| v.is_finite() && *v >= 0.0 && *v <= PLAUSIBLE_PIXEL_RANGE) {
        Quad::Rect(Rect::from_array(values))
    } else {
        Quad::Color(color_from_channels(values))
    }
}

fn color_from_channels(values: [f64; 4]) -> Color {
    let channel = |v: f64| if v.is_finite() { v.round().clamp(0.0, 255.0) as u8 } else { 0 };
    Color::rgba(channel(values[0]), channel(values[1]), channel(values[2]), channel(values[3]))
}

fn quad(value: &Value) -> Option<[f64; 4]> {
    match value.as_array()?.as_slice() {
        [a, b, c, d] => Some([a.as_f64()?, b.as_f64()?, c.as_f64()?, d.as_f64()?]),
        _ => None,
    }
}

/// Rect/color candidates among 4-arrays stored under keys we do not know.
fn unlabelled_quads(map: &Map<String, Value>) -> (Option<Rect>, Option<Color>) {
    const KNOWN: [&str; 5] = ["rect", "content_frame", "color", "border_color", "plugin_size"];
    let mut rect = None;
    let mut color = None;
    for (key, value) in map {
        if KNOWN.contains(&key.as_str()) || key.ends_with("_color") {
            continue;
        }
        let Some(values) = quad(value) else {
            continue;
        };
        match classify_quad(values) {
            Quad::Rect(r) if rect.is_none() => rect = Some(r),
            Quad::Color(c) if color.is_none() => color = Some(c),
            _ => {}
        }
    }
    (rect, color)
}

/// Decode a template blob, discarding the recovery report.
pub fn decode(value: &Value) -> FrameStateStore {
    decode_with_report(value).0
}

/// Decode a template blob and list every value that had to be repaired.
pub fn decode_with_report(value: &Value) -> (FrameStateStore, Vec<RecoveredError>) {
    let mut decoder = Decoder::default();
    let store = decoder.decode(value);
    if !decoder.report.is_empty() {
        log::info!("Template restored with {} repaired value(s)", decoder.report.len());
    }
    (store, decoder.report)
}

/// `constrain_to_frame` of an object, directly or under its legacy `settings` section.
fn constrain_flag(map: &Map<String, Value>) -> Option<bool> {
    map.get("constrain_to_frame")
        .or_else(|| map.get("settings").and_then(|s| s.get("constrain_to_frame")))
        .and_then(Value::as_bool)
}

#[derive(Default)]
struct Decoder {
    report: Vec<RecoveredError>,
}

impl Decoder {
    fn recover(&mut self, error: RecoveredError) {
        self.report.push(error.logged());
    }

    fn malformed(&mut self, location: &str, field: &str, reason: impl Into<String>) {
        self.recover(RecoveredError::malformed(location, field, reason));
    }

    fn decode(&mut self, value: &Value) -> FrameStateStore {
        let value = match value.get("canvas_config") {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };
        let Some(root) = value.as_object() else {
            self.malformed("template", "root", "expected an object");
            return FrameStateStore::default();
        };

        let viewport = self.viewport(root.get("viewport"));
        let mut store = FrameStateStore::new(viewport);
        let active = match root.get("content_type") {
            Some(name) => self.content_type(name).unwrap_or_default(),
            None => ContentType::default(),
        };

        match root.get("content_types").and_then(Value::as_object) {
            Some(sections) => {
                for (name, section) in sections {
                    let Some(content_type) = self.content_type(&json!(name)) else {
                        continue;
                    };
                    let location = content_type.as_str().to_string();
                    let frames = self.frames(&store, content_type, section.get("frames"), false, &location);
                    let current = self.index(section.get("current_frame"), &location, "current_frame");
                    self.check_count(section.get("frame_count"), frames.len(), &location);
                    self.insert(&mut store, content_type, frames, current);
                }
            }
            None => {
                // Single content type blob: frames and the constrain flag at the top level.
                let location = active.as_str().to_string();
                let constrain = constrain_flag(root).unwrap_or(false);
                let frames_value = root.get("frames").or_else(|| root.get("frame_data"));
                let mut frames = self.frames(&store, active, frames_value, constrain, &location);
                if frames.is_empty() {
                    frames.push(self.frame(&store, active, 0, value, constrain, &location));
                }
                let current = self.index(root.get("current_frame"), &location, "current_frame");
                self.check_count(root.get("frame_count"), frames.len(), &location);
                self.insert(&mut store, active, frames, current);
            }
        }

        store.set_active_content_type(active);
        store
    }

    fn insert(&mut self, store: &mut FrameStateStore, content_type: ContentType, frames: Vec<Frame>, current: usize) {
        let count = frames.len().max(1);
        if current >= count {
            self.recover(RecoveredError::InvalidIndex {
                content_type,
                index: current,
                frame_count: count,
                fallback: 0,
            });
        }
        store.insert_content(content_type, frames, current);
    }

    fn viewport(&mut self, value: Option<&Value>) -> Size {
        let Some(value) = value else {
            return DEFAULT_VIEWPORT;
        };
        let size = match value {
            Value::Array(items) => match items.as_slice() {
                [w, h] => w.as_f64().zip(h.as_f64()).map(|(w, h)| Size::new(w, h)),
                _ => None,
            },
            Value::Object(map) => map
                .get("width")
                .and_then(Value::as_f64)
                .zip(map.get("height").and_then(Value::as_f64))
                .map(|(w, h)| Size::new(w, h)),
            _ => None,
        };
        match size.filter(|s| !s.is_empty() && s.width.is_finite() && s.height.is_finite()) {
            Some(size) => size,
            None => {
                self.malformed("template", "viewport", format!("unusable value {}", value));
                DEFAULT_VIEWPORT
            }
        }
    }

    fn content_type(&mut self, value: &Value) -> Option<ContentType> {
        let name = value.as_str().unwrap_or_default();
        match name.parse::<ContentType>() {
            Ok(content_type) => Some(content_type),
            Err(_) => {
                self.recover(RecoveredError::UnknownContentType {
                    name: name.to_string(),
                    fallback: ContentType::default(),
                });
                None
            }
        }
    }

    fn index(&mut self, value: Option<&Value>, location: &str, field: &str) -> usize {
        match value {
            None => 0,
            Some(v) => match v.as_u64() {
                Some(index) => usize::try_from(index).unwrap_or(usize::MAX),
                None => {
                    self.malformed(location, field, format!("expected a frame index, got {}", v));
                    0
                }
            },
        }
    }

    fn check_count(&mut self, value: Option<&Value>, actual: usize, location: &str) {
        if let Some(declared) = value.and_then(Value::as_u64) {
            if declared != actual as u64 {
                self.malformed(
                    location,
                    "frame_count",
                    format!("declared {} but {} frames present, using the frames", declared, actual),
                );
            }
        }
    }

    /// Decode a frame map (`{"0": frame, ...}`) or list. Gaps are filled with default frames.
    ///
    /// `constrain` is the flag for frames that do not carry their own.
    fn frames(
        &mut self,
        store: &FrameStateStore,
        content_type: ContentType,
        value: Option<&Value>,
        constrain: bool,
        location: &str,
    ) -> Vec<Frame> {
        let Some(value) = value else {
            return Vec::new();
        };

        let mut by_index: BTreeMap<usize, &Value> = BTreeMap::new();
        match value {
            Value::Object(map) => {
                for (key, frame) in map {
                    match key.trim().parse::<usize>() {
                        Ok(index) => match by_index.entry(index) {
                            Entry::Vacant(slot) => {
                                slot.insert(frame);
                            }
                            Entry::Occupied(mut slot) => {
                                // Prefer the key written as a plain index ("1" over " 1" or "01").
                                let canonical = *key == index.to_string();
                                self.malformed(
                                    location,
                                    "frames",
                                    format!(
                                        "frame key '{}' repeats index {}, {}",
                                        key,
                                        index,
                                        if canonical { "replacing the earlier entry" } else { "ignored" }
                                    ),
                                );
                                if canonical {
                                    slot.insert(frame);
                                }
                            }
                        },
                        Err(_) => self.malformed(location, "frames", format!("frame key '{}' is not an index", key)),
                    }
                }
            }
            Value::Array(items) => by_index.extend(items.iter().enumerate()),
            other => {
                self.malformed(location, "frames", format!("expected a frame map, got {}", other));
                return Vec::new();
            }
        }

        let max = content_type.max_frames();
        let dropped: Vec<usize> = by_index.keys().copied().filter(|index| *index >= max).collect();
        if !dropped.is_empty() {
            self.malformed(
                location,
                "frames",
                format!("frame indices {:?} exceed the limit of {}, dropped", dropped, max),
            );
            by_index.retain(|index, _| *index < max);
        }

        let Some(&last) = by_index.keys().next_back() else {
            return Vec::new();
        };
        (0..=last)
            .map(|index| match by_index.get(&index) {
                Some(frame) => self.frame(store, content_type, index, frame, constrain, location),
                None => {
                    self.malformed(&format!("{}.frames.{}", location, index), "frame", "missing, using defaults");
                    let mut frame = Frame::with_defaults(content_type, index, store.layout_frame(content_type));
                    frame.constrain_to_frame = constrain;
                    frame
                }
            })
            .collect()
    }

    fn frame(
        &mut self,
        store: &FrameStateStore,
        content_type: ContentType,
        index: usize,
        value: &Value,
        constrain: bool,
        location: &str,
    ) -> Frame {
        let location = format!("{}.frames.{}", location, index);
        let layout_frame = store.layout_frame(content_type);
        let Some(map) = value.as_object() else {
            self.malformed(&location, "frame", "expected an object, using defaults");
            let mut frame = Frame::with_defaults(content_type, index, layout_frame);
            frame.constrain_to_frame = constrain;
            return frame;
        };

        let content_frame = match map.get("content_frame") {
            Some(value) => self.rect_or(value, &location, "content_frame", layout_frame),
            None => layout_frame,
        };
        let constrain_to_frame = constrain_flag(map).unwrap_or(constrain);
        let description = map
            .get("description")
            .or_else(|| map.get("frame_description"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| content_type.default_description(index));

        let elements = match map.get("elements") {
            Some(elements) => self.elements(elements, &content_frame, &location),
            // Oldest blobs store the element map directly as the frame.
            None => self.elements(value, &content_frame, &location),
        };
        let elements = if elements.is_empty() {
            content_type.default_elements(&content_frame)
        } else {
            elements
        };

        Frame {
            elements,
            content_frame,
            constrain_to_frame,
            description,
        }
    }

    fn elements(&mut self, value: &Value, content_frame: &Rect, location: &str) -> Vec<Element> {
        let Some(map) = value.as_object() else {
            self.malformed(location, "elements", "expected an element map");
            return Vec::new();
        };

        let mut decoded: Vec<(usize, Element)> = map
            .iter()
            .filter(|(_, v)| v.is_object())
            .enumerate()
            .filter_map(|(position, (id, value))| {
                let element = self.element(id, value, content_frame, location)?;
                let z_index = value
                    .get("z_index")
                    .and_then(Value::as_u64)
                    .map_or(position, |z| usize::try_from(z).unwrap_or(usize::MAX));
                Some((z_index, element))
            })
            .collect();
        // Stable, so equal z_index keeps document order.
        decoded.sort_by_key(|(z_index, _)| *z_index);
        decoded.into_iter().map(|(_, element)| element).collect()
    }

    fn element(&mut self, id: &str, value: &Value, content_frame: &Rect, location: &str) -> Option<Element> {
        let map = value.as_object()?;
        let location = format!("{}.{}", location, id);

        let kind_name = map.get("type").and_then(Value::as_str);
        let is_pip = match kind_name {
            Some("pip") => true,
            Some("text") => false,
            Some(other) => {
                self.malformed(&location, "type", format!("unknown element type '{}', skipped", other));
                return None;
            }
            None if map.contains_key("content") => false,
            None if id == "pip" || map.contains_key("corner_radius") => true,
            None => {
                // Not an element (e.g. frame metadata in a legacy element map).
                return None;
            }
        };

        let (legacy_rect, legacy_color) = unlabelled_quads(map);
        let rect = match map.get("rect") {
            Some(value) => Some(self.rect(value, &location, "rect")),
            None => legacy_rect,
        };
        let rect = match rect {
            Some(rect) => rect,
            None => {
                self.malformed(&location, "rect", "missing, using fallback");
                Rect::FALLBACK
            }
        };
        let rect = self.enforce_size(id, rect);

        let enabled = map
            .get("enabled")
            .or_else(|| map.get("visible"))
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let color = match map.get("color") {
            Some(value) => Some(self.color(value, &location, "color")),
            None => legacy_color,
        };

        let kind = if is_pip {
            ElementKind::Pip(self.pip_style(map, color, &location))
        } else {
            ElementKind::Text(self.text_style(map, color, &location))
        };

        let mut element = Element {
            id: id.to_string(),
            rect,
            enabled,
            kind,
        };
        if element.is_locked() && !map.contains_key("rect") {
            constraints::pip_layout(&mut element, content_frame);
        }
        Some(element)
    }

    fn enforce_size(&mut self, id: &str, rect: Rect) -> Rect {
        if rect.width >= MIN_SIZE && rect.height >= MIN_SIZE {
            return rect;
        }
        if rect.width <= 0.0 || rect.height <= 0.0 {
            self.recover(RecoveredError::ConstraintViolation {
                element: id.to_string(),
                width: rect.width,
                height: rect.height,
            });
            return constraints::enforce_min_size(rect);
        }
        // Small but positive sizes are kept as saved.
        rect
    }

    /// Read a rectangle, substituting `fallback` (and reporting it) when unreadable.
    fn rect_or(&mut self, value: &Value, location: &str, field: &str, fallback: Rect) -> Rect {
        let rect = match value {
            Value::Array(_) => quad(value).map(Rect::from_array),
            Value::Object(map) => {
                let get = |key: &str| map.get(key).and_then(Value::as_f64);
                match (get("x"), get("y"), get("width"), get("height")) {
                    (Some(x), Some(y), Some(w), Some(h)) => Some(Rect::new(x, y, w, h)),
                    _ => None,
                }
            }
            _ => None,
        };
        match rect.filter(|r| r.to_array().iter().all(|v| v.is_finite())) {
            Some(rect) => rect,
            None => {
                self.malformed(location, field, format!("unreadable rectangle {}, using {:?}", value, fallback));
                fallback
            }
        }
    }

    fn rect(&mut self, value: &Value, location: &str, field: &str) -> Rect {
        self.rect_or(value, location, field, Rect::FALLBACK)
    }

    fn color(&mut self, value: &Value, location: &str, field: &str) -> Color {
        let color = match value {
            Value::Array(items) if items.len() == 3 => {
                let rgb: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
                rgb.map(|c| color_from_channels([c[0], c[1], c[2], 255.0]))
            }
            Value::Array(_) => quad(value).map(color_from_channels),
            Value::Object(map) => {
                let get = |key: &str| map.get(key).and_then(Value::as_f64);
                match (get("r"), get("g"), get("b")) {
                    (Some(r), Some(g), Some(b)) => Some(color_from_channels([r, g, b, get("a").unwrap_or(255.0)])),
                    _ => None,
                }
            }
            Value::String(text) => Color::from_hex(text),
            _ => None,
        };
        match color {
            Some(color) => color,
            None => {
                self.malformed(location, field, format!("unreadable color {}, using white", value));
                Color::WHITE
            }
        }
    }

    fn pip_style(&mut self, map: &Map<String, Value>, color: Option<Color>, location: &str) -> PipStyle {
        let defaults = PipStyle::default();
        let flag = |keys: &[&str], default: bool| {
            keys.iter()
                .find_map(|key| map.get(*key).and_then(Value::as_bool))
                .unwrap_or(default)
        };

        let aspect_ratio = ["aspect_ratio", "plugin_aspect_ratio"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_f64))
            .unwrap_or(defaults.aspect_ratio);
        let aspect_ratio = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            aspect_ratio
        } else {
            self.malformed(location, "aspect_ratio", format!("{} is not a usable ratio", aspect_ratio));
            defaults.aspect_ratio
        };

        let mut style = PipStyle {
            use_aspect_lock: flag(&["use_aspect_lock", "use_plugin_aspect_ratio"], defaults.use_aspect_lock),
            aspect_ratio,
            locked: flag(&["locked"], defaults.locked),
            color: color.unwrap_or(defaults.color),
            border_color: match map.get("border_color") {
                Some(value) => self.color(value, location, "border_color"),
                None => defaults.border_color,
            },
            border_width: map
                .get("border_width")
                .and_then(Value::as_u64)
                .map_or(defaults.border_width, |w| u32::try_from(w).unwrap_or(u32::MAX)),
            plugin_path: ["plugin_path", "plugin_file_path"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .filter(|path| !path.is_empty())
                .map(str::to_string),
            ..defaults
        };
        if let Some(radius) = map.get("corner_radius").and_then(Value::as_f64) {
            style.set_corner_radius(radius.round() as i64);
        }
        style
    }

    fn text_style(&mut self, map: &Map<String, Value>, color: Option<Color>, location: &str) -> TextStyle {
        let defaults = TextStyle::default();
        let font_size = map
            .get("font_size")
            .or_else(|| map.get("size"))
            .and_then(Value::as_f64)
            .filter(|size| size.is_finite() && *size >= 1.0)
            .map_or(defaults.font_size, |size| size.round().min(u32::MAX as f64) as u32);

        let position_preset = match map.get("position_preset").and_then(Value::as_str) {
            Some(name) => PositionPreset::parse(name).unwrap_or_else(|| {
                self.malformed(location, "position_preset", format!("unknown preset '{}'", name));
                defaults.position_preset
            }),
            None => defaults.position_preset,
        };

        let bold = match map.get("bold").and_then(Value::as_bool) {
            Some(bold) => bold,
            None => map.get("style").and_then(Value::as_str) == Some("bold"),
        };

        TextStyle {
            content: map
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default(),
            font_size,
            color: color.unwrap_or(defaults.color),
            position_preset,
            bold,
        }
    }
}
