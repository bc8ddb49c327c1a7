// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reelframe - per-frame overlay template editor.
//!
//! The library holds the template state engine: the frame state store,
//! the canvas and timeline controllers that edit it, the constraint engine
//! and the template blob codec. The `reelframe` binary puts an egui front
//! end on top of it.

pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod settings;
pub mod util;

pub use editor::TemplateEditor;
pub use error::{RecoveredError, TimelineError};
pub use models::content_type::ContentType;
pub use models::store::FrameStateStore;
pub use settings::EditorSettings;
