// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor settings.
//!
//! Settings are optional: every field has a default, and a settings file
//! (JSON or YAML, chosen by extension) only needs the fields it changes.
//! The file is located through the `REELFRAME_SETTINGS` environment variable.

use crate::models::content_type::ContentType;
use crate::models::element::Size;
use crate::util::geometry::{MAX_ZOOM, MIN_ZOOM};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming the settings file.
pub const SETTINGS_ENV: &str = "REELFRAME_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Content type shown when the editor opens.
    pub content_type: ContentType,
    /// Logical viewport used before the window reports its size.
    pub viewport: [f64; 2],
    pub snap_to_grid: bool,
    pub grid_size: f64,
    /// Side length of the square corner handles, in canvas units.
    pub handle_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            content_type: ContentType::Video,
            viewport: [900.0, 700.0],
            snap_to_grid: false,
            grid_size: 10.0,
            handle_size: 8.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl EditorSettings {
    /// Load settings from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid YAML settings in {}", path.display()))?,
            _ => serde_json::from_str(&contents)
                .with_context(|| format!("Invalid JSON settings in {}", path.display()))?,
        };
        Ok(settings)
    }

    /// Settings from `$REELFRAME_SETTINGS`, or defaults when unset or unreadable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_ENV) else {
            return Self::default();
        };

        match Self::load(Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Path::new(&path).display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn viewport_size(&self) -> Size {
        Size::new(self.viewport[0], self.viewport[1])
    }

    /// Grid spacing to snap to, if snapping is enabled.
    pub fn snap_grid(&self) -> Option<f64> {
        (self.snap_to_grid && self.grid_size > 0.0).then_some(self.grid_size)
    }
}
