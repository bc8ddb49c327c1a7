// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template file serialization and deserialization.
//!
//! This module writes the template blob produced by the codec to disk as
//! pretty JSON or YAML, and reads either format back.

use super::codec;
use crate::error::RecoveredError;
use crate::models::store::FrameStateStore;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// On-disk template format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Json,
    Yaml,
}

impl TemplateFormat {
    /// Pick the format from the file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Export a template blob to YAML format.
pub fn export_yaml(blob: &Value, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(blob)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export a template blob to JSON format.
pub fn export_json(blob: &Value, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(blob)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import a template blob from YAML format.
pub fn import_yaml(path: &Path) -> Result<Value> {
    let yaml = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let blob = serde_yaml::from_str(&yaml).with_context(|| format!("Invalid YAML in {}", path.display()))?;
    Ok(blob)
}

/// Import a template blob from JSON format.
pub fn import_json(path: &Path) -> Result<Value> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let blob = serde_json::from_str(&json).with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(blob)
}

/// Encode `store` and write it to `path` in the format its extension names.
pub fn save_template(store: &FrameStateStore, path: &Path) -> Result<()> {
    let blob = codec::encode(store);
    match TemplateFormat::from_path(path) {
        TemplateFormat::Json => export_json(&blob, path)?,
        TemplateFormat::Yaml => export_yaml(&blob, path)?,
    }
    log::info!("Saved template to {}", path.display());
    Ok(())
}

/// Read and decode a template file. Repaired values are returned alongside the store.
pub fn load_template(path: &Path) -> Result<(FrameStateStore, Vec<RecoveredError>)> {
    let blob = match TemplateFormat::from_path(path) {
        TemplateFormat::Json => import_json(path)?,
        TemplateFormat::Yaml => import_yaml(path)?,
    };
    log::info!("Loaded template from {}", path.display());
    Ok(codec::decode_with_report(&blob))
}
