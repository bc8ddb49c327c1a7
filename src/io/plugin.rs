// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plugin descriptor (`.adsp`) reading.
//!
//! A descriptor is a small JSON document; the editor only cares about the
//! plugin's pixel size, which becomes the PiP aspect ratio.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdspDescriptor {
    #[serde(default)]
    plugin_name: String,
    #[serde(default)]
    plugin_title: String,
    #[serde(default)]
    plugin_version: String,
    plugin_size: Option<[f64; 2]>,
}

/// Metadata read from a plugin descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginInfo {
    pub name: String,
    pub title: String,
    pub version: String,
    pub width: f64,
    pub height: f64,
}

impl PluginInfo {
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Read and validate a plugin descriptor.
pub fn load_plugin_info(path: &Path) -> Result<PluginInfo> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plugin descriptor {}", path.display()))?;
    let descriptor: AdspDescriptor = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid plugin descriptor {}", path.display()))?;

    let Some([width, height]) = descriptor.plugin_size else {
        bail!("{} has no pluginSize", path.display());
    };
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        bail!("{} has an unusable pluginSize {}x{}", path.display(), width, height);
    }

    Ok(PluginInfo {
        name: descriptor.plugin_name,
        title: descriptor.plugin_title,
        version: descriptor.plugin_version,
        width,
        height,
    })
}

/// Aspect ratio (width / height) of the plugin at `path`, or `None` if it cannot be read.
pub fn load_aspect_ratio(path: &Path) -> Option<f64> {
    match load_plugin_info(path) {
        Ok(info) => {
            log::info!(
                "Plugin '{}' {} is {}x{}",
                info.title,
                info.version,
                info.width,
                info.height
            );
            Some(info.aspect_ratio())
        }
        Err(e) => {
            log::warn!("Could not load plugin aspect ratio: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_descriptor(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("reelframe_plugin_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reads_aspect_ratio() {
        let path = write_descriptor(
            "wide.adsp",
            r#"{"pluginName":"wide","pluginTitle":"Wide","pluginVersion":"1.2","pluginSize":[700,400]}"#,
        );
        let info = load_plugin_info(&path).unwrap();
        assert_eq!(info.title, "Wide");
        assert_eq!(load_aspect_ratio(&path), Some(1.75));
    }

    #[test]
    fn test_failures_return_none() {
        let garbage = write_descriptor("garbage.adsp", "not json");
        let zero = write_descriptor("zero.adsp", r#"{"pluginSize":[700,0]}"#);
        let missing = write_descriptor("nosize.adsp", r#"{"pluginName":"x"}"#);

        assert_eq!(load_aspect_ratio(&garbage), None);
        assert_eq!(load_aspect_ratio(&zero), None);
        assert_eq!(load_aspect_ratio(&missing), None);
        assert_eq!(load_aspect_ratio(Path::new("/nonexistent/plugin.adsp")), None);
    }
}
