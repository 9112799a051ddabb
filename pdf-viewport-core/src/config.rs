//! Viewer configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::Scale;

/// Tunables shared by the core and its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Zoom picker entries, in percent
    pub zoom_levels: Vec<u16>,
    /// Zoom used when a document is first shown
    pub default_zoom: u16,
    /// Render width used until the container has been measured
    pub fallback_width: u32,
    /// How long a toast stays on screen
    pub toast_duration_ms: u64,
    /// Rendered pages the host keeps around
    pub page_cache_limit: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_levels: vec![100, 150, 200, 250],
            default_zoom: 100,
            fallback_width: 1,
            toast_duration_ms: 5_000,
            page_cache_limit: 10,
        }
    }
}

impl ViewerConfig {
    /// Read and validate a JSON config file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zoom_levels.is_empty() {
            return Err(ConfigError::NoZoomLevels);
        }
        if self.zoom_levels.contains(&0) {
            return Err(ConfigError::ZeroZoomLevel);
        }
        if !self.zoom_levels.contains(&self.default_zoom) {
            return Err(ConfigError::DefaultZoomMissing(self.default_zoom));
        }
        if self.fallback_width == 0 {
            return Err(ConfigError::ZeroFallbackWidth);
        }
        Ok(())
    }

    /// Zoom levels in picker order. Zero entries are skipped.
    pub fn scales(&self) -> Vec<Scale> {
        self.zoom_levels
            .iter()
            .copied()
            .filter_map(Scale::from_percent)
            .collect()
    }

    pub fn default_scale(&self) -> Scale {
        Scale::from_percent(self.default_zoom).unwrap_or_default()
    }
}
