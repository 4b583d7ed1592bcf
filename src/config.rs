use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldcapConfig {
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Words whose top-y values differ by no more than this fraction of page
    /// height are treated as one reading row.
    pub row_tolerance: f32,

    /// Drag rectangles narrower than this fraction of the page in either
    /// axis are discarded as accidental clicks.
    pub min_drag_extent: f32,
}

impl Default for FieldcapConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 0.008,
            min_drag_extent: 0.01,
        }
    }
}

impl FieldcapConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Failed to read config file: {}", e))?;

        let config: FieldcapConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_thresholds() {
        let config = FieldcapConfig::default();
        assert_eq!(config.capture.row_tolerance, 0.008);
        assert_eq!(config.capture.min_drag_extent, 0.01);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fieldcap.toml");

        let mut config = FieldcapConfig::default();
        config.capture.min_drag_extent = 0.02;
        config.save_to_file(&path).unwrap();

        let loaded = FieldcapConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.capture.min_drag_extent, 0.02);
        assert_eq!(loaded.capture.row_tolerance, 0.008);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(FieldcapConfig::load_from_file("/nonexistent/fieldcap.toml").is_err());
    }
}
