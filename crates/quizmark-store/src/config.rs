use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Store settings. Every field has a default, so a config file may set any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Directory holding the JSON store.
    pub root: PathBuf,
    /// Longest image side after normalization, in pixels.
    pub max_image_size: u32,
    /// JPEG quality for normalized images.
    pub jpeg_quality: u8,
    /// Where exports are written.
    pub export_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("quizmark-data"),
            max_image_size: 1000,
            jpeg_quality: 80,
            export_dir: PathBuf::from("."),
        }
    }
}

impl StoreConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config() {
        let config: StoreConfig = serde_json::from_str(r#"{"maxImageSize": 640}"#).unwrap();
        assert_eq!(config.max_image_size, 640);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.root, PathBuf::from("quizmark-data"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizmark.json");
        std::fs::write(&path, r#"{"root": "/tmp/q", "jpegQuality": 60}"#).unwrap();
        let config = StoreConfig::from_json_file(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("/tmp/q"));
        assert_eq!(config.jpeg_quality, 60);

        assert!(StoreConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
