//! Configuration file loading for the labeling engine.
//!
//! This module loads [`EngineConfig`] from TOML or JSON files. Every loaded
//! configuration is validated before it is handed out.

use ocr_labeler_core::core::EngineConfig;
use ocr_labeler_core::core::config::ConfigValidatorExt;
use std::path::Path;

use crate::errors::{LabelerError, LabelerResult};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn for_path(path: &Path) -> LabelerResult<Self> {
        Self::from_extension(path).ok_or_else(|| LabelerError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// Configuration loader for the engine
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The validated configuration, or a LabelerError
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ocr_labeler::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("labeler.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> LabelerResult<EngineConfig> {
        let format = ConfigFormat::for_path(path)?;
        let content =
            std::fs::read_to_string(path).map_err(|e| LabelerError::io(path, e))?;
        let config = Self::load_from_string(&content, format)?;
        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load configuration from a string with specified format
    pub fn load_from_string(content: &str, format: ConfigFormat) -> LabelerResult<EngineConfig> {
        match format {
            ConfigFormat::Toml => Self::load_from_toml(content),
            ConfigFormat::Json => Self::load_from_json(content),
        }
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(content: &str) -> LabelerResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config.validated()?)
    }

    /// Load configuration from JSON string
    pub fn load_from_json(content: &str) -> LabelerResult<EngineConfig> {
        let config: EngineConfig = serde_json::from_str(content)?;
        Ok(config.validated()?)
    }

    /// Save configuration to a file, auto-detecting the format from the extension
    pub fn save_to_file(config: &EngineConfig, path: &Path) -> LabelerResult<()> {
        let format = ConfigFormat::for_path(path)?;
        let content = Self::save_to_string(config, format)?;
        std::fs::write(path, content).map_err(|e| LabelerError::io(path, e))
    }

    /// Save configuration to string with specified format
    pub fn save_to_string(config: &EngineConfig, format: ConfigFormat) -> LabelerResult<String> {
        match format {
            ConfigFormat::Toml => Ok(toml::to_string_pretty(config)?),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_format_detection() {
        assert_eq!(
            ConfigFormat::from_extension(Path::new("labeler.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension(Path::new("labeler.json")),
            Some(ConfigFormat::Json)
        );
        assert!(ConfigFormat::from_extension(Path::new("labeler.txt")).is_none());
        assert!(matches!(
            ConfigLoader::load_from_file(Path::new("labeler.yaml")),
            Err(LabelerError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ConfigLoader::load_from_toml("merge_gap_tolerance = 4\n").unwrap();
        assert_eq!(config.merge_gap_tolerance, 4);
        assert_eq!(config.default_split_fraction, 0.5);
        assert!(config.similarity_tie_break);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = ConfigLoader::load_from_json(r#"{ "default_split_fraction": 2.0 }"#);
        assert!(matches!(result, Err(LabelerError::Config(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig {
            merge_gap_tolerance: 3,
            content_threshold: 128,
            ..EngineConfig::default()
        };
        let toml_str = ConfigLoader::save_to_string(&config, ConfigFormat::Toml).unwrap();
        let loaded = ConfigLoader::load_from_toml(&toml_str).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig {
            similarity_tie_break: false,
            ..EngineConfig::default()
        };
        let json_str = ConfigLoader::save_to_string(&config, ConfigFormat::Json).unwrap();
        let loaded = ConfigLoader::load_from_json(&json_str).unwrap();
        assert_eq!(config, loaded);
    }
}
