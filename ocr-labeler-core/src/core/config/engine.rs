//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigValidator;

/// Tunables for the alignment-and-edit engine.
///
/// A copy of this configuration travels with every line, so the values in
/// effect for a page are fixed when the page is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ConfigValidator)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest horizontal gap, in pixels, between two boxes that may still be
    /// merged as neighbors.
    #[validate(max = 10_000)]
    pub merge_gap_tolerance: u32,

    /// Where a new split task places the split line, as a fraction of the
    /// word box width.
    #[validate(finite, range(min = 0.0, max = 1.0))]
    pub default_split_fraction: f32,

    /// Mask values strictly above this threshold count as foreground when
    /// cropping to content.
    pub content_threshold: u8,

    /// Break alignment ties by text similarity after the positional tie-break.
    pub similarity_tie_break: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            merge_gap_tolerance: 12,
            default_split_fraction: 0.5,
            content_threshold: 0,
            similarity_tie_break: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ConfigError, ConfigValidator};

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.merge_gap_tolerance, 12);
    }

    #[test]
    fn test_split_fraction_out_of_range() {
        let config = EngineConfig {
            default_split_fraction: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig { .. })
        ));

        let config = EngineConfig {
            default_split_fraction: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_tolerance_limit() {
        let config = EngineConfig {
            merge_gap_tolerance: 20_000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"merge_gap_tolerance": 4}"#).unwrap();
        assert_eq!(config.merge_gap_tolerance, 4);
        assert_eq!(config.default_split_fraction, 0.5);
        assert!(config.similarity_tie_break);
    }
}
