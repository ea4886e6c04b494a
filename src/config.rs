use crate::core_modules::framing::FramingRules;
use crate::error::AdvisorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a `FramingAdvisor`, allowing for recalibration across
/// camera setups. Every numeric threshold the engine consults lives here; the
/// defaults match a phone-on-tripod capture at typical range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Frames the background statistics average over.
    #[serde(default = "default_history_length")]
    pub history_length: u32,
    /// Multiplier on the learned per-pixel variance that sets the
    /// foreground boundary.
    #[serde(default = "default_variance_threshold")]
    pub variance_threshold: f32,
    /// Width of the mask's median smoothing kernel; must be odd.
    #[serde(default = "default_median_kernel")]
    pub median_kernel: u32,
    /// Bounding boxes covering less of the frame than this are noise blobs.
    #[serde(default = "default_min_foreground_area_fraction")]
    pub min_foreground_area_fraction: f64,
    /// Horizontal band (inclusive) the subject's center must fall into.
    #[serde(default = "default_center_band")]
    pub center_band: (f64, f64),
    /// The subject's top must sit strictly above this fraction of the height.
    #[serde(default = "default_head_line")]
    pub head_line: f64,
    /// The subject's bottom must sit strictly below this fraction of the height.
    #[serde(default = "default_feet_line")]
    pub feet_line: f64,
    /// Height in pixels of the status banner strip.
    #[serde(default = "default_banner_height")]
    pub banner_height: u32,
    /// Whether shadow-like pixels are folded back into the background.
    #[serde(default = "default_suppress_shadows")]
    pub suppress_shadows: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            history_length: default_history_length(),
            variance_threshold: default_variance_threshold(),
            median_kernel: default_median_kernel(),
            min_foreground_area_fraction: default_min_foreground_area_fraction(),
            center_band: default_center_band(),
            head_line: default_head_line(),
            feet_line: default_feet_line(),
            banner_height: default_banner_height(),
            suppress_shadows: default_suppress_shadows(),
        }
    }
}

impl AdvisorConfig {
    pub fn load(path: &Path) -> Result<Self, AdvisorError> {
        let content = std::fs::read_to_string(path).map_err(|source| AdvisorError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AdvisorConfig =
            toml::from_str(&content).map_err(|e| AdvisorError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), AdvisorError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AdvisorError::ConfigParse(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| AdvisorError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.history_length == 0 {
            return Err(AdvisorError::InvalidConfig(
                "history_length must be at least 1".into(),
            ));
        }
        if self.variance_threshold <= 0.0 {
            return Err(AdvisorError::InvalidConfig(
                "variance_threshold must be positive".into(),
            ));
        }
        if self.median_kernel == 0 || self.median_kernel % 2 == 0 {
            return Err(AdvisorError::InvalidConfig(format!(
                "median_kernel must be odd, got {}",
                self.median_kernel
            )));
        }
        if !(0.0..1.0).contains(&self.min_foreground_area_fraction) {
            return Err(AdvisorError::InvalidConfig(
                "min_foreground_area_fraction must be in [0, 1)".into(),
            ));
        }
        let (band_low, band_high) = self.center_band;
        if !(0.0 < band_low && band_low < band_high && band_high < 1.0) {
            return Err(AdvisorError::InvalidConfig(format!(
                "center_band must satisfy 0 < low < high < 1, got ({band_low}, {band_high})"
            )));
        }
        if !(0.0..1.0).contains(&self.head_line) || !(0.0..1.0).contains(&self.feet_line) {
            return Err(AdvisorError::InvalidConfig(
                "head_line and feet_line must be in (0, 1)".into(),
            ));
        }
        if self.banner_height == 0 {
            return Err(AdvisorError::InvalidConfig(
                "banner_height must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The rule-layer view of this configuration.
    pub fn rules(&self) -> FramingRules {
        FramingRules {
            center_band: self.center_band,
            head_line: self.head_line,
            feet_line: self.feet_line,
        }
    }
}

fn default_history_length() -> u32 {
    50
}
fn default_variance_threshold() -> f32 {
    32.0
}
fn default_median_kernel() -> u32 {
    7
}
fn default_min_foreground_area_fraction() -> f64 {
    0.02
}
fn default_center_band() -> (f64, f64) {
    (0.40, 0.60)
}
fn default_head_line() -> f64 {
    0.15
}
fn default_feet_line() -> f64 {
    0.90
}
fn default_banner_height() -> u32 {
    40
}
fn default_suppress_shadows() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AdvisorConfig::default().validate().is_ok());
    }

    #[test]
    fn even_median_kernel_is_rejected() {
        let config = AdvisorConfig {
            median_kernel: 6,
            ..AdvisorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AdvisorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn inverted_center_band_is_rejected() {
        let config = AdvisorConfig {
            center_band: (0.7, 0.3),
            ..AdvisorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let path = dir.path().join("advisor.toml");
        let config = AdvisorConfig {
            history_length: 80,
            variance_threshold: 24.0,
            center_band: (0.35, 0.65),
            ..AdvisorConfig::default()
        };
        config.save(&path).expect("Error saving config.");
        let loaded = AdvisorConfig::load(&path).expect("Error loading config.");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "history_length = 25\n").expect("Error writing file.");
        let loaded = AdvisorConfig::load(&path).expect("Error loading config.");
        assert_eq!(loaded.history_length, 25);
        assert_eq!(loaded.median_kernel, 7);
        assert_eq!(loaded.center_band, (0.40, 0.60));
    }
}
