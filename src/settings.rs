//! Terrain settings and presets
//!
//! Persisted as JSON. Missing keys fall back to defaults, so older or partial
//! settings files keep loading.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::terrain::{CraterConfig, GeneratorConfig};

/// Terrain complexity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TerrainPreset {
    Simple,
    #[default]
    Normal,
    Complex,
}

impl TerrainPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainPreset::Simple => "Simple",
            TerrainPreset::Normal => "Normal",
            TerrainPreset::Complex => "Complex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" | "low" => Some(TerrainPreset::Simple),
            "normal" | "medium" | "med" => Some(TerrainPreset::Normal),
            "complex" | "high" => Some(TerrainPreset::Complex),
            _ => None,
        }
    }

    /// Generator complexity for this preset
    pub fn complexity(&self) -> f32 {
        match self {
            TerrainPreset::Simple => 0.5,
            TerrainPreset::Normal => 1.0,
            TerrainPreset::Complex => 1.5,
        }
    }
}

/// Failure while reading or writing a settings file
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings I/O error: {}", e),
            SettingsError::Json(e) => write!(f, "settings format error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Terrain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Generator complexity (0.5 = simple, 1.0 = normal, 1.5 = complex)
    pub complexity: f32,
    /// Explosions carve craters
    pub destructible_terrain: bool,
    /// Procedural dunes instead of flat ground
    pub varied_terrain: bool,
    /// Fixed terrain seed (random when unset)
    pub seed: Option<u64>,

    // === Tuning ===
    pub generator: GeneratorConfig,
    pub craters: CraterConfig,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            complexity: TerrainPreset::Normal.complexity(),
            destructible_terrain: true,
            varied_terrain: true,
            seed: None,
            generator: GeneratorConfig::default(),
            craters: CraterConfig::default(),
        }
    }
}

impl TerrainSettings {
    /// Create settings from a complexity preset
    pub fn from_preset(preset: TerrainPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: TerrainPreset) {
        self.complexity = preset.complexity();
    }

    /// Complexity clamped into the supported range
    pub fn effective_complexity(&self) -> f32 {
        if self.complexity.is_finite() {
            self.complexity.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY)
        } else {
            TerrainPreset::Normal.complexity()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded terrain settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.as_ref().display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using default settings", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Terrain settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(TerrainPreset::from_str("COMPLEX"), Some(TerrainPreset::Complex));
        assert_eq!(TerrainPreset::from_str("med"), Some(TerrainPreset::Normal));
        assert_eq!(TerrainPreset::from_str("jagged"), None);
        assert_eq!(TerrainPreset::Simple.as_str(), "Simple");
    }

    #[test]
    fn test_from_preset() {
        let settings = TerrainSettings::from_preset(TerrainPreset::Complex);
        assert_eq!(settings.complexity, 1.5);
        assert!(settings.destructible_terrain);
    }

    #[test]
    fn test_partial_json_merges_defaults() {
        let settings =
            TerrainSettings::from_json(r#"{ "complexity": 0.5, "craters": { "max_craters": 10 } }"#)
                .unwrap();

        assert_eq!(settings.complexity, 0.5);
        assert!(settings.varied_terrain);
        assert_eq!(settings.craters.max_craters, 10);
        assert_eq!(settings.craters.growth_limit, CRATER_GROWTH_LIMIT);
        assert_eq!(settings.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_json_roundtrip_preserves_settings() {
        let mut settings = TerrainSettings::from_preset(TerrainPreset::Simple);
        settings.seed = Some(1234);
        settings.destructible_terrain = false;

        let json = settings.to_json().unwrap();
        assert_eq!(TerrainSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_effective_complexity_clamped() {
        let mut settings = TerrainSettings::default();
        settings.complexity = 9.0;
        assert_eq!(settings.effective_complexity(), MAX_COMPLEXITY);
        settings.complexity = 0.1;
        assert_eq!(settings.effective_complexity(), MIN_COMPLEXITY);
        settings.complexity = f32::NAN;
        assert_eq!(settings.effective_complexity(), 1.0);
    }

    #[test]
    fn test_load_missing_or_malformed_file_falls_back() {
        let dir = std::env::temp_dir();
        let missing = dir.join("dune_artillery_missing_settings.json");
        let _ = fs::remove_file(&missing);
        assert_eq!(TerrainSettings::load_or_default(&missing), TerrainSettings::default());

        let broken = dir.join("dune_artillery_broken_settings.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(TerrainSettings::load(&broken), Err(SettingsError::Json(_))));
        assert_eq!(TerrainSettings::load_or_default(&broken), TerrainSettings::default());
        let _ = fs::remove_file(&broken);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("dune_artillery_saved_settings.json");
        let settings = TerrainSettings {
            seed: Some(77),
            ..TerrainSettings::from_preset(TerrainPreset::Complex)
        };
        settings.save(&path).unwrap();
        assert_eq!(TerrainSettings::load(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }
}
