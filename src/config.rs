//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeshade/treeshade.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `TREESHADE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{hex_to_rgb, ColorSource, OutputRange, Rgb, ValueFormat, DEFAULT_PALETTE};

/// Category-relative intensity settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntensityConfig {
    /// When false every tile is fully opaque
    pub enabled: bool,
    /// Intensity for the smallest leaf of a category
    pub start: f64,
    /// Intensity for the largest leaf of a category
    pub end: f64,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        let range = OutputRange::default();
        Self {
            enabled: true,
            start: range.start,
            end: range.end,
        }
    }
}

/// Raw intensity config for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawIntensityConfig {
    pub enabled: Option<bool>,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub dataset: Option<PathBuf>,
    pub color_source: Option<ColorSource>,
    pub value_format: Option<ValueFormat>,
    pub sort_siblings: Option<bool>,
    pub palette: Option<Vec<String>>,
    #[serde(default)]
    pub intensity: RawIntensityConfig,
}

/// Unified configuration for treeshade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Dataset used when no file argument is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    /// Key selecting a leaf's base color
    pub color_source: ColorSource,
    /// Display format for leaf values
    pub value_format: ValueFormat,
    /// Order siblings taller first, then larger first
    pub sort_siblings: bool,
    /// Base colors as `#rrggbb`, assigned to categories in first-seen order
    pub palette: Vec<String>,
    pub intensity: IntensityConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: None,
            color_source: ColorSource::default(),
            value_format: ValueFormat::default(),
            sort_siblings: true,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            intensity: IntensityConfig::default(),
        }
    }
}

/// Get the XDG config directory for treeshade.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeshade").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeshade.toml"))
}

/// Load a TOML file into RawSettings for merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Typed lookup of one env key: absent is `None`, unparsable is an error.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("environment override '{}': {}", key, e),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    ///
    /// Later layers override earlier ones field by field. A palette given in a
    /// layer replaces the palette entirely.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!("loading config file: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Load only defaults plus one TOML file, without global config or env vars.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let mut settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            dataset: overlay.dataset.clone().or_else(|| self.dataset.clone()),
            color_source: overlay.color_source.unwrap_or(self.color_source),
            value_format: overlay.value_format.unwrap_or(self.value_format),
            sort_siblings: overlay.sort_siblings.unwrap_or(self.sort_siblings),
            palette: overlay
                .palette
                .clone()
                .unwrap_or_else(|| self.palette.clone()),
            intensity: IntensityConfig {
                enabled: overlay.intensity.enabled.unwrap_or(self.intensity.enabled),
                start: overlay.intensity.start.unwrap_or(self.intensity.start),
                end: overlay.intensity.end.unwrap_or(self.intensity.end),
            },
        }
    }

    /// Apply TREESHADE_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `TREESHADE_INTENSITY__START=0.8`. The palette
    /// is a comma separated list. A variable that is set but cannot be parsed
    /// is a config error.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESHADE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("palette"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<String>(&config, "dataset")? {
            settings.dataset = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value::<String>(&config, "color_source")? {
            settings.color_source = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = env_value::<String>(&config, "value_format")? {
            settings.value_format = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = env_value(&config, "sort_siblings")? {
            settings.sort_siblings = val;
        }
        if let Some(val) = env_value(&config, "palette")? {
            settings.palette = val;
        }
        if let Some(val) = env_value(&config, "intensity.enabled")? {
            settings.intensity.enabled = val;
        }
        if let Some(val) = env_value(&config, "intensity.start")? {
            settings.intensity.start = val;
        }
        if let Some(val) = env_value(&config, "intensity.end")? {
            settings.intensity.end = val;
        }

        Ok(settings)
    }

    /// Expand `~` and `$VAR` in the dataset path.
    fn expand_paths(&mut self) {
        if let Some(dataset) = &self.dataset {
            let raw = dataset.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.dataset = Some(PathBuf::from(expanded));
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        self.output_range()?;
        self.palette_colors()?;
        Ok(())
    }

    /// Configured output range for intensities.
    pub fn output_range(&self) -> Result<OutputRange, ApplicationError> {
        Ok(OutputRange::new(self.intensity.start, self.intensity.end)?)
    }

    /// Parsed palette; every entry must be a 6-digit hex color.
    pub fn palette_colors(&self) -> Result<Vec<Rgb>, ApplicationError> {
        if self.palette.is_empty() {
            return Err(ApplicationError::Config {
                message: "palette must contain at least one color".to_string(),
            });
        }
        self.palette
            .iter()
            .map(|hex| hex_to_rgb(hex).ok_or_else(|| ApplicationError::InvalidColor(hex.clone())))
            .collect()
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_valid_and_spectral_palette() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.palette_colors().unwrap().len(), 9);
        assert_eq!(settings.output_range().unwrap(), OutputRange::default());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let overlay = RawSettings {
            value_format: Some(ValueFormat::Currency),
            intensity: RawIntensityConfig {
                start: Some(0.8),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.value_format, ValueFormat::Currency);
        assert_eq!(merged.intensity.start, 0.8);
        assert_eq!(merged.intensity.end, 0.8);
        assert_eq!(merged.color_source, ColorSource::Category);
    }

    #[test]
    fn given_bad_palette_entry_when_validating_then_invalid_color() {
        let settings = Settings {
            palette: vec!["#123456".into(), "#xyz".into()],
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::InvalidColor(ref c)) if c == "#xyz"
        ));
    }

    #[test]
    fn given_empty_palette_when_validating_then_config_error() {
        let settings = Settings {
            palette: vec![],
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_settings_when_serializing_then_toml_round_trips() {
        let text = Settings::default().to_toml().unwrap();
        assert!(text.contains("color_source = \"category\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
