//! Configuration file loading and defaults.
//!
//! All fields are optional; a missing file is not an error and means
//! the built-in defaults, which are exactly the pinned interaction and
//! export constants. Corresponds to `<config dir>/chatview/config.toml`.

use crate::avatar::editor::InteractionSettings;
use crate::avatar::export::ExportSettings;
use crate::avatar::view_state::ScaleRange;
use crate::markdown::cache::DEFAULT_CACHE_CAPACITY;
use crate::markdown::highlight::{is_valid_theme, DEFAULT_THEME};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("failed to read config file at {path}: {reason}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML.
    #[error("invalid TOML in {path}: {reason}")]
    Parse {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

// ===== ConfigFile =====

/// TOML configuration file structure.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `[interaction]` section.
    #[serde(default)]
    pub interaction: Option<InteractionSection>,

    /// `[render]` section.
    #[serde(default)]
    pub render: Option<RenderSection>,

    /// `[export]` section.
    #[serde(default)]
    pub export: Option<ExportSection>,
}

/// Interaction tunables from TOML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InteractionSection {
    /// Scale step per wheel event.
    #[serde(default)]
    pub wheel_step: Option<f64>,

    /// Scale step per zoom-button click.
    #[serde(default)]
    pub button_step: Option<f64>,

    /// Scale delta per pixel of pinch-distance change.
    #[serde(default)]
    pub pinch_sensitivity: Option<f64>,

    /// Lower scale bound.
    #[serde(default)]
    pub min_scale: Option<f64>,

    /// Upper scale bound.
    #[serde(default)]
    pub max_scale: Option<f64>,
}

/// Render tunables from TOML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderSection {
    /// Highlight theme name (e.g. "gruvbox-dark").
    #[serde(default)]
    pub theme: Option<String>,

    /// Markdown memo capacity in messages.
    #[serde(default)]
    pub cache_capacity: Option<usize>,
}

/// Export tunables from TOML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    /// Output raster side length in pixels.
    #[serde(default)]
    pub size: Option<u32>,

    /// Guide circle radius as a fraction of the viewport short side.
    #[serde(default)]
    pub guide_ratio: Option<f64>,
}

// ===== Resolved settings =====

/// Resolved render settings after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Highlight theme name, validated against the embedded set.
    pub theme: String,
    /// Markdown memo capacity in messages.
    pub cache_capacity: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Resolved configuration: defaults overlaid with the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    /// Avatar interaction tunables.
    pub interaction: InteractionSettings,
    /// Markdown render tunables.
    pub render: RenderSettings,
    /// Crop export tunables.
    pub export: ExportSettings,
}

/// Resolve the default config file path.
///
/// `<config dir>/chatview/config.toml`, or the current directory when
/// the platform config dir cannot be determined.
pub fn default_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("chatview").join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

/// Load a configuration file.
///
/// Returns `Ok(None)` if the file doesn't exist (use defaults).
/// Returns `Err` if it exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })
        }
    };

    toml::from_str(&contents)
        .map(Some)
        .map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
}

/// Merge an optional config file over the built-in defaults.
///
/// An invalid theme name falls back to the default with a warning; the
/// rest merges field by field.
pub fn merge_config(file: Option<ConfigFile>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();
    let Some(file) = file else {
        return resolved;
    };

    if let Some(interaction) = file.interaction {
        let defaults = ScaleRange::default();
        resolved.interaction = InteractionSettings {
            wheel_step: interaction
                .wheel_step
                .unwrap_or(resolved.interaction.wheel_step),
            button_step: interaction
                .button_step
                .unwrap_or(resolved.interaction.button_step),
            pinch_sensitivity: interaction
                .pinch_sensitivity
                .unwrap_or(resolved.interaction.pinch_sensitivity),
            scale_range: ScaleRange {
                min: interaction.min_scale.unwrap_or(defaults.min),
                max: interaction.max_scale.unwrap_or(defaults.max),
            },
        };
    }

    if let Some(render) = file.render {
        if let Some(theme) = render.theme {
            if is_valid_theme(&theme) {
                resolved.render.theme = theme;
            } else {
                warn!(%theme, "unknown highlight theme in config, using default");
            }
        }
        if let Some(capacity) = render.cache_capacity {
            resolved.render.cache_capacity = capacity;
        }
    }

    if let Some(export) = file.export {
        resolved.export = ExportSettings {
            output_size: export.size.unwrap_or(resolved.export.output_size),
            guide_ratio: export.guide_ratio.unwrap_or(resolved.export.guide_ratio),
        };
    }

    resolved
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::export::{CROP_GUIDE_RATIO, EXPORT_SIZE};
    use crate::avatar::view_state::{
        BUTTON_STEP, MAX_SCALE, MIN_SCALE, PINCH_SENSITIVITY, WHEEL_STEP,
    };
    use std::io::Write;

    #[test]
    fn defaults_are_the_pinned_constants() {
        let resolved = merge_config(None);
        assert_eq!(resolved.interaction.wheel_step, WHEEL_STEP);
        assert_eq!(resolved.interaction.button_step, BUTTON_STEP);
        assert_eq!(resolved.interaction.pinch_sensitivity, PINCH_SENSITIVITY);
        assert_eq!(resolved.interaction.scale_range.min, MIN_SCALE);
        assert_eq!(resolved.interaction.scale_range.max, MAX_SCALE);
        assert_eq!(resolved.export.output_size, EXPORT_SIZE);
        assert_eq!(resolved.export.guide_ratio, CROP_GUIDE_RATIO);
        assert_eq!(resolved.render.theme, DEFAULT_THEME);
        assert_eq!(resolved.render.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn file_fields_override_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            [interaction]
            wheel_step = 0.05
            max_scale = 8.0

            [render]
            theme = "gruvbox-dark"
            cache_capacity = 32

            [export]
            size = 256
            "#,
        )
        .expect("valid config");

        let resolved = merge_config(Some(file));
        assert_eq!(resolved.interaction.wheel_step, 0.05);
        assert_eq!(resolved.interaction.scale_range.max, 8.0);
        // Unset fields keep their defaults.
        assert_eq!(resolved.interaction.button_step, BUTTON_STEP);
        assert_eq!(resolved.interaction.scale_range.min, MIN_SCALE);
        assert_eq!(resolved.render.theme, "gruvbox-dark");
        assert_eq!(resolved.render.cache_capacity, 32);
        assert_eq!(resolved.export.output_size, 256);
        assert_eq!(resolved.export.guide_ratio, CROP_GUIDE_RATIO);
    }

    #[test]
    fn invalid_theme_falls_back_to_default() {
        let file: ConfigFile =
            toml::from_str("[render]\ntheme = \"nope\"").expect("valid config");
        let resolved = merge_config(Some(file));
        assert_eq!(resolved.render.theme, DEFAULT_THEME);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("[render]\ncolour = \"red\"").is_err());
        assert!(toml::from_str::<ConfigFile>("mystery = 1").is_err());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_config(&dir.path().join("missing.toml"));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn unparseable_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"not [valid toml").expect("write file");

        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn well_formed_file_loads() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\ntheme = \"nord\"\n").expect("write file");

        let file = load_config(&path).expect("readable").expect("present");
        let resolved = merge_config(Some(file));
        assert_eq!(resolved.render.theme, "nord");
    }

    #[test]
    fn default_path_ends_with_the_crate_config_file() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
