use crate::error::ConfigValidationError;
use crate::ring::{
    DEFAULT_DASH_WIDTH, DEFAULT_HANDLE_DIAMETER, DEFAULT_HANDLE_STROKE_WIDTH, DEFAULT_LABEL,
    DEFAULT_OPACITY, DEFAULT_STROKE_WIDTH, DEFAULT_TRACK_COLOR, DEFAULT_WANTED_SPACE_WIDTH,
    RingSettings, SliderConfig,
};
use crate::stage::{ContainerId, DEFAULT_CONTAINER_SIZE, DEFAULT_SIDEBAR_WIDTH};
use directories::ProjectDirs;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerConfig {
    pub id: ContainerId,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: f64,
}

fn default_size() -> f64 {
    DEFAULT_CONTAINER_SIZE
}

fn default_sidebar_width() -> f64 {
    DEFAULT_SIDEBAR_WIDTH
}

/// A number as written in a slider table. Values of the wrong type are kept
/// instead of failing the whole file, so only their slider is rejected.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigNumber {
    Number(f64),
    /// Strings are accepted when they parse, as environment overrides arrive as text.
    Text(String),
    #[serde(skip_serializing)]
    Invalid(IgnoredAny),
}

impl ConfigNumber {
    pub fn get(&self, field: &'static str) -> Result<f64, ConfigValidationError> {
        match self {
            ConfigNumber::Number(v) => Ok(*v),
            ConfigNumber::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigValidationError::NotNumeric { field }),
            ConfigNumber::Invalid(_) => Err(ConfigValidationError::NotNumeric { field }),
        }
    }
}

impl From<f64> for ConfigNumber {
    fn from(v: f64) -> Self {
        ConfigNumber::Number(v)
    }
}

/// One `[[sliders]]` table as written by the user. Required fields stay
/// optional here so a missing one is reported by name.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RingConfig {
    pub container: Option<ContainerId>,
    pub label: Option<String>,
    pub color: Option<String>,
    pub track_color: Option<String>,
    pub min_value: Option<ConfigNumber>,
    pub max_value: Option<ConfigNumber>,
    pub step: Option<ConfigNumber>,
    pub radius: Option<ConfigNumber>,
    pub stroke_width: Option<ConfigNumber>,
    pub dash_width: Option<ConfigNumber>,
    pub wanted_space_width: Option<ConfigNumber>,
    pub handle_diameter: Option<ConfigNumber>,
    pub handle_stroke_width: Option<ConfigNumber>,
    pub opacity: Option<ConfigNumber>,
}

fn required(
    value: &Option<ConfigNumber>,
    field: &'static str,
) -> Result<f64, ConfigValidationError> {
    value
        .as_ref()
        .ok_or(ConfigValidationError::Missing { field })?
        .get(field)
}

impl RingConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn slider_config(&self) -> Result<SliderConfig, ConfigValidationError> {
        let container = self
            .container
            .clone()
            .ok_or(ConfigValidationError::Missing {
                field: "container",
            })?;
        let stroke_width = match &self.stroke_width {
            Some(v) => v.get("stroke_width")?,
            None => DEFAULT_STROKE_WIDTH,
        };

        SliderConfig::new(
            container,
            required(&self.min_value, "min_value")?,
            required(&self.max_value, "max_value")?,
            required(&self.step, "step")?,
            required(&self.radius, "radius")?,
            stroke_width,
        )
    }

    /// Visual settings; a malformed one falls back to its default.
    pub fn settings(&self) -> RingSettings {
        let or_default = |value: &Option<ConfigNumber>, field: &'static str, default: f64| {
            match value.as_ref().map(|v| v.get(field)) {
                Some(Ok(v)) => v,
                Some(Err(e)) => {
                    log::warn!("{}: {}, using {}", self.label(), e, default);
                    default
                }
                None => default,
            }
        };

        RingSettings {
            label: self.label().to_string(),
            color: self.color.clone(),
            track_color: self
                .track_color
                .clone()
                .unwrap_or_else(|| DEFAULT_TRACK_COLOR.to_string()),
            dash_width: or_default(&self.dash_width, "dash_width", DEFAULT_DASH_WIDTH),
            wanted_space_width: or_default(
                &self.wanted_space_width,
                "wanted_space_width",
                DEFAULT_WANTED_SPACE_WIDTH,
            ),
            handle_diameter: or_default(
                &self.handle_diameter,
                "handle_diameter",
                DEFAULT_HANDLE_DIAMETER,
            ),
            handle_stroke_width: or_default(
                &self.handle_stroke_width,
                "handle_stroke_width",
                DEFAULT_HANDLE_STROKE_WIDTH,
            ),
            opacity: or_default(&self.opacity, "opacity", DEFAULT_OPACITY),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
    #[serde(default)]
    pub sliders: Vec<RingConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "ringdial", "ringdial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Reads `path`, or the default location, with `RINGDIAL_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("RINGDIAL"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;
    Ok(s.try_deserialize()?)
}

pub fn default_config() -> Config {
    parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!("Bundled config is invalid: {}", e);
        Config::default()
    })
}

/// The user's config, or the bundled demo when there is none or it is broken.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let exists = match path {
        Some(p) => p.exists(),
        None => get_config_path().is_ok_and(|p| p.exists()),
    };
    if !exists {
        return default_config();
    }

    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config()
        }
    }
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
