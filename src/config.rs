//! Configuration for the particle field.
//!
//! Every section and field is optional in the TOML file; anything missing
//! falls back to the defaults below, which reproduce the classic look
//! (2000 mint-green points in a 10-unit cube, tumbling at 0.05/0.1 rad/s).

use crate::error::ConfigError;
use crate::math::Rgb;
use crate::rotation::RotationRates;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Upper bound on the number of points a config may request.
pub const MAX_POINTS: usize = 1_000_000;

/// Upper bound on the per-axis half extent of the field.
pub const MAX_HALF_WIDTH: f32 = 1.0e6;

/// Shape of the generated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    /// Per-axis half extent; coordinates fall in `[-half_width, half_width)`.
    pub half_width: f32,
    /// Seed for a repeatable field. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            half_width: 5.0,
            seed: None,
        }
    }
}

/// Appearance of each point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    /// World-space size of a point.
    pub size: f64,
    /// Hex colour, `#RGB` or `#RRGGBB`.
    pub color: String,
    pub opacity: f64,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            size: 0.005,
            color: "#6EE7B7".into(),
            opacity: 0.8,
            size_attenuation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub rate_x: f64,
    pub rate_y: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        let rates = RotationRates::default();
        Self {
            rate_x: rates.x,
            rate_y: rates.y,
        }
    }
}

impl RotationConfig {
    pub fn rates(&self) -> RotationRates {
        RotationRates {
            x: self.rate_x,
            y: self.rate_y,
        }
    }
}

/// Perspective camera on the +Z axis looking towards the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f64,
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 1.0,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: u32,
    /// Height of a terminal cell divided by its width.
    pub cell_aspect: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            cell_aspect: 2.0,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    pub field: FieldConfig,
    pub points: PointsConfig,
    pub rotation: RotationConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl ParticleFieldConfig {
    /// Parsed point colour. Only meaningful after [`validate`] succeeded;
    /// falls back to the default colour otherwise.
    pub fn point_color(&self) -> Rgb {
        parse_color(&self.points.color).unwrap_or(DEFAULT_POINT_COLOR)
    }
}

const DEFAULT_POINT_COLOR: Rgb = Rgb::new(0x6e, 0xe7, 0xb7);

/// Load config from a TOML file.
///
/// Missing fields take their defaults. The result is not validated here;
/// callers validate once after applying command line overrides.
pub fn load_from_path(path: &Path) -> Result<ParticleFieldConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: ParticleFieldConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Render a config as TOML, in the same layout [`load_from_path`] reads.
pub fn to_toml(config: &ParticleFieldConfig) -> Result<String, ConfigError> {
    toml::to_string(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize config: {e}")))
}

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParticleFieldConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.field.count > MAX_POINTS {
        errors.push(format!(
            "field.count = {} exceeds the maximum of {MAX_POINTS}",
            config.field.count
        ));
    }
    validate_positive(&mut errors, "field.half_width", config.field.half_width as f64);
    if config.field.half_width > MAX_HALF_WIDTH {
        errors.push(format!(
            "field.half_width = {} exceeds the maximum of {MAX_HALF_WIDTH}",
            config.field.half_width
        ));
    }

    validate_positive(&mut errors, "points.size", config.points.size);
    validate_range_f64(&mut errors, "points.opacity", config.points.opacity, 0.0, 1.0);
    if let Err(e) = parse_color(&config.points.color) {
        errors.push(format!("points.color: {e}"));
    }

    validate_finite(&mut errors, "rotation.rate_x", config.rotation.rate_x);
    validate_finite(&mut errors, "rotation.rate_y", config.rotation.rate_y);

    validate_finite(&mut errors, "camera.distance", config.camera.distance);
    if !(config.camera.fov > 0.0 && config.camera.fov < 180.0) {
        errors.push(format!(
            "camera.fov = {} must be between 0 and 180 degrees",
            config.camera.fov
        ));
    }
    validate_positive(&mut errors, "camera.near", config.camera.near);
    if !(config.camera.far > config.camera.near && config.camera.far.is_finite()) {
        errors.push(format!(
            "camera.far = {} must be greater than camera.near = {}",
            config.camera.far, config.camera.near
        ));
    }

    if config.render.fps < 1 || config.render.fps > 240 {
        errors.push(format!(
            "render.fps = {} is out of range [1, 240]",
            config.render.fps
        ));
    }
    validate_positive(&mut errors, "render.cell_aspect", config.render.cell_aspect);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Parse `#RGB` or `#RRGGBB` into an [`Rgb`].
pub fn parse_color(s: &str) -> Result<Rgb, ConfigError> {
    let s = s.trim();
    let hex = s
        .strip_prefix('#')
        .ok_or_else(|| ConfigError::ParseError(format!("unrecognized color format: {s}")))?;

    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };

    let parsed = match hex.len() {
        _ if !hex.bytes().all(|b| b.is_ascii_hexdigit()) => None,
        3 => match (channel(0..1), channel(1..2), channel(2..3)) {
            (Some(r), Some(g), Some(b)) => Some(Rgb::new(r * 17, g * 17, b * 17)),
            _ => None,
        },
        6 => match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(r), Some(g), Some(b)) => Some(Rgb::new(r, g, b)),
            _ => None,
        },
        _ => None,
    };

    parsed.ok_or_else(|| ConfigError::ParseError(format!("invalid hex color: {s}")))
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !(value >= min && value <= max) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_positive(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(value > 0.0 && value.is_finite()) {
        errors.push(format!("{name} = {value} must be a positive number"));
    }
}

fn validate_finite(errors: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{name} = {value} must be finite"));
    }
}
