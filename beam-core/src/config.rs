//! # Configuration Module
//!
//! Application settings loaded from environment variables.
//!
//! ## Variables
//! - `CAMERA_SERIAL`, `CAMERA_FPS`, `CAMERA_EXPOSURE_US`, `CAMERA_GAIN_DB`
//! - `DISPLAY_WIDTH`, `DISPLAY_HEIGHT`: frame size of the mock camera
//! - `MOCK_CAMERA`: `1` selects the mock camera
//! - `BEAM_X_MODE`, `BEAM_Y_MODE`: `sum`, `min`, `max` or `avg`
//! - `BEAM_X_NORMALIZE`, `BEAM_Y_NORMALIZE`: `1` enables normalization
//! - `MONITOR_FRAMES`: frames to report, `0` for no limit
//! - `MONITOR_JSON`: `1` switches the monitor to JSON lines

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalyzerConfig, AxisConfig};
use crate::projection::ProjectionMode;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub serial: Option<String>,
    pub fps: u32,
    pub exposure_us: u32,
    pub gain_db: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            serial: None,
            fps: 30,
            exposure_us: 10_000,
            gain_db: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Frames to report before stopping; `None` runs until the camera fails.
    pub frame_limit: Option<u64>,
    pub json: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            frame_limit: Some(100),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub display: DisplayConfig,
    pub mock_camera: bool,
    pub analyzer: AnalyzerConfig,
    pub monitor: MonitorConfig,
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which returns the raw value
    /// of a variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let frames: u64 = parse_or(&lookup, "MONITOR_FRAMES", 100)?;

        Ok(Self {
            camera: CameraConfig {
                serial: lookup("CAMERA_SERIAL").filter(|s| !s.is_empty()),
                fps: parse_or(&lookup, "CAMERA_FPS", defaults.camera.fps)?,
                exposure_us: parse_or(&lookup, "CAMERA_EXPOSURE_US", defaults.camera.exposure_us)?,
                gain_db: parse_or(&lookup, "CAMERA_GAIN_DB", defaults.camera.gain_db)?,
            },
            display: DisplayConfig {
                width: parse_or(&lookup, "DISPLAY_WIDTH", defaults.display.width)?,
                height: parse_or(&lookup, "DISPLAY_HEIGHT", defaults.display.height)?,
            },
            mock_camera: flag(&lookup, "MOCK_CAMERA"),
            analyzer: AnalyzerConfig {
                x: AxisConfig {
                    mode: parse_or(&lookup, "BEAM_X_MODE", ProjectionMode::default())?,
                    normalize: flag(&lookup, "BEAM_X_NORMALIZE"),
                },
                y: AxisConfig {
                    mode: parse_or(&lookup, "BEAM_Y_MODE", ProjectionMode::default())?,
                    normalize: flag(&lookup, "BEAM_Y_NORMALIZE"),
                },
            },
            monitor: MonitorConfig {
                frame_limit: (frames > 0).then_some(frames),
                json: flag(&lookup, "MONITOR_JSON"),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).is_some_and(|v| v == "1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.camera.fps, 30);
        assert_eq!(cfg.camera.exposure_us, 10_000);
        assert_eq!(cfg.display.width, 1280);
        assert_eq!(cfg.display.height, 720);
        assert!(!cfg.mock_camera);
        assert_eq!(cfg.analyzer, AnalyzerConfig::default());
        assert_eq!(cfg.monitor.frame_limit, Some(100));
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let cfg = load(&[
            ("CAMERA_SERIAL", "19283746"),
            ("CAMERA_FPS", "60"),
            ("CAMERA_EXPOSURE_US", "2500"),
            ("CAMERA_GAIN_DB", "6.5"),
            ("DISPLAY_WIDTH", "640"),
            ("DISPLAY_HEIGHT", "480"),
            ("MOCK_CAMERA", "1"),
            ("BEAM_X_MODE", "sum"),
            ("BEAM_Y_MODE", "max"),
            ("BEAM_Y_NORMALIZE", "1"),
            ("MONITOR_FRAMES", "0"),
            ("MONITOR_JSON", "1"),
        ])
        .unwrap();

        assert_eq!(cfg.camera.serial.as_deref(), Some("19283746"));
        assert_eq!(cfg.camera.fps, 60);
        assert_eq!(cfg.camera.exposure_us, 2500);
        assert_eq!(cfg.camera.gain_db, 6.5);
        assert_eq!((cfg.display.width, cfg.display.height), (640, 480));
        assert!(cfg.mock_camera);
        assert_eq!(cfg.analyzer.x.mode, ProjectionMode::Sum);
        assert!(!cfg.analyzer.x.normalize);
        assert_eq!(cfg.analyzer.y.mode, ProjectionMode::Max);
        assert!(cfg.analyzer.y.normalize);
        assert_eq!(cfg.monitor.frame_limit, None);
        assert!(cfg.monitor.json);
    }

    #[test]
    fn empty_serial_means_none_and_flags_need_one() {
        let cfg = load(&[("CAMERA_SERIAL", ""), ("MOCK_CAMERA", "true")]).unwrap();
        assert_eq!(cfg.camera.serial, None);
        assert!(!cfg.mock_camera);
    }

    #[test]
    fn invalid_numbers_name_the_variable() {
        let err = load(&[("CAMERA_FPS", "fast")]).unwrap_err();
        assert_eq!(err.key, "CAMERA_FPS");
        assert_eq!(err.value, "fast");

        let err = load(&[("BEAM_X_MODE", "median")]).unwrap_err();
        assert_eq!(err.key, "BEAM_X_MODE");
        assert!(err.to_string().contains("median"));
    }
}
