// beam-core/src/lib.rs

//! The core logic for the beam profiler.
//! This crate is responsible for projecting camera frames onto each axis,
//! computing profile statistics (including FWHM), and relaying frames from a
//! camera on a background thread. It is completely headless and contains no
//! GUI code.

pub mod acquisition;
pub mod analyzer;
pub mod camera;
pub mod config;
mod error;
pub mod frame;
pub mod projection;
pub mod statistics;

pub use acquisition::{AcquisitionError, AcquisitionEvent, AcquisitionWorker};
pub use analyzer::{AnalyzerConfig, Axis, AxisAnalysis, AxisConfig, analyze_axis};
pub use camera::{Camera, CameraError, CameraInfo, MockCamera};
pub use config::{AppConfig, ConfigError};
pub use error::{FrameError, ProjectionError};
pub use frame::{Frame, Grid, to_grayscale};
pub use projection::{ParseModeError, ProjectionMode, ReduceAxis, normalize, project};
pub use statistics::{Fwhm, ProfileStatistics, compute_fwhm, compute_statistics};
