//! # Camera Module
//!
//! The capability set every frame source provides: connection, acquisition
//! control, frame retrieval and exposure settings.
//!
//! `get_frame` never blocks indefinitely. It returns `Ok(None)` when no frame
//! is ready so that the acquisition loop can check for shutdown between
//! calls.

mod mock;

pub use mock::{MockCamera, render_frame};

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Errors reported by a camera implementation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("camera not connected")]
    NotConnected,
    #[error("invalid camera setting: {0}")]
    InvalidSetting(String),
    #[error("camera device error: {0}")]
    Device(String),
}

/// Identification shown when listing cameras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub model: String,
    pub serial: String,
    pub vendor: String,
}

/// A frame source that can be driven from the acquisition thread.
pub trait Camera: Send {
    /// Initializes and connects to the camera.
    fn connect(&mut self) -> Result<(), CameraError>;

    /// Stops acquisition and releases the camera.
    fn disconnect(&mut self);

    /// Starts continuous acquisition. Fails if the camera is not connected.
    fn start_acquisition(&mut self) -> Result<(), CameraError>;

    /// Stops continuous acquisition. Stopping an idle camera is a no-op.
    fn stop_acquisition(&mut self);

    /// Returns the next frame, or `None` when no frame is available.
    fn get_frame(&mut self) -> Result<Option<Frame>, CameraError>;

    /// Sets the exposure time.
    ///
    /// # Arguments
    /// * `exposure_us` - Exposure time in microseconds
    ///
    /// # Returns
    /// * `Err(CameraError::InvalidSetting)` if the device rejects the value
    fn set_exposure(&mut self, exposure_us: u32) -> Result<(), CameraError>;

    /// Sets the analog gain.
    ///
    /// # Arguments
    /// * `gain_db` - Gain in decibels, must be finite
    ///
    /// # Returns
    /// * `Err(CameraError::InvalidSetting)` if the device rejects the value
    fn set_gain(&mut self, gain_db: f64) -> Result<(), CameraError>;

    /// Sets the target frame rate.
    ///
    /// # Arguments
    /// * `fps` - Frames per second; implementations may raise 0 to their minimum
    fn set_fps(&mut self, fps: u32) -> Result<(), CameraError>;

    /// Whether `connect` succeeded and `disconnect` has not been called since.
    fn is_connected(&self) -> bool;

    /// Whether frames are currently being produced.
    fn is_acquiring(&self) -> bool;

    /// Model, serial number and vendor of the device.
    fn info(&self) -> CameraInfo;
}
