//! Mock camera that generates a test pattern, for development without
//! hardware.
//!
//! The pattern is a horizontal gradient with a weaker vertical gradient
//! added, a white disc that moves 5 px to the right per frame, and a
//! brightness offset derived from the simulated exposure and gain.

use std::thread;
use std::time::{Duration, Instant};

use super::{Camera, CameraError, CameraInfo};
use crate::frame::Frame;

const DEFAULT_EXPOSURE_US: u32 = 10_000;
const DEFAULT_FPS: u32 = 30;
const DISC_RADIUS: i64 = 50;
const DISC_STEP_PX: u64 = 5;

/// Simulated camera producing the test pattern at the configured frame rate.
#[derive(Debug)]
pub struct MockCamera {
    width: usize,
    height: usize,
    connected: bool,
    acquiring: bool,
    exposure_us: u32,
    gain_db: f64,
    fps: u32,
    frame_count: u64,
    last_frame_time: Option<Instant>,
}

impl MockCamera {
    /// Creates a disconnected mock camera.
    ///
    /// # Arguments
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    ///
    /// Exposure, gain and frame rate start at 10000 us, 0 dB and 30 fps.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            connected: false,
            acquiring: false,
            exposure_us: DEFAULT_EXPOSURE_US,
            gain_db: 0.0,
            fps: DEFAULT_FPS,
            frame_count: 0,
            last_frame_time: None,
        }
    }

    /// Number of frames produced since acquisition last started.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current exposure in microseconds.
    pub fn exposure_us(&self) -> u32 {
        self.exposure_us
    }

    /// Current gain in decibels.
    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Current frame rate, at least 1.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    // Sleeps for at most one frame interval.
    fn pace(&mut self) {
        let target = Duration::from_secs_f64(1.0 / f64::from(self.fps));
        if let Some(last) = self.last_frame_time {
            let elapsed = last.elapsed();
            if elapsed < target {
                thread::sleep(target - elapsed);
            }
        }
        self.last_frame_time = Some(Instant::now());
    }
}

impl Camera for MockCamera {
    fn connect(&mut self) -> Result<(), CameraError> {
        self.connected = true;
        log::info!("[MockCamera] Connected");
        Ok(())
    }

    fn disconnect(&mut self) {
        self.stop_acquisition();
        self.connected = false;
        log::info!("[MockCamera] Disconnected");
    }

    fn start_acquisition(&mut self) -> Result<(), CameraError> {
        if !self.connected {
            return Err(CameraError::NotConnected);
        }
        self.acquiring = true;
        self.frame_count = 0;
        self.last_frame_time = Some(Instant::now());
        log::info!("[MockCamera] Acquisition started");
        Ok(())
    }

    fn stop_acquisition(&mut self) {
        self.acquiring = false;
        log::info!("[MockCamera] Acquisition stopped");
    }

    fn get_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        if !self.acquiring {
            return Ok(None);
        }
        self.pace();
        self.frame_count += 1;
        render_frame(
            self.width,
            self.height,
            self.frame_count,
            self.exposure_us,
            self.gain_db,
        )
        .map(Some)
        .map_err(|e| CameraError::Device(e.to_string()))
    }

    fn set_exposure(&mut self, exposure_us: u32) -> Result<(), CameraError> {
        self.exposure_us = exposure_us;
        log::info!("[MockCamera] Exposure set to {exposure_us} us");
        Ok(())
    }

    fn set_gain(&mut self, gain_db: f64) -> Result<(), CameraError> {
        if !gain_db.is_finite() {
            return Err(CameraError::InvalidSetting(format!("gain {gain_db} dB")));
        }
        self.gain_db = gain_db;
        log::info!("[MockCamera] Gain set to {gain_db} dB");
        Ok(())
    }

    fn set_fps(&mut self, fps: u32) -> Result<(), CameraError> {
        self.fps = fps.max(1);
        log::info!("[MockCamera] FPS set to {fps}");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    fn info(&self) -> CameraInfo {
        CameraInfo {
            model: "Mock Camera".to_string(),
            serial: "MOCK-001".to_string(),
            vendor: "Simulator".to_string(),
        }
    }
}

/// Evenly spaced samples from `start` to `stop` inclusive, truncated to `u8`.
fn linspace_u8(start: f64, stop: f64, num: usize) -> Vec<u8> {
    match num {
        0 => Vec::new(),
        1 => vec![start as u8],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop as u8
                    } else {
                        (start + i as f64 * step) as u8
                    }
                })
                .collect()
        }
    }
}

/// Renders the mock test pattern for a given frame number.
///
/// Pure function of its arguments: the same frame number and settings always
/// produce the same single-channel frame.
///
/// # Arguments
/// * `width`, `height` - Frame size in pixels
/// * `frame_count` - Frame number; the disc centre sits at `5 * frame_count`
///   modulo the width
/// * `exposure_us`, `gain_db` - Settings that shift the overall brightness
///
/// # Returns
/// * `Frame` - One channel of `u8` intensities, every pixel clipped to 0..=255
pub fn render_frame(
    width: usize,
    height: usize,
    frame_count: u64,
    exposure_us: u32,
    gain_db: f64,
) -> Result<Frame, crate::FrameError> {
    let gradient_h = linspace_u8(0.0, 255.0, width);
    let gradient_v = linspace_u8(0.0, 128.0, height);

    let cx = if width == 0 {
        0
    } else {
        ((frame_count * DISC_STEP_PX) % width as u64) as i64
    };
    let cy = (height / 2) as i64;
    // Pixels clip to [0, 255], so an offset beyond +/-255 cannot change them.
    let brightness =
        ((gain_db * 10.0 + f64::from(exposure_us) / 100.0) as i32).clamp(-255, 255);

    let mut data = Vec::with_capacity(width * height);
    for (y, &gv) in gradient_v.iter().enumerate() {
        let dy = y as i64 - cy;
        for (x, &gh) in gradient_h.iter().enumerate() {
            let dx = x as i64 - cx;
            let base = if dx * dx + dy * dy < DISC_RADIUS * DISC_RADIUS {
                255
            } else {
                (i32::from(gh) + i32::from(gv) - 64).clamp(0, 255)
            };
            data.push((base + brightness - 100).clamp(0, 255) as u8);
        }
    }
    Frame::mono(height, width, data)
}
