//! # Beam Monitor - headless beam profiler
//!
//! Drives camera acquisition and reports the X/Y projection statistics of
//! every frame on stdout.
//!
//! ## Architecture
//! - **Main Thread**: analysis and reporting
//! - **Acquisition Thread**: owns the camera and pulls frames
//! - **Communication**: crossbeam channels for frames and the shutdown signal
//!
//! Configuration comes from environment variables (see `beam_core::config`);
//! `RUST_LOG` controls log verbosity.

mod report;

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use beam_core::{
    AcquisitionEvent, AcquisitionWorker, AnalyzerConfig, AppConfig, Camera, Frame, MockCamera,
};
use crossbeam_channel::Receiver;
use report::FpsCounter;

/// Main entry point for the beam monitor.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("[MAIN] Starting beam monitor...");

    let config = AppConfig::from_env().context("failed to load configuration")?;
    log::debug!("[MAIN] Configuration: {config:?}");

    let mut monitor = Monitor::new(config);
    monitor.start_acquisition()?;
    let result = monitor.run();
    monitor.stop_acquisition();

    log::info!("[MAIN] Monitor finished after {} frame(s)", monitor.frames_seen);
    result
}

/// Picks the frame source.
///
/// Only the mock camera is built in; a hardware request falls back to it
/// with a warning.
fn select_camera(config: &AppConfig) -> Box<dyn Camera> {
    if config.mock_camera {
        log::info!("[MAIN] Using mock camera (mock mode enabled)");
    } else {
        log::warn!(
            "[MAIN] No hardware camera backend available (serial {:?}) - using mock camera",
            config.camera.serial
        );
    }
    let camera = MockCamera::new(config.display.width, config.display.height);
    let info = camera.info();
    log::info!(
        "[MAIN] Camera: {} (serial {}, vendor {})",
        info.model,
        info.serial,
        info.vendor
    );
    Box::new(camera)
}

/// State of a monitoring session.
struct Monitor {
    config: AppConfig,
    analyzer: AnalyzerConfig,
    worker: Option<AcquisitionWorker>,
    events: Option<Receiver<AcquisitionEvent>>,
    fps: FpsCounter,
    frames_seen: u64,
}

impl Monitor {
    fn new(config: AppConfig) -> Self {
        Self {
            analyzer: config.analyzer,
            config,
            worker: None,
            events: None,
            fps: FpsCounter::new(Instant::now()),
            frames_seen: 0,
        }
    }

    /// Connects the camera, applies the settings and spawns the
    /// acquisition thread.
    fn start_acquisition(&mut self) -> Result<()> {
        let mut camera = select_camera(&self.config);
        let cam_cfg = &self.config.camera;
        camera.connect().context("failed to connect camera")?;
        camera.set_exposure(cam_cfg.exposure_us)?;
        camera.set_gain(cam_cfg.gain_db)?;
        camera.set_fps(cam_cfg.fps)?;
        camera
            .start_acquisition()
            .context("failed to start acquisition")?;

        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        self.worker = Some(AcquisitionWorker::spawn(camera, events_tx));
        self.events = Some(events_rx);
        self.fps = FpsCounter::new(Instant::now());
        self.frames_seen = 0;
        Ok(())
    }

    /// Stops the acquisition thread and releases the camera.
    fn stop_acquisition(&mut self) {
        if let Some(worker) = self.worker.take() {
            match worker.stop() {
                Ok(mut camera) => {
                    camera.stop_acquisition();
                    camera.disconnect();
                }
                Err(e) => log::error!("[MAIN] {e}"),
            }
        }
        self.events = None;
    }

    /// Reports frames until the frame limit is reached or acquisition fails.
    fn run(&mut self) -> Result<()> {
        let events = self
            .events
            .clone()
            .ok_or_else(|| anyhow!("acquisition is not running"))?;
        let mut out = io::stdout().lock();

        for event in events.iter() {
            match event {
                AcquisitionEvent::Frame(frame) => {
                    self.process_frame(&frame, &mut out)?;
                    if self
                        .config
                        .monitor
                        .frame_limit
                        .is_some_and(|limit| self.frames_seen >= limit)
                    {
                        break;
                    }
                }
                AcquisitionEvent::Error(message) => {
                    log::error!("[MAIN] Acquisition error: {message}");
                    out.flush()?;
                    return Err(anyhow!("acquisition stopped: {message}"));
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    fn process_frame(&mut self, frame: &Frame, out: &mut impl Write) -> Result<()> {
        self.frames_seen += 1;
        let (x, y) = self.analyzer.analyze(frame)?;

        let line = if self.config.monitor.json {
            report::json_line(self.frames_seen, &x, self.analyzer.x, &y, self.analyzer.y)?
        } else {
            report::text_line(self.frames_seen, &x, self.analyzer.x, &y, self.analyzer.y)
        };
        writeln!(out, "{line}")?;
        // One flushed line per frame.
        out.flush()?;

        if let Some(rate) = self.fps.tick(Instant::now()) {
            log::info!("[MAIN] {rate:.1} fps, {} frames", self.frames_seen);
        }
        Ok(())
    }
}
