//! # Acquisition Module
//!
//! Relays frames from a camera to the analysis/display thread.
//!
//! ## Architecture
//! - **Acquisition thread**: owns the camera and pulls frames in a loop
//! - **Communication**: crossbeam channels carry frames out and the shutdown
//!   signal in
//! - **Shutdown**: cooperative; the loop checks the signal between frames and
//!   `stop` joins the thread and returns the camera to its owner

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::camera::Camera;
use crate::frame::Frame;

/// Back-off after the camera reports that no frame is ready.
const IDLE_BACKOFF: Duration = Duration::from_millis(1);

/// Messages sent from the acquisition thread to the consumer.
#[derive(Debug)]
pub enum AcquisitionEvent {
    /// A completed frame, in acquisition order.
    Frame(Frame),
    /// The camera failed; the acquisition loop has exited.
    Error(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    #[error("acquisition thread panicked")]
    WorkerPanicked,
}

/// Handle to a running acquisition thread.
#[derive(Debug)]
pub struct AcquisitionWorker {
    shutdown_tx: Sender<()>,
    thread_handle: JoinHandle<Box<dyn Camera>>,
}

impl AcquisitionWorker {
    /// Moves `camera` onto a dedicated thread and starts relaying frames to
    /// `events`.
    ///
    /// The camera should already be connected and acquiring; a camera that
    /// returns no frames simply keeps the loop idle until shutdown.
    pub fn spawn(camera: Box<dyn Camera>, events: Sender<AcquisitionEvent>) -> Self {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let thread_handle = thread::spawn(move || run_loop(camera, &events, &shutdown_rx));
        Self {
            shutdown_tx,
            thread_handle,
        }
    }

    /// Signals the loop to stop, waits for it and hands the camera back.
    pub fn stop(self) -> Result<Box<dyn Camera>, AcquisitionError> {
        log::debug!("[ACQ] Shutting down acquisition worker...");
        // The loop may already have exited and dropped the receiver.
        let _ = self.shutdown_tx.try_send(());
        let camera = self
            .thread_handle
            .join()
            .map_err(|_| AcquisitionError::WorkerPanicked)?;
        log::debug!("[ACQ] Acquisition worker joined");
        Ok(camera)
    }
}

fn run_loop(
    mut camera: Box<dyn Camera>,
    events: &Sender<AcquisitionEvent>,
    shutdown_rx: &Receiver<()>,
) -> Box<dyn Camera> {
    log::info!("[ACQ-THREAD] Entering acquisition loop...");
    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                log::info!("[ACQ-THREAD] Received shutdown signal");
                break;
            }
            Err(TryRecvError::Empty) => {}
        }

        match camera.get_frame() {
            Ok(Some(frame)) => {
                if events.send(AcquisitionEvent::Frame(frame)).is_err() {
                    log::warn!("[ACQ-THREAD] Frame receiver dropped");
                    break;
                }
            }
            Ok(None) => thread::sleep(IDLE_BACKOFF),
            Err(e) => {
                log::error!("[ACQ-THREAD] Camera error: {e}");
                let _ = events.send(AcquisitionEvent::Error(e.to_string()));
                break;
            }
        }
    }
    log::info!("[ACQ-THREAD] Acquisition thread finished");
    camera
}
