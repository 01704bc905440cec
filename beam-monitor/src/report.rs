//! # Report Module
//!
//! Turns per-frame analysis results into the lines the monitor prints, and
//! keeps the frame-rate statistics.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use beam_core::{AxisAnalysis, AxisConfig, ProfileStatistics};
use serde::Serialize;

/// Window over which the frame rate is averaged.
const FPS_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
struct AxisReport<'a> {
    #[serde(flatten)]
    config: AxisConfig,
    samples: usize,
    stats: &'a ProfileStatistics,
}

#[derive(Debug, Serialize)]
struct FrameReport<'a> {
    frame: u64,
    x: AxisReport<'a>,
    y: AxisReport<'a>,
}

/// Formats one frame as a single JSON object.
pub fn json_line(
    frame: u64,
    x: &AxisAnalysis,
    x_config: AxisConfig,
    y: &AxisAnalysis,
    y_config: AxisConfig,
) -> serde_json::Result<String> {
    serde_json::to_string(&FrameReport {
        frame,
        x: AxisReport {
            config: x_config,
            samples: x.profile.len(),
            stats: &x.stats,
        },
        y: AxisReport {
            config: y_config,
            samples: y.profile.len(),
            stats: &y.stats,
        },
    })
}

/// Formats one frame as a human readable line.
pub fn text_line(
    frame: u64,
    x: &AxisAnalysis,
    x_config: AxisConfig,
    y: &AxisAnalysis,
    y_config: AxisConfig,
) -> String {
    let mut line = format!("frame {frame:>6}");
    for (analysis, config) in [(x, x_config), (y, y_config)] {
        let s = &analysis.stats;
        let norm = if config.normalize { ",norm" } else { "" };
        // Writing into a String cannot fail.
        let _ = write!(
            line,
            " | {}[{}{}] peak={} mean={:.3} std={:.3} fwhm=",
            analysis.axis, config.mode, norm, s.peak_pos, s.mean, s.std
        );
        match s.fwhm {
            Some(f) => {
                let _ = write!(line, "{:.2} ({:.2}..{:.2})", f.width, f.left, f.right);
            }
            None => line.push_str("n/a"),
        }
    }
    line
}

/// Counts frames and reports the rate once per window.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    /// Starts the first window at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Records a frame; returns the frame rate when a window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_WINDOW {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_core::{Axis, Fwhm, ProjectionMode};

    fn analysis(axis: Axis, fwhm: Option<Fwhm>) -> AxisAnalysis {
        AxisAnalysis {
            axis,
            profile: vec![0.0, 1.0, 0.0],
            stats: ProfileStatistics {
                mean: 1.0 / 3.0,
                std: 0.4714,
                min: 0.0,
                max: 1.0,
                peak_pos: 1,
                fwhm,
            },
        }
    }

    #[test]
    fn text_line_lists_both_axes() {
        let fwhm = Fwhm {
            width: 1.0,
            left: 0.5,
            right: 1.5,
        };
        let x = analysis(Axis::X, Some(fwhm));
        let y = analysis(Axis::Y, None);
        let x_cfg = AxisConfig {
            mode: ProjectionMode::Sum,
            normalize: true,
        };
        let line = text_line(7, &x, x_cfg, &y, AxisConfig::default());
        assert_eq!(
            line,
            "frame      7 | X[sum,norm] peak=1 mean=0.333 std=0.471 fwhm=1.00 (0.50..1.50) \
             | Y[avg] peak=1 mean=0.333 std=0.471 fwhm=n/a"
        );
    }

    #[test]
    fn json_line_is_a_single_object() {
        let x = analysis(Axis::X, None);
        let y = analysis(Axis::Y, None);
        let line = json_line(3, &x, AxisConfig::default(), &y, AxisConfig::default()).unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["frame"], 3);
        assert_eq!(value["x"]["mode"], "avg");
        assert_eq!(value["x"]["normalize"], false);
        assert_eq!(value["y"]["samples"], 3);
        assert_eq!(value["y"]["stats"]["peak_pos"], 1);
        assert!(value["y"]["stats"]["fwhm"].is_null());
    }

    #[test]
    fn fps_is_reported_once_per_window() {
        let start = Instant::now();
        let mut fps = FpsCounter::new(start);
        for i in 1..30 {
            assert_eq!(fps.tick(start + Duration::from_millis(i * 33)), None);
        }
        let rate = fps.tick(start + Duration::from_secs(1)).expect("window elapsed");
        assert!((rate - 30.0).abs() < 1e-9);
        // counter restarts for the next window
        assert_eq!(fps.tick(start + Duration::from_millis(1500)), None);
    }
}
