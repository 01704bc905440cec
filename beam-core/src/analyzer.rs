//! # Analyzer Module
//!
//! Turns a camera frame into a profile and its statistics for each axis.
//!
//! The pipeline per axis is: grayscale extraction, projection with the
//! axis' mode, optional normalization, statistics. Statistics are computed on
//! the normalized profile when normalization is enabled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::frame::{Frame, Grid, to_grayscale};
use crate::projection::{ProjectionMode, ReduceAxis, normalize, project};
use crate::statistics::{ProfileStatistics, compute_statistics};

/// Display axis of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Intensity versus column (rows collapsed), drawn below the image.
    X,
    /// Intensity versus row (columns collapsed), drawn left of the image.
    Y,
}

impl Axis {
    /// Grid axis collapsed to produce this axis' profile.
    pub fn reduce_axis(self) -> ReduceAxis {
        match self {
            Axis::X => ReduceAxis::Rows,
            Axis::Y => ReduceAxis::Columns,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("X"),
            Axis::Y => f.write_str("Y"),
        }
    }
}

/// Projection settings of one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub mode: ProjectionMode,
    pub normalize: bool,
}

/// Profile and statistics of one axis of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisAnalysis {
    pub axis: Axis,
    pub profile: Vec<f64>,
    pub stats: ProfileStatistics,
}

/// Analyzes one axis of a frame with the given settings.
///
/// # Arguments
/// * `frame` - Camera frame; only channel 0 is used
/// * `axis` - Which profile to build
/// * `config` - Projection mode and normalization for that axis
///
/// # Returns
/// * `AxisAnalysis` - The profile and its statistics
/// * `Err(ProjectionError::EmptyGrid)` if the frame has no rows or columns
pub fn analyze_axis(
    frame: &Frame,
    axis: Axis,
    config: AxisConfig,
) -> Result<AxisAnalysis, ProjectionError> {
    analyze_grid(&to_grayscale(frame), axis, config)
}

fn analyze_grid(
    gray: &Grid,
    axis: Axis,
    config: AxisConfig,
) -> Result<AxisAnalysis, ProjectionError> {
    let mut profile = project(gray, axis.reduce_axis(), config.mode)?;
    if config.normalize {
        profile = normalize(&profile);
    }
    let stats = compute_statistics(&profile)?;
    Ok(AxisAnalysis {
        axis,
        profile,
        stats,
    })
}

/// Per-axis settings held by the owning layer.
///
/// Setters are the only mutation points; analysis never changes the
/// configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,
}

impl AnalyzerConfig {
    /// Current settings of `axis`.
    pub fn axis(&self, axis: Axis) -> AxisConfig {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisConfig {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Selects the projection mode used for `axis` from the next frame on.
    pub fn set_mode(&mut self, axis: Axis, mode: ProjectionMode) {
        log::debug!("[ANALYZER] {axis} projection mode set to {mode}");
        self.axis_mut(axis).mode = mode;
    }

    /// Enables or disables peak normalization for `axis`.
    pub fn set_normalize(&mut self, axis: Axis, normalize: bool) {
        log::debug!("[ANALYZER] {axis} normalization set to {normalize}");
        self.axis_mut(axis).normalize = normalize;
    }

    /// Profile along the columns, with the rows collapsed.
    pub fn analyze_x(&self, frame: &Frame) -> Result<AxisAnalysis, ProjectionError> {
        analyze_axis(frame, Axis::X, self.x)
    }

    /// Profile along the rows, with the columns collapsed.
    pub fn analyze_y(&self, frame: &Frame) -> Result<AxisAnalysis, ProjectionError> {
        analyze_axis(frame, Axis::Y, self.y)
    }

    /// Analyzes both axes, extracting the grayscale grid only once.
    pub fn analyze(&self, frame: &Frame) -> Result<(AxisAnalysis, AxisAnalysis), ProjectionError> {
        let gray = to_grayscale(frame);
        let x = analyze_grid(&gray, Axis::X, self.x)?;
        let y = analyze_grid(&gray, Axis::Y, self.y)?;
        Ok((x, y))
    }
}
