//! # Projection Module
//!
//! Reduces a 2-D intensity grid to a 1-D profile along one axis.
//!
//! ## Axes
//! - `ReduceAxis::Rows` (axis 0) collapses rows: one value per column, the X profile.
//! - `ReduceAxis::Columns` (axis 1) collapses columns: one value per row, the Y profile.
//!
//! All reductions accumulate in `f64` regardless of the sample width.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::frame::Grid;

/// How the samples along the collapsed axis are reduced to one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Sum of the samples (true projection / integral)
    Sum,
    /// Minimum sample
    Min,
    /// Maximum sample
    Max,
    /// Mean sample
    #[default]
    #[serde(rename = "avg")]
    Average,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 4] = [
        ProjectionMode::Sum,
        ProjectionMode::Min,
        ProjectionMode::Max,
        ProjectionMode::Average,
    ];

    /// Short name used by controls and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionMode::Sum => "sum",
            ProjectionMode::Min => "min",
            ProjectionMode::Max => "max",
            ProjectionMode::Average => "avg",
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown projection mode '{0}', expected one of sum, min, max, avg")]
pub struct ParseModeError(pub String);

impl FromStr for ProjectionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(ProjectionMode::Sum),
            "min" => Ok(ProjectionMode::Min),
            "max" => Ok(ProjectionMode::Max),
            "avg" | "average" => Ok(ProjectionMode::Average),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// The grid dimension that is collapsed by a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceAxis {
    /// Axis 0: collapse rows, result indexed by column.
    Rows,
    /// Axis 1: collapse columns, result indexed by row.
    Columns,
}

impl TryFrom<usize> for ReduceAxis {
    type Error = ProjectionError;

    fn try_from(axis: usize) -> Result<Self, Self::Error> {
        match axis {
            0 => Ok(ReduceAxis::Rows),
            1 => Ok(ReduceAxis::Columns),
            other => Err(ProjectionError::InvalidAxis(other)),
        }
    }
}

/// Calculates the 1-D projection of `grid` along `axis`.
///
/// # Returns
/// * `Ok(profile)` - `grid.cols()` values for `Rows`, `grid.rows()` values for `Columns`
/// * `Err(ProjectionError::EmptyGrid)` - the grid has no rows or no columns
pub fn project(
    grid: &Grid,
    axis: ReduceAxis,
    mode: ProjectionMode,
) -> Result<Vec<f64>, ProjectionError> {
    let (rows, cols) = (grid.rows(), grid.cols());
    if rows == 0 || cols == 0 {
        return Err(ProjectionError::EmptyGrid { rows, cols });
    }

    let profile = match axis {
        ReduceAxis::Rows => {
            let mut acc = grid.row(0).to_vec();
            for r in 1..rows {
                for (a, &v) in acc.iter_mut().zip(grid.row(r)) {
                    *a = combine(mode, *a, v);
                }
            }
            if mode == ProjectionMode::Average {
                let n = rows as f64;
                acc.iter_mut().for_each(|a| *a /= n);
            }
            acc
        }
        ReduceAxis::Columns => (0..rows)
            .map(|r| reduce(mode, grid.row(r)))
            .collect(),
    };
    Ok(profile)
}

fn combine(mode: ProjectionMode, acc: f64, v: f64) -> f64 {
    match mode {
        ProjectionMode::Sum | ProjectionMode::Average => acc + v,
        ProjectionMode::Min => acc.min(v),
        ProjectionMode::Max => acc.max(v),
    }
}

// `values` is never empty here.
fn reduce(mode: ProjectionMode, values: &[f64]) -> f64 {
    let folded = values[1..]
        .iter()
        .fold(values[0], |acc, &v| combine(mode, acc, v));
    if mode == ProjectionMode::Average {
        folded / values.len() as f64
    } else {
        folded
    }
}

/// Scales a profile so that its maximum becomes exactly 1.0.
///
/// When the maximum is zero or negative the profile is returned unchanged,
/// as a copy.
pub fn normalize(profile: &[f64]) -> Vec<f64> {
    let max = profile.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        profile.iter().map(|&v| v / max).collect()
    } else {
        profile.to_vec()
    }
}
