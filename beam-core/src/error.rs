//! Error types shared by the frame and projection modules.

/// Raised when a frame buffer does not describe a valid image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame buffer size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("frame must have at least one channel")]
    ZeroChannels,
}

/// Raised when a projection or statistics call receives unusable input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("cannot project an empty grid ({rows} rows x {cols} columns)")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("cannot compute statistics of an empty profile")]
    EmptyProfile,
    #[error("invalid projection axis {0}, expected 0 or 1")]
    InvalidAxis(usize),
}
