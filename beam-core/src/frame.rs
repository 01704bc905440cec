//! # Frame Module
//!
//! Raw camera frames and the single-channel floating-point grid the
//! projection calculator works on.
//!
//! Frames are stored row-major with interleaved channels, so the sample for
//! pixel `(row, col)` and channel `c` lives at
//! `(row * width + col) * channels + c`.

use crate::error::FrameError;

/// A raw frame as delivered by a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Wraps an interleaved sample buffer of `height * width * channels` bytes.
    pub fn from_vec(
        height: usize,
        width: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if channels == 0 {
            return Err(FrameError::ZeroChannels);
        }
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(FrameError::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// Wraps a single-channel buffer.
    pub fn mono(height: usize, width: usize, data: Vec<u8>) -> Result<Self, FrameError> {
        Self::from_vec(height, width, 1, data)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at `(row, col)` for the given channel, if in bounds.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        if row >= self.height || col >= self.width || channel >= self.channels {
            return None;
        }
        self.data
            .get((row * self.width + col) * self.channels + channel)
            .copied()
    }
}

/// Single-channel `f64` samples in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Wraps row-major samples.
    ///
    /// # Returns
    /// * `Err(FrameError::SizeMismatch)` if `data.len() != rows * cols`
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, FrameError> {
        let expected = rows.checked_mul(cols).ok_or(FrameError::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, FrameError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(FrameError::SizeMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Samples of row `r`.
    ///
    /// # Panics
    /// * If `r >= self.rows()`
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row index out of bounds");
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }
}

/// Converts a frame to a single-channel `f64` grid.
///
/// Multi-channel frames keep channel 0 only. Mono cameras deliver identical
/// channels, so picking the first one avoids a per-pixel average.
pub fn to_grayscale(frame: &Frame) -> Grid {
    let data: Vec<f64> = if frame.channels == 1 {
        frame.data.iter().map(|&v| f64::from(v)).collect()
    } else {
        frame
            .data
            .chunks_exact(frame.channels)
            .map(|px| f64::from(px[0]))
            .collect()
    };
    Grid {
        rows: frame.height,
        cols: frame.width,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = Frame::from_vec(2, 3, 3, vec![0; 17]).unwrap_err();
        assert_eq!(
            err,
            FrameError::SizeMismatch {
                expected: 18,
                actual: 17
            }
        );
        assert_eq!(
            Frame::from_vec(2, 2, 0, vec![]).unwrap_err(),
            FrameError::ZeroChannels
        );
    }

    #[test]
    fn grayscale_uses_first_channel_only() {
        let (h, w) = (4, 5);
        let mut data = Vec::with_capacity(h * w * 3);
        for _ in 0..h * w {
            data.extend_from_slice(&[100, 150, 200]);
        }
        let frame = Frame::from_vec(h, w, 3, data).expect("valid frame");

        let gray = to_grayscale(&frame);
        assert_eq!(gray.rows(), h);
        assert_eq!(gray.cols(), w);
        assert!(gray.data().iter().all(|&v| v == 100.0));
    }

    #[test]
    fn grayscale_of_mono_frame_is_a_cast() {
        let frame = Frame::mono(2, 3, vec![0, 1, 2, 253, 254, 255]).expect("valid frame");
        let gray = to_grayscale(&frame);
        assert_eq!(gray.data(), &[0.0, 1.0, 2.0, 253.0, 254.0, 255.0]);
        assert_eq!(gray.get(1, 2), Some(255.0));
        assert_eq!(gray.row(0), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn frame_indexing_is_interleaved() {
        let frame = Frame::from_vec(1, 2, 2, vec![1, 2, 3, 4]).expect("valid frame");
        assert_eq!(frame.get(0, 1, 0), Some(3));
        assert_eq!(frame.get(0, 1, 1), Some(4));
        assert_eq!(frame.get(0, 2, 0), None);
    }

    #[test]
    fn grid_from_ragged_rows_fails() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Grid::from_rows(&rows).is_err());
    }
}
