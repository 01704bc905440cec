//! # Profile Statistics Module
//!
//! Descriptive statistics of a 1-D profile and its Full Width at Half Maximum.
//!
//! ## Half maximum
//! The half-maximum level is the midpoint between the peak and the profile
//! minimum (the baseline): `(peak + min) / 2`. Crossings are searched
//! outward from the peak and located with linear interpolation between the
//! two samples that straddle the level, giving sub-pixel positions.

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Minimum number of samples needed to attempt an FWHM measurement.
pub const MIN_FWHM_SAMPLES: usize = 3;

/// Full Width at Half Maximum with its crossing positions (in samples).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fwhm {
    /// `right - left`
    pub width: f64,
    /// Interpolated crossing left of the peak.
    pub left: f64,
    /// Interpolated crossing right of the peak.
    pub right: f64,
}

/// Statistics of a single projection profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistics {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Index of the first occurrence of the maximum.
    pub peak_pos: usize,
    /// Absent when no crossing pair exists.
    pub fwhm: Option<Fwhm>,
}

// Flat accessors for callers that report the three FWHM values separately.
impl ProfileStatistics {
    pub fn fwhm_width(&self) -> Option<f64> {
        self.fwhm.map(|f| f.width)
    }

    pub fn fwhm_left(&self) -> Option<f64> {
        self.fwhm.map(|f| f.left)
    }

    pub fn fwhm_right(&self) -> Option<f64> {
        self.fwhm.map(|f| f.right)
    }
}

/// Index and value of the first maximum. `data` must not be empty.
fn argmax(data: &[f64]) -> (usize, f64) {
    let mut best = (0, data[0]);
    for (i, &v) in data.iter().enumerate().skip(1) {
        // strict comparison keeps the earliest index on ties
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

fn min_value(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Calculates the Full Width at Half Maximum of a profile.
///
/// # Returns
/// * `Some(fwhm)` - both half-maximum crossings were found
/// * `None` - fewer than three samples, or a crossing is missing on either side
///   of the peak (flat profiles and peaks on the first sample end up here)
pub fn compute_fwhm(data: &[f64]) -> Option<Fwhm> {
    if data.len() < MIN_FWHM_SAMPLES {
        return None;
    }

    let (peak_idx, peak_val) = argmax(data);
    let half_max = (peak_val + min_value(data)) / 2.0;

    let left = (1..=peak_idx).rev().find_map(|i| {
        let (lo, hi) = (data[i - 1], data[i]);
        (lo <= half_max && half_max <= hi).then(|| {
            if hi != lo {
                (i - 1) as f64 + (half_max - lo) / (hi - lo)
            } else {
                i as f64
            }
        })
    })?;

    let right = (peak_idx..data.len() - 1).find_map(|i| {
        let (hi, lo) = (data[i], data[i + 1]);
        (hi >= half_max && half_max >= lo).then(|| {
            if hi != lo {
                i as f64 + (hi - half_max) / (hi - lo)
            } else {
                i as f64
            }
        })
    })?;

    Some(Fwhm {
        width: right - left,
        left,
        right,
    })
}

/// Calculates mean, population standard deviation, extrema, peak position
/// and FWHM of a profile.
pub fn compute_statistics(data: &[f64]) -> Result<ProfileStatistics, ProjectionError> {
    if data.is_empty() {
        return Err(ProjectionError::EmptyProfile);
    }

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let (peak_pos, max) = argmax(data);

    Ok(ProfileStatistics {
        mean,
        std: variance.sqrt(),
        min: min_value(data),
        max,
        peak_pos,
        fwhm: compute_fwhm(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn gaussian(len: usize, center: f64, sigma: f64) -> Vec<f64> {
        (0..len)
            .map(|x| (-0.5 * ((x as f64 - center) / sigma).powi(2)).exp())
            .collect()
    }

    #[test]
    fn gaussian_fwhm_matches_theory() {
        let sigma = 10.0;
        let profile = gaussian(100, 50.0, sigma);

        let fwhm = compute_fwhm(&profile).expect("gaussian has a fwhm");
        // 2 * sqrt(2 ln 2) * sigma
        assert_abs_diff_eq!(fwhm.width, 2.3548 * sigma, epsilon = 0.5);
        assert_eq!(fwhm.width, fwhm.right - fwhm.left);
    }

    #[test]
    fn gaussian_crossings_are_symmetric() {
        let center = 50.0;
        let profile = gaussian(100, center, 10.0);

        let fwhm = compute_fwhm(&profile).expect("gaussian has a fwhm");
        assert_abs_diff_eq!(center - fwhm.left, fwhm.right - center, epsilon = 0.5);
        assert!(fwhm.right >= fwhm.left && fwhm.left >= 0.0);
    }

    #[test]
    fn half_max_is_relative_to_baseline() {
        // baseline 10, peak 30 -> level 20, crossed exactly at indices 1 and 3
        let profile = [10.0, 20.0, 30.0, 20.0, 10.0];
        let fwhm = compute_fwhm(&profile).expect("peak with baseline");
        assert_eq!(fwhm.left, 1.0);
        assert_eq!(fwhm.right, 3.0);
        assert_eq!(fwhm.width, 2.0);
    }

    #[test]
    fn crossings_are_interpolated() {
        // level = 5; left between 0 (0) and 1 (8), right between 3 (8) and 4 (0)
        let profile = [0.0, 8.0, 10.0, 8.0, 0.0];
        let fwhm = compute_fwhm(&profile).unwrap();
        assert_relative_eq!(fwhm.left, 0.625);
        assert_relative_eq!(fwhm.right, 3.375);
        assert_relative_eq!(fwhm.width, 2.75);
    }

    #[test]
    fn offset_profile_uses_midpoint_not_half_peak() {
        // min 100, peak 200 -> level 150 (half the peak alone would be 100)
        let profile = [100.0, 100.0, 140.0, 200.0, 140.0, 100.0, 100.0];
        let fwhm = compute_fwhm(&profile).unwrap();
        assert_relative_eq!(fwhm.left, 2.0 + 10.0 / 60.0);
        assert_relative_eq!(fwhm.right, 3.0 + 50.0 / 60.0);
        assert_relative_eq!(fwhm.width, fwhm.right - fwhm.left);
    }

    #[test]
    fn short_profile_has_no_fwhm() {
        assert_eq!(compute_fwhm(&[1.0, 2.0]), None);
        assert_eq!(compute_fwhm(&[]), None);
    }

    #[test]
    fn peak_on_first_sample_has_no_left_crossing() {
        let profile = [100.0, 80.0, 60.0, 40.0, 20.0];
        assert_eq!(compute_fwhm(&profile), None);
    }

    #[test]
    fn flat_profile_has_no_fwhm() {
        let profile = vec![1.0; 100];
        assert_eq!(compute_fwhm(&profile), None);
    }

    #[test]
    fn plateau_peak_uses_first_maximum() {
        let profile = [0.0, 10.0, 10.0, 10.0, 0.0];
        let stats = compute_statistics(&profile).unwrap();
        assert_eq!(stats.peak_pos, 1);
        let fwhm = stats.fwhm.unwrap();
        assert_relative_eq!(fwhm.left, 0.5);
        // right scan starts at the first maximum and walks across the plateau
        assert_relative_eq!(fwhm.right, 3.5);
    }

    #[test]
    fn basic_statistics() {
        let stats = compute_statistics(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.peak_pos, 4);
        assert_abs_diff_eq!(stats.std, 2.0_f64.sqrt(), epsilon = 1e-4);
        // the ramp peaks on its last sample, so there is no right crossing
        assert_eq!(stats.fwhm, None);
        assert_eq!(stats.fwhm_left(), None);
        assert_eq!(stats.fwhm_right(), None);
    }

    #[test]
    fn statistics_carry_fwhm_fields() {
        let profile = gaussian(64, 31.5, 4.0);
        let stats = compute_statistics(&profile).unwrap();
        let fwhm = compute_fwhm(&profile).unwrap();
        assert_eq!(stats.fwhm_width(), Some(fwhm.width));
        assert_eq!(stats.fwhm_left(), Some(fwhm.left));
        assert_eq!(stats.fwhm_right(), Some(fwhm.right));
    }

    #[test]
    fn statistics_are_deterministic() {
        let profile = gaussian(200, 80.3, 12.0);
        assert_eq!(
            compute_statistics(&profile).unwrap(),
            compute_statistics(&profile).unwrap()
        );
    }

    #[test]
    fn empty_profile_is_an_error() {
        assert_eq!(compute_statistics(&[]), Err(ProjectionError::EmptyProfile));
    }
}
