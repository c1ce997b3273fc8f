//! Median / MAD primitives over series that may contain missing values.

/// Scale factor making MAD z-scores comparable to standard-normal z-scores.
pub const MAD_Z_SCALE: f64 = 0.6745;

/// Substitute spread used when a series has a MAD of exactly zero.
pub const MAD_FLOOR: f64 = 1e-9;

/// Median of the present (non-`NaN`) values, or `None` if there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Median absolute deviation around `center`, ignoring missing values.
pub fn mad(values: &[f64], center: f64) -> Option<f64> {
    let deviations: Vec<f64> = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| (v - center).abs())
        .collect();
    median(&deviations)
}

/// Robust z-score of every value: `0.6745 * (x - median) / mad`.
///
/// A zero MAD is replaced by [`MAD_FLOOR`], so a constant series scores 0
/// everywhere. Missing inputs stay missing; an all-missing series yields
/// all `NaN`.
pub fn robust_zscores(values: &[f64]) -> Vec<f64> {
    let Some(center) = median(values) else {
        return vec![f64::NAN; values.len()];
    };
    let mut spread = mad(values, center).unwrap_or(MAD_FLOOR);
    if spread == 0.0 {
        spread = MAD_FLOOR;
    }
    values
        .iter()
        .map(|&x| MAD_Z_SCALE * (x - center) / spread)
        .collect()
}

/// Largest absolute value among the present values, `NaN` if none.
pub fn peak_abs(values: &[f64]) -> f64 {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| v.abs())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(f64::NAN)
}
