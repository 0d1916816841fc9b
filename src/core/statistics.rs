use crate::types::NOISE_FLOOR_CI;
use ndarray::ArrayView2;

/// Mean, population standard deviation and coefficient of variation of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStatistics {
    pub mean: f64,
    pub std_dev: f64,
    /// `std_dev / mean`, not floor-substituted
    pub ci: f64,
}

impl WindowStatistics {
    /// Compute statistics over a window view.
    ///
    /// Two passes over the view (mean, then squared deviations) so nothing
    /// is allocated per pixel. The deviation is the population one, divided
    /// by the element count.
    #[inline]
    pub fn from_window(window: &ArrayView2<f64>) -> Self {
        let count = window.len() as f64;
        if window.is_empty() {
            return Self { mean: 0.0, std_dev: 0.0, ci: f64::NAN };
        }

        let mean = window.iter().sum::<f64>() / count;
        let variance = window
            .iter()
            .map(|&v| (v - mean) * (v - mean))
            .sum::<f64>()
            / count;
        let std_dev = variance.sqrt();

        Self { mean, std_dev, ci: std_dev / mean }
    }

    /// Coefficient of variation fed to the weighting functions.
    ///
    /// Zero-mean, zero-variance and undefined (NaN) windows fall back to
    /// [`NOISE_FLOOR_CI`]. Every variant goes through this.
    #[inline]
    pub fn effective_ci(&self) -> f64 {
        if self.mean == 0.0 || self.ci == 0.0 || self.ci.is_nan() {
            NOISE_FLOOR_CI
        } else {
            self.ci
        }
    }
}
