//! Adaptive blend weights for the Lee family of speckle filters
//!
//! Every variant maps the local coefficient of variation `ci` to a weight in
//! [0, 1]. Low `ci` means homogeneous terrain where the window mean is safe;
//! high `ci` means an edge or strong scatterer where the original pixel has
//! to survive.

use super::params::{FilterVariant, KuanParams, LeeEnhancedParams, LeeParams};
use super::statistics::WindowStatistics;
use crate::types::{SpeckleResult, NOISE_FLOOR_CI};
use ndarray::ArrayView2;

/// Used in place of a zero Kuan divisor
const KUAN_DIVISOR_FLOOR: f64 = 0.0001;

/// `ci²`, floored when a tiny non-zero `ci` underflows to zero
#[inline]
fn squared_ci(ci: f64) -> f64 {
    let two_ci = ci * ci;
    if two_ci == 0.0 {
        NOISE_FLOOR_CI * NOISE_FLOOR_CI
    } else {
        two_ci
    }
}

/// A weighting rule the filter engine can drive.
///
/// The engine is generic over this trait so the variant is chosen once per
/// call and the weight function is inlined into the pixel loop.
pub trait AdaptiveWeight: Sync {
    /// Blend weight for an (already floor-substituted) coefficient of variation
    fn weight(&self, ci: f64) -> f64;

    /// Combine pixel and window mean. Default orientation: `w_t` on the pixel.
    #[inline]
    fn blend(&self, pixel: f64, mean: f64, w_t: f64) -> f64 {
        pixel * w_t + mean * (1.0 - w_t)
    }

    /// Filtered values must be >= 0 before rounding
    fn requires_non_negative(&self) -> bool {
        false
    }

    fn validate(&self) -> SpeckleResult<()>;
}

impl AdaptiveWeight for LeeParams {
    #[inline]
    fn weight(&self, ci: f64) -> f64 {
        let two_cu = self.cu * self.cu;
        let two_ci = squared_ci(ci);
        if self.cu > ci {
            0.0
        } else {
            1.0 - two_cu / two_ci
        }
    }

    fn validate(&self) -> SpeckleResult<()> {
        FilterVariant::Lee(*self).validate()
    }
}

impl AdaptiveWeight for KuanParams {
    #[inline]
    fn weight(&self, ci: f64) -> f64 {
        let two_cu = self.cu * self.cu;
        let two_ci = squared_ci(ci);
        let mut divisor = 1.0 + two_cu;
        if divisor == 0.0 {
            divisor = KUAN_DIVISOR_FLOOR;
        }
        if self.cu > ci {
            0.0
        } else {
            (1.0 - two_cu / two_ci) / divisor
        }
    }

    fn validate(&self) -> SpeckleResult<()> {
        FilterVariant::Kuan(*self).validate()
    }
}

impl AdaptiveWeight for LeeEnhancedParams {
    /// 1 in homogeneous regions, 0 at edges, exponential decay in between
    #[inline]
    fn weight(&self, ci: f64) -> f64 {
        if ci <= self.cu {
            1.0
        } else if ci < self.cmax {
            (-self.k * (ci - self.cu) / (self.cmax - ci)).exp()
        } else {
            0.0
        }
    }

    /// Here `w_t` sits on the mean: a weight of 1 returns the mean.
    #[inline]
    fn blend(&self, pixel: f64, mean: f64, w_t: f64) -> f64 {
        mean * w_t + pixel * (1.0 - w_t)
    }

    fn requires_non_negative(&self) -> bool {
        true
    }

    fn validate(&self) -> SpeckleResult<()> {
        FilterVariant::LeeEnhanced(*self).validate()
    }
}

impl AdaptiveWeight for FilterVariant {
    fn weight(&self, ci: f64) -> f64 {
        match self {
            FilterVariant::Lee(p) => p.weight(ci),
            FilterVariant::Kuan(p) => p.weight(ci),
            FilterVariant::LeeEnhanced(p) => p.weight(ci),
        }
    }

    fn blend(&self, pixel: f64, mean: f64, w_t: f64) -> f64 {
        match self {
            FilterVariant::Lee(p) => p.blend(pixel, mean, w_t),
            FilterVariant::Kuan(p) => p.blend(pixel, mean, w_t),
            FilterVariant::LeeEnhanced(p) => p.blend(pixel, mean, w_t),
        }
    }

    fn requires_non_negative(&self) -> bool {
        matches!(self, FilterVariant::LeeEnhanced(_))
    }

    fn validate(&self) -> SpeckleResult<()> {
        FilterVariant::validate(self)
    }
}

/// Weight of a single window, computed exactly as the image filters do
pub fn window_weight<W: AdaptiveWeight + ?Sized>(window: &ArrayView2<f64>, weighting: &W) -> f64 {
    let stats = WindowStatistics::from_window(window);
    weighting.weight(stats.effective_ci())
}
