//! sardespeckle: adaptive speckle filters for SAR intensity imagery
//!
//! Lee, Kuan and Enhanced Lee filters share one windowed-statistics engine:
//! each pixel is blended with its local window mean, weighted by how
//! heterogeneous (edge-like) the window is.
//!
//! ```
//! use ndarray::Array2;
//! use sardespeckle::{lee_filter, lee_enhanced_filter};
//!
//! let image = Array2::<f64>::from_elem((4, 4), 100.0);
//! let lee = lee_filter(&image, 3, 0.25).unwrap();
//! assert!(lee.iter().all(|&v| v == 100.0));
//!
//! let enhanced = lee_enhanced_filter(&image, 3, 1.0, 0.523, 1.73).unwrap();
//! assert_eq!(enhanced.dim(), image.dim());
//! ```

pub mod types;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{
    SarReal, SarRealImage, SpeckleError, SpeckleResult, NOISE_FLOOR_CI, to_intensity_image,
};

pub use crate::core::{
    AdaptiveWeight, DespeckleFilter, FilterParameters, FilterVariant, KuanParams,
    LeeEnhancedParams, LeeParams, SpeckleFilter, WindowBounds, WindowStatistics,
    filter_with_weight, kuan_filter, lee_enhanced_filter, lee_filter, local_statistics,
    noise_cu_from_looks, window_weight,
};
