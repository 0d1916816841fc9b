//! Core speckle filtering modules

pub mod params;
pub mod window;
pub mod statistics;
pub mod weighting;
pub mod speckle_filter;

// Re-export main types
pub use params::{FilterParameters, FilterVariant, LeeParams, KuanParams, LeeEnhancedParams};
pub use window::WindowBounds;
pub use statistics::WindowStatistics;
pub use weighting::{AdaptiveWeight, window_weight};
pub use speckle_filter::{
    SpeckleFilter, DespeckleFilter, filter_with_weight, lee_filter, kuan_filter,
    lee_enhanced_filter, local_statistics, noise_cu_from_looks,
};
