use crate::types::{SpeckleError, SpeckleResult};
use serde::{Deserialize, Serialize};

/// Default noise coefficient of variation for Lee and Kuan
pub const DEFAULT_CU: f64 = 0.25;
/// Enhanced Lee defaults
pub const DEFAULT_ENHANCED_K: f64 = 1.0;
pub const DEFAULT_ENHANCED_CU: f64 = 0.523;
pub const DEFAULT_ENHANCED_CMAX: f64 = 1.73;
/// Upper bound of the Enhanced Lee damping factor
pub const MAX_ENHANCED_K: f64 = 10.0;

pub const DEFAULT_WINDOW_SIZE: usize = 3;
pub const MIN_WINDOW_SIZE: usize = 3;

/// Lee filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeeParams {
    /// Noise coefficient of variation
    pub cu: f64,
}

impl Default for LeeParams {
    fn default() -> Self {
        Self { cu: DEFAULT_CU }
    }
}

/// Kuan filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KuanParams {
    /// Noise coefficient of variation
    pub cu: f64,
}

impl Default for KuanParams {
    fn default() -> Self {
        Self { cu: DEFAULT_CU }
    }
}

/// Enhanced Lee filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeeEnhancedParams {
    /// Damping factor, in [0, 10]
    pub k: f64,
    /// Noise coefficient of variation (homogeneous threshold)
    pub cu: f64,
    /// Heterogeneous threshold, >= cu
    pub cmax: f64,
}

impl Default for LeeEnhancedParams {
    fn default() -> Self {
        Self {
            k: DEFAULT_ENHANCED_K,
            cu: DEFAULT_ENHANCED_CU,
            cmax: DEFAULT_ENHANCED_CMAX,
        }
    }
}

/// Adaptive filter variant with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FilterVariant {
    Lee(LeeParams),
    Kuan(KuanParams),
    LeeEnhanced(LeeEnhancedParams),
}

impl FilterVariant {
    pub fn name(&self) -> &'static str {
        match self {
            FilterVariant::Lee(_) => "Lee",
            FilterVariant::Kuan(_) => "Kuan",
            FilterVariant::LeeEnhanced(_) => "Enhanced Lee",
        }
    }

    /// Check the variant-specific numeric domain
    pub fn validate(&self) -> SpeckleResult<()> {
        match self {
            FilterVariant::Lee(p) => check_cu(p.cu),
            FilterVariant::Kuan(p) => check_cu(p.cu),
            FilterVariant::LeeEnhanced(p) => validate_lee_enhanced(p),
        }
    }
}

/// Complete parameter bundle for one filter invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    /// Window size (odd, >= 3)
    pub win_size: usize,
    pub variant: FilterVariant,
}

impl FilterParameters {
    pub fn new(win_size: usize, variant: FilterVariant) -> Self {
        Self { win_size, variant }
    }

    pub fn lee() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE, FilterVariant::Lee(LeeParams::default()))
    }

    pub fn kuan() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE, FilterVariant::Kuan(KuanParams::default()))
    }

    pub fn lee_enhanced() -> Self {
        Self::new(
            DEFAULT_WINDOW_SIZE,
            FilterVariant::LeeEnhanced(LeeEnhancedParams::default()),
        )
    }

    pub fn with_window_size(mut self, win_size: usize) -> Self {
        self.win_size = win_size;
        self
    }

    /// Validate everything before any pixel is touched
    pub fn validate(&self) -> SpeckleResult<()> {
        validate_window_size(self.win_size)?;
        self.variant.validate()
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::lee()
    }
}

/// Window sizes must be odd and at least 3
pub fn validate_window_size(win_size: usize) -> SpeckleResult<()> {
    if win_size < MIN_WINDOW_SIZE {
        return Err(SpeckleError::Parameter(format!(
            "Window size must be at least {}, got {}",
            MIN_WINDOW_SIZE, win_size
        )));
    }
    if win_size % 2 == 0 {
        return Err(SpeckleError::Parameter(format!(
            "Window size must be odd, got {}",
            win_size
        )));
    }
    Ok(())
}

fn check_cu(cu: f64) -> SpeckleResult<()> {
    if !cu.is_finite() || cu < 0.0 {
        return Err(SpeckleError::Parameter(format!(
            "cu must be a finite non-negative number, got {}",
            cu
        )));
    }
    Ok(())
}

fn validate_lee_enhanced(p: &LeeEnhancedParams) -> SpeckleResult<()> {
    if !p.k.is_finite() || !(0.0..=MAX_ENHANCED_K).contains(&p.k) {
        return Err(SpeckleError::Parameter(format!(
            "k parameter out of range 0 <= k <= {}, got {}",
            MAX_ENHANCED_K, p.k
        )));
    }
    check_cu(p.cu)?;
    if !p.cmax.is_finite() || p.cmax < 0.0 || p.cmax < p.cu {
        return Err(SpeckleError::Parameter(format!(
            "cmax must be non-negative and >= cu ({}), got {}",
            p.cu, p.cmax
        )));
    }
    Ok(())
}
