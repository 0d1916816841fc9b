use ndarray::Array2;
use num_traits::ToPrimitive;

/// Real-valued intensity data
pub type SarReal = f64;

/// 2D intensity image (rows x columns)
pub type SarRealImage = Array2<SarReal>;

/// Coefficient of variation used when a window is perfectly homogeneous
/// (zero variance) or has zero mean. Keeps the adaptive weight away from the
/// 0/0 singularity.
pub const NOISE_FLOOR_CI: f64 = 0.01;

/// Error types for speckle filtering
#[derive(Debug, thiserror::Error)]
pub enum SpeckleError {
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    #[error("Image has no pixels ({rows}x{cols})")]
    EmptyImage { rows: usize, cols: usize },

    #[error("Invariant violated at pixel ({row}, {col}): filtered value {value} is negative")]
    InvariantViolation { row: usize, col: usize, value: f64 },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type for speckle filtering operations
pub type SpeckleResult<T> = Result<T, SpeckleError>;

/// Convert any numeric raster (u8, u16, f32 ...) into the f64 working image.
///
/// Filtering always runs in f64 so that blending and rounding never overflow
/// the input's storage type.
pub fn to_intensity_image<T: ToPrimitive>(raster: &Array2<T>) -> SpeckleResult<SarRealImage> {
    let mut image = Array2::<f64>::zeros(raster.dim());
    for ((idx, value), out) in raster.indexed_iter().zip(image.iter_mut()) {
        *out = value.to_f64().ok_or_else(|| {
            SpeckleError::Parameter(format!(
                "Pixel ({}, {}) cannot be represented as f64",
                idx.0, idx.1
            ))
        })?;
    }
    Ok(image)
}
