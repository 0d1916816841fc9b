use super::params::{
    validate_window_size, FilterParameters, FilterVariant, KuanParams, LeeEnhancedParams,
    LeeParams,
};
use super::statistics::WindowStatistics;
use super::weighting::AdaptiveWeight;
use super::window::WindowBounds;
use crate::types::{SarRealImage, SpeckleError, SpeckleResult};
use ndarray::{Array2, ArrayView2};

/// Shared contract of every despeckling filter: image in, same-shaped image out.
///
/// Lee, Kuan and Enhanced Lee implement it through [`SpeckleFilter`]; other
/// peers (Frost, median, mean) plug in here.
pub trait DespeckleFilter {
    fn name(&self) -> &str;

    fn filter(&self, image: &SarRealImage) -> SpeckleResult<SarRealImage>;
}

/// Adaptive speckle filter processor
#[derive(Debug, Clone)]
pub struct SpeckleFilter {
    params: FilterParameters,
}

impl SpeckleFilter {
    /// Create a Lee filter with default parameters
    pub fn new() -> Self {
        Self {
            params: FilterParameters::default(),
        }
    }

    /// Create a speckle filter with custom parameters
    pub fn with_params(params: FilterParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    /// Apply speckle filtering to a SAR intensity image.
    ///
    /// Parameters and image are validated before any pixel is processed.
    /// The output has the input's shape and holds rounded values.
    pub fn apply_filter(&self, image: &SarRealImage) -> SpeckleResult<SarRealImage> {
        let (height, width) = image.dim();
        log::info!(
            "Applying {} speckle filter to {}x{} image",
            self.params.variant.name(),
            height,
            width
        );
        log::debug!("Filter parameters: {:?}", self.params);

        if let Err(e) = self.params.validate() {
            log::warn!("Rejected {} filter parameters: {}", self.params.variant.name(), e);
            return Err(e);
        }

        let view = image.view();
        let win_size = self.params.win_size;
        let filtered = match &self.params.variant {
            FilterVariant::Lee(p) => filter_with_weight(&view, win_size, p)?,
            FilterVariant::Kuan(p) => filter_with_weight(&view, win_size, p)?,
            FilterVariant::LeeEnhanced(p) => filter_with_weight(&view, win_size, p)?,
        };

        log::info!("Speckle filtering completed successfully");
        Ok(filtered)
    }

    /// Multi-scale speckle filtering.
    ///
    /// Each scale filters the previous scale's output. All window sizes are
    /// checked up front so a bad scale never leaves half the work done.
    pub fn apply_multiscale_filter(
        &self,
        image: &SarRealImage,
        scales: &[usize],
    ) -> SpeckleResult<SarRealImage> {
        log::info!("Applying multi-scale speckle filtering with {} scales", scales.len());

        if scales.is_empty() {
            return Err(SpeckleError::Parameter(
                "Multi-scale filtering needs at least one window size".to_string(),
            ));
        }
        for &scale in scales {
            validate_window_size(scale)?;
        }

        let mut result = image.clone();
        for (i, &scale) in scales.iter().enumerate() {
            log::debug!("Processing scale {} with window size {}", i + 1, scale);

            let scale_filter = SpeckleFilter::with_params(self.params.with_window_size(scale));
            result = scale_filter.apply_filter(&result)?;
        }

        log::info!("Multi-scale filtering completed");
        Ok(result)
    }

    /// Estimate the equivalent number of looks (mean² / variance) of an image.
    ///
    /// Only finite, positive pixels count. Meaningful on homogeneous regions.
    pub fn estimate_number_of_looks(image: &SarRealImage) -> SpeckleResult<f64> {
        log::debug!("Estimating number of looks from image statistics");

        let values: Vec<f64> = image
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();

        if values.len() < 2 {
            return Err(SpeckleError::Parameter(
                "At least two valid pixels are needed to estimate looks".to_string(),
            ));
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / (values.len() - 1) as f64;

        if variance <= 0.0 {
            return Err(SpeckleError::Parameter(
                "Image has zero variance, number of looks is unbounded".to_string(),
            ));
        }

        let num_looks = (mean * mean) / variance;
        log::info!("Estimated number of looks: {:.2}", num_looks);
        Ok(num_looks.max(1.0))
    }
}

impl Default for SpeckleFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl DespeckleFilter for SpeckleFilter {
    fn name(&self) -> &str {
        self.params.variant.name()
    }

    fn filter(&self, image: &SarRealImage) -> SpeckleResult<SarRealImage> {
        self.apply_filter(image)
    }
}

/// Lee filter with window `win_size` and noise coefficient `cu`
pub fn lee_filter(image: &SarRealImage, win_size: usize, cu: f64) -> SpeckleResult<SarRealImage> {
    SpeckleFilter::with_params(FilterParameters::new(
        win_size,
        FilterVariant::Lee(LeeParams { cu }),
    ))
    .apply_filter(image)
}

/// Kuan filter with window `win_size` and noise coefficient `cu`
pub fn kuan_filter(image: &SarRealImage, win_size: usize, cu: f64) -> SpeckleResult<SarRealImage> {
    SpeckleFilter::with_params(FilterParameters::new(
        win_size,
        FilterVariant::Kuan(KuanParams { cu }),
    ))
    .apply_filter(image)
}

/// Enhanced Lee filter with damping `k` and thresholds `cu` / `cmax`
pub fn lee_enhanced_filter(
    image: &SarRealImage,
    win_size: usize,
    k: f64,
    cu: f64,
    cmax: f64,
) -> SpeckleResult<SarRealImage> {
    SpeckleFilter::with_params(FilterParameters::new(
        win_size,
        FilterVariant::LeeEnhanced(LeeEnhancedParams { k, cu, cmax }),
    ))
    .apply_filter(image)
}

/// Noise coefficient of variation of an `looks`-look intensity image
pub fn noise_cu_from_looks(looks: f64) -> SpeckleResult<f64> {
    if !looks.is_finite() || looks <= 0.0 {
        return Err(SpeckleError::Parameter(format!(
            "Number of looks must be positive, got {}",
            looks
        )));
    }
    Ok(1.0 / looks.sqrt())
}

/// Per-pixel window mean and effective coefficient of variation
pub fn local_statistics(
    image: &SarRealImage,
    win_size: usize,
) -> SpeckleResult<(SarRealImage, SarRealImage)> {
    validate_window_size(win_size)?;
    check_image(&image.view())?;

    let view = image.view();
    let dim = image.dim();
    let mut means = Array2::<f64>::zeros(dim);
    let mut cis = Array2::<f64>::zeros(dim);

    for ((row, col), mean) in means.indexed_iter_mut() {
        let bounds = WindowBounds::around(dim, row, col, win_size);
        let stats = WindowStatistics::from_window(&bounds.view(&view));
        *mean = stats.mean;
        cis[[row, col]] = stats.effective_ci();
    }

    Ok((means, cis))
}

/// Run the adaptive filter engine with any weighting rule.
///
/// Validates the window size, the weighting parameters and the image before
/// the first pixel; the pixel loop never runs on bad input.
pub fn filter_with_weight<W: AdaptiveWeight>(
    image: &ArrayView2<f64>,
    win_size: usize,
    weighting: &W,
) -> SpeckleResult<SarRealImage> {
    validate_window_size(win_size)?;
    weighting.validate()?;
    check_image(image)?;

    let (height, width) = image.dim();
    let mut buffer = vec![0.0f64; height * width];

    if let Err(e) = filter_rows(image, win_size, weighting, &mut buffer) {
        log::error!("Speckle filtering aborted: {}", e);
        return Err(e);
    }

    Ok(Array2::from_shape_vec((height, width), buffer)?)
}

fn check_image(image: &ArrayView2<f64>) -> SpeckleResult<()> {
    let (rows, cols) = image.dim();
    if rows == 0 || cols == 0 {
        return Err(SpeckleError::EmptyImage { rows, cols });
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn filter_rows<W: AdaptiveWeight>(
    image: &ArrayView2<f64>,
    win_size: usize,
    weighting: &W,
    buffer: &mut [f64],
) -> SpeckleResult<()> {
    filter_rows_parallel(image, win_size, weighting, buffer)
}

#[cfg(not(feature = "parallel"))]
fn filter_rows<W: AdaptiveWeight>(
    image: &ArrayView2<f64>,
    win_size: usize,
    weighting: &W,
    buffer: &mut [f64],
) -> SpeckleResult<()> {
    filter_rows_sequential(image, win_size, weighting, buffer)
}

/// Rows are disjoint output slices, so workers never share mutable state
#[cfg(feature = "parallel")]
fn filter_rows_parallel<W: AdaptiveWeight>(
    image: &ArrayView2<f64>,
    win_size: usize,
    weighting: &W,
    buffer: &mut [f64],
) -> SpeckleResult<()> {
    use rayon::prelude::*;

    let width = image.ncols();
    buffer
        .par_chunks_mut(width)
        .enumerate()
        .try_for_each(|(row, out)| filter_row(image, row, win_size, weighting, out))
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn filter_rows_sequential<W: AdaptiveWeight>(
    image: &ArrayView2<f64>,
    win_size: usize,
    weighting: &W,
    buffer: &mut [f64],
) -> SpeckleResult<()> {
    let width = image.ncols();
    buffer
        .chunks_mut(width)
        .enumerate()
        .try_for_each(|(row, out)| filter_row(image, row, win_size, weighting, out))
}

#[inline]
fn filter_row<W: AdaptiveWeight>(
    image: &ArrayView2<f64>,
    row: usize,
    win_size: usize,
    weighting: &W,
    out: &mut [f64],
) -> SpeckleResult<()> {
    let dim = image.dim();
    let check_sign = weighting.requires_non_negative();

    for (col, slot) in out.iter_mut().enumerate() {
        let bounds = WindowBounds::around(dim, row, col, win_size);
        let stats = WindowStatistics::from_window(&bounds.view(image));
        let w_t = weighting.weight(stats.effective_ci());

        let value = weighting.blend(image[[row, col]], stats.mean, w_t);
        // NaN fails this as well
        if check_sign && !(value >= 0.0) {
            return Err(SpeckleError::InvariantViolation { row, col, value });
        }

        *slot = value.round_ties_even();
    }
    Ok(())
}
