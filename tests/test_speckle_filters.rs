use approx::assert_relative_eq;
use ndarray::Array2;
use sardespeckle::{
    kuan_filter, lee_enhanced_filter, lee_filter, window_weight, DespeckleFilter,
    FilterParameters, KuanParams, LeeParams, SpeckleFilter, WindowBounds,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Step edge with deterministic speckle-like texture
fn create_test_scene(height: usize, width: usize) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(i, j)| {
        let base = if j < width / 2 { 50.0 } else { 200.0 };
        let texture = ((i * 7 + j * 13) % 11) as f64 / 10.0 - 0.5;
        base * (1.0 + 0.6 * texture)
    })
}

/// Rounded mean of the clipped window, computed by hand
fn expected_window_mean(image: &Array2<f64>, row: usize, col: usize, win_size: usize) -> f64 {
    let (height, width) = image.dim();
    let half = win_size / 2;
    let mut sum = 0.0f64;
    let mut count = 0;
    for i in row.saturating_sub(half)..(row + half + 1).min(height) {
        for j in col.saturating_sub(half)..(col + half + 1).min(width) {
            sum += image[[i, j]];
            count += 1;
        }
    }
    (sum / count as f64).round_ties_even()
}

#[test]
fn test_shape_preservation() {
    init_logging();

    for (height, width) in [(1, 1), (1, 9), (9, 1), (17, 23)] {
        let image = create_test_scene(height, width);
        assert_eq!(lee_filter(&image, 3, 0.25).unwrap().dim(), (height, width));
        assert_eq!(kuan_filter(&image, 5, 0.25).unwrap().dim(), (height, width));
        assert_eq!(
            lee_enhanced_filter(&image, 7, 1.0, 0.523, 1.73).unwrap().dim(),
            (height, width)
        );
    }
}

#[test]
fn test_homogeneous_region_identity() {
    init_logging();

    let image = Array2::<f64>::from_elem((4, 4), 100.0);

    let lee = lee_filter(&image, 3, 0.25).unwrap();
    let kuan = kuan_filter(&image, 3, 0.25).unwrap();
    let enhanced = lee_enhanced_filter(&image, 3, 1.0, 0.523, 1.73).unwrap();

    assert!(lee.iter().all(|&v| v == 100.0));
    assert!(kuan.iter().all(|&v| v == 100.0));
    assert!(enhanced.iter().all(|&v| v == 100.0));
}

#[test]
fn test_zero_image_stays_zero() {
    let image = Array2::<f64>::zeros((6, 5));

    assert!(lee_filter(&image, 3, 0.25).unwrap().iter().all(|&v| v == 0.0));
    assert!(kuan_filter(&image, 3, 0.25).unwrap().iter().all(|&v| v == 0.0));
    assert!(lee_enhanced_filter(&image, 3, 1.0, 0.523, 1.73)
        .unwrap()
        .iter()
        .all(|&v| v == 0.0));
}

#[test]
fn test_full_smoothing_when_cu_exceeds_ci() {
    init_logging();

    // gentle texture: ci stays far below cu = 0.25
    let image = Array2::from_shape_fn((9, 12), |(i, j)| 100.0 + ((i * 3 + j * 5) % 7) as f64);
    let lee = lee_filter(&image, 3, 0.25).unwrap();
    let kuan = kuan_filter(&image, 3, 0.25).unwrap();

    for ((row, col), &value) in lee.indexed_iter() {
        let expected = expected_window_mean(&image, row, col, 3);
        assert_eq!(value, expected, "Lee pixel ({}, {})", row, col);
        assert_eq!(kuan[[row, col]], expected, "Kuan pixel ({}, {})", row, col);
    }
}

#[test]
fn test_enhanced_lee_preserves_edges() {
    init_logging();

    // checkerboard: ci ~ 1 in every window
    let image = Array2::from_shape_fn((8, 8), |(i, j)| if (i + j) % 2 == 0 { 1.3 } else { 100.6 });

    // ci >= cmax: original pixel survives (rounded)
    let preserved = lee_enhanced_filter(&image, 3, 1.0, 0.1, 0.2).unwrap();
    for ((row, col), &value) in preserved.indexed_iter() {
        assert_eq!(value, image[[row, col]].round_ties_even());
    }

    // ci <= cu: the window mean wins
    let smoothed = lee_enhanced_filter(&image, 3, 1.0, 2.0, 3.0).unwrap();
    for ((row, col), &value) in smoothed.indexed_iter() {
        assert_eq!(value, expected_window_mean(&image, row, col, 3));
    }
}

#[test]
fn test_enhanced_lee_transition_between_mean_and_pixel() {
    let image = create_test_scene(12, 12);
    let filtered = lee_enhanced_filter(&image, 5, 1.0, 0.05, 5.0).unwrap();

    for ((row, col), &value) in filtered.indexed_iter() {
        let pixel = image[[row, col]];
        let mean = expected_window_mean(&image, row, col, 5);
        let low = pixel.min(mean).floor() - 1.0;
        let high = pixel.max(mean).ceil() + 1.0;
        assert!(value >= low && value <= high, "({}, {}) = {}", row, col, value);
    }
}

#[test]
fn test_corner_window_asymmetry() {
    let dim = (40, 40);
    let corner = WindowBounds::around(dim, 0, 0, 15);
    let interior = WindowBounds::around(dim, 20, 20, 15);

    assert_eq!(corner.rows, 0..8);
    assert_eq!(corner.cols, 0..8);
    assert_eq!(interior.len(), 15 * 15);
    assert!(corner.len() < interior.len());

    // the engine uses the same window: mean of row indices 0..8 is 3.5
    let image = Array2::from_shape_fn(dim, |(i, _)| i as f64);
    let (means, _) = sardespeckle::local_statistics(&image, 15).unwrap();
    assert_relative_eq!(means[[0, 0]], 3.5);
    assert_relative_eq!(means[[20, 20]], 20.0);
}

#[test]
fn test_kuan_weight_never_exceeds_lee() {
    let image = create_test_scene(15, 15);
    let view = image.view();
    let lee = LeeParams { cu: 0.2 };
    let kuan = KuanParams { cu: 0.2 };

    for row in 0..15 {
        for col in 0..15 {
            let bounds = WindowBounds::around(image.dim(), row, col, 5);
            let window = bounds.view(&view);
            let w_lee = window_weight(&window, &lee);
            let w_kuan = window_weight(&window, &kuan);

            assert!((0.0..=1.0).contains(&w_lee));
            assert!((0.0..=1.0).contains(&w_kuan));
            assert!(w_kuan <= w_lee, "({}, {}): {} > {}", row, col, w_kuan, w_lee);
        }
    }
}

#[test]
fn test_lee_keeps_strong_edge() {
    let image = create_test_scene(10, 20);
    let filtered = lee_filter(&image, 3, 0.25).unwrap();

    // far from the edge the two plateaus stay apart
    assert!(filtered[[5, 2]] < 100.0);
    assert!(filtered[[5, 17]] > 100.0);
}

#[test]
fn test_multiscale_filtering() {
    init_logging();

    let image = create_test_scene(16, 16);
    let filter = SpeckleFilter::with_params(FilterParameters::kuan());

    let result = filter.apply_multiscale_filter(&image, &[3, 5]).unwrap();
    let expected = kuan_filter(&kuan_filter(&image, 3, 0.25).unwrap(), 5, 0.25).unwrap();
    assert_eq!(result, expected);

    assert!(filter.apply_multiscale_filter(&image, &[]).is_err());
    assert!(filter.apply_multiscale_filter(&image, &[3, 4]).is_err());
}

#[test]
fn test_estimate_number_of_looks() {
    let image = Array2::from_shape_fn((10, 10), |(i, j)| if (i + j) % 2 == 0 { 1.0 } else { 3.0 });
    let looks = SpeckleFilter::estimate_number_of_looks(&image).unwrap();
    assert_relative_eq!(looks, 4.0 * 99.0 / 100.0, epsilon = 1e-12);

    let flat = Array2::<f64>::from_elem((3, 3), 5.0);
    assert!(SpeckleFilter::estimate_number_of_looks(&flat).is_err());

    let cu = sardespeckle::noise_cu_from_looks(looks).unwrap();
    assert!(cu > 0.0 && cu < 1.0);
}

#[test]
fn test_filters_behind_common_contract() {
    let image = create_test_scene(9, 9);
    let filters: Vec<Box<dyn DespeckleFilter>> = vec![
        Box::new(SpeckleFilter::with_params(FilterParameters::lee())),
        Box::new(SpeckleFilter::with_params(FilterParameters::kuan())),
        Box::new(SpeckleFilter::with_params(FilterParameters::lee_enhanced())),
    ];

    let names: Vec<&str> = filters.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Lee", "Kuan", "Enhanced Lee"]);

    for filter in &filters {
        let filtered = filter.filter(&image).unwrap();
        assert_eq!(filtered.dim(), image.dim());
    }
}

#[test]
fn test_integer_raster_input() {
    let raster = Array2::<u16>::from_elem((5, 5), 1200);
    let image = sardespeckle::to_intensity_image(&raster).unwrap();
    let filtered = lee_filter(&image, 3, 0.25).unwrap();
    assert!(filtered.iter().all(|&v| v == 1200.0));
}

/// Deterministic speckle: 1-look exponential on the left, 4-look on the right
fn create_speckled_scene(height: usize, width: usize) -> Array2<f64> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next_uniform = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 11) as f64 + 1.0) / (1u64 << 53) as f64
    };

    let mut image = Array2::<f64>::zeros((height, width));
    for ((_, j), value) in image.indexed_iter_mut() {
        let looks = if j < width / 2 { 1 } else { 4 };
        let speckle = (0..looks).map(|_| -next_uniform().ln()).sum::<f64>() / looks as f64;
        let base = if (j / 6) % 2 == 0 { 80.0 } else { 140.0 };
        *value = base * speckle;
    }
    image
}

#[derive(Clone, Copy)]
enum Reference {
    Lee { cu: f64 },
    Kuan { cu: f64 },
    Enhanced { k: f64, cu: f64, cmax: f64 },
}

/// Expected output pixel by pixel, plus how many weights fell strictly inside (0, 1)
fn reference_filter(image: &Array2<f64>, win_size: usize, variant: Reference) -> (Array2<f64>, usize) {
    let (height, width) = image.dim();
    let half = win_size / 2;
    let mut expected = Array2::<f64>::zeros((height, width));
    let mut partial = 0;

    for row in 0..height {
        for col in 0..width {
            let rows = row.saturating_sub(half)..(row + half + 1).min(height);
            let cols = col.saturating_sub(half)..(col + half + 1).min(width);

            let mut values = Vec::new();
            for i in rows {
                for j in cols.clone() {
                    values.push(image[[i, j]]);
                }
            }
            let count = values.len() as f64;
            let mean = values.iter().sum::<f64>() / count;
            let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / count;
            let mut ci = variance.sqrt() / mean;
            if mean == 0.0 || ci == 0.0 || ci.is_nan() {
                ci = 0.01;
            }

            let pixel = image[[row, col]];
            let (w_t, value) = match variant {
                Reference::Lee { cu } => {
                    let w_t = if cu > ci { 0.0 } else { 1.0 - (cu * cu) / (ci * ci) };
                    (w_t, pixel * w_t + mean * (1.0 - w_t))
                }
                Reference::Kuan { cu } => {
                    let w_t = if cu > ci {
                        0.0
                    } else {
                        (1.0 - (cu * cu) / (ci * ci)) / (1.0 + cu * cu)
                    };
                    (w_t, pixel * w_t + mean * (1.0 - w_t))
                }
                Reference::Enhanced { k, cu, cmax } => {
                    let w_t = if ci <= cu {
                        1.0
                    } else if ci < cmax {
                        (-k * (ci - cu) / (cmax - ci)).exp()
                    } else {
                        0.0
                    };
                    (w_t, mean * w_t + pixel * (1.0 - w_t))
                }
            };

            if w_t > 0.0 && w_t < 1.0 {
                partial += 1;
            }
            expected[[row, col]] = value.round_ties_even();
        }
    }
    (expected, partial)
}

#[test]
fn test_filters_match_hand_computed_blend() {
    init_logging();

    let image = create_speckled_scene(23, 31);

    for win_size in [3, 5, 7, 15] {
        let (expected, partial) = reference_filter(&image, win_size, Reference::Lee { cu: 0.25 });
        assert!(partial > 0, "Lee win {} never blends", win_size);
        assert_eq!(lee_filter(&image, win_size, 0.25).unwrap(), expected, "Lee win {}", win_size);

        let (expected, partial) = reference_filter(&image, win_size, Reference::Kuan { cu: 0.25 });
        assert!(partial > 0, "Kuan win {} never blends", win_size);
        assert_eq!(kuan_filter(&image, win_size, 0.25).unwrap(), expected, "Kuan win {}", win_size);

        let enhanced = Reference::Enhanced { k: 1.0, cu: 0.523, cmax: 1.73 };
        let (expected, partial) = reference_filter(&image, win_size, enhanced);
        assert!(partial > 0, "Enhanced Lee win {} never blends", win_size);
        assert_eq!(
            lee_enhanced_filter(&image, win_size, 1.0, 0.523, 1.73).unwrap(),
            expected,
            "Enhanced Lee win {}",
            win_size
        );
    }
}

#[test]
fn test_enhanced_lee_approaches_pixel_near_cmax() {
    // cmax just above every window's ci: weights collapse towards the pixel
    let image = create_speckled_scene(12, 18);
    let (_, cis) = sardespeckle::local_statistics(&image, 3).unwrap();
    let max_ci = cis.iter().cloned().fold(0.0f64, f64::max);
    let cmax = max_ci * (1.0 + 1e-6);
    let cu = 0.0;

    let filtered = lee_enhanced_filter(&image, 3, 10.0, cu, cmax).unwrap();
    let (expected, _) = reference_filter(&image, 3, Reference::Enhanced { k: 10.0, cu, cmax });
    assert_eq!(filtered, expected);

    // the window with the largest ci keeps its own pixel
    let ((row, col), _) = cis
        .indexed_iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    assert_eq!(filtered[[row, col]], image[[row, col]].round_ties_even());
}
