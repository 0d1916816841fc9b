use ndarray::{s, ArrayView2};
use std::ops::Range;

/// Clipped neighborhood of a pixel.
///
/// Windows are clipped at the image border, never padded or wrapped, so near
/// edges and corners they are smaller than `win_size x win_size` and no
/// longer centered on the pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBounds {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl WindowBounds {
    /// Compute the window around `(row, col)` in an image of `dim` (rows, cols).
    ///
    /// The nominal extent is `win_size / 2` on either side. For odd sizes the
    /// interior window is exactly `win_size` wide; the range always contains
    /// the center pixel, even for degenerate sizes.
    #[inline]
    pub fn around(dim: (usize, usize), row: usize, col: usize, win_size: usize) -> Self {
        Self {
            rows: clipped_range(row, dim.0, win_size),
            cols: clipped_range(col, dim.1, win_size),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }

    pub fn len(&self) -> usize {
        self.height() * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the window out of `image` without copying.
    #[inline]
    pub fn view<'a>(&self, image: &ArrayView2<'a, f64>) -> ArrayView2<'a, f64> {
        image.clone().slice_move(s![self.rows.clone(), self.cols.clone()])
    }
}

/// `[ceil(center - win/2), ceil(center + win/2))` clipped to `[0, len)`.
#[inline]
fn clipped_range(center: usize, len: usize, win_size: usize) -> Range<usize> {
    let start = center.saturating_sub(win_size / 2);
    let after = ((win_size + 1) / 2).max(1);
    let end = center.saturating_add(after).min(len);
    start..end
}
