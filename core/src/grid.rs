use crate::seed::item_jitter;
use crate::space::{Bounds, ItemSize, LayoutSpace};

pub const SCATTER_BANDS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterGrid {
    pub item_count: usize,
    pub cols: usize,
    pub rows: usize,
    pub top_band_count: usize,
}

impl ScatterGrid {
    pub fn bottom_band_count(&self) -> usize {
        self.item_count - self.top_band_count
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterCell {
    pub col: usize,
    pub row: usize,
    pub band: usize,
    pub center: (f64, f64),
    pub width: f64,
    pub height: f64,
}

/// Near-square grid for `item_count` items in a space of the given aspect.
pub fn scatter_grid(item_count: usize, aspect: f64) -> Option<ScatterGrid> {
    if item_count == 0 {
        return None;
    }
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let cols = ((item_count as f64 * aspect).sqrt().round() as usize).clamp(1, item_count);
    let rows = item_count.div_ceil(cols);
    Some(ScatterGrid {
        item_count,
        cols,
        rows,
        top_band_count: item_count.div_ceil(SCATTER_BANDS),
    })
}

pub fn scatter_cell(grid: &ScatterGrid, index: usize, space: LayoutSpace) -> Option<ScatterCell> {
    if index >= grid.item_count || !space.is_measured() {
        return None;
    }
    let (band, local, band_count) = if index < grid.top_band_count {
        (0, index, grid.top_band_count)
    } else {
        (1, index - grid.top_band_count, grid.bottom_band_count())
    };
    let band_rows = band_count.div_ceil(grid.cols).max(1);
    let band_height = space.height / SCATTER_BANDS as f64;
    let band_top = band as f64 * band_height;
    let col = local % grid.cols;
    let row = local / grid.cols;
    let width = space.width / grid.cols as f64;
    let height = band_height / band_rows as f64;
    Some(ScatterCell {
        col,
        row,
        band,
        center: (
            (col as f64 + 0.5) * width,
            band_top + (row as f64 + 0.5) * height,
        ),
        width,
        height,
    })
}

/// Starting top-left corner for an item: cell center, softened by seeded
/// jitter, then clamped into the padded space.
pub fn initial_position(
    grid: &ScatterGrid,
    index: usize,
    space: LayoutSpace,
    size: ItemSize,
    padding: f64,
    jitter_ratio: f64,
) -> Option<(f64, f64)> {
    let cell = scatter_cell(grid, index, space)?;
    let (jx, jy) = item_jitter(index);
    let cx = cell.center.0 + jx * jitter_ratio * cell.width;
    let cy = cell.center.1 + jy * jitter_ratio * cell.height;
    let top_left = (cx - size.width * 0.5, cy - size.height * 0.5);
    Some(Bounds::for_item(space, size, padding).clamp(top_left))
}
