//! Color-coded rendering of a labeled grid into a 32-bit BGRA pixel buffer.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::palette::generate_basin_colors;
use crate::basins::{BasinLabels, CellState};
use crate::terrain::ElevationGrid;

/// Bytes per output pixel (blue, green, red, alpha).
pub const BYTES_PER_PIXEL: usize = 4;

pub const OCEAN_COLOR: [u8; 3] = [0, 0, 0];
pub const INLAND_WATER_COLOR: [u8; 3] = [20, 40, 110];
pub const COAST_COLOR: [u8; 3] = [0, 255, 0];
pub const CONTESTED_COLOR: [u8; 3] = [255, 0, 0];
/// Land shade used when the grid has no positive elevation to normalize by.
pub const FLAT_LAND_GREY: u8 = 128;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Label grid is {label_rows}x{label_cols} but elevation grid is {rows}x{cols}")]
    ShapeMismatch {
        label_rows: usize,
        label_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Grid of {0}x{1} cells is too large for a single image")]
    TooLarge(usize, usize),
}

/// What the rendered image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Basin palette with coast, contested and unreachable cells marked.
    Basins,
    /// Greyscale land elevation with the coastline highlighted.
    Elevation,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Basins
    }
}

/// Options for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub mode: RenderMode,
    /// Seed for the basin palette.
    pub palette_seed: u64,
    /// Darken basin colors toward low ground.
    pub shade_by_elevation: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Basins,
            palette_seed: 42,
            shade_by_elevation: false,
        }
    }
}

/// A rendered image, one pixel per grid cell, row-major top to bottom.
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    bgra: Vec<u8>,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes in blue, green, red, alpha order.
    pub fn as_bgra(&self) -> &[u8] {
        &self.bgra
    }

    /// BGRA bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([self.bgra[i], self.bgra[i + 1], self.bgra[i + 2], self.bgra[i + 3]])
    }

    /// Same pixels reordered to red, green, blue, alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = self.bgra.clone();
        for px in out.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.swap(0, 2);
        }
        out
    }
}

/// Maps a land elevation to a grey level using `max` as the normalization denominator.
#[inline]
pub fn elevation_grey(elevation: i16, max: i16) -> u8 {
    if max <= 0 {
        return FLAT_LAND_GREY;
    }
    let normalized = (elevation.max(0) as f32 / max as f32).clamp(0.0, 1.0);
    (normalized * 255.0).floor() as u8
}

#[inline]
fn put(out: &mut [u8], [r, g, b]: [u8; 3]) {
    out[0] = b;
    out[1] = g;
    out[2] = r;
    out[3] = 255;
}

#[inline]
fn shade([r, g, b]: [u8; 3], grey: u8) -> [u8; 3] {
    let k = 0.5 + 0.5 * (grey as f32 / 255.0);
    [(r as f32 * k) as u8, (g as f32 * k) as u8, (b as f32 * k) as u8]
}

/// Renders `labels` over `grid` according to `options`.
pub fn render(
    grid: &ElevationGrid,
    labels: &BasinLabels,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    if !labels.matches_shape(grid) {
        return Err(RenderError::ShapeMismatch {
            label_rows: labels.rows(),
            label_cols: labels.cols(),
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    let (rows, cols) = (grid.rows(), grid.cols());
    let (width, height) = match (u32::try_from(cols), u32::try_from(rows)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(RenderError::TooLarge(rows, cols)),
    };

    let max = grid.max_elevation();
    let palette = generate_basin_colors(labels.basin_count() as usize, options.palette_seed);
    let mut bgra = vec![0u8; rows * cols * BYTES_PER_PIXEL];

    if cols > 0 {
        bgra.par_chunks_mut(cols * BYTES_PER_PIXEL)
            .enumerate()
            .for_each(|(row, out)| {
                let base = row * cols;
                for (col, px) in out.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                    let idx = base + col;
                    let state = labels.state_at(idx);
                    let grey = elevation_grey(grid.elevation_at(idx), max);
                    let color = match options.mode {
                        RenderMode::Basins => basin_color(state, grey, &palette, options.shade_by_elevation),
                        RenderMode::Elevation => elevation_color(state, grey),
                    };
                    put(px, color);
                }
            });
    }

    Ok(RasterImage { width, height, bgra })
}

fn basin_color(state: CellState, grey: u8, palette: &[[u8; 3]], shaded: bool) -> [u8; 3] {
    match state {
        CellState::Ocean => OCEAN_COLOR,
        CellState::InlandWater => INLAND_WATER_COLOR,
        CellState::Coast(_) => COAST_COLOR,
        CellState::Contested(_) => CONTESTED_COLOR,
        CellState::Labeled(b) => match palette.get(b.index()) {
            Some(&c) if shaded => shade(c, grey),
            Some(&c) => c,
            None => [grey, grey, grey],
        },
        CellState::Unvisited => [grey, grey, grey],
    }
}

fn elevation_color(state: CellState, grey: u8) -> [u8; 3] {
    match state {
        CellState::Ocean | CellState::InlandWater => OCEAN_COLOR,
        CellState::Coast(_) => COAST_COLOR,
        _ => [grey, grey, grey],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basins::{detect_coastline, label_basins, label_ocean_components, OceanPolicy};
    use crate::terrain::OceanRule;

    fn labeled(grid: &ElevationGrid) -> BasinLabels {
        let oceans = label_ocean_components(grid, 1);
        let seeds = detect_coastline(grid, &oceans, OceanPolicy::Connected);
        label_basins(grid, &oceans, &seeds).unwrap().0
    }

    fn bgr(c: [u8; 3]) -> [u8; 4] {
        [c[2], c[1], c[0], 255]
    }

    #[test]
    fn test_elevation_grey_normalization() {
        assert_eq!(elevation_grey(0, 100), 0);
        assert_eq!(elevation_grey(100, 100), 255);
        assert_eq!(elevation_grey(50, 100), 127);
        assert_eq!(elevation_grey(-20, 100), 0);
        assert_eq!(elevation_grey(10, 0), FLAT_LAND_GREY);
        assert_eq!(elevation_grey(10, -5), FLAT_LAND_GREY);
    }

    #[test]
    fn test_render_basins_colors() {
        let grid = ElevationGrid::from_fn(3, 9, OceanRule::default(), |_, c| {
            if c == 0 || c == 8 { -500 } else { 50 }
        })
        .unwrap();
        let labels = labeled(&grid);
        let image = render(&grid, &labels, &RenderOptions::default()).unwrap();

        assert_eq!(image.width(), 9);
        assert_eq!(image.height(), 3);
        assert_eq!(image.as_bgra().len(), 9 * 3 * BYTES_PER_PIXEL);

        let palette = generate_basin_colors(2, RenderOptions::default().palette_seed);
        assert_eq!(image.pixel(0, 0), Some(bgr(OCEAN_COLOR)));
        assert_eq!(image.pixel(1, 0), Some(bgr(COAST_COLOR)));
        assert_eq!(image.pixel(2, 1), Some(bgr(palette[0])));
        assert_eq!(image.pixel(4, 2), Some(bgr(CONTESTED_COLOR)));
        assert_eq!(image.pixel(6, 0), Some(bgr(palette[1])));
        assert_eq!(image.pixel(9, 0), None);
    }

    #[test]
    fn test_render_elevation_mode() {
        let grid = ElevationGrid::from_samples(1, 4, vec![-500, 10, 20, 40], OceanRule::default()).unwrap();
        let labels = labeled(&grid);
        let options = RenderOptions { mode: RenderMode::Elevation, ..Default::default() };
        let image = render(&grid, &labels, &options).unwrap();

        assert_eq!(image.pixel(0, 0), Some(bgr(OCEAN_COLOR)));
        assert_eq!(image.pixel(1, 0), Some(bgr(COAST_COLOR)));
        assert_eq!(image.pixel(2, 0), Some([127, 127, 127, 255]));
        assert_eq!(image.pixel(3, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_flat_land_renders_mid_grey() {
        // Land at elevation 0 everywhere except one ocean cell: max is 0.
        let grid = ElevationGrid::from_samples(1, 3, vec![-1, 0, 0], OceanRule::default()).unwrap();
        let labels = labeled(&grid);
        let options = RenderOptions { mode: RenderMode::Elevation, ..Default::default() };
        let image = render(&grid, &labels, &options).unwrap();
        assert_eq!(image.pixel(2, 0), Some([FLAT_LAND_GREY, FLAT_LAND_GREY, FLAT_LAND_GREY, 255]));
    }

    #[test]
    fn test_to_rgba_swaps_channels() {
        let grid = ElevationGrid::from_samples(1, 2, vec![-1, 5], OceanRule::default()).unwrap();
        let labels = labeled(&grid);
        let image = render(&grid, &labels, &RenderOptions::default()).unwrap();
        let rgba = image.to_rgba();
        assert_eq!(&rgba[4..8], &[COAST_COLOR[0], COAST_COLOR[1], COAST_COLOR[2], 255]);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let grid = ElevationGrid::from_samples(1, 2, vec![-1, 5], OceanRule::default()).unwrap();
        let labels = labeled(&grid);
        let other = ElevationGrid::from_samples(2, 1, vec![-1, 5], OceanRule::default()).unwrap();
        assert!(matches!(
            render(&other, &labels, &RenderOptions::default()),
            Err(RenderError::ShapeMismatch { .. })
        ));
    }
}
