//! Dense row-major elevation raster with bounds-safe 4-neighbor adjacency.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column count of the reference global raster (30 arc-second tiles).
pub const DEFAULT_COLUMNS: usize = 10800;

/// Errors raised while building an [`ElevationGrid`].
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Malformed elevation input: {0}")]
    MalformedInput(String),
    #[error("Big-endian hosts are not supported: samples are read in native little-endian order")]
    PlatformUnsupported,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Integer (row, column) address of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// 4-neighbor directions, in the order neighbors are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
}

/// How a sample is classified as ocean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OceanRule {
    /// Anything strictly below `sea_level` is ocean.
    BelowSeaLevel { sea_level: i16 },
    /// Only the no-data sentinel is ocean; land below sea level stays land.
    Sentinel { value: i16 },
}

impl Default for OceanRule {
    fn default() -> Self {
        Self::BelowSeaLevel { sea_level: 0 }
    }
}

impl OceanRule {
    #[inline]
    pub fn is_ocean(&self, elevation: i16) -> bool {
        match *self {
            OceanRule::BelowSeaLevel { sea_level } => elevation < sea_level,
            OceanRule::Sentinel { value } => elevation == value,
        }
    }
}

/// Up to four neighbor indices of a cell, yielded left, up, right, down.
#[derive(Debug, Clone)]
pub struct NeighborIndices {
    items: [usize; 4],
    len: u8,
    pos: u8,
}

impl Iterator for NeighborIndices {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.pos < self.len {
            let idx = self.items[self.pos as usize];
            self.pos += 1;
            Some(idx)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = (self.len - self.pos) as usize;
        (rem, Some(rem))
    }
}

impl ExactSizeIterator for NeighborIndices {}

/// A fixed-size elevation raster.
///
/// Samples are immutable once the grid is built; everything that changes
/// during classification lives in separate per-cell arrays indexed the same
/// way (`row * cols + col`).
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    samples: Vec<i16>,
    ocean_rule: OceanRule,
}

impl ElevationGrid {
    /// Builds a grid from row-major samples.
    ///
    /// Fails with [`GridError::MalformedInput`] if `cols` is zero or the sample
    /// count is not exactly `rows * cols`.
    pub fn from_samples(
        rows: usize,
        cols: usize,
        samples: Vec<i16>,
        ocean_rule: OceanRule,
    ) -> Result<Self, GridError> {
        if cols == 0 {
            return Err(GridError::MalformedInput("column count must be positive".into()));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            GridError::MalformedInput(format!("{rows} x {cols} overflows the address space"))
        })?;
        if samples.len() != expected {
            return Err(GridError::MalformedInput(format!(
                "{} samples do not fill a {} x {} grid",
                samples.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, samples, ocean_rule })
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(rows: usize, cols: usize, ocean_rule: OceanRule, mut f: F) -> Result<Self, GridError>
    where
        F: FnMut(usize, usize) -> i16,
    {
        let mut samples = Vec::with_capacity(rows.saturating_mul(cols));
        for row in 0..rows {
            for col in 0..cols {
                samples.push(f(row, col));
            }
        }
        Self::from_samples(rows, cols, samples, ocean_rule)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn ocean_rule(&self) -> OceanRule {
        self.ocean_rule
    }

    /// Row-major samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Flat index of `(row, col)`, or `None` when out of range.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Coordinate of a flat index.
    #[inline]
    pub fn coord_of(&self, idx: usize) -> CellCoord {
        debug_assert!(idx < self.samples.len());
        CellCoord { row: idx / self.cols, col: idx % self.cols }
    }

    /// Bounds-checked elevation lookup.
    pub fn get(&self, row: usize, col: usize) -> Option<i16> {
        self.index_of(row, col).map(|idx| self.samples[idx])
    }

    /// Elevation at a flat index.
    ///
    /// # Panics
    /// Panics if `idx` is out of range.
    #[inline]
    pub fn elevation_at(&self, idx: usize) -> i16 {
        self.samples[idx]
    }

    /// Applies this grid's ocean rule to an elevation value.
    #[inline]
    pub fn is_ocean(&self, elevation: i16) -> bool {
        self.ocean_rule.is_ocean(elevation)
    }

    #[inline]
    pub fn is_ocean_at(&self, idx: usize) -> bool {
        self.is_ocean(self.samples[idx])
    }

    /// Index of the neighbor in `dir`, if it exists. Never wraps.
    #[inline]
    pub fn step(&self, idx: usize, dir: Direction) -> Option<usize> {
        let row = idx / self.cols;
        let col = idx % self.cols;
        match dir {
            Direction::Left => (col > 0).then(|| idx - 1),
            Direction::Up => (row > 0).then(|| idx - self.cols),
            Direction::Right => (col + 1 < self.cols).then(|| idx + 1),
            Direction::Down => (row + 1 < self.rows).then(|| idx + self.cols),
        }
    }

    /// Flat indices of the in-range 4-neighbors of `idx`.
    #[inline]
    pub fn neighbor_indices(&self, idx: usize) -> NeighborIndices {
        let mut items = [0usize; 4];
        let mut len = 0u8;
        for dir in Direction::ALL {
            if let Some(n) = self.step(idx, dir) {
                items[len as usize] = n;
                len += 1;
            }
        }
        NeighborIndices { items, len, pos: 0 }
    }

    /// In-range 4-neighbors of `(row, col)`. Empty if the cell itself is out of range.
    pub fn neighbors(&self, row: usize, col: usize) -> Vec<CellCoord> {
        match self.index_of(row, col) {
            Some(idx) => self.neighbor_indices(idx).map(|n| self.coord_of(n)).collect(),
            None => Vec::new(),
        }
    }

    /// Highest sample in the grid (0 for an empty grid).
    pub fn max_elevation(&self) -> i16 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    /// (min, max) sample values.
    pub fn elevation_range(&self) -> (i16, i16) {
        let min = self.samples.iter().copied().min().unwrap_or(0);
        (min, self.max_elevation())
    }

    /// Number of cells the ocean rule classifies as land.
    pub fn land_count(&self) -> usize {
        self.samples.iter().filter(|&&e| !self.is_ocean(e)).count()
    }
}
