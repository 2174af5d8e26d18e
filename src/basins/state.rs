//! Per-cell classification state produced by basin labeling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::terrain::{CellCoord, ElevationGrid};

/// Identifier of the ocean basin a cell drains toward (dense, starting at 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BasinId(pub u32);

impl BasinId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BasinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "basin#{}", self.0)
    }
}

/// Classification of a single cell.
///
/// Water cells are fixed before labeling starts. Land cells begin as
/// `Unvisited` and move to exactly one of the labeled states at most once,
/// except that a `Labeled` cell may later become `Contested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Open ocean: part of a water body large enough to seed a basin.
    Ocean,
    /// Water too small to count as ocean (lakes, below-sea-level pits).
    InlandWater,
    /// Land no coast could reach.
    Unvisited,
    /// Coastal seed cell.
    Coast(BasinId),
    /// Land claimed by a single nearest basin.
    Labeled(BasinId),
    /// Land equidistant from two or more basins; carries the lowest of their ids.
    Contested(BasinId),
}

impl CellState {
    /// Basin carried by this cell, if any.
    pub fn basin(self) -> Option<BasinId> {
        match self {
            CellState::Coast(b) | CellState::Labeled(b) | CellState::Contested(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, CellState::Ocean | CellState::InlandWater)
    }

    pub fn is_land(self) -> bool {
        !self.is_water()
    }

    pub fn is_contested(self) -> bool {
        matches!(self, CellState::Contested(_))
    }
}

/// Result grid of basin labeling.
#[derive(Debug, Clone)]
pub struct BasinLabels {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) states: Vec<CellState>,
    pub(crate) distances: Vec<u32>,
    pub(crate) basin_count: u32,
}

/// Distance stored for cells never reached by expansion.
pub const UNREACHED: u32 = u32::MAX;

impl BasinLabels {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of distinct basin ids handed out to seeds.
    pub fn basin_count(&self) -> u32 {
        self.basin_count
    }

    /// Row-major cell states.
    pub fn states(&self) -> &[CellState] {
        &self.states
    }

    pub fn state(&self, row: usize, col: usize) -> Option<CellState> {
        (row < self.rows && col < self.cols).then(|| self.states[row * self.cols + col])
    }

    pub fn state_at(&self, idx: usize) -> CellState {
        self.states[idx]
    }

    /// Basin id of `(row, col)`, if the cell is in range and carries one.
    pub fn basin(&self, row: usize, col: usize) -> Option<BasinId> {
        self.state(row, col).and_then(CellState::basin)
    }

    /// Grid-step distance from the nearest seed, or `None` if unreached.
    pub fn distance(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        match self.distances[row * self.cols + col] {
            UNREACHED => None,
            d => Some(d),
        }
    }

    /// Number of cells matching `pred`.
    pub fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(CellState) -> bool,
    {
        self.states.iter().filter(|&&s| pred(s)).count()
    }

    /// Coordinates of land cells still `Unvisited`.
    pub fn unvisited_cells(&self) -> Vec<CellCoord> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, CellState::Unvisited))
            .map(|(i, _)| CellCoord { row: i / self.cols, col: i % self.cols })
            .collect()
    }

    /// True if this label grid has the same shape as `grid`.
    pub fn matches_shape(&self, grid: &ElevationGrid) -> bool {
        self.rows == grid.rows() && self.cols == grid.cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basin_accessor() {
        assert_eq!(CellState::Coast(BasinId(2)).basin(), Some(BasinId(2)));
        assert_eq!(CellState::Contested(BasinId(0)).basin(), Some(BasinId(0)));
        assert_eq!(CellState::Unvisited.basin(), None);
        assert_eq!(CellState::Ocean.basin(), None);
    }

    #[test]
    fn test_water_and_land() {
        assert!(CellState::Ocean.is_water());
        assert!(CellState::InlandWater.is_water());
        assert!(CellState::Unvisited.is_land());
        assert!(CellState::Labeled(BasinId(1)).is_land());
    }

    #[test]
    fn test_basin_display() {
        assert_eq!(BasinId(7).to_string(), "basin#7");
    }
}
