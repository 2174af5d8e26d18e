//! Connected-component labeling of ocean cells.
//!
//! Components are discovered in row-major order of their first cell and
//! grown by breadth-first flood fill over 4-adjacency.

use std::collections::VecDeque;

use tracing::debug;

use crate::terrain::ElevationGrid;

/// Component id stored for land cells.
pub const NOT_WATER: u32 = u32::MAX;

/// Water components of a grid.
#[derive(Debug, Clone)]
pub struct OceanMap {
    /// Component id per cell, or [`NOT_WATER`].
    components: Vec<u32>,
    /// Cell count per component.
    sizes: Vec<usize>,
    min_ocean_cells: usize,
}

impl OceanMap {
    /// Component of the water cell at `idx`, or `None` for land.
    #[inline]
    pub fn component_at(&self, idx: usize) -> Option<u32> {
        match self.components[idx] {
            NOT_WATER => None,
            c => Some(c),
        }
    }

    /// True if `component` is large enough to count as open ocean.
    #[inline]
    pub fn is_open(&self, component: u32) -> bool {
        self.sizes[component as usize] >= self.min_ocean_cells
    }

    /// Open-ocean component at `idx`, or `None` for land and inland water.
    #[inline]
    pub fn open_component_at(&self, idx: usize) -> Option<u32> {
        self.component_at(idx).filter(|&c| self.is_open(c))
    }

    #[inline]
    pub fn is_inland_water_at(&self, idx: usize) -> bool {
        self.component_at(idx).is_some_and(|c| !self.is_open(c))
    }

    /// Total number of water components, open or inland.
    pub fn component_count(&self) -> usize {
        self.sizes.len()
    }

    /// Number of components that count as open ocean.
    pub fn open_count(&self) -> usize {
        (0..self.sizes.len() as u32).filter(|&c| self.is_open(c)).count()
    }

    pub fn cell_count(&self) -> usize {
        self.components.len()
    }
}

/// Labels every water cell of `grid` with a component id.
///
/// Components with fewer than `min_ocean_cells` cells are kept as inland water.
pub fn label_ocean_components(grid: &ElevationGrid, min_ocean_cells: usize) -> OceanMap {
    let total = grid.len();
    let mut components = vec![NOT_WATER; total];
    let mut sizes: Vec<usize> = Vec::new();
    let mut q: VecDeque<usize> = VecDeque::new();

    for start in 0..total {
        if components[start] != NOT_WATER || !grid.is_ocean_at(start) {
            continue;
        }

        let id = sizes.len() as u32;
        let mut size = 0usize;
        components[start] = id;
        q.push_back(start);

        while let Some(idx) = q.pop_front() {
            size += 1;
            for n in grid.neighbor_indices(idx) {
                if components[n] == NOT_WATER && grid.is_ocean_at(n) {
                    components[n] = id;
                    q.push_back(n);
                }
            }
        }

        sizes.push(size);
    }

    let map = OceanMap { components, sizes, min_ocean_cells };
    debug!(
        components = map.component_count(),
        open = map.open_count(),
        "labeled water components"
    );
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::OceanRule;

    fn grid(rows: &[&[i16]]) -> ElevationGrid {
        let cols = rows[0].len();
        let samples = rows.iter().flat_map(|r| r.iter().copied()).collect();
        ElevationGrid::from_samples(rows.len(), cols, samples, OceanRule::default()).unwrap()
    }

    #[test]
    fn test_two_separate_oceans() {
        let g = grid(&[
            &[-1, 5, 5, -1],
            &[-1, 5, 5, -1],
        ]);
        let map = label_ocean_components(&g, 1);

        assert_eq!(map.component_count(), 2);
        assert_eq!(map.component_at(0), Some(0));
        assert_eq!(map.component_at(4), Some(0));
        assert_eq!(map.component_at(3), Some(1));
        assert_eq!(map.component_at(7), Some(1));
        assert_eq!(map.component_at(1), None);
    }

    #[test]
    fn test_diagonal_water_is_not_connected() {
        let g = grid(&[
            &[-1, 5],
            &[5, -1],
        ]);
        let map = label_ocean_components(&g, 1);
        assert_eq!(map.component_count(), 2);
    }

    #[test]
    fn test_small_components_are_inland_water() {
        let g = grid(&[
            &[-1, -1, -1, 5, 5],
            &[-1, -1, -1, 5, 5],
            &[5, 5, 5, 5, -1],
        ]);
        let map = label_ocean_components(&g, 3);

        assert_eq!(map.component_count(), 2);
        assert_eq!(map.open_count(), 1);
        assert!(map.open_component_at(0).is_some());
        assert!(map.is_inland_water_at(14));
        assert_eq!(map.open_component_at(14), None);
        assert!(!map.is_inland_water_at(3));
    }
}
