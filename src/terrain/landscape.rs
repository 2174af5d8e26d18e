//! The elevation grid together with what each pipeline stage derives from it.

use super::grid::ElevationGrid;
use crate::basins::{BasinLabels, LabelReport, OceanMap, SeedSet};

/// A loaded raster and its classification products.
///
/// The grid is owned for the lifetime of a run; later fields are filled in
/// by pipeline stages and stay `None` until their stage has executed.
#[derive(Debug, Clone)]
pub struct Landscape {
    /// Immutable elevation samples.
    pub grid: ElevationGrid,
    /// Water components (populated after the ocean stage).
    pub oceans: Option<OceanMap>,
    /// Coastal seeds (populated after the coastline stage).
    pub seeds: Option<SeedSet>,
    /// Per-cell basin labels (populated after the basin stage).
    pub labels: Option<BasinLabels>,
    /// Summary of the basin stage.
    pub report: Option<LabelReport>,
}

impl Landscape {
    pub fn new(grid: ElevationGrid) -> Self {
        Self {
            grid,
            oceans: None,
            seeds: None,
            labels: None,
            report: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Returns true once basin labels exist.
    pub fn is_labeled(&self) -> bool {
        self.labels.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::OceanRule;

    #[test]
    fn test_new_landscape_is_unlabeled() {
        let grid = ElevationGrid::from_samples(2, 3, vec![0; 6], OceanRule::default()).unwrap();
        let landscape = Landscape::new(grid);
        assert_eq!(landscape.rows(), 2);
        assert_eq!(landscape.cols(), 3);
        assert!(landscape.oceans.is_none());
        assert!(landscape.seeds.is_none());
        assert!(!landscape.is_labeled());
    }
}
