//! Terrain input module.
//!
//! Provides the elevation grid, raw raster loading, and the `Landscape`
//! container that pipeline stages fill in.

mod grid;
mod landscape;
mod loader;

pub use grid::{CellCoord, Direction, ElevationGrid, GridError, NeighborIndices, OceanRule, DEFAULT_COLUMNS};
pub use landscape::Landscape;
pub use loader::{ensure_supported_platform, grid_from_bytes, load_grid, raster_shape, SAMPLE_BYTES};
