//! Continental-divide classification of global elevation rasters.
//!
//! This crate loads a flat 16-bit elevation raster, finds coastal land
//! cells, and labels every land cell with the ocean basin it is nearest to
//! by breadth-first expansion over 4-adjacency. Results can be rendered as a
//! color-coded image or dumped as a RAW label grid.

pub mod basins;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod terrain;

pub use basins::{BasinConfig, BasinId, BasinLabels, CellState, LabelReport, OceanPolicy, SeedSet};
pub use config::DivideConfig;
pub use pipeline::{DivideStage, Pipeline, PipelineError, StageConfig};
pub use terrain::{CellCoord, ElevationGrid, GridError, Landscape, OceanRule};
