//! Drainage-basin classification.
//!
//! Water is split into ocean components, coastal land cells become seeds,
//! and a breadth-first expansion carries each seed's basin inland.

mod config;
pub mod coast;
pub mod labeler;
pub mod ocean;
mod state;

pub use coast::{detect_coastline, Seed, SeedSet};
pub use config::{BasinConfig, OceanPolicy};
pub use labeler::{label_basins, BasinError, LabelReport, UnreachableLand};
pub use ocean::{label_ocean_components, OceanMap};
pub use state::{BasinId, BasinLabels, CellState};
