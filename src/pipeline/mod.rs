//! Pipeline module for orchestrating the classification stages.
//!
//! Stages run as a single synchronous batch: ocean components, then
//! coastline seeds, then basin expansion.

mod stage;

pub use stage::{
    BasinStage, CoastlineStage, DivideStage, OceanStage, Pipeline, PipelineError, StageConfig, StageId,
};
