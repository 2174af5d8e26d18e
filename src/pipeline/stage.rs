//! Classification stage trait and pipeline orchestration.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use crate::basins::{detect_coastline, label_basins, label_ocean_components, BasinConfig, BasinError};
use crate::terrain::Landscape;

/// Unique identifier for classification stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Water connected-component labeling.
    Oceans,
    /// Coastal seed detection.
    Coastline,
    /// Breadth-first basin expansion.
    Basins,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Oceans => "oceans",
            StageId::Coastline => "coastline",
            StageId::Basins => "basins",
        }
    }
}

/// Configuration passed to each stage.
#[derive(Debug, Clone, Default)]
pub struct StageConfig {
    pub basins: BasinConfig,
}

impl StageConfig {
    pub fn new(basins: BasinConfig) -> Self {
        Self { basins }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error(transparent)]
    Basin(#[from] BasinError),
}

/// A step of the classification pipeline.
///
/// Each stage reads what earlier stages left on the [`Landscape`] and adds its
/// own product.
pub trait DivideStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the landscape in place.
    fn execute(&self, landscape: &mut Landscape, config: &StageConfig) -> Result<(), PipelineError>;
}

/// Runs stages in order over one landscape.
pub struct Pipeline {
    stages: Vec<Box<dyn DivideStage>>,
    config: StageConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: StageConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Pipeline with the ocean, coastline and basin stages in order.
    pub fn standard(config: StageConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline.add_stage(OceanStage).add_stage(CoastlineStage).add_stage(BasinStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: DivideStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order.
    pub fn run(&self, landscape: &mut Landscape) -> Result<(), PipelineError> {
        self.run_with_callbacks(landscape, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages, reporting each start and completion.
    ///
    /// # Arguments
    /// * `landscape` - The landscape to classify
    /// * `on_stage_start` - Called with (stage name, index, total) before each stage
    /// * `on_stage_complete` - Called with (stage name, index, total) after each stage
    ///
    /// # Returns
    /// `Ok(())` if every stage succeeded, or the first error encountered
    pub fn run_with_callbacks<F1, F2>(
        &self,
        landscape: &mut Landscape,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            on_stage_start(stage.name(), i, total);
            let start = Instant::now();
            stage.execute(landscape, &self.config)?;
            debug!(stage = stage.name(), elapsed = ?start.elapsed(), "stage finished");
            completed.push(stage.id());
            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Splits water into connected components.
pub struct OceanStage;

impl DivideStage for OceanStage {
    fn id(&self) -> StageId {
        StageId::Oceans
    }

    fn name(&self) -> &str {
        "Ocean Components"
    }

    fn execute(&self, landscape: &mut Landscape, config: &StageConfig) -> Result<(), PipelineError> {
        let oceans = label_ocean_components(&landscape.grid, config.basins.min_ocean_cells);
        if oceans.open_count() == 0 {
            warn!("no open ocean found; every cell is land or inland water");
        }
        landscape.oceans = Some(oceans);
        Ok(())
    }
}

/// Finds coastal seeds and assigns their basin ids.
pub struct CoastlineStage;

impl DivideStage for CoastlineStage {
    fn id(&self) -> StageId {
        StageId::Coastline
    }

    fn name(&self) -> &str {
        "Coastline Detection"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Oceans]
    }

    fn execute(&self, landscape: &mut Landscape, config: &StageConfig) -> Result<(), PipelineError> {
        let oceans = landscape.oceans.as_ref().ok_or_else(|| {
            PipelineError::StageFailed(self.name().to_string(), "ocean components not computed".into())
        })?;
        let seeds = detect_coastline(&landscape.grid, oceans, config.basins.ocean_policy);
        landscape.seeds = Some(seeds);
        Ok(())
    }
}

/// Expands coastal seeds inland.
pub struct BasinStage;

impl DivideStage for BasinStage {
    fn id(&self) -> StageId {
        StageId::Basins
    }

    fn name(&self) -> &str {
        "Basin Labeling"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Oceans, StageId::Coastline]
    }

    fn execute(&self, landscape: &mut Landscape, _config: &StageConfig) -> Result<(), PipelineError> {
        let (Some(oceans), Some(seeds)) = (landscape.oceans.as_ref(), landscape.seeds.as_ref()) else {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                "coastline seeds not computed".into(),
            ));
        };
        let (labels, report) = label_basins(&landscape.grid, oceans, seeds)?;
        landscape.labels = Some(labels);
        landscape.report = Some(report);
        Ok(())
    }
}
