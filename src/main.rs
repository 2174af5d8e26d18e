//! Divide CLI - continental-divide basin labeling.
//!
//! Classify every land cell of a flat 16-bit elevation raster by the ocean
//! basin it is nearest to, and render the result as an image.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use continental_divide::basins::{CellState, OceanPolicy};
use continental_divide::config::{ConfigError, DivideConfig};
use continental_divide::export::{
    export_labels_raw, render, write_raster, write_report, ImageExportError, ImageExportOptions,
    RawExportError, RawLabelFormat, RenderError, RenderMode, ReportError, RunSummary, BYTES_PER_PIXEL,
};
use continental_divide::pipeline::{Pipeline, PipelineError, StageConfig};
use continental_divide::terrain::{
    ensure_supported_platform, load_grid, raster_shape, GridError, Landscape, OceanRule, DEFAULT_COLUMNS,
    SAMPLE_BYTES,
};

/// Continental-divide basin labeler.
#[derive(Parser)]
#[command(name = "divide")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label every land cell with its nearest ocean basin and render the result.
    Classify(ClassifyArgs),

    /// Display the shape and memory footprint of an input raster.
    Info {
        /// Raw little-endian signed 16-bit elevation file.
        #[arg(short, long)]
        input: PathBuf,

        /// Samples per row.
        #[arg(short, long, default_value_t = DEFAULT_COLUMNS)]
        columns: usize,
    },
}

#[derive(Args)]
struct ClassifyArgs {
    /// Raw little-endian signed 16-bit elevation file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output image (.png or .bmp).
    #[arg(short, long)]
    output: PathBuf,

    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples per row.
    #[arg(short, long)]
    columns: Option<usize>,

    /// Samples strictly below this elevation are ocean.
    #[arg(long, conflicts_with = "ocean_sentinel", allow_hyphen_values = true)]
    sea_level: Option<i16>,

    /// Only samples equal to this value are ocean.
    #[arg(long, allow_hyphen_values = true)]
    ocean_sentinel: Option<i16>,

    /// How ocean components map to basins.
    #[arg(long)]
    ocean_policy: Option<PolicyArg>,

    /// Water bodies smaller than this are inland water, not ocean.
    #[arg(long)]
    min_ocean_cells: Option<usize>,

    /// What the output image shows.
    #[arg(short, long)]
    mode: Option<ModeArg>,

    /// Seed for the basin palette.
    #[arg(long)]
    palette_seed: Option<u64>,

    /// Darken basin colors toward low ground.
    #[arg(long)]
    shade: bool,

    /// Also write the label grid as raw integers.
    #[arg(long)]
    labels_raw: Option<PathBuf>,

    /// Integer width of the raw label grid.
    #[arg(long, default_value = "u32")]
    labels_format: LabelFormatArg,

    /// Also write a JSON summary of the run.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Each connected ocean is its own basin.
    Connected,
    /// All oceans form one basin.
    SingleSea,
}

impl From<PolicyArg> for OceanPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Connected => OceanPolicy::Connected,
            PolicyArg::SingleSea => OceanPolicy::SingleSea,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Basin palette with coast and contested cells marked.
    Basins,
    /// Greyscale elevation with the coastline in green.
    Elevation,
}

impl From<ModeArg> for RenderMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Basins => RenderMode::Basins,
            ModeArg::Elevation => RenderMode::Elevation,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LabelFormatArg {
    /// 16-bit unsigned little-endian.
    U16,
    /// 32-bit unsigned little-endian.
    U32,
}

impl From<LabelFormatArg> for RawLabelFormat {
    fn from(arg: LabelFormatArg) -> Self {
        match arg {
            LabelFormatArg::U16 => RawLabelFormat::U16,
            LabelFormatArg::U32 => RawLabelFormat::U32,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Image(#[from] ImageExportError),
    #[error(transparent)]
    Raw(#[from] RawExportError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = ensure_supported_platform() {
        error!("{e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classify(args) => run_classify(args),
        Commands::Info { input, columns } => run_info(&input, columns),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn resolve_config(args: &ClassifyArgs) -> Result<DivideConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => DivideConfig::from_json_file(path)?,
        None => DivideConfig::default(),
    };

    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(sea_level) = args.sea_level {
        config.ocean_rule = OceanRule::BelowSeaLevel { sea_level };
    }
    if let Some(value) = args.ocean_sentinel {
        config.ocean_rule = OceanRule::Sentinel { value };
    }
    if let Some(policy) = args.ocean_policy {
        config.basins.ocean_policy = policy.into();
    }
    if let Some(min) = args.min_ocean_cells {
        config.basins.min_ocean_cells = min;
    }
    if let Some(mode) = args.mode {
        config.render.mode = mode.into();
    }
    if let Some(seed) = args.palette_seed {
        config.render.palette_seed = seed;
    }
    if args.shade {
        config.render.shade_by_elevation = true;
    }

    config.validate()?;
    Ok(config)
}

fn run_classify(args: ClassifyArgs) -> Result<(), CliError> {
    let config = resolve_config(&args)?;

    println!("Divide - Continental Basin Labeling");
    println!("===================================");
    println!("Input:  {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Ocean:  {:?}, policy {:?}", config.ocean_rule, config.basins.ocean_policy);
    println!();

    let start = Instant::now();
    let grid = load_grid(&args.input, config.columns, config.ocean_rule)?;
    println!(
        "Loaded {}x{} grid ({} land cells) in {:.2?}",
        grid.cols(),
        grid.rows(),
        grid.land_count(),
        start.elapsed()
    );

    let (min_elevation, max_elevation) = grid.elevation_range();
    println!("Elevation range: [{}, {}]", min_elevation, max_elevation);

    let mut landscape = Landscape::new(grid);
    let pipeline = Pipeline::standard(StageConfig::new(config.basins.clone()));

    let start = Instant::now();
    pipeline.run_with_callbacks(
        &mut landscape,
        |name, i, total| {
            println!("  [{}/{}] Starting: {}", i + 1, total, name);
        },
        |name, i, total| {
            println!("  [{}/{}] Completed: {}", i + 1, total, name);
        },
    )?;
    println!("Labeling completed in {:.2?}", start.elapsed());

    let (Some(labels), Some(report)) = (landscape.labels.as_ref(), landscape.report.as_ref()) else {
        return Err(PipelineError::StageFailed("Basin Labeling".into(), "no labels produced".into()).into());
    };

    println!("Basins: {}", report.basin_count());
    println!("Coast cells: {}", report.coast_cells);
    println!("Contested cells: {}", report.contested_cells);
    if report.unreachable.is_some() {
        println!("Unreachable land cells: {}", report.unreachable_count());
    }

    let image = render(&landscape.grid, labels, &config.render)?;
    write_raster(&image, &args.output, &ImageExportOptions::default())?;
    println!("Wrote {}", args.output.display());

    if let Some(path) = &args.labels_raw {
        export_labels_raw(labels, path, args.labels_format.into())?;
        println!("Wrote {}", path.display());
    }

    if let Some(path) = &args.report {
        let summary = RunSummary::new(
            landscape.rows(),
            landscape.cols(),
            config.ocean_rule,
            config.basins.ocean_policy,
            report,
        );
        write_report(&summary, path)?;
        println!("Wrote {}", path.display());
    }

    info!(
        basins = report.basin_count(),
        unvisited = labels.count_where(|s| s == CellState::Unvisited),
        "classification finished"
    );
    Ok(())
}

fn run_info(input: &Path, columns: usize) -> Result<(), CliError> {
    let byte_len = std::fs::metadata(input)?.len();
    let (rows, cols) = raster_shape(byte_len, columns)?;
    let cells = (rows as u64) * (cols as u64);

    let bytes_elevation = cells * SAMPLE_BYTES as u64;
    let bytes_states = cells * std::mem::size_of::<CellState>() as u64;
    let bytes_distances = cells * std::mem::size_of::<u32>() as u64;
    let bytes_components = cells * std::mem::size_of::<u32>() as u64;
    let bytes_image = cells * BYTES_PER_PIXEL as u64;
    let bytes_raw_u16 = cells * RawLabelFormat::U16.bytes_per_cell();
    let bytes_raw_u32 = cells * RawLabelFormat::U32.bytes_per_cell();

    println!("Divide - Raster Info");
    println!("====================");
    println!();
    println!("Input: {}", input.display());
    println!("File size: {} bytes", byte_len);
    println!("Shape: {} rows x {} columns", rows, cols);
    println!("Cells: {}", cells);
    println!();
    println!("Memory usage (in-memory):");
    println!("  Elevation:     {:>12} bytes ({:.2} MB)", bytes_elevation, mb(bytes_elevation));
    println!("  Cell states:   {:>12} bytes ({:.2} MB)", bytes_states, mb(bytes_states));
    println!("  Distances:     {:>12} bytes ({:.2} MB)", bytes_distances, mb(bytes_distances));
    println!("  Water comps:   {:>12} bytes ({:.2} MB)", bytes_components, mb(bytes_components));
    println!("  Image (BGRA):  {:>12} bytes ({:.2} MB)", bytes_image, mb(bytes_image));
    let total = bytes_elevation + bytes_states + bytes_distances + bytes_components + bytes_image;
    println!("  Total:         {:>12} bytes ({:.2} MB)", total, mb(total));
    println!();
    println!("Label export sizes:");
    println!("  RAW (u16):     {:>12} bytes ({:.2} MB)", bytes_raw_u16, mb(bytes_raw_u16));
    println!("  RAW (u32):     {:>12} bytes ({:.2} MB)", bytes_raw_u32, mb(bytes_raw_u32));

    if u32::try_from(rows).is_err() || u32::try_from(cols).is_err() {
        println!();
        println!("Warning: grid is too large to render as a single image");
    }

    Ok(())
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
