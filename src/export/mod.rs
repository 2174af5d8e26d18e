//! Export module for turning basin labels into files.
//!
//! Renders a color-coded BGRA raster (written as PNG or BMP), dumps the
//! label grid as RAW integers, and summarizes a run as JSON.

mod encode;
mod palette;
mod raster;
mod raw;
mod report;

pub use encode::{write_raster, ImageExportError, ImageExportOptions};
pub use palette::{generate_basin_colors, hsv_to_rgb};
pub use raster::{
    elevation_grey, render, RasterImage, RenderError, RenderMode, RenderOptions, BYTES_PER_PIXEL,
    COAST_COLOR, CONTESTED_COLOR, FLAT_LAND_GREY, INLAND_WATER_COLOR, OCEAN_COLOR,
};
pub use raw::{encode_cell, expected_file_size, export_labels_raw, RawExportError, RawLabelFormat};
pub use report::{write_report, BasinSummary, ReportError, RunSummary, MAX_LISTED_UNREACHABLE};
