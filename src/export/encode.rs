//! Encoding rendered rasters to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use thiserror::Error;
use tracing::info;

use super::raster::RasterImage;

/// Errors that can occur during image export.
#[derive(Error, Debug)]
pub enum ImageExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Unsupported output format for '{0}' (expected .png or .bmp)")]
    UnsupportedFormat(String),
}

/// Options for image export.
#[derive(Debug, Clone)]
pub struct ImageExportOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for ImageExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Writes `image` to `path`, choosing PNG or BMP from the file extension.
///
/// Both encodings keep the alpha channel (32 bits per pixel).
pub fn write_raster(
    image: &RasterImage,
    path: &Path,
    options: &ImageExportOptions,
) -> Result<(), ImageExportError> {
    let format = match ImageFormat::from_path(path) {
        Ok(f @ (ImageFormat::Png | ImageFormat::Bmp)) => f,
        _ => return Err(ImageExportError::UnsupportedFormat(path.display().to_string())),
    };

    let rgba = image.to_rgba();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        ImageFormat::Bmp => {
            let encoder = BmpEncoder::new(&mut writer);
            encoder.write_image(&rgba, image.width(), image.height(), ExtendedColorType::Rgba8)?;
        }
        _ => {
            let encoder = PngEncoder::new_with_quality(&mut writer, options.compression, options.filter);
            encoder.write_image(&rgba, image.width(), image.height(), ExtendedColorType::Rgba8)?;
        }
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote raster image"
    );
    Ok(())
}
