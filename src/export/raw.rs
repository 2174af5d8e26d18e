//! RAW label export: one little-endian integer per cell, row-major.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::basins::{BasinLabels, CellState};

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Basin id {0} does not fit below the reserved values of the 16-bit format")]
    IdOverflow(u32),
}

/// RAW label format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawLabelFormat {
    /// 16-bit unsigned, little-endian.
    U16,
    /// 32-bit unsigned, little-endian.
    #[default]
    U32,
}

impl RawLabelFormat {
    pub fn bytes_per_cell(self) -> u64 {
        match self {
            RawLabelFormat::U16 => 2,
            RawLabelFormat::U32 => 4,
        }
    }

    /// Value written for ocean and inland water.
    pub fn no_basin(self) -> u32 {
        self.max()
    }

    /// Value written for land no coast reached.
    pub fn unreachable(self) -> u32 {
        self.max() - 1
    }

    /// Value written for contested land.
    pub fn contested(self) -> u32 {
        self.max() - 2
    }

    fn max(self) -> u32 {
        match self {
            RawLabelFormat::U16 => u16::MAX as u32,
            RawLabelFormat::U32 => u32::MAX,
        }
    }
}

/// Encodes a single cell state.
pub fn encode_cell(state: CellState, format: RawLabelFormat) -> Result<u32, RawExportError> {
    let value = match state {
        CellState::Ocean | CellState::InlandWater => format.no_basin(),
        CellState::Unvisited => format.unreachable(),
        CellState::Contested(_) => format.contested(),
        CellState::Coast(b) | CellState::Labeled(b) => {
            if b.0 >= format.contested() {
                return Err(RawExportError::IdOverflow(b.0));
            }
            b.0
        }
    };
    Ok(value)
}

/// Writes the label grid as a headerless RAW file.
///
/// The whole grid is validated before the file is created, so an overflow
/// never leaves a partial file behind.
///
/// # Arguments
/// * `labels` - Labeled grid to export
/// * `path` - Output file path
/// * `format` - Integer width (U16 or U32)
///
/// # Returns
/// `Ok(())` on success, `IdOverflow` if a basin id collides with the
/// sentinel range, or an IO error
pub fn export_labels_raw(labels: &BasinLabels, path: &Path, format: RawLabelFormat) -> Result<(), RawExportError> {
    if labels.basin_count() > 0 && labels.basin_count() - 1 >= format.contested() {
        return Err(RawExportError::IdOverflow(labels.basin_count() - 1));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for &state in labels.states() {
        let value = encode_cell(state, format)?;
        match format {
            RawLabelFormat::U16 => writer.write_all(&(value as u16).to_le_bytes())?,
            RawLabelFormat::U32 => writer.write_all(&value.to_le_bytes())?,
        }
    }

    writer.flush()?;
    Ok(())
}

/// Returns the expected file size for a RAW label export.
pub fn expected_file_size(rows: usize, cols: usize, format: RawLabelFormat) -> u64 {
    (rows as u64) * (cols as u64) * format.bytes_per_cell()
}
