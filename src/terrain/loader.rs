//! Flat binary elevation raster ingestion.
//!
//! The input is a headerless stream of signed 16-bit samples, row-major,
//! with a fixed column count. Samples are reinterpreted in host order, so
//! only little-endian hosts are accepted.

use std::path::Path;

use tracing::{debug, info};

use super::grid::{ElevationGrid, GridError, OceanRule};

/// Bytes per elevation sample.
pub const SAMPLE_BYTES: usize = 2;

/// Fails with [`GridError::PlatformUnsupported`] on big-endian hosts.
pub fn ensure_supported_platform() -> Result<(), GridError> {
    if cfg!(target_endian = "big") {
        return Err(GridError::PlatformUnsupported);
    }
    Ok(())
}

/// Shape implied by a raw byte count, as `(rows, cols)`.
///
/// Validates everything [`grid_from_bytes`] validates without touching the
/// data, so callers can report the shape of a file before loading it.
pub fn raster_shape(byte_len: u64, columns: usize) -> Result<(usize, usize), GridError> {
    if columns == 0 {
        return Err(GridError::MalformedInput("column count must be positive".into()));
    }
    if byte_len % SAMPLE_BYTES as u64 != 0 {
        return Err(GridError::MalformedInput(format!(
            "expected an even number of bytes for 16-bit samples, got {byte_len}"
        )));
    }
    let samples = byte_len / SAMPLE_BYTES as u64;
    if samples % columns as u64 != 0 {
        return Err(GridError::MalformedInput(format!(
            "{samples} samples are not evenly divisible by the column count ({columns})"
        )));
    }
    let rows = usize::try_from(samples / columns as u64)
        .map_err(|_| GridError::MalformedInput(format!("{samples} samples exceed addressable memory")))?;
    Ok((rows, columns))
}

/// Builds a grid from raw little-endian bytes.
///
/// All structural checks run before any sample is decoded.
pub fn grid_from_bytes(bytes: &[u8], columns: usize, ocean_rule: OceanRule) -> Result<ElevationGrid, GridError> {
    ensure_supported_platform()?;
    let (rows, cols) = raster_shape(bytes.len() as u64, columns)?;

    // Handles unaligned input by copying; the host is known to be little-endian.
    let samples: Vec<i16> = bytemuck::pod_collect_to_vec(bytes);
    debug!(rows, cols, "decoded elevation samples");

    ElevationGrid::from_samples(rows, cols, samples, ocean_rule)
}

/// Reads and decodes an elevation raster file.
///
/// The file size is validated before any bytes are read.
///
/// # Arguments
/// * `path` - Headerless file of little-endian signed 16-bit samples
/// * `columns` - Samples per row
/// * `ocean_rule` - Classification applied to every sample
///
/// # Returns
/// The loaded grid, or `MalformedInput` / `Io` if the file cannot form one
pub fn load_grid(path: &Path, columns: usize, ocean_rule: OceanRule) -> Result<ElevationGrid, GridError> {
    ensure_supported_platform()?;
    let len = std::fs::metadata(path)?.len();
    // Reject before reading a potentially large file.
    raster_shape(len, columns)?;

    let bytes = std::fs::read(path)?;
    let grid = grid_from_bytes(&bytes, columns, ocean_rule)?;
    info!(
        path = %path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "loaded elevation raster"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn encode(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_little_endian_host_is_supported() {
        if cfg!(target_endian = "little") {
            assert!(ensure_supported_platform().is_ok());
        } else {
            assert!(matches!(ensure_supported_platform(), Err(GridError::PlatformUnsupported)));
        }
    }

    #[test]
    fn test_odd_byte_length_is_malformed() {
        let bytes = vec![0u8; 7];
        let result = grid_from_bytes(&bytes, 2, OceanRule::default());
        assert!(matches!(result, Err(GridError::MalformedInput(_))));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        // 5 samples cannot form rows of 3.
        let bytes = encode(&[1, 2, 3, 4, 5]);
        let result = grid_from_bytes(&bytes, 3, OceanRule::default());
        assert!(matches!(result, Err(GridError::MalformedInput(_))));
    }

    #[test]
    fn test_zero_columns_is_malformed() {
        assert!(matches!(raster_shape(8, 0), Err(GridError::MalformedInput(_))));
    }

    #[test]
    fn test_decodes_signed_samples_row_major() {
        let bytes = encode(&[-500, 0, 1, 32767, -32768, 42]);
        let grid = grid_from_bytes(&bytes, 3, OceanRule::default()).unwrap();

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(0, 0), Some(-500));
        assert_eq!(grid.get(0, 2), Some(1));
        assert_eq!(grid.get(1, 0), Some(32767));
        assert_eq!(grid.get(1, 1), Some(-32768));
        assert_eq!(grid.get(1, 2), Some(42));
    }

    #[test]
    fn test_decodes_unaligned_slice() {
        let mut bytes = vec![0u8];
        bytes.extend(encode(&[7, -7]));
        let grid = grid_from_bytes(&bytes[1..], 2, OceanRule::default()).unwrap();
        assert_eq!(grid.samples(), &[7, -7]);
    }

    #[test]
    fn test_raster_shape() {
        assert_eq!(raster_shape(10800 * 2 * 3, 10800).unwrap(), (3, 10800));
        assert_eq!(raster_shape(0, 4).unwrap(), (0, 4));
    }

    #[test]
    fn test_load_grid_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&encode(&[-500, 12, 30, -500])).unwrap();
        drop(file);

        let grid = load_grid(&path, 2, OceanRule::default()).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.get(1, 0), Some(30));
    }

    #[test]
    fn test_load_grid_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load_grid(&dir.path().join("missing.bin"), 2, OceanRule::default());
        assert!(matches!(result, Err(GridError::Io(_))));
    }
}
