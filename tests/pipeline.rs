//! End-to-end classification: raw bytes to image, label grid and report.

use continental_divide::basins::{BasinConfig, BasinId, CellState};
use continental_divide::export::{
    export_labels_raw, expected_file_size, render, write_raster, write_report, ImageExportOptions,
    RawLabelFormat, RenderOptions, RunSummary,
};
use continental_divide::pipeline::{Pipeline, StageConfig};
use continental_divide::terrain::{load_grid, Landscape, OceanRule};

fn encode(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Two oceans on the left and right edges with a ridge of land between.
fn strait_samples(rows: usize, cols: usize) -> Vec<i16> {
    let mut samples = Vec::with_capacity(rows * cols);
    for _ in 0..rows {
        for c in 0..cols {
            if c == 0 || c == cols - 1 {
                samples.push(-500);
            } else {
                samples.push(100 + 10 * c as i16);
            }
        }
    }
    samples
}

#[test]
fn test_classify_strait_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("strait.bin");
    std::fs::write(&input, encode(&strait_samples(6, 10))).unwrap();

    let grid = load_grid(&input, 10, OceanRule::default()).unwrap();
    assert_eq!((grid.rows(), grid.cols()), (6, 10));

    let mut landscape = Landscape::new(grid);
    Pipeline::standard(StageConfig::default()).run(&mut landscape).unwrap();

    let labels = landscape.labels.as_ref().unwrap();
    let report = landscape.report.as_ref().unwrap();
    assert_eq!(report.basin_count(), 2);
    assert_eq!(report.contested_cells, 0);
    assert!(report.unreachable.is_none());
    for row in 0..6 {
        assert_eq!(labels.state(row, 1), Some(CellState::Coast(BasinId(0))));
        assert_eq!(labels.basin(row, 4), Some(BasinId(0)));
        assert_eq!(labels.basin(row, 5), Some(BasinId(1)));
        assert_eq!(labels.state(row, 8), Some(CellState::Coast(BasinId(1))));
    }

    let image = render(&landscape.grid, labels, &RenderOptions::default()).unwrap();
    let png_path = dir.path().join("basins.png");
    write_raster(&image, &png_path, &ImageExportOptions::default()).unwrap();
    let decoded = image::open(&png_path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (10, 6));
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 3).0, [0, 255, 0, 255]);
    assert_eq!(decoded.get_pixel(8, 3).0, [0, 255, 0, 255]);
    assert_ne!(decoded.get_pixel(3, 0).0, decoded.get_pixel(6, 0).0);

    let raw_path = dir.path().join("labels.raw");
    export_labels_raw(labels, &raw_path, RawLabelFormat::U32).unwrap();
    let raw = std::fs::read(&raw_path).unwrap();
    assert_eq!(raw.len() as u64, expected_file_size(6, 10, RawLabelFormat::U32));
    let value = |idx: usize| u32::from_le_bytes(raw[idx * 4..idx * 4 + 4].try_into().unwrap());
    assert_eq!(value(0), u32::MAX);
    assert_eq!(value(2), 0);
    assert_eq!(value(7), 1);

    let report_path = dir.path().join("report.json");
    let summary = RunSummary::new(6, 10, OceanRule::default(), BasinConfig::default().ocean_policy, report);
    write_report(&summary, &report_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["basins"].as_array().unwrap().len(), 2);
    assert_eq!(json["basins"][0]["cells"], 24);
    assert_eq!(json["land_cells"], 48);
    assert_eq!(json["unreachable_cells"], 0);
}

#[test]
fn test_island_in_lake_is_reported_unreachable() {
    // Ocean down column 0; a ring of lake water around (4, 4) encloses an island.
    let (rows, cols): (usize, usize) = (9, 9);
    let samples: Vec<i16> = (0..rows * cols)
        .map(|idx| {
            let (r, c) = (idx / cols, idx % cols);
            let ring = r.abs_diff(4).max(c.abs_diff(4)) == 1;
            if c == 0 || ring { -20 } else { 300 }
        })
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lake.bin");
    std::fs::write(&input, encode(&samples)).unwrap();
    let grid = load_grid(&input, cols, OceanRule::default()).unwrap();

    let config = StageConfig::new(BasinConfig {
        min_ocean_cells: 9,
        ..Default::default()
    });
    let mut landscape = Landscape::new(grid);
    Pipeline::standard(config).run(&mut landscape).unwrap();

    let labels = landscape.labels.as_ref().unwrap();
    let report = landscape.report.as_ref().unwrap();
    assert_eq!(report.inland_water_cells, 8);
    assert_eq!(report.unreachable_count(), 1);
    assert_eq!(labels.state(4, 4), Some(CellState::Unvisited));
    assert_eq!(labels.state(3, 4), Some(CellState::InlandWater));
    assert_eq!(labels.basin(4, 8), Some(BasinId(0)));

    let raw_path = dir.path().join("labels.raw");
    export_labels_raw(labels, &raw_path, RawLabelFormat::U16).unwrap();
    let raw = std::fs::read(&raw_path).unwrap();
    let island = 4 * cols + 4;
    assert_eq!(u16::from_le_bytes([raw[island * 2], raw[island * 2 + 1]]), u16::MAX - 1);

    let image = render(&landscape.grid, labels, &RenderOptions::default()).unwrap();
    let bmp_path = dir.path().join("lake.bmp");
    write_raster(&image, &bmp_path, &ImageExportOptions::default()).unwrap();
    let decoded = image::open(&bmp_path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (9, 9));
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 255, 0, 255]);
}
