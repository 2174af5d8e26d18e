//! JSON summary of a classification run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::basins::{LabelReport, OceanPolicy};
use crate::terrain::{CellCoord, OceanRule};

/// Unreachable cells listed individually in a summary; the rest are only counted.
pub const MAX_LISTED_UNREACHABLE: usize = 1000;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct BasinSummary {
    pub id: u32,
    pub cells: usize,
}

/// Serializable view of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub cols: usize,
    pub ocean_rule: OceanRule,
    pub ocean_policy: OceanPolicy,
    pub land_cells: usize,
    pub ocean_cells: usize,
    pub inland_water_cells: usize,
    pub coast_cells: usize,
    pub labeled_cells: usize,
    pub contested_cells: usize,
    pub max_distance: u32,
    pub basins: Vec<BasinSummary>,
    pub unreachable_cells: usize,
    pub unreachable_sample: Vec<CellCoord>,
}

impl RunSummary {
    pub fn new(
        rows: usize,
        cols: usize,
        ocean_rule: OceanRule,
        ocean_policy: OceanPolicy,
        report: &LabelReport,
    ) -> Self {
        let unreachable_sample = report
            .unreachable
            .as_ref()
            .map(|u| u.cells.iter().take(MAX_LISTED_UNREACHABLE).copied().collect())
            .unwrap_or_default();

        Self {
            rows,
            cols,
            ocean_rule,
            ocean_policy,
            land_cells: report.land_cells,
            ocean_cells: report.ocean_cells,
            inland_water_cells: report.inland_water_cells,
            coast_cells: report.coast_cells,
            labeled_cells: report.labeled_cells,
            contested_cells: report.contested_cells,
            max_distance: report.max_distance,
            basins: report
                .basin_cells
                .iter()
                .enumerate()
                .map(|(id, &cells)| BasinSummary { id: id as u32, cells })
                .collect(),
            unreachable_cells: report.unreachable_count(),
            unreachable_sample,
        }
    }
}

/// Writes `summary` as pretty-printed JSON.
pub fn write_report(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basins::UnreachableLand;
    use tempfile::tempdir;

    fn report() -> LabelReport {
        LabelReport {
            land_cells: 10,
            ocean_cells: 5,
            coast_cells: 4,
            labeled_cells: 4,
            contested_cells: 1,
            enqueued: 9,
            max_distance: 3,
            basin_cells: vec![6, 2],
            unreachable: Some(UnreachableLand { cells: vec![CellCoord::new(2, 3)] }),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_fields() {
        let summary = RunSummary::new(3, 5, OceanRule::default(), OceanPolicy::Connected, &report());
        assert_eq!(summary.basins.len(), 2);
        assert_eq!(summary.basins[1].cells, 2);
        assert_eq!(summary.unreachable_cells, 1);
        assert_eq!(summary.unreachable_sample, vec![CellCoord::new(2, 3)]);
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let summary = RunSummary::new(
            3,
            5,
            OceanRule::Sentinel { value: -500 },
            OceanPolicy::SingleSea,
            &report(),
        );

        write_report(&summary, &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows"], 3);
        assert_eq!(value["ocean_policy"], "single-sea");
        assert_eq!(value["ocean_rule"]["kind"], "sentinel");
        assert_eq!(value["ocean_rule"]["value"], -500);
        assert_eq!(value["basins"][0]["cells"], 6);
        assert_eq!(value["unreachable_sample"][0]["col"], 3);
    }
}
