//! Multi-source breadth-first basin expansion.
//!
//! Every coastal seed starts in a single FIFO frontier at distance 0. Land
//! cells take the basin of the first seed wave to reach them, so each cell
//! ends up labeled with its nearest basin in grid steps. A cell reached in
//! the same wave by a different basin is marked contested and keeps the
//! lowest of the competing ids. Contested cells hand the tie on: anything
//! whose shortest path runs through one is contested as well.
//!
//! The frontier is completely drained one distance layer before the next is
//! dequeued. That makes the lowest-id resolution final before a contested
//! cell propagates.

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::coast::SeedSet;
use super::ocean::OceanMap;
use super::state::{BasinId, BasinLabels, CellState, UNREACHED};
use crate::terrain::{CellCoord, ElevationGrid};

/// Errors that prevent labeling from starting.
#[derive(Error, Debug)]
pub enum BasinError {
    #[error("No coastal cells found: input is entirely ocean, entirely land, or malformed")]
    EmptySeedSet,
    #[error("Seed at ({row}, {col}) is {reason}")]
    InvalidSeed { row: usize, col: usize, reason: &'static str },
    #[error("Ocean map covers {ocean_cells} cells but the grid has {grid_cells}")]
    ShapeMismatch { ocean_cells: usize, grid_cells: usize },
}

/// Land that no coast could reach (disconnected from every seed).
///
/// This is reported alongside a successful labeling, never returned as `Err`.
#[derive(Error, Debug, Clone, Serialize)]
#[error("{} land cells are unreachable from any coast", cells.len())]
pub struct UnreachableLand {
    pub cells: Vec<CellCoord>,
}

/// Summary of one labeling run.
#[derive(Debug, Clone, Default)]
pub struct LabelReport {
    pub land_cells: usize,
    pub ocean_cells: usize,
    pub inland_water_cells: usize,
    pub coast_cells: usize,
    pub labeled_cells: usize,
    pub contested_cells: usize,
    /// Cells pushed onto the frontier. Equals the number of reached land cells.
    pub enqueued: usize,
    /// Largest grid-step distance from any seed.
    pub max_distance: u32,
    /// Reached cells per basin (coast and labeled; contested counted separately).
    pub basin_cells: Vec<usize>,
    pub unreachable: Option<UnreachableLand>,
}

impl LabelReport {
    pub fn basin_count(&self) -> usize {
        self.basin_cells.len()
    }

    pub fn unreachable_count(&self) -> usize {
        self.unreachable.as_ref().map_or(0, |u| u.cells.len())
    }
}

/// Labels every land cell of `grid` with the basin of its nearest seed.
///
/// Fails only if `seeds` is empty or names a cell that is not land inside the
/// grid; once started, expansion always terminates.
///
/// # Arguments
/// * `grid` - Elevation grid being classified
/// * `oceans` - Water components of the same grid
/// * `seeds` - Coastal seeds, usually from [`super::detect_coastline`]
///
/// # Returns
/// Per-cell labels and a run summary. Unreachable land is listed in the
/// summary rather than returned as an error.
pub fn label_basins(
    grid: &ElevationGrid,
    oceans: &OceanMap,
    seeds: &SeedSet,
) -> Result<(BasinLabels, LabelReport), BasinError> {
    if oceans.cell_count() != grid.len() {
        return Err(BasinError::ShapeMismatch {
            ocean_cells: oceans.cell_count(),
            grid_cells: grid.len(),
        });
    }
    if seeds.is_empty() {
        return Err(BasinError::EmptySeedSet);
    }

    let total = grid.len();
    let mut states: Vec<CellState> = (0..total)
        .map(|idx| {
            if oceans.open_component_at(idx).is_some() {
                CellState::Ocean
            } else if oceans.is_inland_water_at(idx) {
                CellState::InlandWater
            } else {
                CellState::Unvisited
            }
        })
        .collect();
    let mut distances = vec![UNREACHED; total];
    let mut frontier: VecDeque<usize> = VecDeque::with_capacity(seeds.len());
    let mut enqueued = 0usize;

    for seed in seeds.iter() {
        let CellCoord { row, col } = seed.cell;
        let idx = grid.index_of(row, col).ok_or(BasinError::InvalidSeed {
            row,
            col,
            reason: "outside the grid",
        })?;

        match states[idx] {
            CellState::Unvisited => {
                states[idx] = if seed.contested {
                    CellState::Contested(seed.basin)
                } else {
                    CellState::Coast(seed.basin)
                };
                distances[idx] = 0;
                frontier.push_back(idx);
                enqueued += 1;
            }
            // Same cell listed again for another basin.
            CellState::Coast(other) | CellState::Contested(other) => {
                if other != seed.basin {
                    states[idx] = CellState::Contested(other.min(seed.basin));
                }
            }
            _ => {
                return Err(BasinError::InvalidSeed { row, col, reason: "not land" });
            }
        }
    }

    while let Some(idx) = frontier.pop_front() {
        let Some(basin) = states[idx].basin() else {
            continue;
        };
        let next = distances[idx] + 1;
        // A cell tied between basins passes the tie on to everything it reaches first.
        let tied = states[idx].is_contested();

        for n in grid.neighbor_indices(idx) {
            match states[n] {
                CellState::Unvisited => {
                    states[n] = if tied {
                        CellState::Contested(basin)
                    } else {
                        CellState::Labeled(basin)
                    };
                    distances[n] = next;
                    frontier.push_back(n);
                    enqueued += 1;
                }
                CellState::Labeled(other) if distances[n] == next && (tied || other != basin) => {
                    states[n] = CellState::Contested(other.min(basin));
                }
                CellState::Contested(other) if distances[n] == next && other != basin => {
                    states[n] = CellState::Contested(other.min(basin));
                }
                _ => {}
            }
        }
    }

    let labels = BasinLabels {
        rows: grid.rows(),
        cols: grid.cols(),
        states,
        distances,
        basin_count: seeds.basin_count(),
    };
    let report = summarize(&labels, enqueued);

    info!(
        basins = report.basin_count(),
        coast = report.coast_cells,
        labeled = report.labeled_cells,
        contested = report.contested_cells,
        max_distance = report.max_distance,
        "basin labeling complete"
    );
    if let Some(unreachable) = &report.unreachable {
        warn!("{}", unreachable);
    }

    Ok((labels, report))
}

fn summarize(labels: &BasinLabels, enqueued: usize) -> LabelReport {
    let mut report = LabelReport {
        enqueued,
        basin_cells: vec![0; labels.basin_count as usize],
        ..Default::default()
    };

    for (&state, &dist) in labels.states.iter().zip(labels.distances.iter()) {
        if state.is_land() {
            report.land_cells += 1;
        }
        match state {
            CellState::Ocean => report.ocean_cells += 1,
            CellState::InlandWater => report.inland_water_cells += 1,
            CellState::Unvisited => {}
            CellState::Coast(b) => {
                report.coast_cells += 1;
                bump(&mut report.basin_cells, b);
            }
            CellState::Labeled(b) => {
                report.labeled_cells += 1;
                bump(&mut report.basin_cells, b);
            }
            CellState::Contested(_) => report.contested_cells += 1,
        }
        if dist != UNREACHED {
            report.max_distance = report.max_distance.max(dist);
        }
    }

    let cells = labels.unvisited_cells();
    if !cells.is_empty() {
        debug!(first = ?cells[0], "unreachable land present");
        report.unreachable = Some(UnreachableLand { cells });
    }

    report
}

fn bump(counts: &mut Vec<usize>, basin: BasinId) {
    if counts.len() <= basin.index() {
        counts.resize(basin.index() + 1, 0);
    }
    counts[basin.index()] += 1;
}
