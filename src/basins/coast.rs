//! Coastline detection on a flat elevation grid.
//!
//! A coast cell is a land cell with at least one open-ocean 4-neighbor. Rows
//! are scanned in parallel against the read-only grid; basin ids are then
//! assigned in a single row-major pass so the result does not depend on
//! scheduling.

use rayon::prelude::*;
use tracing::debug;

use super::config::OceanPolicy;
use super::ocean::OceanMap;
use super::state::BasinId;
use crate::terrain::{CellCoord, ElevationGrid};

/// A coastal cell and the basin it seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub cell: CellCoord,
    pub basin: BasinId,
    /// Touches two or more distinct basins; `basin` is the lowest of them.
    pub contested: bool,
}

/// The coastal seed set, in row-major order.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    seeds: Vec<Seed>,
    basin_count: u32,
}

impl SeedSet {
    /// Builds a seed set from explicit seeds.
    ///
    /// `basin_count` is derived as one past the highest basin id present.
    pub fn new(seeds: Vec<Seed>) -> Self {
        let basin_count = seeds.iter().map(|s| s.basin.0 + 1).max().unwrap_or(0);
        Self { seeds, basin_count }
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Number of distinct basin ids (ids are dense from 0).
    pub fn basin_count(&self) -> u32 {
        self.basin_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seed> {
        self.seeds.iter()
    }
}

/// A land cell next to open ocean, before basin ids are assigned.
#[derive(Debug, Clone, Copy)]
struct CoastCandidate {
    idx: usize,
    /// Distinct open-ocean components touched, in left/up/right/down order.
    oceans: [u32; 4],
    len: u8,
}

fn scan_row(grid: &ElevationGrid, oceans: &OceanMap, row: usize) -> Vec<CoastCandidate> {
    let cols = grid.cols();
    let base = row * cols;
    let mut out = Vec::new();

    for idx in base..base + cols {
        if grid.is_ocean_at(idx) {
            continue;
        }

        let mut cand = CoastCandidate { idx, oceans: [0; 4], len: 0 };
        for n in grid.neighbor_indices(idx) {
            if let Some(c) = oceans.open_component_at(n) {
                if !cand.oceans[..cand.len as usize].contains(&c) {
                    cand.oceans[cand.len as usize] = c;
                    cand.len += 1;
                }
            }
        }

        if cand.len > 0 {
            out.push(cand);
        }
    }

    out
}

/// Finds every coastal cell and assigns it a basin id.
///
/// Under [`OceanPolicy::Connected`], ids are handed out to ocean components in
/// the order their first coastal cell appears in a row-major scan. A coast
/// cell touching two different oceans is a contested seed.
pub fn detect_coastline(grid: &ElevationGrid, oceans: &OceanMap, policy: OceanPolicy) -> SeedSet {
    let per_row: Vec<Vec<CoastCandidate>> = (0..grid.rows())
        .into_par_iter()
        .map(|row| scan_row(grid, oceans, row))
        .collect();

    let mut basin_of_component: Vec<Option<BasinId>> = vec![None; oceans.component_count()];
    let mut next_id = 0u32;
    let mut seeds = Vec::with_capacity(per_row.iter().map(Vec::len).sum());

    for cand in per_row.into_iter().flatten() {
        let mut lowest: Option<BasinId> = None;
        let mut contested = false;

        for &component in &cand.oceans[..cand.len as usize] {
            let id = match policy {
                OceanPolicy::SingleSea => BasinId(0),
                OceanPolicy::Connected => *basin_of_component[component as usize].get_or_insert_with(|| {
                    let id = BasinId(next_id);
                    next_id += 1;
                    id
                }),
            };
            match lowest {
                None => lowest = Some(id),
                Some(prev) if prev != id => {
                    contested = true;
                    lowest = Some(prev.min(id));
                }
                Some(_) => {}
            }
        }

        if let Some(basin) = lowest {
            seeds.push(Seed { cell: grid.coord_of(cand.idx), basin, contested });
        }
    }

    let basin_count = match policy {
        OceanPolicy::SingleSea => u32::from(!seeds.is_empty()),
        OceanPolicy::Connected => next_id,
    };
    debug!(seeds = seeds.len(), basins = basin_count, "detected coastline");

    SeedSet { seeds, basin_count }
}
