//! Basin labeling configuration.

use serde::{Deserialize, Serialize};

/// How ocean water is split into basins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OceanPolicy {
    /// Every 4-connected open-ocean body that touches land is its own basin.
    Connected,
    /// All open ocean is one undifferentiated sea (single basin).
    SingleSea,
}

impl Default for OceanPolicy {
    fn default() -> Self {
        Self::Connected
    }
}

/// Parameters for coastline detection and basin expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasinConfig {
    /// Basin differentiation policy.
    pub ocean_policy: OceanPolicy,
    /// Water bodies with fewer cells than this are inland water, not ocean.
    /// They neither seed basins nor carry propagation.
    pub min_ocean_cells: usize,
}

impl Default for BasinConfig {
    fn default() -> Self {
        Self {
            ocean_policy: OceanPolicy::default(),
            min_ocean_cells: 1,
        }
    }
}
