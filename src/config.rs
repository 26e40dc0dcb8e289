use error_chain::bail;
use serde_derive::{Deserialize, Serialize};

use crate::errors::*;
use crate::grid_coordinates::GridShape;
use crate::units::{Height, SeamOpenings, Width};

/// How a newly built tile picks the seed for its maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// One counter per store, starting at the world seed and bumped on every build.
    /// The maze a coordinate gets depends on the order tiles were built in.
    BuildOrder,
    /// Hash of the world seed and the tile coordinate. A coordinate always gets the same maze.
    Coordinate,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::BuildOrder
    }
}

/// Settings for a patch store, usually read from the driver's TOML file and command line.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchStoreConfig {
    /// Cells across one tile.
    pub tile_width: usize,
    /// Cells up one tile.
    pub tile_height: usize,
    /// Corridors forced open across every shared edge.
    pub seam_openings: usize,
    pub seed_policy: SeedPolicy,
    pub world_seed: u64,
}

impl Default for PatchStoreConfig {
    fn default() -> Self {
        PatchStoreConfig {
            tile_width: 10,
            tile_height: 10,
            seam_openings: 2,
            seed_policy: SeedPolicy::BuildOrder,
            world_seed: 0,
        }
    }
}

impl PatchStoreConfig {
    pub fn from_toml_str(text: &str) -> Result<PatchStoreConfig> {
        let config: PatchStoreConfig = toml::from_str(text)
            .map_err(|e| ErrorKind::InvalidArgument(format!("bad patch store config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.seam_openings == 0 {
            bail!(ErrorKind::InvalidArgument("seam_openings must be at least 1".to_string()));
        }
        self.tile_shape().map(|_| ())
    }

    pub fn tile_shape(&self) -> Result<GridShape> {
        GridShape::new(Width(self.tile_width), Height(self.tile_height))
    }

    #[inline]
    pub fn seam_openings(&self) -> SeamOpenings {
        SeamOpenings(self.seam_openings)
    }
}
