//! Lazily built, ever growing tiling of maze patches.
//!
//! A patch is carved the first time anything asks for its coordinate and then stitched to every
//! neighbour that already exists, by forcing the same edge offsets open on both sides of the seam.
//! Patches are never evicted or regenerated.

use image::{GrayImage, Luma};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;
use std::collections::hash_map;
use tracing::{debug, trace};

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, TileCoordinate};
use crate::config::{PatchStoreConfig, SeedPolicy};
use crate::errors::*;
use crate::grid_coordinates::GridShape;
use crate::patch::Patch;
use crate::samplable_set::SamplableSet;
use crate::units::SeamOpenings;
use crate::utils::{self, FnvHashMap};

pub type SeamOffsets = SmallVec<[u32; 8]>;

#[derive(Debug)]
pub struct PatchStore {
    config: PatchStoreConfig,
    tile_shape: GridShape,
    patches: FnvHashMap<TileCoordinate, Patch>,
    next_seed: u64,
    builds: usize,
    rng: XorShiftRng,
}

impl PatchStore {
    pub fn new(config: PatchStoreConfig) -> Result<PatchStore> {
        config.validate()?;
        let tile_shape = config.tile_shape()?;
        Ok(PatchStore {
            tile_shape,
            patches: utils::fnv_hashmap(64),
            next_seed: config.world_seed,
            builds: 0,
            rng: XorShiftRng::seed_from_u64(config.world_seed),
            config,
        })
    }

    #[inline]
    pub fn tile_shape(&self) -> &GridShape {
        &self.tile_shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Number of patches carved so far. Only a build of a new coordinate carves.
    #[inline]
    pub fn builds(&self) -> usize {
        self.builds
    }

    #[inline]
    pub fn contains(&self, coord: TileCoordinate) -> bool {
        self.patches.contains_key(&coord)
    }

    #[inline]
    pub fn get(&self, coord: TileCoordinate) -> Option<&Patch> {
        self.patches.get(&coord)
    }

    /// All built patches, in no particular order.
    pub fn iter(&self) -> hash_map::Values<TileCoordinate, Patch> {
        self.patches.values()
    }

    /// Return the patch at `coord`, carving and stitching it first if it does not exist yet.
    pub fn build_patch(&mut self, coord: TileCoordinate) -> Result<&Patch> {
        if self.patches.contains_key(&coord) {
            return self.patches
                .get(&coord)
                .ok_or_else(|| ErrorKind::NotFound(coord.to_string()).into());
        }

        let seed = self.next_tile_seed(coord);
        let mut patch = Patch::carve(coord, self.tile_shape, seed)?;
        self.builds += 1;
        debug!(tile = %coord, seed, "carved tile");

        self.stitch(&mut patch)?;
        Ok(&*self.patches.entry(coord).or_insert(patch))
    }

    /// Build the patch at `coord` and all 8 patches around it, so a single step out of `coord`
    /// in any direction always lands on an existing patch.
    pub fn add_patch(&mut self, coord: TileCoordinate) -> Result<&Patch> {
        self.build_patch(coord)?;
        for neighbour in coord.moore_neighbourhood() {
            self.build_patch(neighbour)?;
        }
        self.patches
            .get(&coord)
            .ok_or_else(|| ErrorKind::NotFound(coord.to_string()).into())
    }

    /// Where one step in `direction` from `position` on tile `tile` ends up.
    ///
    /// Leaving the tile wraps the position onto the neighbouring tile, which is built along with its
    /// own neighbourhood first. A move onto a wall is rejected and returns the starting tile and
    /// position unchanged.
    pub fn translate(&mut self,
                     tile: TileCoordinate,
                     position: Cartesian2DCoordinate,
                     direction: CompassPrimary)
                     -> Result<(TileCoordinate, Cartesian2DCoordinate)> {
        let (width, height) = {
            let patch = self.build_patch(tile)?;
            (i64::from(patch.maze().width()), i64::from(patch.maze().height()))
        };
        let (dx, dy) = direction.offset();
        let (x, tile_dx) = wrap_axis(i64::from(position.x) + i64::from(dx), width);
        let (y, tile_dy) = wrap_axis(i64::from(position.y) + i64::from(dy), height);

        let destination_tile = tile.offset(tile_dx, tile_dy);
        let destination = Cartesian2DCoordinate::new(x as u32, y as u32);
        let patch = if destination_tile != tile {
            self.add_patch(destination_tile)?
        } else {
            self.build_patch(tile)?
        };

        if patch.is_wall(destination) {
            trace!(tile = %tile, position = %position, ?direction, "move rejected by wall");
            Ok((tile, position))
        } else {
            Ok((destination_tile, destination))
        }
    }

    /// Compose every built patch into one image covering their bounding box, north up.
    /// Coordinates with no patch are drawn as walls.
    pub fn to_image(&self) -> Option<GrayImage> {
        let min_x = self.patches.keys().map(|c| c.x).min()?;
        let max_x = self.patches.keys().map(|c| c.x).max()?;
        let min_y = self.patches.keys().map(|c| c.y).min()?;
        let max_y = self.patches.keys().map(|c| c.y).max()?;

        let tile_w = 2 * self.tile_shape.width().0 as u32 + 1;
        let tile_h = 2 * self.tile_shape.height().0 as u32 + 1;
        let columns = (max_x - min_x + 1) as u32;
        let rows = (max_y - min_y + 1) as u32;
        let mut canvas = GrayImage::from_pixel(columns * tile_w, rows * tile_h, Luma([0]));

        for patch in self.patches.values() {
            let origin_x = (patch.coord().x - min_x) as u32 * tile_w;
            let origin_y = (max_y - patch.coord().y) as u32 * tile_h;
            let tile_image = patch.maze().to_image();
            for (px, py, pixel) in tile_image.enumerate_pixels() {
                canvas.put_pixel(origin_x + px, origin_y + py, *pixel);
            }
        }
        Some(canvas)
    }

    fn next_tile_seed(&mut self, coord: TileCoordinate) -> u64 {
        match self.config.seed_policy {
            SeedPolicy::BuildOrder => {
                let seed = self.next_seed;
                self.next_seed = self.next_seed.wrapping_add(1);
                seed
            }
            SeedPolicy::Coordinate => {
                let packed = (u64::from(coord.x as u32) << 32) | u64::from(coord.y as u32);
                utils::mix_seed(self.config.world_seed ^ utils::mix_seed(packed))
            }
        }
    }

    /// Open corridors between `patch` and each of its existing axis neighbours.
    fn stitch(&mut self, patch: &mut Patch) -> Result<()> {
        for &side in CompassPrimary::ALL.iter() {
            let neighbour_coord = patch.coord().neighbour(side);
            if !self.patches.contains_key(&neighbour_coord) {
                continue;
            }

            let offsets = seam_offsets(&mut self.rng,
                                       patch.edge_length(side),
                                       self.config.seam_openings())?;
            if let Some(neighbour) = self.patches.get_mut(&neighbour_coord) {
                for &offset in &offsets {
                    let here = patch.edge_position(side, offset);
                    let there = neighbour.edge_position(side.opposite(), offset);
                    patch.force_open(here);
                    neighbour.force_open(there);
                }
            }
            debug!(tile = %patch.coord(), neighbour = %neighbour_coord, ?offsets, "stitched seam");
        }
        Ok(())
    }
}

/// Pick distinct edge offsets to force open, up to `openings` of them.
///
/// Only odd offsets are candidates. Those line up with a row or column of path cells, so the opened
/// edge position always touches a carved cell on both sides of the seam.
pub fn seam_offsets<R: Rng>(rng: &mut R, edge_length: u32, openings: SeamOpenings) -> Result<SeamOffsets> {
    let mut candidates: SamplableSet<u32> = (0..edge_length / 2).map(|k| 2 * k + 1).collect();
    let wanted = openings.0.min(candidates.len());

    let mut offsets = SeamOffsets::new();
    for _ in 0..wanted {
        let offset = candidates.sample(rng)?;
        candidates.remove(offset)?;
        offsets.push(offset);
    }
    offsets.sort();
    Ok(offsets)
}

/// Returns the wrapped coordinate and which way (if any) it left the `[0, length)` range.
#[inline]
fn wrap_axis(v: i64, length: i64) -> (i64, i32) {
    if v < 0 {
        (v + length, -1)
    } else if v >= length {
        (v - length, 1)
    } else {
        (v, 0)
    }
}
