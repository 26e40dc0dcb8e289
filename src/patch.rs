use crate::bitmap::MazeBitmap;
use crate::cells::{Cartesian2DCoordinate, CompassPrimary, TileCoordinate};
use crate::errors::*;
use crate::generators;
use crate::grid_coordinates::GridShape;

/// One independently carved maze tile placed at a coordinate of the tiling.
///
/// After carving, the only change a patch ever sees is having positions on its outer edge forced
/// open when it is stitched to a neighbour.
#[derive(Debug, Clone)]
pub struct Patch {
    coord: TileCoordinate,
    shape: GridShape,
    seed: u64,
    maze: MazeBitmap,
}

impl Patch {
    pub fn carve(coord: TileCoordinate, shape: GridShape, seed: u64) -> Result<Patch> {
        let maze = generators::carve_maze_with_shape(&shape, seed)?;
        Ok(Patch {
            coord,
            shape,
            seed,
            maze,
        })
    }

    #[inline(always)]
    pub fn coord(&self) -> TileCoordinate {
        self.coord
    }

    #[inline(always)]
    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    #[inline(always)]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline(always)]
    pub fn maze(&self) -> &MazeBitmap {
        &self.maze
    }

    #[inline]
    pub fn is_wall(&self, position: Cartesian2DCoordinate) -> bool {
        self.maze.is_wall(position)
    }

    /// Number of bitmap positions along the edge on `side`.
    pub fn edge_length(&self, side: CompassPrimary) -> u32 {
        match side {
            CompassPrimary::North | CompassPrimary::South => self.maze.width(),
            CompassPrimary::East | CompassPrimary::West => self.maze.height(),
        }
    }

    /// The bitmap position `offset` steps along the edge on `side`, counting from the
    /// south west corner. Opposite edges of adjacent tiles line up offset for offset.
    pub fn edge_position(&self, side: CompassPrimary, offset: u32) -> Cartesian2DCoordinate {
        match side {
            CompassPrimary::North => Cartesian2DCoordinate::new(offset, self.maze.height() - 1),
            CompassPrimary::South => Cartesian2DCoordinate::new(offset, 0),
            CompassPrimary::East => Cartesian2DCoordinate::new(self.maze.width() - 1, offset),
            CompassPrimary::West => Cartesian2DCoordinate::new(0, offset),
        }
    }

    pub(crate) fn force_open(&mut self, position: Cartesian2DCoordinate) -> bool {
        self.maze.open(position)
    }
}
