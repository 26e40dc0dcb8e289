//! Mapping between 2D cell coordinates and linear cell ids inside a bounded rectangle.

use error_chain::bail;
use smallvec::SmallVec;
use std::convert::TryFrom;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::units::{CellId, Height, Width};

/// Up to 4 distinct neighbouring cell ids.
pub type NeighbourSmallVec = SmallVec<[CellId; 4]>;

/// The `(W, H)` shape of a grid of cells. Both dimensions are always positive.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct GridShape {
    width: usize,
    height: usize,
}

impl GridShape {
    /// Degenerate shapes are rejected; a walk over an empty grid would never terminate.
    pub fn new(width: Width, height: Height) -> Result<GridShape> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 {
            bail!(ErrorKind::InvalidArgument(format!("grid shape must be positive, got {}x{}", w, h)));
        }
        if bitmap_extent(w, h).is_none() {
            bail!(ErrorKind::InvalidArgument(format!("grid shape {}x{} is too large", w, h)));
        }
        Ok(GridShape { width: w, height: h })
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        Width(self.width)
    }

    #[inline(always)]
    pub fn height(&self) -> Height {
        Height(self.height)
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn to_id(&self, coord: Cartesian2DCoordinate) -> CellId {
        coord.y as usize * self.width + coord.x as usize
    }

    #[inline]
    pub fn to_coord(&self, id: CellId) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new((id % self.width) as u32, (id / self.width) as u32)
    }

    /// Clamp each axis into `[0, dim)` and return the resulting cell id.
    /// The upper bound is exclusive: `x == width` lands on `width - 1`.
    pub fn clamp_to_id(&self, x: i64, y: i64) -> CellId {
        let cx = clamp_axis(x, self.width);
        let cy = clamp_axis(y, self.height);
        cy * self.width + cx
    }

    /// The cells reached by a step in each of the 4 axis directions, clamped at the boundary.
    ///
    /// Steps that bump into the boundary land on `id` itself. That "stay" outcome appears once
    /// no matter how many directions produced it, so sampling from the result treats each
    /// distinct destination equally.
    pub fn neighbours(&self, id: CellId) -> NeighbourSmallVec {
        let coord = self.to_coord(id);
        let (x, y) = (i64::from(coord.x), i64::from(coord.y));

        let mut out = NeighbourSmallVec::new();
        for &(dx, dy) in &[(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let n = self.clamp_to_id(x + dx, y + dy);
            if !out.contains(&n) {
                out.push(n);
            }
        }
        out
    }
}

/// The `(2W + 1, 2H + 1)` bitmap dimensions, if they and their area fit in a `u32`.
fn bitmap_extent(w: usize, h: usize) -> Option<(u32, u32)> {
    let side = |n: usize| u32::try_from(n).ok()?.checked_mul(2)?.checked_add(1);
    let (bw, bh) = (side(w)?, side(h)?);
    bw.checked_mul(bh).map(|_| (bw, bh))
}

#[inline]
fn clamp_axis(v: i64, dim: usize) -> usize {
    if v < 0 {
        0
    } else if v as u64 >= dim as u64 {
        dim - 1
    } else {
        v as usize
    }
}
