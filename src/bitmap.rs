use bit_set::BitSet;
use image::{DynamicImage, GrayImage, Luma};
use smallvec::SmallVec;
use std::fmt;

use crate::cells::Cartesian2DCoordinate;
use crate::grid_coordinates::GridShape;

const OPEN_PIXEL: u8 = 255;
const WALL_PIXEL: u8 = 0;

/// Open/wall cells of a maze drawn at double resolution.
///
/// A grid of `W x H` cells becomes a `(2W + 1) x (2H + 1)` bitmap: cell `(x, y)` sits at
/// `(2x + 1, 2y + 1)` and every even row and column holds the walls between cells.
/// A bit in the set means the position is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeBitmap {
    open: BitSet,
    width: u32,
    height: u32,
}

impl MazeBitmap {
    /// A bitmap with every position walled.
    pub fn walled(width: u32, height: u32) -> MazeBitmap {
        MazeBitmap {
            open: BitSet::with_capacity((width * height) as usize),
            width,
            height,
        }
    }

    /// The fully walled bitmap for a grid of cells.
    pub fn for_shape(shape: &GridShape) -> MazeBitmap {
        let w = shape.width().0 as u32;
        let h = shape.height().0 as u32;
        MazeBitmap::walled(2 * w + 1, 2 * h + 1)
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, coord: Cartesian2DCoordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Positions outside the bitmap count as walls.
    #[inline]
    pub fn is_open(&self, coord: Cartesian2DCoordinate) -> bool {
        self.contains(coord) && self.open.contains(self.bit_index(coord))
    }

    #[inline]
    pub fn is_wall(&self, coord: Cartesian2DCoordinate) -> bool {
        !self.is_open(coord)
    }

    /// Mark a position open. Returns false if it was out of bounds or already open.
    pub fn open(&mut self, coord: Cartesian2DCoordinate) -> bool {
        if !self.contains(coord) {
            return false;
        }
        let index = self.bit_index(coord);
        self.open.insert(index)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn wall_count(&self) -> usize {
        (self.width * self.height) as usize - self.open_count()
    }

    /// Every open position, row by row from `y = 0`.
    pub fn iter_open(&self) -> impl Iterator<Item = Cartesian2DCoordinate> + '_ {
        let w = self.width;
        self.open
            .iter()
            .map(move |i| Cartesian2DCoordinate::new(i as u32 % w, i as u32 / w))
    }

    /// The open positions one step away along either axis.
    pub fn open_neighbours(&self, coord: Cartesian2DCoordinate) -> SmallVec<[Cartesian2DCoordinate; 4]> {
        let (x, y) = (coord.x, coord.y);
        let mut out = SmallVec::new();
        if x > 0 {
            out.push(Cartesian2DCoordinate::new(x - 1, y));
        }
        if y > 0 {
            out.push(Cartesian2DCoordinate::new(x, y - 1));
        }
        out.push(Cartesian2DCoordinate::new(x + 1, y));
        out.push(Cartesian2DCoordinate::new(x, y + 1));
        out.retain(|c| self.is_open(*c));
        out
    }

    /// Grayscale rendering, one pixel per position, white is open.
    /// Row 0 of the image is the highest `y` so north points up.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |px, py| {
            let coord = Cartesian2DCoordinate::new(px, self.height - 1 - py);
            if self.is_open(coord) {
                Luma([OPEN_PIXEL])
            } else {
                Luma([WALL_PIXEL])
            }
        })
    }

    /// Inverse of `to_image`: bright pixels (intensity >= 128) are open.
    pub fn from_image(data_image: &DynamicImage) -> MazeBitmap {
        let gray_scale_image = data_image.to_luma8();
        let (w, h) = gray_scale_image.dimensions();
        let mut bitmap = MazeBitmap::walled(w, h);

        for (px, py, pix) in gray_scale_image.enumerate_pixels() {
            if pix.0[0] >= 128 {
                bitmap.open(Cartesian2DCoordinate::new(px, h - 1 - py));
            }
        }
        bitmap
    }

    #[inline]
    fn bit_index(&self, coord: Cartesian2DCoordinate) -> usize {
        (coord.y * self.width + coord.x) as usize
    }
}

/// Where a grid cell lands in the double resolution bitmap.
#[inline]
pub fn project(cell: Cartesian2DCoordinate) -> Cartesian2DCoordinate {
    Cartesian2DCoordinate::new(2 * cell.x + 1, 2 * cell.y + 1)
}

impl fmt::Display for MazeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height).rev() {
            let line: String = (0..self.width)
                .map(|x| if self.is_open(Cartesian2DCoordinate::new(x, y)) { ' ' } else { '#' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn shape_bitmap_is_double_resolution() {
        let shape = GridShape::new(Width(10), Height(8)).unwrap();
        let b = MazeBitmap::for_shape(&shape);
        assert_eq!((b.width(), b.height()), (21, 17));
        assert_eq!(b.open_count(), 0);
        assert_eq!(b.wall_count(), 21 * 17);
    }

    #[test]
    fn opening_positions() {
        let mut b = MazeBitmap::walled(3, 3);
        assert!(b.is_wall(gc(1, 1)));
        assert!(b.open(gc(1, 1)));
        assert!(!b.open(gc(1, 1)));
        assert!(b.is_open(gc(1, 1)));
        assert_eq!(b.open_count(), 1);

        assert!(!b.open(gc(3, 0)));
        assert!(b.is_wall(gc(3, 0)));
        assert!(b.is_wall(gc(100, 100)));
        assert_eq!(b.open_count(), 1);
    }

    #[test]
    fn open_neighbours_only_reports_open_positions() {
        let mut b = MazeBitmap::walled(3, 3);
        b.open(gc(1, 1));
        b.open(gc(1, 2));
        b.open(gc(0, 1));
        let mut n = b.open_neighbours(gc(1, 1)).to_vec();
        n.sort();
        assert_eq!(n, vec![gc(0, 1), gc(1, 2)]);
        assert!(b.open_neighbours(gc(0, 0)).contains(&gc(0, 1)));
    }

    #[test]
    fn projection_lands_on_odd_positions() {
        assert_eq!(project(gc(0, 0)), gc(1, 1));
        assert_eq!(project(gc(3, 2)), gc(7, 5));
    }

    #[test]
    fn image_round_trip_preserves_openings() {
        let mut b = MazeBitmap::walled(5, 3);
        b.open(gc(1, 1));
        b.open(gc(2, 1));
        b.open(gc(3, 2));
        let img = b.to_image();
        assert_eq!(img.get_pixel(3, 0).0[0], OPEN_PIXEL);
        assert_eq!(img.get_pixel(0, 0).0[0], WALL_PIXEL);
        let back = MazeBitmap::from_image(&DynamicImage::ImageLuma8(img));
        assert_eq!(back, b);
    }

    #[test]
    fn text_rendering_puts_north_on_top() {
        let mut b = MazeBitmap::walled(3, 2);
        b.open(gc(1, 1));
        assert_eq!(format!("{}", b), "# #\n###\n");
    }
}
