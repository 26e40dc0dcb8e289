use itertools::iproduct;
use std::fmt;

/// A position inside one bounded grid or bitmap.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position of a whole tile in the unbounded tiling. Either axis may be negative.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Default)]
pub struct TileCoordinate {
    pub x: i32,
    pub y: i32,
}

impl TileCoordinate {
    pub fn new(x: i32, y: i32) -> TileCoordinate {
        TileCoordinate { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> TileCoordinate {
        TileCoordinate::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub fn neighbour(self, dir: CompassPrimary) -> TileCoordinate {
        let (dx, dy) = dir.offset();
        self.offset(dx, dy)
    }

    /// The 8 tiles surrounding this one, row by row from the lowest `y`.
    pub fn moore_neighbourhood(self) -> impl Iterator<Item = TileCoordinate> {
        iproduct!(-1..=1, -1..=1)
            .filter(|&(dy, dx)| dx != 0 || dy != 0)
            .map(move |(dy, dx)| self.offset(dx, dy))
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// North is towards increasing `y`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            CompassPrimary::North => (0, 1),
            CompassPrimary::South => (0, -1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::West => (-1, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}
