use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::trace;

use crate::bitmap::{project, MazeBitmap};
use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::grid_coordinates::GridShape;
use crate::samplable_set::SamplableSet;
use crate::units::{CellId, Height, Width};
use crate::utils::FnvHashMap;

/// Carve a `width x height` cell maze into a double resolution bitmap.
///
/// The generator is seeded from `seed` alone, so the same shape and seed always give a bit identical
/// bitmap whatever else in the process is consuming randomness.
pub fn carve_maze(width: Width, height: Height, seed: u64) -> Result<MazeBitmap> {
    let shape = GridShape::new(width, height)?;
    carve_maze_with_shape(&shape, seed)
}

pub fn carve_maze_with_shape(shape: &GridShape, seed: u64) -> Result<MazeBitmap> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    wilson(shape, &mut rng)
}

/// Apply Wilson's algorithm: grow a uniform spanning tree with loop erased random walks.
///
/// One random cell seeds the tree. Then, while any cell is still unvisited, a random walk starts
/// at an unvisited cell and wanders until it hits the tree. Whenever the walk crosses its own
/// path the loop is erased, so what gets carved is a simple path and the maze never gains a cycle.
pub fn wilson<R: Rng>(shape: &GridShape, rng: &mut R) -> Result<MazeBitmap> {
    let mut maze = MazeBitmap::for_shape(shape);
    let mut unvisited: SamplableSet = (0..shape.size()).collect();

    let start = unvisited.sample(rng)?;
    unvisited.remove(start)?;
    maze.open(project(shape.to_coord(start)));

    // Index of each cell in the current walk, so a revisit is found without scanning
    let mut position_in_path = FnvHashMap::default();

    while !unvisited.is_empty() {
        let path = loop_erased_walk(&unvisited, shape, &mut position_in_path, rng)?;
        trace!(length = path.len(), remaining = unvisited.len(), "joining walk to the tree");
        carve_path(&mut maze, shape, &path);

        // The final cell of the walk is already part of the tree
        for &cell in &path[..path.len() - 1] {
            unvisited.remove(cell)?;
        }
    }

    Ok(maze)
}

/// Walk from a random unvisited cell until reaching a visited one, erasing loops on the way.
/// The returned path ends with the first visited cell reached.
fn loop_erased_walk<R: Rng>(unvisited: &SamplableSet,
                            shape: &GridShape,
                            position_in_path: &mut FnvHashMap<CellId, usize>,
                            rng: &mut R)
                            -> Result<Vec<CellId>> {
    let mut cell = unvisited.sample(rng)?;
    let mut path = vec![cell];

    position_in_path.clear();
    position_in_path.insert(cell, 0);

    while unvisited.contains(cell) {
        let neighbours = shape.neighbours(cell);
        cell = neighbours[rng.gen_range(0..neighbours.len())];

        if let Some(&earlier) = position_in_path.get(&cell) {
            for erased in path.drain(earlier + 1..) {
                position_in_path.remove(&erased);
            }
        } else {
            position_in_path.insert(cell, path.len());
            path.push(cell);
        }
    }

    Ok(path)
}

/// Open the path cells and the wall cell between each consecutive pair.
fn carve_path(maze: &mut MazeBitmap, shape: &GridShape, path: &[CellId]) {
    for pair in path.windows(2) {
        let a = project(shape.to_coord(pair[0]));
        let b = project(shape.to_coord(pair[1]));
        let between = Cartesian2DCoordinate::new((a.x + b.x) / 2, (a.y + b.y) / 2);
        maze.open(a);
        maze.open(between);
        maze.open(b);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::pathing::Distances;

    fn carve(w: usize, h: usize, seed: u64) -> MazeBitmap {
        carve_maze(Width(w), Height(h), seed).expect("valid shape")
    }

    /// Links between horizontally or vertically adjacent open positions, each counted once.
    fn open_adjacencies(maze: &MazeBitmap) -> usize {
        maze.iter_open()
            .map(|c| {
                let east = Cartesian2DCoordinate::new(c.x + 1, c.y);
                let north = Cartesian2DCoordinate::new(c.x, c.y + 1);
                maze.is_open(east) as usize + maze.is_open(north) as usize
            })
            .sum()
    }

    #[test]
    fn same_seed_same_maze() {
        assert_eq!(carve(10, 10, 0), carve(10, 10, 0));
        assert_eq!(carve(7, 13, 99), carve(7, 13, 99));
    }

    #[test]
    fn different_seeds_different_mazes() {
        assert_ne!(carve(10, 10, 0), carve(10, 10, 1));
    }

    #[test]
    fn fixed_number_of_walls_and_openings() {
        // 80 path cells and 79 tree edges open, out of 21 * 17 positions
        for &seed in &[0, 1] {
            let maze = carve(10, 8, seed);
            assert_eq!(maze.wall_count(), 198);
            assert_eq!(maze.open_count(), 159);
        }
    }

    #[test]
    fn carved_maze_is_a_spanning_tree() {
        for seed in 0..5 {
            let maze = carve(12, 9, seed);
            let distances = Distances::new(&maze, Cartesian2DCoordinate::new(1, 1))
                .expect("cell (0, 0) is always open");

            assert_eq!(distances.reachable_count(), maze.open_count());
            assert_eq!(open_adjacencies(&maze), maze.open_count() - 1);
        }
    }

    #[test]
    fn every_path_cell_is_open_and_the_border_is_walled() {
        let maze = carve(6, 4, 3);
        for y in 0..4 {
            for x in 0..6 {
                assert!(maze.is_open(project(Cartesian2DCoordinate::new(x, y))));
            }
        }
        for x in 0..maze.width() {
            assert!(maze.is_wall(Cartesian2DCoordinate::new(x, 0)));
            assert!(maze.is_wall(Cartesian2DCoordinate::new(x, maze.height() - 1)));
        }
        for y in 0..maze.height() {
            assert!(maze.is_wall(Cartesian2DCoordinate::new(0, y)));
            assert!(maze.is_wall(Cartesian2DCoordinate::new(maze.width() - 1, y)));
        }
        // Wall corners between four cells are never carved
        for y in (0..maze.height()).step_by(2) {
            for x in (0..maze.width()).step_by(2) {
                assert!(maze.is_wall(Cartesian2DCoordinate::new(x, y)));
            }
        }
    }

    #[test]
    fn walk_position_map_is_reset_between_walks() {
        let shape = GridShape::new(Width(8), Height(6)).unwrap();
        let unvisited: SamplableSet = (1..shape.size()).collect();
        let mut rng = XorShiftRng::seed_from_u64(4);

        // Entries left behind by an earlier walk must not be mistaken for loops
        let mut position_in_path: FnvHashMap<CellId, usize> = (0..shape.size()).map(|c| (c, 99)).collect();
        for _ in 0..3 {
            let path = loop_erased_walk(&unvisited, &shape, &mut position_in_path, &mut rng).unwrap();

            assert_eq!(path.last(), Some(&0));
            assert_eq!(position_in_path.len(), path.len());
            for (i, cell) in path.iter().enumerate() {
                assert_eq!(position_in_path[cell], i);
            }
            for pair in path.windows(2) {
                assert!(shape.neighbours(pair[0]).contains(&pair[1]));
            }
        }
    }

    #[test]
    fn single_cell_maze() {
        let maze = carve(1, 1, 5);
        assert_eq!(maze.open_count(), 1);
        assert!(maze.is_open(Cartesian2DCoordinate::new(1, 1)));
    }

    #[test]
    fn corridor_maze_opens_the_whole_row() {
        let maze = carve(5, 1, 8);
        for x in 1..10 {
            assert!(maze.is_open(Cartesian2DCoordinate::new(x, 1)));
        }
        assert_eq!(maze.open_count(), 9);
    }

    #[test]
    fn degenerate_shape_is_invalid_argument() {
        for &(w, h) in &[(0, 3), (3, 0)] {
            let err = carve_maze(Width(w), Height(h), 0).unwrap_err();
            match *err.kind() {
                ErrorKind::InvalidArgument(_) => {}
                ref other => panic!("expected invalid argument, got {:?}", other),
            }
        }
    }
}
