//! Flood fill distances over the open positions of a bitmap.
//!
//! Every step costs the same, so a breadth first flood fill gives exact shortest distances. On a
//! freshly carved maze (a tree) that also makes the double flood fill in `longest_path` exact.

use smallvec::SmallVec;

use crate::bitmap::MazeBitmap;
use crate::cells::Cartesian2DCoordinate;
use crate::utils::{self, FnvHashMap};

#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// None if `start_coordinate` is a wall or outside the bitmap.
    pub fn new(bitmap: &MazeBitmap, start_coordinate: Cartesian2DCoordinate) -> Option<Distances> {
        if !bitmap.is_open(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(bitmap.open_count());
        distances.insert(start_coordinate, 0);

        // The distances map doubles as the visited set
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for coord in &frontier {
                let distance_to_cell = distances[coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for next in bitmap.open_neighbours(*coord) {
                    if !distances.contains_key(&next) {
                        distances.insert(next, distance_to_cell + 1);
                        new_frontier.push(next);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// How many open positions the flood fill reached, the start included.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn furthest_points(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let mut furthest: SmallVec<[Cartesian2DCoordinate; 8]> = self.distances
            .iter()
            .filter(|&(_, &d)| d == self.max_distance)
            .map(|(&coord, _)| coord)
            .collect();
        // Hash map order is arbitrary, callers get a stable answer
        furthest.sort();
        furthest
    }
}

/// Walk back from `end_point` towards the start, always to a neighbour one step closer.
pub fn shortest_path(bitmap: &MazeBitmap,
                     distances_from_start: &Distances,
                     end_point: Cartesian2DCoordinate)
                     -> Option<Vec<Cartesian2DCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let mut current_coord = end_point;

    while current_distance > 0 {
        let closer = bitmap.open_neighbours(current_coord)
            .into_iter()
            .find(|c| distances_from_start.distance_from_start_to(*c) == Some(current_distance - 1))?;
        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// The longest shortest path within the region holding the lowest open position.
///
/// Only exact while the open positions form a tree, which holds for any bitmap straight out of the carver.
pub fn longest_path(bitmap: &MazeBitmap) -> Option<Vec<Cartesian2DCoordinate>> {
    let arbitrary_start_point = bitmap.iter_open().next()?;
    let first_distances = Distances::new(bitmap, arbitrary_start_point)?;

    // The start of the longest path is the point furthest away from an arbitrary initial point
    let long_path_start = first_distances.furthest_points()[0];
    let distances_from_start = Distances::new(bitmap, long_path_start)?;
    let end_point = distances_from_start.furthest_points()[0];

    shortest_path(bitmap, &distances_from_start, end_point)
}

#[cfg(test)]
mod tests {

    use super::*;

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    /// ```text
    /// #####
    /// #   #
    /// # # #
    /// #####
    /// ```
    fn u_shaped() -> MazeBitmap {
        let mut b = MazeBitmap::walled(5, 4);
        for &c in &[gc(1, 1), gc(1, 2), gc(2, 2), gc(3, 2), gc(3, 1)] {
            b.open(c);
        }
        b
    }

    #[test]
    fn distances_construction_requires_open_start() {
        let b = u_shaped();
        assert!(Distances::new(&b, gc(0, 0)).is_none());
        assert!(Distances::new(&b, gc(u32::MAX, u32::MAX)).is_none());
    }

    #[test]
    fn distances_along_a_corridor() {
        let b = u_shaped();
        let d = Distances::new(&b, gc(1, 1)).unwrap();
        assert_eq!(d.start(), gc(1, 1));
        assert_eq!(d.distance_from_start_to(gc(1, 1)), Some(0));
        assert_eq!(d.distance_from_start_to(gc(2, 2)), Some(2));
        assert_eq!(d.distance_from_start_to(gc(3, 1)), Some(4));
        assert_eq!(d.distance_from_start_to(gc(2, 1)), None);
        assert_eq!(d.max(), 4);
        assert_eq!(d.reachable_count(), 5);
        assert_eq!(&*d.furthest_points(), &[gc(3, 1)]);
    }

    #[test]
    fn unreachable_regions_have_no_distance() {
        let mut b = u_shaped();
        b.open(gc(2, 0));
        b.open(gc(0, 3));
        let d = Distances::new(&b, gc(1, 1)).unwrap();
        assert_eq!(d.distance_from_start_to(gc(0, 3)), None);
        assert_eq!(d.reachable_count(), 5);
    }

    #[test]
    fn shortest_path_follows_the_corridor() {
        let b = u_shaped();
        let d = Distances::new(&b, gc(1, 1)).unwrap();
        let path = shortest_path(&b, &d, gc(3, 1)).unwrap();
        assert_eq!(path, vec![gc(1, 1), gc(1, 2), gc(2, 2), gc(3, 2), gc(3, 1)]);
        assert!(shortest_path(&b, &d, gc(2, 1)).is_none());
    }

    #[test]
    fn longest_path_spans_the_corridor_ends() {
        let b = u_shaped();
        let path = longest_path(&b).unwrap();
        assert_eq!(path.len(), 5);
        let mut ends = vec![path[0], path[4]];
        ends.sort();
        assert_eq!(ends, vec![gc(1, 1), gc(3, 1)]);
    }

    #[test]
    fn no_longest_path_without_openings() {
        assert!(longest_path(&MazeBitmap::walled(3, 3)).is_none());
    }
}
