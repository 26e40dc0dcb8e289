//! **maze_tiles** carves solvable maze tiles and stitches them into an unbounded tiled world that an
//! agent can walk one step at a time.
//!
//! - `samplable_set`: constant time insert/remove/contains/sample set used as the carving frontier
//! - `generators`: loop erased random walk (Wilson's algorithm) carving at double resolution
//! - `patch_store`: lazily built, seam stitched tiling of carved patches
//! - `environment`: the single agent walking over a patch store

pub mod bitmap;
pub mod cells;
pub mod config;
pub mod environment;
pub mod errors;
pub mod generators;
pub mod grid_coordinates;
pub mod patch;
pub mod patch_store;
pub mod pathing;
pub mod samplable_set;
pub mod units;
mod utils;
