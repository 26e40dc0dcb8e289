use docopt::Docopt;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{collections::HashSet, fs, path::Path};
use tracing::info;
use tracing_subscriber::EnvFilter;

use maze_tiles::{
    bitmap::MazeBitmap,
    config::{PatchStoreConfig, SeedPolicy},
    environment::{Action, TiledMazeEnvironment},
    generators,
    pathing,
    units::{Height, Width},
};

const USAGE: &str = "Maze Tiles

Usage:
    maze_tiles_driver -h | --help
    maze_tiles_driver carve [--width=<w> --height=<h> --seed=<s>] [--image-out=<path>] [--quiet]
    maze_tiles_driver walk [--steps=<n> --agent-seed=<s>] [--config=<path>] [--tile-width=<w>] [--tile-height=<h>] [--seam-openings=<n>] [--world-seed=<s>] [--coordinate-seeds] [--image-out=<path>]

Options:
    -h --help              Show this screen.
    --width=<w>            Cells across the carved maze [default: 10].
    --height=<h>           Cells up the carved maze [default: 8].
    --seed=<s>             Seed for carving a single maze [default: 0].
    --quiet                Do not print the carved maze as text.
    --steps=<n>            Number of random agent steps to take [default: 1000].
    --agent-seed=<s>       Seed for the random agent's choice of actions [default: 0].
    --config=<path>        TOML file with patch store settings. Command line settings override it.
    --tile-width=<w>       Cells across each tile.
    --tile-height=<h>      Cells up each tile.
    --seam-openings=<n>    Corridors opened across each shared tile edge.
    --world-seed=<s>       First tile seed, and the seed of the stitching decisions.
    --coordinate-seeds     Seed every tile from its coordinate instead of the order tiles are built in.
    --image-out=<path>     Save a grayscale PNG of the maze (carve) or of every built tile (walk).
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_carve: bool,
    cmd_walk: bool,
    flag_width: usize,
    flag_height: usize,
    flag_seed: u64,
    flag_quiet: bool,
    flag_steps: usize,
    flag_agent_seed: u64,
    flag_config: String,
    flag_tile_width: Option<usize>,
    flag_tile_height: Option<usize>,
    flag_seam_openings: Option<usize>,
    flag_world_seed: Option<u64>,
    flag_coordinate_seeds: bool,
    flag_image_out: String,
}

// The driver's own error types, chaining the library's errors and the io/image failures it adds.
mod errors {
    use error_chain::error_chain;
    error_chain! {
        links {
            Maze(maze_tiles::errors::Error, maze_tiles::errors::ErrorKind);
        }

        foreign_links {
            ImageSaveError(::image::ImageError);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: DriverArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.cmd_carve {
        carve(&args)
    } else if args.cmd_walk {
        walk(&args)
    } else {
        Ok(())
    }
}

fn carve(args: &DriverArgs) -> Result<()> {
    let maze = generators::carve_maze(Width(args.flag_width), Height(args.flag_height), args.flag_seed)?;

    if !args.flag_quiet {
        println!("{}", maze);
    }

    let longest = pathing::longest_path(&maze).map_or(0, |path| path.len());
    info!(width = args.flag_width,
          height = args.flag_height,
          seed = args.flag_seed,
          open = maze.open_count(),
          walls = maze.wall_count(),
          longest_path = longest,
          "carved maze");

    if !args.flag_image_out.is_empty() {
        save_bitmap_image(&maze, &args.flag_image_out)?;
    }
    Ok(())
}

fn walk(args: &DriverArgs) -> Result<()> {
    let config = store_config_from_args(args)?;
    info!(?config, "starting random walk");

    let mut env = TiledMazeEnvironment::new(config)?;
    let mut rng = XorShiftRng::seed_from_u64(args.flag_agent_seed);
    let mut visited_tiles = HashSet::new();
    visited_tiles.insert(env.observation().tile);

    let (mut moves, mut bumps, mut total_reward) = (0usize, 0usize, 0.0f64);
    for _ in 0..args.flag_steps {
        let action = Action::ALL[rng.gen_range(0..Action::ALL.len())];
        let outcome = env.step(action)?;
        total_reward += outcome.reward;
        if outcome.moved {
            moves += 1;
        } else {
            bumps += 1;
        }
        visited_tiles.insert(outcome.observation.tile);
    }

    let end = env.observation();
    info!(steps = args.flag_steps,
          moves,
          bumps,
          total_reward,
          tiles_visited = visited_tiles.len(),
          tiles_built = env.store().len(),
          final_tile = %end.tile,
          final_position = %end.position,
          "random walk finished");

    if !args.flag_image_out.is_empty() {
        if let Some(world) = env.store().to_image() {
            world.save(&args.flag_image_out)
                .chain_err(|| format!("Failed to save world image {}", args.flag_image_out))?;
        }
    }
    Ok(())
}

/// Defaults, overlaid by the `--config` file, overlaid by individual command line settings.
fn store_config_from_args(args: &DriverArgs) -> Result<PatchStoreConfig> {
    let mut config = if args.flag_config.is_empty() {
        PatchStoreConfig::default()
    } else {
        let text = fs::read_to_string(&args.flag_config)
            .chain_err(|| format!("Failed to read config file {}", args.flag_config))?;
        PatchStoreConfig::from_toml_str(&text)?
    };

    if let Some(w) = args.flag_tile_width {
        config.tile_width = w;
    }
    if let Some(h) = args.flag_tile_height {
        config.tile_height = h;
    }
    if let Some(n) = args.flag_seam_openings {
        config.seam_openings = n;
    }
    if let Some(s) = args.flag_world_seed {
        config.world_seed = s;
    }
    if args.flag_coordinate_seeds {
        config.seed_policy = SeedPolicy::Coordinate;
    }

    config.validate()?;
    Ok(config)
}

fn save_bitmap_image(maze: &MazeBitmap, file_path: &str) -> Result<()> {
    maze.to_image()
        .save(Path::new(file_path))
        .chain_err(|| format!("Failed to save maze image {}", file_path))?;
    Ok(())
}
