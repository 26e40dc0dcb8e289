//! Agent-facing wrapper over a patch store: a single agent walking the tiled world.
//!
//! Rewards and termination are placeholders for whatever environment embeds this one: every step
//! costs `STEP_REWARD` and an episode never ends on its own.

use error_chain::bail;
use tracing::trace;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, TileCoordinate};
use crate::config::PatchStoreConfig;
use crate::errors::*;
use crate::patch_store::PatchStore;

pub const STEP_REWARD: f64 = -1.0;

/// Where every episode begins: cell `(0, 0)` of the origin tile.
pub const ORIGIN_TILE: TileCoordinate = TileCoordinate { x: 0, y: 0 };
pub const ORIGIN_POSITION: Cartesian2DCoordinate = Cartesian2DCoordinate { x: 1, y: 1 };

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    pub fn from_code(code: u32) -> Result<Action> {
        match code {
            0 => Ok(Action::Up),
            1 => Ok(Action::Right),
            2 => Ok(Action::Down),
            3 => Ok(Action::Left),
            _ => bail!(ErrorKind::InvalidArgument(format!("unknown action code {}", code))),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }

    pub fn direction(self) -> CompassPrimary {
        match self {
            Action::Up => CompassPrimary::North,
            Action::Right => CompassPrimary::East,
            Action::Down => CompassPrimary::South,
            Action::Left => CompassPrimary::West,
        }
    }
}

/// The agent's logical position: which tile and where inside its bitmap.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Observation {
    pub tile: TileCoordinate,
    pub position: Cartesian2DCoordinate,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct StepOutcome {
    pub reward: f64,
    pub observation: Observation,
    pub done: bool,
    /// False when a wall rejected the move.
    pub moved: bool,
}

#[derive(Debug)]
pub struct TiledMazeEnvironment {
    store: PatchStore,
    tile: TileCoordinate,
    position: Cartesian2DCoordinate,
}

impl TiledMazeEnvironment {
    pub fn new(config: PatchStoreConfig) -> Result<TiledMazeEnvironment> {
        let mut env = TiledMazeEnvironment {
            store: PatchStore::new(config)?,
            tile: ORIGIN_TILE,
            position: ORIGIN_POSITION,
        };
        env.start()?;
        Ok(env)
    }

    /// Put the agent back at the origin. Tiles that were already built stay as they are.
    pub fn start(&mut self) -> Result<Observation> {
        self.tile = ORIGIN_TILE;
        self.position = ORIGIN_POSITION;
        self.store.add_patch(ORIGIN_TILE)?;
        Ok(self.observation())
    }

    pub fn step(&mut self, action: Action) -> Result<StepOutcome> {
        let (tile, position) = self.store.translate(self.tile, self.position, action.direction())?;
        let moved = (tile, position) != (self.tile, self.position);
        trace!(?action, tile = %tile, position = %position, moved, "step");

        self.tile = tile;
        self.position = position;
        Ok(StepOutcome {
            reward: STEP_REWARD,
            observation: self.observation(),
            done: false,
            moved,
        })
    }

    /// `step` for drivers that speak in integer action codes.
    pub fn step_code(&mut self, code: u32) -> Result<StepOutcome> {
        self.step(Action::from_code(code)?)
    }

    #[inline]
    pub fn observation(&self) -> Observation {
        Observation {
            tile: self.tile,
            position: self.position,
        }
    }

    #[inline]
    pub fn store(&self) -> &PatchStore {
        &self.store
    }
}
