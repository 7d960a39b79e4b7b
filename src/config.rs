//! Command-line configuration.
//!
//! This module contains the [`Cli`] argument parser and the validated [`Settings`] the rest of the
//! application runs from. Validation happens before the terminal is taken over, so a bad argument
//! is reported as a plain error instead of a broken screen.

use std::{num::NonZeroUsize, time::Duration};

use clap::Parser;

use crate::{
    error::{Endpoint, MazeError, Result},
    generator::validate_dimensions,
    grid::Cell,
};

/// Default maze width in cells.
pub const DEFAULT_WIDTH: usize = 41;

/// Default maze height in cells.
pub const DEFAULT_HEIGHT: usize = 21;

/// Default delay between animation ticks in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 16;

/// Command-line arguments for the maze animator.
#[derive(Debug, Parser)]
#[command(name = "mazestep")]
#[command(
    author,
    version,
    about = "Generate a maze and solve it with A*, one animated step at a time"
)]
pub struct Cli {
    /// Maze width in cells (at least 3)
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Maze height in cells (at least 3)
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Random seed for a reproducible first maze
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Delay between animation ticks in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Algorithm steps performed per animation tick
    #[arg(short = 'n', long, default_value = "1")]
    pub steps_per_tick: NonZeroUsize,

    /// Skip the animations and show only finished results
    #[arg(long)]
    pub no_animate: bool,

    /// Start cell as `x,y`
    #[arg(long, value_name = "X,Y")]
    pub start: Option<Cell>,

    /// End cell as `x,y`; with --start the search begins once the maze is ready
    #[arg(long, value_name = "X,Y")]
    pub end: Option<Cell>,

    /// Print the solved maze to stdout instead of opening the interface
    #[arg(long)]
    pub print: bool,
}

impl Cli {
    /// Validates the arguments into [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimensions`] for a maze smaller than 3x3, and
    /// [`MazeError::OutOfBounds`] or [`MazeError::BlockedEndpoint`] for preselected endpoints
    /// outside the maze or on its always-walled border.
    pub fn settings(&self) -> Result<Settings> {
        validate_dimensions(self.width, self.height)?;
        if let Some(start) = self.start {
            check_interior(self.width, self.height, Endpoint::Start, start)?;
        }
        if let Some(end) = self.end {
            check_interior(self.width, self.height, Endpoint::End, end)?;
        }

        Ok(Settings {
            width: self.width,
            height: self.height,
            seed: self.seed,
            tick: Duration::from_millis(self.tick_ms),
            steps_per_tick: self.steps_per_tick,
            animate: !self.no_animate,
            start: self.start,
            end: self.end,
        })
    }
}

/// Validated runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Maze width in cells.
    pub width: usize,
    /// Maze height in cells.
    pub height: usize,
    /// Seed for the first maze; later mazes draw a fresh one.
    pub seed: Option<u64>,
    /// Delay between animation ticks.
    pub tick: Duration,
    /// Algorithm steps per animation tick.
    pub steps_per_tick: NonZeroUsize,
    /// Whether intermediate steps are shown.
    pub animate: bool,
    /// Preselected start cell.
    pub start: Option<Cell>,
    /// Preselected end cell.
    pub end: Option<Cell>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            steps_per_tick: NonZeroUsize::MIN,
            animate: true,
            start: None,
            end: None,
        }
    }
}

/// Rejects endpoints that can never be open in a generated maze.
fn check_interior(width: usize, height: usize, endpoint: Endpoint, cell: Cell) -> Result<()> {
    if cell.x >= width || cell.y >= height {
        return Err(MazeError::OutOfBounds {
            endpoint,
            cell,
            width,
            height,
        });
    }
    if cell.x == 0 || cell.y == 0 || cell.x + 1 == width || cell.y + 1 == height {
        return Err(MazeError::BlockedEndpoint { endpoint, cell });
    }
    Ok(())
}
