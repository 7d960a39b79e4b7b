//! Randomized depth-first maze generation.
//!
//! This module contains [`MazeGenerator`], an explicit state machine that carves a perfect maze
//! one step at a time. Each call to [`MazeGenerator::step`] either carves a passage into an
//! unvisited room or backtracks out of a dead end, so a presentation layer can render the grid
//! between any two steps.

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom as _, Rng, SeedableRng as _};

use crate::{
    error::{MazeError, Result},
    grid::{Cell, Grid, Tile},
};

/// Smallest width or height that leaves an interior to carve.
pub const MIN_DIMENSION: usize = 3;

/// Cell every maze is carved from.
pub const ORIGIN: Cell = Cell::new(1, 1);

/// Offsets to the rooms two steps away; the cell halfway is the wall carved between them.
const ROOM_STRIDES: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// One unit of generation work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationEvent {
    /// A room and the wall leading into it were opened; the room is the new stack top.
    Carved(Cell),
    /// A dead end was popped off the stack without carving anything.
    StepBoundary,
}

/// Incremental randomized depth-first maze carver.
///
/// The generator owns the grid while it runs. Once [`is_finished`](Self::is_finished) reports
/// `true` the open cells form a spanning tree over every room (cell with odd coordinates inside
/// the border) and the outer border is untouched.
#[derive(Debug)]
pub struct MazeGenerator<R = StdRng> {
    /// Grid being carved.
    grid: Grid,
    /// Rooms on the current depth-first branch, deepest last.
    stack: Vec<Cell>,
    /// Direction order, shuffled in place before every step.
    directions: [(isize, isize); 4],
    /// Source of the per-step shuffle.
    rng: R,
    /// Seed the generator was built from, when known.
    seed: Option<u64>,
    /// Number of carve events emitted so far.
    carved: usize,
}

impl MazeGenerator<StdRng> {
    /// Creates a generator seeded from system entropy.
    ///
    /// The drawn seed is kept and exposed through [`seed`](Self::seed) so the run can be
    /// reproduced later.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimensions`] if either dimension is below [`MIN_DIMENSION`].
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    /// Creates a generator whose carve sequence is fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimensions`] if either dimension is below [`MIN_DIMENSION`].
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        let mut generator = Self::with_rng(width, height, StdRng::seed_from_u64(seed))?;
        generator.seed = Some(seed);
        Ok(generator)
    }
}

impl<R: Rng> MazeGenerator<R> {
    /// Creates a generator drawing its shuffles from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimensions`] if either dimension is below [`MIN_DIMENSION`].
    pub fn with_rng(width: usize, height: usize, rng: R) -> Result<Self> {
        validate_dimensions(width, height)?;

        let mut grid = Grid::walled(width, height)?;
        grid.set(ORIGIN, Tile::Open);
        debug!("maze generator created for a {width}x{height} grid");

        Ok(Self {
            grid,
            stack: vec![ORIGIN],
            directions: ROOM_STRIDES,
            rng,
            seed: None,
            carved: 0,
        })
    }

    /// Performs one unit of work, or returns `None` once the maze is complete.
    ///
    /// Calling this again after it returned `None` keeps returning `None` and leaves the grid
    /// untouched.
    pub fn step(&mut self) -> Option<GenerationEvent> {
        let current = *self.stack.last()?;
        self.directions.shuffle(&mut self.rng);

        let carve = self.directions.iter().find_map(|&(dx, dy)| {
            let room = current.offset(dx, dy)?;
            let inside = room.x >= 1
                && room.y >= 1
                && room.x + 1 < self.grid.width()
                && room.y + 1 < self.grid.height();
            if !inside || self.grid.get(room) != Some(Tile::Wall) {
                return None;
            }
            current.offset(dx / 2, dy / 2).map(|wall| (room, wall))
        });

        if let Some((room, wall)) = carve {
            self.grid.set(room, Tile::Open);
            self.grid.set(wall, Tile::Open);
            self.stack.push(room);
            self.carved += 1;
            trace!("carved {room} through {wall}");
            return Some(GenerationEvent::Carved(room));
        }

        let _dead_end = self.stack.pop();
        if self.stack.is_empty() {
            debug!("maze generation finished after {} carves", self.carved);
        }
        Some(GenerationEvent::StepBoundary)
    }

    /// Runs the remaining steps and returns how many were taken.
    pub fn run_to_end(&mut self) -> usize {
        let mut steps = 0;
        while self.step().is_some() {
            steps += 1;
        }
        steps
    }
}

impl<R> MazeGenerator<R> {
    /// Grid in its current, possibly partial, state.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Gives up the generator and keeps the grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Whether every room has been carved and backtracked out of.
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Seed the generator was built from, or `None` for a caller-supplied rng.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of rooms carved so far, not counting the origin.
    pub const fn carved(&self) -> usize {
        self.carved
    }

    /// Room currently on top of the depth-first stack.
    pub fn head(&self) -> Option<Cell> {
        self.stack.last().copied()
    }
}

impl<R: Rng> Iterator for MazeGenerator<R> {
    type Item = GenerationEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

/// Checks that a `width` x `height` grid has an interior to carve.
///
/// # Errors
///
/// Returns [`MazeError::InvalidDimensions`] naming the dimension that is too small.
pub fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    if width < MIN_DIMENSION {
        return Err(MazeError::InvalidDimensions {
            width,
            height,
            reason: "width must be at least 3",
        });
    }
    if height < MIN_DIMENSION {
        return Err(MazeError::InvalidDimensions {
            width,
            height,
            reason: "height must be at least 3",
        });
    }
    Ok(())
}

/// Carves a complete maze in one call.
///
/// # Errors
///
/// Returns [`MazeError::InvalidDimensions`] if either dimension is below [`MIN_DIMENSION`].
pub fn generate(width: usize, height: usize, seed: u64) -> Result<Grid> {
    let mut generator = MazeGenerator::with_seed(width, height, seed)?;
    let _steps = generator.run_to_end();
    Ok(generator.into_grid())
}

/// Room closest to the bottom-right corner of a `width` x `height` maze.
///
/// Rooms sit on odd coordinates, so for even dimensions this is one cell further in than the
/// last interior column or row. Dimensions below [`MIN_DIMENSION`] yield [`ORIGIN`].
pub const fn farthest_room(width: usize, height: usize) -> Cell {
    const fn last_odd(extent: usize) -> usize {
        if extent < MIN_DIMENSION {
            return 1;
        }
        let last = extent - 2;
        if last % 2 == 1 {
            last
        } else {
            last - 1
        }
    }

    Cell::new(last_odd(width), last_odd(height))
}
