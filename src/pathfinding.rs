//! Incremental A* search over maze grids.
//!
//! This module contains [`Pathfinder`], an explicit state machine running A* with a Manhattan
//! heuristic over the open cells of a [`Grid`]. Every call to [`Pathfinder::step`] either expands
//! one frontier entry or reveals one more cell of the path, and hands back a read-only
//! [`SearchSnapshot`] of the search state for rendering.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, BinaryHeap},
    rc::Rc,
};

use log::{debug, trace};

use crate::{
    error::{Endpoint, MazeError, Result},
    grid::{Cell, Grid},
};

/// Predecessor links recorded during a search; the start maps to `None`.
pub type CameFrom = BTreeMap<Cell, Option<Cell>>;

/// Manhattan distance between two cells.
///
/// Admissible and consistent for unit-cost orthogonal moves.
pub const fn manhattan(a: Cell, b: Cell) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Pending frontier entry.
///
/// The derived ordering compares `priority` first and then the cell, which gives the
/// `(x, y)` tie-break between equally promising entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    /// Cost so far plus the heuristic estimate to the goal.
    priority: usize,
    /// Cell waiting to be expanded.
    cell: Cell,
}

/// What a snapshot was emitted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotKind {
    /// A frontier entry was expanded; there is no path yet.
    Progress,
    /// One more cell of the path was walked back from the goal.
    Reveal,
    /// The search is over and the path is definitive (empty when unreachable).
    Final,
}

/// Read-only view of the search state after one step.
///
/// The view borrows the pathfinder, so the state it shows cannot change while it is held.
#[derive(Clone, Copy, Debug)]
pub struct SearchSnapshot<'a> {
    /// Why the snapshot was emitted.
    kind: SnapshotKind,
    /// Cells expanded so far.
    visited: &'a BTreeSet<Cell>,
    /// Pending frontier entries, stale ones included.
    frontier: &'a BinaryHeap<Reverse<FrontierEntry>>,
    /// Partial or final path, when the search has moved past expansion.
    path: Option<&'a [Cell]>,
}

impl<'a> SearchSnapshot<'a> {
    /// Why this snapshot was emitted.
    pub const fn kind(&self) -> SnapshotKind {
        self.kind
    }

    /// Whether this is the terminal snapshot.
    pub fn is_final(&self) -> bool {
        self.kind == SnapshotKind::Final
    }

    /// Cells expanded so far.
    pub const fn visited(&self) -> &'a BTreeSet<Cell> {
        self.visited
    }

    /// Distinct cells currently waiting in the frontier.
    pub fn frontier(&self) -> BTreeSet<Cell> {
        self.frontier.iter().map(|Reverse(entry)| entry.cell).collect()
    }

    /// Path revealed so far.
    ///
    /// `None` while cells are still being expanded. During the reveal the cells run from the goal
    /// backwards; the final snapshot runs from start to goal and is empty when the goal cannot be
    /// reached.
    pub const fn path(&self) -> Option<&'a [Cell]> {
        self.path
    }
}

/// Stage of the search state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Expanding frontier entries.
    Searching,
    /// Walking predecessor links back from the goal; holds the next cell to walk.
    Reconstructing(Cell),
    /// The final snapshot has been emitted.
    Finished,
}

/// Incremental A* solver over a finished maze grid.
///
/// A pathfinder runs exactly one search. Build a new one for every start and goal pair.
#[derive(Debug)]
pub struct Pathfinder {
    /// Grid being searched; never mutated.
    grid: Rc<Grid>,
    /// Cell the search starts from.
    start: Cell,
    /// Cell the search tries to reach.
    end: Cell,
    /// Predecessor of every discovered cell.
    came_from: CameFrom,
    /// Best known cost of every discovered cell.
    cost_so_far: BTreeMap<Cell, usize>,
    /// Min-heap of entries waiting to be expanded.
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    /// Cells already expanded.
    visited: BTreeSet<Cell>,
    /// Revealed path, goal-first until the final snapshot reverses it.
    path: Vec<Cell>,
    /// Current stage.
    phase: Phase,
    /// Kind of the most recently emitted snapshot, `None` before the first step.
    last: Option<SnapshotKind>,
    /// Number of frontier pops that expanded a cell.
    expanded: usize,
}

impl Pathfinder {
    /// Prepares a search from `start` to `end` over `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] or [`MazeError::BlockedEndpoint`] naming the endpoint
    /// that is outside the grid or on a wall.
    pub fn new<G: Into<Rc<Grid>>>(grid: G, start: Cell, end: Cell) -> Result<Self> {
        let grid = grid.into();
        validate_endpoint(&grid, Endpoint::Start, start)?;
        validate_endpoint(&grid, Endpoint::End, end)?;
        debug!("search started from {start} to {end}");

        Ok(Self {
            grid,
            start,
            end,
            came_from: BTreeMap::from([(start, None)]),
            cost_so_far: BTreeMap::from([(start, 0)]),
            frontier: BinaryHeap::from([Reverse(FrontierEntry {
                priority: 0,
                cell: start,
            })]),
            visited: BTreeSet::new(),
            path: Vec::new(),
            phase: Phase::Searching,
            last: None,
            expanded: 0,
        })
    }

    /// Performs one unit of work and returns a view of the resulting state.
    ///
    /// Returns `None` once the final snapshot has been emitted; further calls keep returning
    /// `None` without touching the state.
    pub fn step(&mut self) -> Option<SearchSnapshot<'_>> {
        let kind = match self.phase {
            Phase::Searching => self.expand_next(),
            Phase::Reconstructing(cursor) => self.reveal(cursor),
            Phase::Finished => return None,
        };
        self.last = Some(kind);
        Some(self.snapshot())
    }

    /// View of the state as of the most recent step.
    pub fn snapshot(&self) -> SearchSnapshot<'_> {
        let path = match self.last {
            None | Some(SnapshotKind::Progress) => None,
            Some(SnapshotKind::Reveal | SnapshotKind::Final) => Some(self.path.as_slice()),
        };

        SearchSnapshot {
            kind: self.last.unwrap_or(SnapshotKind::Progress),
            visited: &self.visited,
            frontier: &self.frontier,
            path,
        }
    }

    /// Runs the search to completion and returns the final path.
    pub fn solve(mut self) -> Vec<Cell> {
        while self.step().is_some() {}
        self.path
    }

    /// Final path, once the search has finished.
    pub fn path(&self) -> Option<&[Cell]> {
        (self.phase == Phase::Finished).then_some(self.path.as_slice())
    }

    /// Whether the final snapshot has been emitted.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Predecessor links recorded so far.
    pub const fn came_from(&self) -> &CameFrom {
        &self.came_from
    }

    /// Grid being searched.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell the search starts from.
    pub const fn start(&self) -> Cell {
        self.start
    }

    /// Cell the search tries to reach.
    pub const fn end(&self) -> Cell {
        self.end
    }

    /// Number of frontier pops that expanded a cell.
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Pops the best frontier entry and expands it, or starts the reveal when the goal is popped
    /// or the frontier runs dry.
    fn expand_next(&mut self) -> SnapshotKind {
        let Some(Reverse(FrontierEntry { cell: current, .. })) = self.frontier.pop() else {
            debug!("frontier exhausted after {} expansions", self.expanded);
            return self.reveal(self.end);
        };

        if current == self.end {
            debug!("goal {current} reached after {} expansions", self.expanded);
            return self.reveal(self.end);
        }

        let cost = self.cost_so_far.get(&current).copied().unwrap_or_default();
        let new_cost = cost + 1;
        for neighbor in self.grid.open_neighbors(current) {
            let improved = self
                .cost_so_far
                .get(&neighbor)
                .map_or(true, |&known| new_cost < known);
            if improved {
                let _previous_cost = self.cost_so_far.insert(neighbor, new_cost);
                let _previous_link = self.came_from.insert(neighbor, Some(current));
                self.frontier.push(Reverse(FrontierEntry {
                    priority: new_cost + manhattan(self.end, neighbor),
                    cell: neighbor,
                }));
            }
        }

        let _newly_visited = self.visited.insert(current);
        self.expanded += 1;
        trace!("expanded {current} at cost {cost}");
        SnapshotKind::Progress
    }

    /// Walks one predecessor link back from `cursor`.
    fn reveal(&mut self, cursor: Cell) -> SnapshotKind {
        if cursor == self.start {
            self.path.push(self.start);
            self.path.reverse();
            return self.finish();
        }

        self.path.push(cursor);
        match self.came_from.get(&cursor).copied().flatten() {
            Some(previous) => {
                self.phase = Phase::Reconstructing(previous);
                SnapshotKind::Reveal
            }
            None => {
                self.path.clear();
                self.finish()
            }
        }
    }

    /// Marks the search as done.
    fn finish(&mut self) -> SnapshotKind {
        self.phase = Phase::Finished;
        debug!(
            "search finished: {} cells visited, path of {} cells",
            self.visited.len(),
            self.path.len()
        );
        SnapshotKind::Final
    }
}

/// Rebuilds the start-to-end path from predecessor links.
///
/// Returns an empty path when a link is missing before `start` is reached. The walk has no
/// hidden state, so repeated calls over the same links agree.
pub fn reconstruct_path(came_from: &CameFrom, start: Cell, end: Cell) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = end;
    while current != start {
        path.push(current);
        match came_from.get(&current).copied().flatten() {
            Some(previous) => current = previous,
            None => return Vec::new(),
        }
    }
    path.push(start);
    path.reverse();
    path
}

/// Solves a grid in one call, without observing intermediate snapshots.
///
/// # Errors
///
/// Returns the same precondition errors as [`Pathfinder::new`].
pub fn astar<G: Into<Rc<Grid>>>(grid: G, start: Cell, end: Cell) -> Result<Vec<Cell>> {
    Ok(Pathfinder::new(grid, start, end)?.solve())
}

/// Checks that `cell` is a usable search endpoint.
fn validate_endpoint(grid: &Grid, endpoint: Endpoint, cell: Cell) -> Result<()> {
    if !grid.contains(cell) {
        return Err(MazeError::OutOfBounds {
            endpoint,
            cell,
            width: grid.width(),
            height: grid.height(),
        });
    }
    if !grid.is_open(cell) {
        return Err(MazeError::BlockedEndpoint { endpoint, cell });
    }
    Ok(())
}
