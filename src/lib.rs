//! Maze generation and A* solving as resumable, step-by-step computations.
//!
//! The core of this crate is two explicit state machines. [`generator::MazeGenerator`] carves a
//! perfect maze with randomized depth-first backtracking, and [`pathfinding::Pathfinder`] runs A*
//! over the finished [`grid::Grid`]. Each exposes a `step` method that performs exactly one unit
//! of work, so a caller can stop, inspect or render the state between any two steps.
//!
//! The remaining modules make up a terminal front end that animates both algorithms through
//! [`App`], plus a [`headless`] printer for non-interactive use.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod animation;
mod app;
pub mod config;
pub mod error;
mod events;
pub mod generator;
pub mod grid;
pub mod headless;
pub mod pathfinding;
mod types;
mod ui;

pub use app::App;
